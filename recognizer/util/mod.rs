pub mod image;
pub mod query;
