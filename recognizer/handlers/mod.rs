pub mod model;
pub mod recognize;
