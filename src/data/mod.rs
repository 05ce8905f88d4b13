pub mod idx;
pub mod sample;

pub use idx::{load_idx_pair, parse_idx_pair};
pub use sample::{argmax, one_hot, Sample};
