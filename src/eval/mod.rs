pub mod evaluator;

pub use evaluator::{average_cost, evaluate, Evaluation};
