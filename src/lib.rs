pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod eval;
pub mod data;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use network::{ForwardCache, Gradients, Network};
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::{train_loop, EpochStats, TrainConfig};
pub use eval::{average_cost, evaluate, Evaluation};
pub use data::{load_idx_pair, parse_idx_pair, Sample};
pub use error::{NetError, Result};
