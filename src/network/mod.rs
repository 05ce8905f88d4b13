pub mod cache;
pub mod gradients;
pub mod network;
pub mod persist;

pub use cache::ForwardCache;
pub use gradients::Gradients;
pub use network::Network;
