pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Gradients, Network, NetworkSpec, LayerSpec};
pub use loss::quadratic::QuadraticCost;
pub use optim::sgd::Sgd;
pub use train::{EpochStats, TrainConfig, Trainer};
pub use data::{MnistSource, Sample};
pub use config::RunConfig;
pub use error::{Error, Result};
