use serde::{Serialize, Deserialize};

/// Per-epoch training statistics returned by `Trainer::train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Minibatches processed this epoch.
    pub batches: usize,
    /// Mean quadratic cost over the samples trained on this epoch.
    pub train_cost: f64,
    /// Validation accuracy as a fraction in [0, 1], if a validation set was given.
    pub validation_accuracy: Option<f64>,
    /// Test accuracy as a fraction in [0, 1], if a test set was given.
    pub test_accuracy: Option<f64>,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
