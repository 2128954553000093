use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Hyperparameters for a `Trainer` run.
///
/// # Fields
/// - `epochs`      — number of full passes over the training data
/// - `eta`         — learning-rate scale applied to averaged batch gradients
/// - `batch_count` — divisor sizing the minibatches:
///                   `batch_size = training_len / batch_count`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub eta: f64,
    pub batch_count: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, eta: f64, batch_count: usize) -> Self {
        TrainConfig { epochs, eta, batch_count }
    }

    /// Checks the values that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_count == 0 {
            return Err(Error::InvalidConfig("batch_count must be at least 1".into()));
        }
        if !self.eta.is_finite() || self.eta <= 0.0 {
            return Err(Error::InvalidConfig(format!("eta must be positive and finite, got {}", self.eta)));
        }
        Ok(())
    }

    /// Minibatch size for a training set of `training_len` samples.
    pub fn batch_size(&self, training_len: usize) -> Result<usize> {
        self.validate()?;
        let size = training_len / self.batch_count;
        if size == 0 {
            return Err(Error::InvalidConfig(format!(
                "batch_count {} exceeds the {} available training samples",
                self.batch_count, training_len
            )));
        }
        Ok(size)
    }
}

impl Default for TrainConfig {
    /// 20 epochs, eta 4.0, 6000 batches (size 8 on the 50k MNIST split).
    fn default() -> Self {
        TrainConfig {
            epochs: 20,
            eta: 4.0,
            batch_count: 6000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_floors() {
        let config = TrainConfig::new(1, 1.0, 6000);
        assert_eq!(config.batch_size(50_000).unwrap(), 8);
        assert_eq!(TrainConfig::new(1, 1.0, 3).batch_size(10).unwrap(), 3);
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(TrainConfig::new(0, 1.0, 1).validate().is_err());
        assert!(TrainConfig::new(1, 1.0, 0).validate().is_err());
        assert!(TrainConfig::new(1, f64::NAN, 1).validate().is_err());
        assert!(TrainConfig::new(1, 1.0, 11).batch_size(10).is_err());
    }
}
