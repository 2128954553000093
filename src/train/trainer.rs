use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::data::sample::Sample;
use crate::error::{Error, Result};
use crate::network::gradients::Gradients;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Shuffles `items` in place (Fisher–Yates, driven by `rng`).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Minibatch SGD driver.
///
/// Owns the hyperparameters, the RNG used for per-epoch shuffling, and the
/// gradient accumulator reused across minibatches.
pub struct Trainer<R: Rng> {
    config: TrainConfig,
    optimizer: Sgd,
    rng: R,
}

impl<R: Rng> Trainer<R> {
    pub fn new(config: TrainConfig, rng: R) -> Result<Trainer<R>> {
        config.validate()?;
        let optimizer = Sgd::new(config.eta);
        Ok(Trainer { config, optimizer, rng })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Trains `network` for `config.epochs` epochs and returns one
    /// `EpochStats` per epoch, in order.
    ///
    /// `training` is reshuffled in place every epoch. After each epoch the
    /// network is scored on `validation` and `test`; an empty set is skipped
    /// and reported as `None`.
    pub fn train(
        &mut self,
        network: &mut Network,
        training: &mut [Sample],
        validation: &[Sample],
        test: &[Sample],
    ) -> Result<Vec<EpochStats>> {
        check_shapes(network, training, "training")?;
        check_shapes(network, validation, "validation")?;
        check_shapes(network, test, "test")?;

        let batch_size = self.config.batch_size(training.len())?;
        let batches = training.len() / batch_size;
        let dropped = training.len() - batches * batch_size;
        debug!(batch_size, batches, "minibatch layout");
        if dropped > 0 {
            warn!("{} trailing samples do not fill a minibatch and are skipped each epoch", dropped);
        }

        let mut accumulated = Gradients::zeros_like(&network.layers);
        let mut history = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            let t_start = Instant::now();

            shuffle(training, &mut self.rng);
            let total_cost: f64 = training
                .chunks_exact(batch_size)
                .map(|batch| self.update_mini_batch(network, batch, &mut accumulated))
                .sum();
            let train_cost = total_cost / (batches * batch_size) as f64;

            let validation_accuracy = (!validation.is_empty()).then(|| network.evaluate(validation));
            let test_accuracy = (!test.is_empty()).then(|| network.evaluate(test));

            let stats = EpochStats {
                epoch,
                total_epochs: self.config.epochs,
                batches,
                train_cost,
                validation_accuracy,
                test_accuracy,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            log_epoch(&stats);
            history.push(stats);
        }

        Ok(history)
    }

    /// One SGD step from a single minibatch. Returns the summed cost of the
    /// batch's samples measured before the update.
    pub fn update_mini_batch(
        &self,
        network: &mut Network,
        batch: &[Sample],
        accumulated: &mut Gradients,
    ) -> f64 {
        accumulated.reset();
        let mut cost = 0.0;
        for sample in batch {
            let (grads, c) = network.backprop_with_cost(sample);
            accumulated.accumulate(&grads);
            cost += c;
        }
        self.optimizer.step(&mut network.layers, accumulated, batch.len());
        cost
    }
}

/// Rejects samples whose input or label length does not match the
/// network's input and output layer sizes.
fn check_shapes(network: &Network, samples: &[Sample], set: &str) -> Result<()> {
    let (inputs, outputs) = (network.input_size(), network.output_size());
    for (index, sample) in samples.iter().enumerate() {
        let (got_in, got_out) = (sample.input().row_count(), sample.label().row_count());
        if got_in != inputs || got_out != outputs {
            return Err(Error::InvalidConfig(format!(
                "{} sample {} has {} inputs and {} label rows, but the network maps {} inputs to {} outputs",
                set, index, got_in, got_out, inputs, outputs
            )));
        }
    }
    Ok(())
}

fn log_epoch(stats: &EpochStats) {
    let pct = |acc: Option<f64>| acc.map(|a| format!("{:.2}%", a * 100.0)).unwrap_or_else(|| "-".into());
    info!(
        "epoch {:2}/{}: cost {:.6}, validation accuracy {}, test accuracy {} ({} ms)",
        stats.epoch,
        stats.total_epochs,
        stats.train_cost,
        pct(stats.validation_accuracy),
        pct(stats.test_accuracy),
        stats.elapsed_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::spec::NetworkSpec;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items: Vec<u32> = (0..100).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }

    #[test]
    fn update_mini_batch_matches_manual_step() {
        let mut rng = StdRng::seed_from_u64(9);
        let spec = NetworkSpec::from_sizes(&[2, 2, 1], ActivationFunction::Sigmoid);
        let mut network = Network::from_spec(&spec, 0.5, &mut rng).unwrap();
        let batch = vec![
            Sample::with_class(vec![0.1, 0.9], 0, 1),
            Sample::with_class(vec![0.8, 0.3], 0, 1),
        ];

        let mut expected = network.clone();
        let g0 = network.backprop(&batch[0]);
        let g1 = network.backprop(&batch[1]);
        for (i, layer) in expected.layers.iter_mut().enumerate() {
            let w = g0.weights()[i].add(&g1.weights()[i]).scale(1.5 / 2.0);
            let b = g0.biases()[i].add(&g1.biases()[i]).scale(1.5 / 2.0);
            layer.weights.sub_with(&w);
            layer.biases.sub_with(&b);
        }

        let trainer = Trainer::new(TrainConfig::new(1, 1.5, 1), rng).unwrap();
        let mut acc = Gradients::zeros_like(&network.layers);
        trainer.update_mini_batch(&mut network, &batch, &mut acc);

        for (got, want) in network.layers.iter().zip(expected.layers.iter()) {
            assert_eq!(got.weights, want.weights);
            assert_eq!(got.biases, want.biases);
        }
    }

    #[test]
    fn trailing_partial_batch_is_dropped() {
        let mut rng = StdRng::seed_from_u64(2);
        let spec = NetworkSpec::from_sizes(&[1, 2], ActivationFunction::Sigmoid);
        let mut network = Network::from_spec(&spec, 0.1, &mut rng).unwrap();
        let mut training: Vec<Sample> = (0..11)
            .map(|i| Sample::with_class(vec![i as f64 / 11.0], i % 2, 2))
            .collect();

        let mut trainer = Trainer::new(TrainConfig::new(2, 0.5, 3), rng).unwrap();
        let history = trainer.train(&mut network, &mut training, &[], &[]).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].batches, 3);
        assert_eq!(history[1].epoch, 2);
        assert!(history[0].validation_accuracy.is_none());
        assert!(history[0].test_accuracy.is_none());
        assert_eq!(training.len(), 11);
    }

    #[test]
    fn sample_shape_mismatch_is_config_error() {
        let mut rng = StdRng::seed_from_u64(5);
        let spec = NetworkSpec::from_sizes(&[3, 2, 2], ActivationFunction::Sigmoid);
        let mut network = Network::from_spec(&spec, 0.1, &mut rng).unwrap();
        let before = network.clone();
        let mut training: Vec<Sample> = (0..4)
            .map(|i| Sample::with_class(vec![0.1, 0.2], i % 2, 2))
            .collect();

        let mut trainer = Trainer::new(TrainConfig::new(1, 0.5, 2), rng).unwrap();
        let err = trainer.train(&mut network, &mut training, &[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        for (got, want) in network.layers.iter().zip(before.layers.iter()) {
            assert_eq!(got.weights, want.weights);
        }
    }

    #[test]
    fn label_width_mismatch_in_test_set_is_config_error() {
        let mut rng = StdRng::seed_from_u64(6);
        let spec = NetworkSpec::from_sizes(&[2, 2], ActivationFunction::Sigmoid);
        let mut network = Network::from_spec(&spec, 0.1, &mut rng).unwrap();
        let mut training = vec![Sample::with_class(vec![0.1, 0.2], 1, 2)];
        let test = vec![Sample::with_class(vec![0.1, 0.2], 1, 10)];

        let mut trainer = Trainer::new(TrainConfig::new(1, 0.5, 1), rng).unwrap();
        let err = trainer.train(&mut network, &mut training, &[], &test).unwrap_err();
        assert!(err.to_string().contains("test sample 0"));
    }
}
