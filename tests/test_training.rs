// End-to-end training on a linearly separable synthetic problem, plus the
// statistical properties of the per-epoch shuffle.

use std::collections::HashSet;

use digit_mlp::train::shuffle;
use digit_mlp::{ActivationFunction, Network, NetworkSpec, Sample, TrainConfig, Trainer};
use rand::{rngs::StdRng, Rng, SeedableRng};

// Class 1 iff x + y > 1, inputs uniform in the unit square.
fn threshold_samples(n: usize, rng: &mut StdRng) -> Vec<Sample> {
    (0..n)
        .map(|_| {
            let x: f64 = rng.gen();
            let y: f64 = rng.gen();
            let class = usize::from(x + y > 1.0);
            Sample::with_class(vec![x, y], class, 2)
        })
        .collect()
}

#[test]
fn training_improves_accuracy() {
    let mut rng = StdRng::seed_from_u64(12345);
    let mut training = threshold_samples(400, &mut rng);
    let test = threshold_samples(200, &mut rng);

    let spec = NetworkSpec::from_sizes(&[2, 3, 2], ActivationFunction::Sigmoid);
    let mut network = Network::from_spec(&spec, 1.0, &mut rng).unwrap();

    let mut trainer = Trainer::new(TrainConfig::new(80, 1.0, 40), rng).unwrap();
    let history = trainer.train(&mut network, &mut training, &[], &test).unwrap();

    assert_eq!(history.len(), 80);
    assert!(history.iter().all(|s| s.batches == 40));
    let first = history[0].test_accuracy.unwrap();
    let last = history[79].test_accuracy.unwrap();
    assert!(last > first, "accuracy did not improve: {} -> {}", first, last);
    assert!(last >= 0.85, "final accuracy too low: {}", last);
    assert!(history[79].train_cost < history[0].train_cost);
    assert_eq!(network.evaluate(&test), last);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(99);
        let mut training = threshold_samples(60, &mut rng);
        let validation = threshold_samples(20, &mut rng);
        let spec = NetworkSpec::from_sizes(&[2, 3, 2], ActivationFunction::Sigmoid);
        let mut network = Network::from_spec(&spec, 0.5, &mut rng).unwrap();
        let mut trainer = Trainer::new(TrainConfig::new(3, 2.0, 6), rng).unwrap();
        let history = trainer.train(&mut network, &mut training, &validation, &[]).unwrap();
        (history.iter().map(|s| s.train_cost).collect::<Vec<_>>(), network.layers[0].weights.clone())
    };
    let (costs_a, weights_a) = run();
    let (costs_b, weights_b) = run();
    assert_eq!(costs_a, costs_b);
    assert_eq!(weights_a, weights_b);
}

#[test]
fn rejects_batch_count_larger_than_training_set() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut training = threshold_samples(5, &mut rng);
    let spec = NetworkSpec::from_sizes(&[2, 2], ActivationFunction::Sigmoid);
    let mut network = Network::from_spec(&spec, 0.1, &mut rng).unwrap();
    let mut trainer = Trainer::new(TrainConfig::new(1, 1.0, 6), rng).unwrap();
    assert!(trainer.train(&mut network, &mut training, &[], &[]).is_err());
}

#[test]
fn shuffle_preserves_multiset() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut items = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3];
    let mut expected = items.clone();
    shuffle(&mut items, &mut rng);
    items.sort_unstable();
    expected.sort_unstable();
    assert_eq!(items, expected);
}

#[test]
fn shuffle_reaches_every_ordering() {
    let mut rng = StdRng::seed_from_u64(31337);
    let mut seen = HashSet::new();
    for _ in 0..600 {
        let mut items = [0u8, 1, 2];
        shuffle(&mut items, &mut rng);
        seen.insert(items);
    }
    assert_eq!(seen.len(), 6);
}
