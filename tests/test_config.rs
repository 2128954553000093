// RunConfig JSON loading, defaults and validation.

use digit_mlp::{ActivationFunction, NetworkSpec, RunConfig, TrainConfig};

#[test]
fn defaults_reproduce_mnist_setup() {
    let config = RunConfig::default();
    assert_eq!(config.network.sizes(), vec![784, 24, 10]);
    assert!(config.network.layers.iter().all(|l| l.activation == ActivationFunction::Sigmoid));
    assert_eq!(config.training, TrainConfig::new(20, 4.0, 6000));
    assert_eq!(config.init_range, 0.001);
    assert_eq!(config.dataset, "./dataset");
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_fills_in_defaults() {
    let config: RunConfig = serde_json::from_str(
        r#"{ "training": { "epochs": 3 }, "seed": 5, "dataset": "https://example.com/mnist" }"#,
    )
    .unwrap();
    assert_eq!(config.training.epochs, 3);
    assert_eq!(config.training.eta, 4.0);
    assert_eq!(config.training.batch_count, 6000);
    assert_eq!(config.seed, Some(5));
    assert_eq!(config.network, NetworkSpec::mnist());
}

#[test]
fn save_then_load_round_trips() {
    let path = std::env::temp_dir().join(format!("digit-mlp-config-{}.json", std::process::id()));
    let mut config = RunConfig::default();
    config.network = NetworkSpec::from_sizes(&[784, 30, 16, 10], ActivationFunction::ScaledSigmoid { scale: 0.5 });
    config.seed = Some(42);
    config.save_json(&path).unwrap();

    let loaded = RunConfig::load_json(&path).unwrap();
    assert_eq!(loaded, config);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn validation_catches_bad_values() {
    let mut config = RunConfig::default();
    config.init_range = -1.0;
    assert!(config.validate().is_err());

    let mut config = RunConfig::default();
    config.training.eta = 0.0;
    assert!(config.validate().is_err());

    let mut config = RunConfig::default();
    config.network.layers[1].input_size = 7;
    assert!(config.validate().is_err());
}

#[test]
fn malformed_json_is_an_error() {
    let path = std::env::temp_dir().join(format!("digit-mlp-bad-{}.json", std::process::id()));
    std::fs::write(&path, "{ not json").unwrap();
    let err = RunConfig::load_json(&path).unwrap_err();
    assert!(matches!(err, digit_mlp::Error::Json(_)));
    std::fs::remove_file(&path).unwrap();
}
