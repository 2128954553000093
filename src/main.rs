//! Trains a sigmoid MLP on MNIST.
//!
//! Run with:
//!   cargo run --release -- -d ./dataset
//!   cargo run --release -- -d https://example.com/mnist --epochs 5 --seed 1

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use digit_mlp::data::split_training_set;
use digit_mlp::{ActivationFunction, MnistSource, Network, NetworkSpec, RunConfig, Trainer};

#[derive(Parser, Debug)]
#[command(name = "digit-mlp")]
#[command(about = "Train a from-scratch MLP on MNIST with minibatch SGD")]
struct Args {
    /// MNIST directory or base URL (files are cached after the first download)
    #[arg(short, long)]
    dataset: Option<String>,

    /// JSON run configuration; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Learning-rate scale
    #[arg(long)]
    eta: Option<f64>,

    /// Minibatch size divisor: batch_size = training_len / batch_count
    #[arg(long)]
    batch_count: Option<usize>,

    /// Hidden layer size; repeat for several hidden layers
    #[arg(long = "hidden")]
    hidden: Vec<usize>,

    /// RNG seed for initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Download cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Write per-epoch statistics as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load_json(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(epochs) = self.epochs {
            config.training.epochs = epochs;
        }
        if let Some(eta) = self.eta {
            config.training.eta = eta;
        }
        if let Some(batch_count) = self.batch_count {
            config.training.batch_count = batch_count;
        }
        if !self.hidden.is_empty() {
            let input = config.network.input_size().unwrap_or(28 * 28);
            let output = config.network.output_size().unwrap_or(10);
            let mut sizes = vec![input];
            sizes.extend(&self.hidden);
            sizes.push(output);
            config.network = NetworkSpec::from_sizes(&sizes, ActivationFunction::Sigmoid);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.cache_dir.is_some() {
            config.cache_dir = self.cache_dir.clone();
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.run_config()?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let source = MnistSource::new(config.dataset.clone(), config.cache_dir());
    let training = source.training_set()
        .with_context(|| format!("loading training set from {}", source.location()))?;
    let (mut training, validation) = split_training_set(training);
    let test = source.test_set()
        .with_context(|| format!("loading test set from {}", source.location()))?;
    info!(
        "{} training, {} validation, {} test samples",
        training.len(),
        validation.len(),
        test.len()
    );

    let mut network = Network::from_spec(&config.network, config.init_range, &mut rng)?;
    info!("network {:?}, eta {}, {} epochs", config.network.sizes(), config.training.eta, config.training.epochs);

    let mut trainer = Trainer::new(config.training.clone(), rng)?;
    let history = trainer.train(&mut network, &mut training, &validation, &test)?;

    if let Some(last) = history.last() {
        if let Some(acc) = last.test_accuracy {
            info!("final test accuracy {:.2}%", acc * 100.0);
        }
    }

    if let Some(path) = &args.report {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating report {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &history)?;
        info!("wrote epoch report to {}", path.display());
    }

    Ok(())
}
