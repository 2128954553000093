//! Run configuration: everything the binary needs to build a network, load
//! data and train, loadable from a JSON file.
//!
//! ```json
//! {
//!   "dataset": "https://example.com/mnist",
//!   "network": { "layers": [
//!     { "size": 24, "input_size": 784, "activation": { "type": "sigmoid" } },
//!     { "size": 10, "input_size": 24,  "activation": { "type": "sigmoid" } }
//!   ]},
//!   "training": { "epochs": 20, "eta": 4.0, "batch_count": 6000 },
//!   "init_range": 0.001,
//!   "seed": 7
//! }
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::download::default_cache_dir;
use crate::error::{Error, Result};
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory or base URL holding the four MNIST files.
    pub dataset: String,
    /// Where downloaded files are cached. `None` means `default_cache_dir()`.
    pub cache_dir: Option<PathBuf>,
    pub network: NetworkSpec,
    pub training: TrainConfig,
    /// Half-width of the uniform range used to initialize parameters.
    pub init_range: f64,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            dataset: "./dataset".into(),
            cache_dir: None,
            network: NetworkSpec::mnist(),
            training: TrainConfig::default(),
            init_range: 0.001,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()?;
        if !self.init_range.is_finite() || self.init_range < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "init_range must be finite and non-negative, got {}",
                self.init_range
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file previously written by `save_json`
    /// (or by hand).
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
