use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::data::download;
use crate::data::idx::{decompress, pair_samples, parse_images, parse_labels};
use crate::data::sample::Sample;
use crate::error::Result;

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Loads MNIST samples from a directory or a base URL.
///
/// The four standard file names are appended to `location`. If `location`
/// is an `http(s)://` URL the gzipped `<name>.gz` files are fetched once into
/// `cache_dir`. A directory may hold either form; the plain file wins.
#[derive(Debug, Clone)]
pub struct MnistSource {
    location: String,
    cache_dir: PathBuf,
}

impl MnistSource {
    pub fn new(location: impl Into<String>, cache_dir: impl Into<PathBuf>) -> MnistSource {
        MnistSource {
            location: location.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn file_location(&self, name: &str) -> String {
        if download::is_url(&self.location) {
            return format!("{}/{}.gz", self.location.trim_end_matches('/'), name);
        }
        let plain = Path::new(&self.location).join(name);
        let gzipped = Path::new(&self.location).join(format!("{}.gz", name));
        if !plain.exists() && gzipped.is_file() {
            return gzipped.to_string_lossy().into_owned();
        }
        plain.to_string_lossy().into_owned()
    }

    /// The 60k-sample training file pair.
    pub fn training_set(&self) -> Result<Vec<Sample>> {
        self.load_pair(TRAIN_IMAGES, TRAIN_LABELS)
    }

    /// The 10k-sample test file pair.
    pub fn test_set(&self) -> Result<Vec<Sample>> {
        self.load_pair(TEST_IMAGES, TEST_LABELS)
    }

    fn load_pair(&self, images: &str, labels: &str) -> Result<Vec<Sample>> {
        let samples = load_files(
            &self.file_location(images),
            &self.file_location(labels),
            &self.cache_dir,
        )?;
        info!("loaded {} samples from {} + {}", samples.len(), images, labels);
        Ok(samples)
    }
}

/// Loads and pairs one image file and one label file. Either may be a URL,
/// and either may be gzip-compressed.
pub fn load_files(image_location: &str, label_location: &str, cache_dir: &Path) -> Result<Vec<Sample>> {
    let image_path = download::resolve(image_location, cache_dir)?;
    let label_path = download::resolve(label_location, cache_dir)?;
    debug!(images = %image_path.display(), labels = %label_path.display(), "reading dataset files");

    let image_name = image_path.to_string_lossy();
    let label_name = label_path.to_string_lossy();
    let images = parse_images(&decompress(fs::read(&image_path)?, &image_name)?, &image_name)?;
    let labels = parse_labels(&decompress(fs::read(&label_path)?, &label_name)?, &label_name)?;
    pair_samples(images, labels)
}

/// Splits off the last sixth as a validation set: the first `5*len/6`
/// samples are returned for training, the rest for validation.
pub fn split_training_set(mut samples: Vec<Sample>) -> (Vec<Sample>, Vec<Sample>) {
    let n = 5 * samples.len() / 6;
    let validation = samples.split_off(n);
    (samples, validation)
}
