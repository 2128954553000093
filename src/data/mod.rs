pub mod download;
pub mod idx;
pub mod sample;
pub mod source;

pub use sample::Sample;
pub use source::{split_training_set, MnistSource};
