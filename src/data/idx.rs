//! Parsers for the IDX binary files MNIST ships in.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic, big-endian)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic, big-endian)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, 9]
//! ```

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::data::sample::{one_hot, Sample, CLASS_COUNT};
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflates `bytes` when they start with the gzip magic; anything else is
/// returned unchanged.
pub fn decompress(bytes: Vec<u8>, file: &str) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut out)
        .map_err(|source| Error::Gzip { file: file.to_owned(), source })?;
    debug!(file, compressed = bytes.len(), inflated = out.len(), "decompressed gzip file");
    Ok(out)
}

/// Reads the big-endian `u32` at `offset`. Callers check the length first.
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn check_header(bytes: &[u8], header_len: usize, magic: u32, file: &str) -> Result<()> {
    if bytes.len() < header_len {
        return Err(Error::Truncated {
            file: file.to_owned(),
            needed: header_len,
            actual: bytes.len(),
        });
    }
    let found = read_u32(bytes, 0);
    if found != magic {
        return Err(Error::BadMagic {
            file: file.to_owned(),
            expected: magic,
            found,
        });
    }
    Ok(())
}

/// Parses an IDX3 image file into `rows*cols x 1` column vectors with each
/// pixel scaled into `[0, 1]`.
///
/// `file` only labels error messages.
pub fn parse_images(bytes: &[u8], file: &str) -> Result<Vec<Matrix>> {
    check_header(bytes, IMAGE_HEADER_LEN, IMAGE_MAGIC, file)?;

    let n_items = read_u32(bytes, 4) as usize;
    let rows = read_u32(bytes, 8) as usize;
    let cols = read_u32(bytes, 12) as usize;

    let overflow = || Error::BadHeader {
        file: file.to_owned(),
        detail: format!("dimensions {}x{}x{} overflow usize", n_items, rows, cols),
    };
    let n_pixels = rows.checked_mul(cols).ok_or_else(overflow)?;
    if n_pixels == 0 && n_items > 0 {
        return Err(Error::BadHeader {
            file: file.to_owned(),
            detail: format!("{} images of {}x{} pixels", n_items, rows, cols),
        });
    }
    let needed = n_items.checked_mul(n_pixels)
        .and_then(|len| len.checked_add(IMAGE_HEADER_LEN))
        .ok_or_else(overflow)?;

    if bytes.len() < needed {
        return Err(Error::Truncated {
            file: file.to_owned(),
            needed,
            actual: bytes.len(),
        });
    }

    debug!(file, n_items, rows, cols, "parsed image header");

    if n_items == 0 {
        return Ok(Vec::new());
    }

    Ok(bytes[IMAGE_HEADER_LEN..needed]
        .chunks_exact(n_pixels)
        .map(|chunk| Matrix::from_column_vector(chunk.iter().map(|&px| px as f64 / 255.0).collect()))
        .collect())
}

/// Parses an IDX1 label file into 10-row one-hot column vectors.
///
/// A byte outside `[0, 9]` is reported as [`Error::LabelOutOfRange`].
pub fn parse_labels(bytes: &[u8], file: &str) -> Result<Vec<Matrix>> {
    check_header(bytes, LABEL_HEADER_LEN, LABEL_MAGIC, file)?;

    let n_items = read_u32(bytes, 4) as usize;
    let needed = LABEL_HEADER_LEN.checked_add(n_items).ok_or_else(|| Error::BadHeader {
        file: file.to_owned(),
        detail: format!("label count {} overflows usize", n_items),
    })?;
    if bytes.len() < needed {
        return Err(Error::Truncated {
            file: file.to_owned(),
            needed,
            actual: bytes.len(),
        });
    }

    debug!(file, n_items, "parsed label header");

    bytes[LABEL_HEADER_LEN..needed]
        .iter()
        .enumerate()
        .map(|(index, &label)| {
            if label as usize >= CLASS_COUNT {
                return Err(Error::LabelOutOfRange { index, label });
            }
            Ok(one_hot(label as usize, CLASS_COUNT))
        })
        .collect()
}

/// Pairs image `i` with label `i`. Differing counts are an error rather
/// than a silent truncation.
pub fn pair_samples(images: Vec<Matrix>, labels: Vec<Matrix>) -> Result<Vec<Sample>> {
    if images.len() != labels.len() {
        return Err(Error::CountMismatch {
            images: images.len(),
            labels: labels.len(),
        });
    }
    Ok(images.into_iter()
        .zip(labels)
        .map(|(input, label)| Sample::new(input, label))
        .collect())
}
