use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Default download cache: `$HOME/.cache/download`, or `.cache` when no
/// home directory is known.
pub fn default_cache_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Path::new(&home).join(".cache").join("download"),
        _ => PathBuf::from(".cache"),
    }
}

/// Turns a dataset location into a local path.
///
/// Plain paths are returned unchanged. URLs are downloaded into `cache_dir`
/// under their final path segment, once; later calls return the cached file
/// without touching the network.
pub fn resolve(location: &str, cache_dir: &Path) -> Result<PathBuf> {
    if !is_url(location) {
        return Ok(PathBuf::from(location));
    }

    let name = location
        .split(['?', '#'])
        .next()
        .and_then(|s| s.rsplit('/').next())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::BadCachePath(PathBuf::from(location)))?;

    fs::create_dir_all(cache_dir)?;
    let cached = cache_dir.join(name);
    if cached.is_file() {
        debug!(url = location, path = %cached.display(), "using cached download");
        return Ok(cached);
    }

    info!("downloading {} to {}", location, cached.display());
    let bytes = fetch(location)?;

    store(&cached, &bytes)?;
    info!("{} downloaded, total {} bytes", location, bytes.len());

    Ok(cached)
}

/// Writes `bytes` to `<target>.part` and renames it onto `target`, so a
/// failed download never looks like a cache hit. The partial file is
/// removed if any step fails.
fn store(target: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial = target.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let written = (|| -> std::io::Result<()> {
        let mut out = fs::File::create(&partial)?;
        out.write_all(bytes)?;
        out.sync_all()?;
        fs::rename(&partial, target)
    })();
    if let Err(err) = written {
        let _ = fs::remove_file(&partial);
        return Err(err.into());
    }
    Ok(())
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let wrap = |source| Error::Download { url: url.to_owned(), source };
    let response = reqwest::blocking::get(url).map_err(wrap)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus { url: url.to_owned(), status: status.as_u16() });
    }
    Ok(response.bytes().map_err(wrap)?.to_vec())
}
