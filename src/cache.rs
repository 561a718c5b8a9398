//! Local copy of the last response body fetched for each vertical.
//!
//! Every successful fetch can be written through to the cache directory. In
//! offline mode the client serves snapshots from these files instead of the
//! network. Files ending in `.json.gz` are decompressed transparently.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::config::{self, Vertical};
use crate::error::{PriceError, Result};
use crate::models::{Listing, Snapshot};

/// Stores raw response bodies per vertical.
pub struct ResponseCache {
    /// Directory where cached bodies are stored.
    pub cache_dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `cache_dir`, or the platform default.
    ///
    /// Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    /// Path of the plain cache file for a vertical.
    pub fn path_for(&self, vertical: Vertical) -> PathBuf {
        self.cache_dir.join(vertical.cache_file())
    }

    fn gz_path_for(&self, vertical: Vertical) -> PathBuf {
        self.cache_dir.join(format!("{}.gz", vertical.cache_file()))
    }

    /// Locate a cached body, preferring the uncompressed file.
    pub fn locate(&self, vertical: Vertical) -> Option<PathBuf> {
        [self.path_for(vertical), self.gz_path_for(vertical)]
            .into_iter()
            .find(|p| p.exists())
    }

    /// Write a response body for a vertical.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated body behind.
    pub fn store(&self, vertical: Vertical, body: &[u8]) -> Result<()> {
        let dest = self.path_for(vertical);
        let tmp_dest = dest.with_extension("json.tmp");

        let result = (|| -> Result<()> {
            fs::write(&tmp_dest, body)?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        match result {
            Ok(()) => debug!(%vertical, bytes = body.len(), "cached response body"),
            Err(_) => {
                let _ = fs::remove_file(&tmp_dest);
            }
        }

        result
    }

    /// Read the raw cached body for a vertical.
    pub fn read(&self, vertical: Vertical) -> Result<Vec<u8>> {
        let path = self.locate(vertical).ok_or_else(|| {
            PriceError::NotFound(format!("No cached response for {}", vertical))
        })?;
        read_body(&path)
    }

    /// Load and validate cached snapshots.
    ///
    /// If the cached body no longer matches the schema, it is deleted so the
    /// next online fetch replaces it, and the schema error is returned.
    pub fn load<L: Listing>(&self, vertical: Vertical) -> Result<Vec<Snapshot<L>>> {
        let body = self.read(vertical)?;
        match crate::client::parse_snapshots::<L>(vertical, &body) {
            Ok(snapshots) => Ok(snapshots),
            Err(e) => {
                if let Some(path) = self.locate(vertical) {
                    warn!(path = %path.display(), error = %e, "corrupt cache file -- removing");
                    let _ = fs::remove_file(&path);
                }
                Err(e)
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn read_body(path: &Path) -> Result<Vec<u8>> {
    let mut contents = Vec::new();
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let file = fs::File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        decoder.read_to_end(&mut contents)?;
    } else {
        contents = fs::read(path)?;
    }
    Ok(contents)
}
