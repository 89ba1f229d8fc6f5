//! Cache manager for the on-disk forecast document
//!
//! Provides a `CacheManager` that stores the last forecast document as a
//! single JSON file. The file's modification time is the only record of
//! when it was fetched.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::SystemTime;

use directories::ProjectDirs;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::data::ForecastDocument;

/// Name of the cache file inside the cache directory
pub const CACHE_FILE_NAME: &str = "forecast.json";

/// Errors from cache file operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache directory could not be created
    #[error("Failed to create cache directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cache file could not be read
    #[error("Failed to read cache file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cache file is not a forecast document
    #[error("Failed to parse cache file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Cache file could not be written
    #[error("Failed to write cache file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cache file could not be deleted
    #[error("Failed to delete cache file '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Modification time of the cache file is unavailable
    #[error("Failed to read metadata for cache file '{}': {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Manages reading and writing the cached forecast document
///
/// The cache lives in an XDG-compliant cache directory (`~/.cache/solcast/`
/// on Linux). Writes go to a temporary file in the same directory that is
/// then renamed over the cache file, so readers see either the old or the
/// new document and never a truncated one.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where the cache file is stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using the per-user cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "solcast")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Full path of the cache file
    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    /// Ensures the cache directory exists
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| CacheError::CreateDir {
            path: self.cache_dir.clone(),
            source,
        })
    }

    /// Whether a cache file is present
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Last-write time of the cache file
    pub fn modified(&self) -> Result<SystemTime, CacheError> {
        let path = self.path();
        fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map_err(|source| CacheError::Metadata { path, source })
    }

    /// Reads and parses the cached document
    pub fn read(&self) -> Result<ForecastDocument, CacheError> {
        let path = self.path();
        let content = fs::read_to_string(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CacheError::Parse { path, source })
    }

    /// Replaces the cached document
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation, writing or the final rename fails
    pub fn write(&self, document: &ForecastDocument) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let path = self.path();
        let write_err = |source: io::Error| CacheError::Write {
            path: path.clone(),
            source,
        };

        let json = serde_json::to_vec(document)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let mut temp = NamedTempFile::new_in(&self.cache_dir).map_err(write_err)?;
        temp.write_all(&json).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&path).map_err(|e| write_err(e.error))?;

        Ok(())
    }

    /// Deletes the cache file
    pub fn remove(&self) -> Result<(), CacheError> {
        let path = self.path();
        fs::remove_file(&path).map_err(|source| CacheError::Remove { path, source })
    }
}
