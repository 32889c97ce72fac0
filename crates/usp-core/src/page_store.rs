//! The page store: one scratch file per page sitemap.
//!
//! Writes atomically (temp path, then `fs::rename` into place), one scratch file per
//! [`crate::entity::SitemapEntity`] leaf, with the contract "persist the whole ordered list
//! once, reload on demand" rather than "persist a durable per-page cache".

use std::path::PathBuf;

use crate::entity::SitemapEntry;
use crate::error::{Error, Result};

/// Owns the lifetime of one page sitemap's scratch file.
///
/// Constructed once with the fully materialised page list; every subsequent read re-parses the
/// file from disk on each call. Dropping the store deletes
/// the file; a missing file at that point is logged, not raised.
#[derive(Debug)]
pub struct PageStore {
    path: PathBuf,
    // Keeps the containing directory alive for the life of the store; the file itself is
    // persisted at `path` so it can be reloaded independently of this handle.
    _dir: tempfile::TempDir,
}

impl PageStore {
    /// Persist `entries` to a fresh scratch file and return a store over it.
    pub fn new(entries: Vec<SitemapEntry>) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("usp-sitemap-")
            .tempdir()
            .map_err(Error::Io)?;
        let path = dir.path().join("pages.json");
        let json = serde_json::to_string_pretty(&entries)?;

        // Atomic write: stage in the same directory, then rename into place.
        let tmp_path = dir.path().join("pages.json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;

        Ok(Self { path, _dir: dir })
    }

    /// Reload the page list from the scratch file.
    ///
    /// Returns an empty list (rather than propagating) if the file has already been removed,
    /// matching the "release is idempotent and tolerates missing files" lifecycle rule — a
    /// caller holding a cloned handle after the owning entity began tearing down should not
    /// observe a hard error.
    pub fn load(&self) -> Result<Vec<SitemapEntry>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Release the scratch file ahead of `Drop`. Idempotent and tolerant of an already-missing
    /// file.
    pub fn close(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {},
            Err(_) if !self.path.exists() => {},
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to remove page store scratch file"),
        }
    }
}

impl Drop for PageStore {
    fn drop(&mut self) {
        self.close();
    }
}
