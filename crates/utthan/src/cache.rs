//! Lazily loaded, atomically replaced dataset snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::UtthanConfig;
use crate::dataset::Dataset;
use crate::error::Result;

/// Owns the source path and the currently published snapshot.
///
/// Readers get an `Arc<Dataset>` and keep a consistent view for as long as
/// they hold it. A reload builds the new snapshot without holding the lock
/// and publishes it with a single swap.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    config: UtthanConfig,
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    /// Create an empty cache; nothing is read until the first `get`.
    pub fn new(path: impl Into<PathBuf>, config: UtthanConfig) -> Self {
        Self {
            path: path.into(),
            config,
            current: RwLock::new(None),
        }
    }

    /// Create a cache already holding a snapshot.
    pub fn with_dataset(path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        let config = dataset.config().clone();
        Self {
            path: path.into(),
            config,
            current: RwLock::new(Some(Arc::new(dataset))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &UtthanConfig {
        &self.config
    }

    /// The published snapshot, loading it on first use.
    pub fn get(&self) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.current() {
            return Ok(dataset);
        }

        let loaded = Arc::new(Dataset::load(&self.path, &self.config)?);
        let mut slot = self.write();
        // Another caller may have published while this one was loading.
        Ok(slot.get_or_insert_with(|| loaded).clone())
    }

    /// The published snapshot without triggering a load.
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.read().clone()
    }

    /// Rebuild from the source and publish the result.
    ///
    /// On failure the previous snapshot stays published.
    pub fn reload(&self) -> Result<Arc<Dataset>> {
        match Dataset::load(&self.path, &self.config) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                *self.write() = Some(Arc::clone(&dataset));
                tracing::info!(path = %self.path.display(), rows = dataset.len(), "reloaded dataset");
                Ok(dataset)
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "reload failed; keeping previous snapshot"
                );
                Err(err)
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<Dataset>>> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<Dataset>>> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHEET: &str = "Ward,School Name,Class,Medium,Attendance,Reading,Writing,Numeracy\n\
                         1,Mps Marol,I,Marathi,Present,L1,L2,L3\n";

    fn write_sheet(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_lazy_load() {
        let file = write_sheet(SHEET);
        let cache = DatasetCache::new(file.path(), UtthanConfig::default());
        assert!(cache.current().is_none());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let file = write_sheet(SHEET);
        let cache = DatasetCache::new(file.path(), UtthanConfig::default());
        let before = cache.get().unwrap();

        std::fs::write(
            file.path(),
            format!("{SHEET}2,Ups Andheri,II,Hindi,Absent,L0,L0,L0\n"),
        )
        .unwrap();
        let after = cache.reload().unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert!(Arc::ptr_eq(&after, &cache.get().unwrap()));
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let file = write_sheet(SHEET);
        let cache = DatasetCache::new(file.path(), UtthanConfig::default());
        let before = cache.get().unwrap();

        std::fs::write(file.path(), "Ward,Class\n1,I\n").unwrap();
        assert!(cache.reload().is_err());
        assert!(Arc::ptr_eq(&before, &cache.get().unwrap()));
    }

    #[test]
    fn test_with_dataset_is_published() {
        let file = write_sheet(SHEET);
        let dataset = Dataset::load(file.path(), &UtthanConfig::default().lenient()).unwrap();
        let cache = DatasetCache::with_dataset(file.path(), dataset);

        assert!(cache.current().is_some());
        assert!(!cache.config().strict_schema);
        assert_eq!(cache.get().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cache = DatasetCache::new("/nonexistent/baseline.xlsx", UtthanConfig::default());
        assert!(cache.get().is_err());
        assert!(cache.current().is_none());
    }
}
