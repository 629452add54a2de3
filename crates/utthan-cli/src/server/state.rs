//! Application state for the web server.

use std::sync::Arc;

use utthan::{Dataset, DatasetCache};

use super::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Published dataset snapshot and its source.
    pub cache: Arc<DatasetCache>,
}

impl AppState {
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self { cache }
    }

    /// Current snapshot, loading it off the async workers if nothing is
    /// published yet.
    pub async fn dataset(&self) -> Result<Arc<Dataset>, ApiError> {
        if let Some(dataset) = self.cache.current() {
            return Ok(dataset);
        }
        let cache = Arc::clone(&self.cache);
        Ok(tokio::task::spawn_blocking(move || cache.get()).await??)
    }

    /// Rebuild and publish a new snapshot on the blocking pool.
    pub async fn reload(&self) -> Result<Arc<Dataset>, ApiError> {
        let cache = Arc::clone(&self.cache);
        Ok(tokio::task::spawn_blocking(move || cache.reload()).await??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use utthan::UtthanConfig;

    #[tokio::test]
    async fn test_lazy_load_and_reload_off_the_runtime() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(
            b"Ward,School Name,Class,Medium,Attendance,Reading,Writing,Numeracy\n\
              1,Mps Marol,I,Marathi,Present,L1,L2,L3\n",
        )
        .unwrap();
        let state = AppState::new(Arc::new(DatasetCache::new(
            file.path(),
            UtthanConfig::default(),
        )));
        assert!(state.cache.current().is_none());

        let first = state.dataset().await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &state.dataset().await.unwrap()));

        std::fs::write(file.path(), "Ward\n1\n").unwrap();
        assert!(matches!(state.reload().await, Err(ApiError::Utthan(_))));
        assert!(Arc::ptr_eq(&first, &state.dataset().await.unwrap()));
    }
}
