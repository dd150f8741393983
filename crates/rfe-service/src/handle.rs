//! Shared handle to the active dataset.
//!
//! The handle owns an atomically swappable `Arc<Dataset>`. Readers take a
//! cheap snapshot ([`DatasetHandle::query`]) and keep using it even if a
//! reload swaps in a new dataset meanwhile. A failed reload never touches
//! the active dataset.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use rfe_loader::{load_from_path, Dataset, LoadConfig, LoadError};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::query::QueryService;

/// Errors raised by the dataset handle.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A query was issued before any dataset was loaded.
    #[error("precondition violated: no RFE dataset loaded")]
    PreconditionViolation,

    /// A reload was requested but the handle has no document source.
    #[error("no RFE document source configured")]
    NoSource,

    /// Loading the document failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Cloneable handle to the active dataset.
#[derive(Clone, Default)]
pub struct DatasetHandle {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    active: RwLock<Option<Arc<Dataset>>>,
    source: Option<PathBuf>,
    config: LoadConfig,
}

impl std::fmt::Debug for DatasetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetHandle")
            .field("loaded", &self.is_loaded())
            .field("source", &self.inner.source)
            .finish()
    }
}

impl DatasetHandle {
    /// Creates a handle with no dataset and no source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle serving `dataset`, with no reload source.
    pub fn with_dataset(dataset: Dataset) -> Self {
        let handle = Self::new();
        handle.install(dataset);
        handle
    }

    /// Creates an empty handle that loads from `source` on reload.
    pub fn with_source<P: AsRef<Path>>(source: P, config: LoadConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                active: RwLock::new(None),
                source: Some(source.as_ref().to_path_buf()),
                config,
            }),
        }
    }

    /// Returns the configured reload source.
    pub fn source(&self) -> Option<&Path> {
        self.inner.source.as_deref()
    }

    /// Returns true if a dataset is active.
    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Returns the active dataset, if any.
    pub fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.inner
            .active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a query service over the active dataset.
    ///
    /// Fails with [`ServiceError::PreconditionViolation`] if nothing has
    /// been loaded yet.
    pub fn query(&self) -> Result<QueryService, ServiceError> {
        match self.snapshot() {
            Some(dataset) => Ok(QueryService::new(dataset)),
            None => {
                error!("query issued before any RFE dataset was loaded");
                Err(ServiceError::PreconditionViolation)
            }
        }
    }

    /// Makes `dataset` the active dataset, returning the previous one.
    pub fn install(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        let dataset = Arc::new(dataset);
        let mut active = self
            .inner
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        active.replace(dataset)
    }

    /// Reloads from the configured source.
    ///
    /// Returns the new record count. On failure the active dataset is left
    /// as it was.
    pub fn reload(&self) -> Result<usize, ServiceError> {
        let source = self.inner.source.as_deref().ok_or(ServiceError::NoSource)?;
        self.reload_from_path(source)
    }

    /// Loads the document at `path` and swaps it in if valid.
    pub fn reload_from_path<P: AsRef<Path>>(&self, path: P) -> Result<usize, ServiceError> {
        let path = path.as_ref();

        match load_from_path(path, self.inner.config.clone()) {
            Ok(dataset) => {
                let count = dataset.len();
                let previous = self.install(dataset);
                info!(
                    path = %path.display(),
                    records = count,
                    replaced = previous.is_some(),
                    "RFE dataset swapped in"
                );
                Ok(count)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    kept_previous = self.is_loaded(),
                    "RFE reload failed"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DOC_V1: &str = r#"{
        "metadata": {"source": "SFAR", "version": "1.0", "date_extraction": "2024-01-01"},
        "recommandations_generales": {"timing": "T"},
        "data": [{"specialite": "Urologie", "acte": "Néphrectomie"}]
    }"#;

    const DOC_V2: &str = r#"{
        "metadata": {"source": "SFAR", "version": "2.0", "date_extraction": "2024-11-05"},
        "recommandations_generales": {"timing": "T"},
        "data": [
            {"specialite": "Urologie", "acte": "Néphrectomie"},
            {"specialite": "ORL", "acte": "Amygdalectomie"}
        ]
    }"#;

    fn temp_document(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rfe.json");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_query_before_load_is_precondition_violation() {
        let handle = DatasetHandle::new();
        assert!(!handle.is_loaded());
        assert!(matches!(
            handle.query(),
            Err(ServiceError::PreconditionViolation)
        ));
    }

    #[test]
    fn test_reload_without_source() {
        let handle = DatasetHandle::new();
        assert!(matches!(handle.reload(), Err(ServiceError::NoSource)));
    }

    #[test]
    fn test_reload_swaps_dataset() {
        let (_dir, path) = temp_document(DOC_V1);
        let handle = DatasetHandle::with_source(&path, LoadConfig::default());

        assert_eq!(handle.reload().unwrap(), 1);
        let before = handle.query().unwrap();
        assert_eq!(before.info().version, "1.0");

        fs::write(&path, DOC_V2).unwrap();
        assert_eq!(handle.reload().unwrap(), 2);

        // existing snapshots keep the dataset they were taken on
        assert_eq!(before.info().version, "1.0");
        assert_eq!(handle.query().unwrap().info().version, "2.0");
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let (_dir, path) = temp_document(DOC_V1);
        let handle = DatasetHandle::with_source(&path, LoadConfig::default());
        handle.reload().unwrap();

        fs::write(&path, r#"{"metadata": {}, "recommandations_generales": {}}"#).unwrap();
        let err = handle.reload().unwrap_err();
        assert!(matches!(err, ServiceError::Load(ref e) if e.is_malformed()));

        let service = handle.query().unwrap();
        assert_eq!(service.info().version, "1.0");
        assert_eq!(service.list_specialties(), ["Urologie"]);
    }

    #[test]
    fn test_failed_first_load_stays_unloaded() {
        let handle = DatasetHandle::with_source("/nonexistent/rfe.json", LoadConfig::default());
        assert!(handle.reload().is_err());
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = DatasetHandle::new();
        let clone = handle.clone();
        let dataset = rfe_loader::load_from_str(DOC_V1, LoadConfig::default()).unwrap();

        assert!(handle.install(dataset).is_none());
        assert!(clone.is_loaded());
    }
}
