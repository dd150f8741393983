//! Document discovery and loading.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rfe_types::well_known;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::types::{LoadConfig, LoadError, LoadResult};
use crate::validate::parse_document;

/// Locates the RFE document.
///
/// `path` may name the JSON file itself, or a directory containing
/// `rfe_antibioprophylaxie.json` either directly or under `data/`.
pub fn discover_document<P: AsRef<Path>>(path: P) -> LoadResult<PathBuf> {
    let path = path.as_ref();

    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    if !path.exists() {
        return Err(if path.extension().is_some() {
            LoadError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            LoadError::DirectoryNotFound {
                path: path.display().to_string(),
            }
        });
    }

    let candidates = [
        path.join(well_known::DOCUMENT_FILE_NAME),
        path.join(well_known::DATA_DIR).join(well_known::DOCUMENT_FILE_NAME),
    ];

    candidates
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| LoadError::DocumentNotFound {
            directory: path.display().to_string(),
        })
}

/// Loads a dataset from a file or directory (see [`discover_document`]).
pub fn load_from_path<P: AsRef<Path>>(path: P, config: LoadConfig) -> LoadResult<Dataset> {
    let file = discover_document(path)?;
    info!(path = %file.display(), "Loading RFE document");

    let bytes = fs::read(&file)?;
    load_from_slice(&bytes, config)
}

/// Loads a dataset from a reader.
///
/// The whole document is buffered before parsing.
pub fn load_from_reader<R: Read>(mut reader: R, config: LoadConfig) -> LoadResult<Dataset> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_from_slice(&bytes, config)
}

/// Loads a dataset from a string.
pub fn load_from_str(json: &str, config: LoadConfig) -> LoadResult<Dataset> {
    load_from_slice(json.as_bytes(), config)
}

/// Loads a dataset from raw bytes.
///
/// Either the whole document is valid and a complete dataset is returned,
/// or nothing is built.
pub fn load_from_slice(bytes: &[u8], config: LoadConfig) -> LoadResult<Dataset> {
    let start = Instant::now();
    debug!(size = %format_bytes(bytes.len()), "Parsing RFE document");

    let document = parse_document(bytes, &config)?;
    let dataset = Dataset::build(document);

    let stats = dataset.stats();
    info!(
        records = stats.record_count,
        specialties = stats.specialty_count,
        version = %dataset.metadata().version,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Loaded RFE dataset"
    );

    Ok(dataset)
}

/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MalformedReason;

    const MINIMAL: &str = r#"{
        "metadata": {"source": "SFAR", "version": "2.0", "date_extraction": "2024-11-05"},
        "recommandations_generales": {"timing": "30 min avant incision"},
        "data": [{"specialite": "Urologie", "acte": "Néphrectomie"}]
    }"#;

    #[test]
    fn test_load_from_str() {
        let dataset = load_from_str(MINIMAL, LoadConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.metadata().source, "SFAR");
    }

    #[test]
    fn test_load_from_reader() {
        let dataset = load_from_reader(MINIMAL.as_bytes(), LoadConfig::default()).unwrap();
        assert_eq!(dataset.specialties(), ["Urologie"]);
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let err = load_from_str(
            r#"{"metadata": {}, "recommandations_generales": {}}"#,
            LoadConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.malformed_reason(),
            Some(&MalformedReason::MissingSection { section: "data" })
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = load_from_slice(b"not json", LoadConfig::default()).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_discover_missing_paths() {
        let err = discover_document("/nonexistent/rfe_antibioprophylaxie.json").unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));

        let err = discover_document("/nonexistent/dir").unwrap_err();
        assert!(matches!(err, LoadError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
    }
}
