//! Loader-specific types.

use thiserror::Error;

/// Why a document was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The bytes are not valid JSON.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        /// Line of the syntax error (1-based).
        line: usize,
        /// Column of the syntax error (1-based).
        column: usize,
        /// Parser message.
        message: String,
    },

    /// The top-level value is not a JSON object.
    #[error("top-level value is not an object")]
    NotAnObject,

    /// A required top-level section is absent.
    #[error("missing required section '{section}'")]
    MissingSection {
        /// Name of the missing section.
        section: &'static str,
    },

    /// A top-level section does not have the expected shape.
    #[error("invalid section '{section}': {message}")]
    InvalidSection {
        /// Name of the section.
        section: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A record could not be read as a procedure record.
    #[error("invalid record at index {index}: {message}")]
    InvalidRecord {
        /// Position of the record in `data`.
        index: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A record has an empty required field.
    #[error("record at index {index} has an empty '{field}' field")]
    EmptyField {
        /// Position of the record in `data`.
        index: usize,
        /// Wire name of the empty field.
        field: &'static str,
    },

    /// The document has no records and the config forbids it.
    #[error("document contains no records")]
    EmptyDataset,
}

/// Errors that can occur while loading an RFE document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error reading the document.
    #[error("IO error reading RFE document: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// No document file in the searched directory.
    #[error("RFE document not found in {directory}")]
    DocumentNotFound {
        /// The directory that was searched.
        directory: String,
    },

    /// The document violates the schema.
    #[error("Malformed document: {reason}")]
    MalformedDocument {
        /// What was wrong.
        reason: MalformedReason,
    },
}

impl LoadError {
    /// Returns true if the document itself was rejected, as opposed to
    /// failing to read it.
    pub fn is_malformed(&self) -> bool {
        matches!(self, LoadError::MalformedDocument { .. })
    }

    /// Returns the rejection reason, if the document was malformed.
    pub fn malformed_reason(&self) -> Option<&MalformedReason> {
        match self {
            LoadError::MalformedDocument { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<MalformedReason> for LoadError {
    fn from(reason: MalformedReason) -> Self {
        LoadError::MalformedDocument { reason }
    }
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Configuration for loading a document.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Collapse internal whitespace and trim every record field. Optional
    /// fields left empty become absent.
    pub trim_fields: bool,
    /// Replace an empty `recommandations_generales` object with the 2024
    /// defaults.
    pub default_general_recommendations: bool,
    /// Accept a document with zero records.
    pub allow_empty: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            trim_fields: true,
            default_general_recommendations: true,
            allow_empty: true,
        }
    }
}

impl LoadConfig {
    /// Creates a config that takes the document exactly as written and
    /// rejects empty documents.
    pub fn strict() -> Self {
        Self {
            trim_fields: false,
            default_general_recommendations: false,
            allow_empty: false,
        }
    }
}

/// Summary counts over a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStats {
    /// Number of procedure records.
    pub record_count: usize,
    /// Number of distinct specialty labels.
    pub specialty_count: usize,
    /// Records with no first-line antibiotic.
    pub without_antibiotic: usize,
    /// Records with a recognized evidence grade.
    pub graded: usize,
}

impl DatasetStats {
    /// Returns the percentage of records carrying a recognized grade.
    pub fn graded_rate(&self) -> f64 {
        if self.record_count == 0 {
            0.0
        } else {
            (self.graded as f64 / self.record_count as f64) * 100.0
        }
    }
}

/// Disagreement between the declared metadata and the loaded records.
///
/// These never fail a load; the dataset keeps them for inspection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataMismatch {
    /// `total_records` differs from the actual record count.
    #[error("metadata declares {declared} records, document has {actual}")]
    RecordCount {
        /// Declared count.
        declared: usize,
        /// Actual count.
        actual: usize,
    },

    /// A specialty listed in `specialites` has no records.
    #[error("declared specialty '{specialty}' has no records")]
    EmptySpecialty {
        /// The declared label.
        specialty: String,
    },
}
