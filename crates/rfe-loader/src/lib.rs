//! # rfe-loader
//!
//! Loader and validator for the extracted RFE antibioprophylaxis document.
//!
//! The loader parses the JSON document, rejects anything that violates the
//! schema with [`LoadError::MalformedDocument`], and builds an immutable
//! [`Dataset`] with lookup indexes by specialty and by procedure-name token.
//!
//! ## Usage
//!
//! ```rust
//! use rfe_loader::{load_from_str, LoadConfig};
//!
//! let json = r#"{
//!     "metadata": {"source": "SFAR", "version": "2.0", "date_extraction": "2024-11-05"},
//!     "recommandations_generales": {"timing": "30 min avant incision"},
//!     "data": [
//!         {"specialite": "Chirurgie orthopédique", "acte": "Prothèse totale de hanche",
//!          "antibiotique": "Céfazoline", "posologie": "2g IV", "grade": "GRADE 1"}
//!     ]
//! }"#;
//!
//! let dataset = load_from_str(json, LoadConfig::default()).unwrap();
//! assert_eq!(dataset.specialties(), ["Chirurgie orthopédique"]);
//! assert_eq!(dataset.procedure_matches("hanche"), vec![0]);
//! ```

#![warn(missing_docs)]

mod dataset;
pub mod index;
mod loader;
pub mod normalize;
mod types;
mod validate;

pub use dataset::Dataset;
pub use loader::{
    discover_document, format_bytes, load_from_path, load_from_reader, load_from_slice,
    load_from_str,
};
pub use types::{DatasetStats, LoadConfig, LoadError, LoadResult, MalformedReason, MetadataMismatch};
pub use validate::document_from_value;

// Re-export rfe-types for convenience
pub use rfe_types;
