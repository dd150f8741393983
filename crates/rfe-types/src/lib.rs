//! # rfe-types
//!
//! Type definitions for the SFAR antibioprophylaxis recommendation dataset
//! (RFE, "recommandations formalisées d'experts").
//!
//! This crate provides the plain data model shared by the loader and the
//! query service: document metadata, the general recommendations, and the
//! per-procedure records. Field names on the wire follow the French keys of
//! the extracted JSON document.
//!
//! ## Usage
//!
//! ```rust
//! use rfe_types::{EvidenceGrade, ProcedureRecord};
//!
//! let record = ProcedureRecord {
//!     specialty: "Chirurgie orthopédique".to_string(),
//!     procedure: "Prothèse totale de hanche".to_string(),
//!     antibiotic: Some("Céfazoline".to_string()),
//!     dosage: Some("2g IV".to_string()),
//!     grade: Some("GRADE 1".to_string()),
//!     ..Default::default()
//! };
//!
//! assert_eq!(record.evidence_grade(), Some(EvidenceGrade::Grade1));
//! assert!(record.has_antibiotic());
//! ```

#![warn(missing_docs)]

mod document;
mod enums;
mod guidance;
mod metadata;
mod procedure;
pub mod well_known;

// Re-export all public types at crate root
pub use document::RfeDocument;
pub use enums::{EvidenceGrade, Topic};
pub use guidance::{GeneralRecommendations, Guidance};
pub use metadata::Metadata;
pub use procedure::ProcedureRecord;
