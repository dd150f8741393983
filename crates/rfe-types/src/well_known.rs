//! Well-known names of the RFE document contract.
//!
//! # Examples
//!
//! ```
//! use rfe_types::well_known;
//!
//! assert_eq!(well_known::SECTION_GENERAL, "recommandations_generales");
//! assert_eq!(well_known::REQUIRED_SECTIONS.len(), 3);
//! ```

// =============================================================================
// Top-level sections
// =============================================================================

/// Provenance section.
pub const SECTION_METADATA: &str = "metadata";

/// General recommendations section.
pub const SECTION_GENERAL: &str = "recommandations_generales";

/// Procedure records section.
pub const SECTION_DATA: &str = "data";

/// Sections every document must contain, in document order.
pub const REQUIRED_SECTIONS: [&str; 3] = [SECTION_METADATA, SECTION_GENERAL, SECTION_DATA];

// =============================================================================
// Record fields
// =============================================================================

/// Record key holding the specialty label.
pub const FIELD_SPECIALTY: &str = "specialite";

/// Record key holding the procedure label.
pub const FIELD_PROCEDURE: &str = "acte";

/// Lowercased antibiotic values meaning "no prophylaxis recommended".
pub const NO_PROPHYLAXIS_MARKERS: [&str; 4] =
    ["-", "aucune", "aucun", "pas d'antibioprophylaxie"];

// =============================================================================
// Distribution
// =============================================================================

/// File name of the extracted document.
pub const DOCUMENT_FILE_NAME: &str = "rfe_antibioprophylaxie.json";

/// Conventional directory holding the extracted document.
pub const DATA_DIR: &str = "data";
