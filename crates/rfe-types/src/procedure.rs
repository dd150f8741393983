//! Procedure record type.
//!
//! This module provides the `ProcedureRecord` struct, one row of the
//! recommendation tables: a surgical or interventional act mapped to its
//! prophylactic antibiotic regimen.

use serde::{Deserialize, Serialize};

use crate::{well_known, EvidenceGrade};

/// A single antibioprophylaxis recommendation for one procedure.
///
/// Represents an element of the `data` array of the extracted document.
/// `specialty` and `procedure` are required and never empty once a record
/// has passed the loader; every other field is optional.
///
/// # Examples
///
/// ```
/// use rfe_types::ProcedureRecord;
///
/// let json = r#"{
///     "specialite": "Urologie",
///     "acte": "Néphrectomie",
///     "antibiotique": "Céfazoline",
///     "posologie": "2g IV"
/// }"#;
///
/// let record: ProcedureRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.procedure, "Néphrectomie");
/// assert_eq!(record.allergy_alternative, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureRecord {
    /// Surgical discipline (e.g. "Chirurgie orthopédique").
    #[serde(rename = "specialite", default)]
    pub specialty: String,
    /// The surgical or interventional act.
    #[serde(rename = "acte", default)]
    pub procedure: String,
    /// First-line agent; absent when no prophylaxis is recommended.
    #[serde(
        rename = "antibiotique",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub antibiotic: Option<String>,
    /// Dose and route, free text.
    #[serde(rename = "posologie", default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    /// Alternative agent for beta-lactam allergy.
    #[serde(
        rename = "alternative_allergie",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allergy_alternative: Option<String>,
    /// Intra-operative reinjection interval.
    #[serde(
        rename = "reinjection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reinjection_interval: Option<String>,
    /// Total duration of the prophylaxis.
    #[serde(rename = "duree", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Evidence-grade label (e.g. "GRADE 1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Free-text note attached to the row.
    #[serde(
        rename = "commentaire",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub comment: Option<String>,
}

impl ProcedureRecord {
    /// Returns the evidence grade enum value.
    ///
    /// Returns `None` if the grade is absent or not a recognized label.
    pub fn evidence_grade(&self) -> Option<EvidenceGrade> {
        self.grade.as_deref().and_then(EvidenceGrade::from_label)
    }

    /// Returns true if a first-line antibiotic is recommended.
    ///
    /// Placeholders such as "-" or "Pas d'antibioprophylaxie" count as no
    /// antibiotic.
    pub fn has_antibiotic(&self) -> bool {
        self.antibiotic.as_deref().is_some_and(|a| {
            let a = a.trim().to_lowercase();
            !a.is_empty() && !well_known::NO_PROPHYLAXIS_MARKERS.contains(&a.as_str())
        })
    }

    /// Returns true if an allergy alternative is documented.
    pub fn has_allergy_alternative(&self) -> bool {
        self.allergy_alternative
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    }
}
