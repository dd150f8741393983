//! In-memory RFE dataset.
//!
//! A [`Dataset`] is built once from a validated document and never
//! mutated afterwards. It owns the records in source order plus the lookup
//! structures the query layer needs:
//!
//! - lowercased specialty label → record positions (source order)
//! - specialty slug → record positions
//! - token indexes over folded procedure and antibiotic names
//!
//! ```ignore
//! let dataset = rfe_loader::load_from_path("data/rfe_antibioprophylaxie.json", LoadConfig::default())?;
//!
//! for label in dataset.specialties() {
//!     println!("{label}: {} actes", dataset.records_for_specialty(label).len());
//! }
//! ```

use std::collections::HashMap;

use rfe_types::{GeneralRecommendations, Metadata, ProcedureRecord, RfeDocument};
use tracing::warn;

use crate::index::TextIndex;
use crate::normalize::slugify;
use crate::types::{DatasetStats, LoadConfig, LoadResult, MetadataMismatch};
use crate::validate::validate_document;

/// Immutable, indexed RFE dataset.
///
/// Duplicate (specialty, procedure) pairs are all kept, in source order.
pub struct Dataset {
    /// Provenance.
    metadata: Metadata,
    /// Guidance shared by all records.
    general: GeneralRecommendations,
    /// Records in source order.
    records: Vec<ProcedureRecord>,
    /// Distinct specialty labels in first-seen order and spelling.
    specialties: Vec<String>,
    /// Lowercased specialty label → record positions.
    by_specialty: HashMap<String, Vec<usize>>,
    /// Specialty slug → record positions.
    by_slug: HashMap<String, Vec<usize>>,
    /// Folded procedure names.
    procedures: TextIndex,
    /// Folded antibiotic names (empty text when none is recommended).
    antibiotics: TextIndex,
    /// Metadata disagreements found at build time.
    mismatches: Vec<MetadataMismatch>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("source", &self.metadata.source)
            .field("version", &self.metadata.version)
            .field("records", &self.records.len())
            .field("specialties", &self.specialties.len())
            .field("procedure_tokens", &self.procedures.token_count())
            .field("antibiotic_tokens", &self.antibiotics.token_count())
            .finish()
    }
}

impl Dataset {
    /// Validates a typed document and builds the dataset.
    ///
    /// This is the common path for [`crate::load_from_slice`] and for
    /// callers that assemble documents in memory.
    pub fn from_document(document: RfeDocument, config: &LoadConfig) -> LoadResult<Self> {
        let document = validate_document(document, config)?;
        Ok(Self::build(document))
    }

    /// Builds indexes over an already validated document.
    pub(crate) fn build(document: RfeDocument) -> Self {
        let RfeDocument {
            metadata,
            recommandations_generales: general,
            data: records,
        } = document;

        let mut specialties = Vec::new();
        let mut by_specialty: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_slug: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            let positions = by_specialty.entry(specialty_key(&record.specialty)).or_default();
            if positions.is_empty() {
                specialties.push(record.specialty.clone());
            }
            positions.push(position);
            by_slug
                .entry(slugify(&record.specialty))
                .or_default()
                .push(position);
        }

        let procedures = TextIndex::build(records.iter().map(|r| r.procedure.as_str()));
        let antibiotics = TextIndex::build(records.iter().map(|r| {
            r.antibiotic
                .as_deref()
                .filter(|_| r.has_antibiotic())
                .unwrap_or("")
        }));

        let mut dataset = Self {
            metadata,
            general,
            records,
            specialties,
            by_specialty,
            by_slug,
            procedures,
            antibiotics,
            mismatches: Vec::new(),
        };
        dataset.mismatches = dataset.check_metadata();
        for mismatch in &dataset.mismatches {
            warn!("{}", mismatch);
        }
        dataset
    }

    /// Compares declared metadata against the actual records.
    fn check_metadata(&self) -> Vec<MetadataMismatch> {
        let mut mismatches = Vec::new();

        if let Some(declared) = self.metadata.total_records {
            if declared != self.records.len() {
                mismatches.push(MetadataMismatch::RecordCount {
                    declared,
                    actual: self.records.len(),
                });
            }
        }

        for declared in &self.metadata.specialites {
            if !self.by_specialty.contains_key(&specialty_key(declared)) {
                mismatches.push(MetadataMismatch::EmptySpecialty {
                    specialty: declared.clone(),
                });
            }
        }

        mismatches
    }

    // Query methods

    /// Returns the document provenance.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the general recommendations.
    pub fn general_recommendations(&self) -> &GeneralRecommendations {
        &self.general
    }

    /// Returns all records in source order.
    pub fn records(&self) -> &[ProcedureRecord] {
        &self.records
    }

    /// Gets a record by its source position.
    pub fn record(&self, position: usize) -> Option<&ProcedureRecord> {
        self.records.get(position)
    }

    /// Returns where the declared metadata disagrees with the records.
    pub fn metadata_mismatches(&self) -> &[MetadataMismatch] {
        &self.mismatches
    }

    /// Returns the distinct specialty labels in first-seen order.
    ///
    /// Labels differing only by case or surrounding whitespace count as one
    /// specialty, listed under the first spelling seen.
    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    /// Returns positions of records whose specialty equals `label`,
    /// ignoring case and surrounding whitespace.
    pub fn specialty_positions(&self, label: &str) -> &[usize] {
        self.by_specialty
            .get(&specialty_key(label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns records whose specialty equals `label`, ignoring case.
    pub fn records_for_specialty(&self, label: &str) -> Vec<&ProcedureRecord> {
        self.resolve(self.specialty_positions(label))
    }

    /// Returns records whose specialty slug equals `slug`.
    pub fn records_for_slug(&self, slug: &str) -> Vec<&ProcedureRecord> {
        self.by_slug
            .get(slug.trim())
            .map(|positions| self.resolve(positions))
            .unwrap_or_default()
    }

    /// Positions of records whose folded procedure name contains
    /// `folded_query`.
    pub fn procedure_matches(&self, folded_query: &str) -> Vec<usize> {
        self.procedures.matches(folded_query)
    }

    /// Positions of records whose folded antibiotic contains
    /// `folded_query`.
    pub fn antibiotic_matches(&self, folded_query: &str) -> Vec<usize> {
        self.antibiotics.matches(folded_query)
    }

    /// Maps positions to records, skipping out-of-range positions.
    pub fn resolve(&self, positions: &[usize]) -> Vec<&ProcedureRecord> {
        positions.iter().filter_map(|&p| self.records.get(p)).collect()
    }

    /// Reassembles the document this dataset was loaded from.
    pub fn to_document(&self) -> RfeDocument {
        RfeDocument {
            metadata: self.metadata.clone(),
            recommandations_generales: self.general.clone(),
            data: self.records.clone(),
        }
    }

    // Statistics

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns summary counts.
    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            record_count: self.records.len(),
            specialty_count: self.specialties.len(),
            without_antibiotic: self.records.iter().filter(|r| !r.has_antibiotic()).count(),
            graded: self
                .records
                .iter()
                .filter(|r| r.evidence_grade().is_some())
                .count(),
        }
    }
}

/// Specialty lookup key: trimmed and lowercased.
fn specialty_key(label: &str) -> String {
    label.trim().to_lowercase()
}
