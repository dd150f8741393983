//! Schema validation at the load boundary.
//!
//! Turns raw JSON into a typed [`RfeDocument`], reporting the first
//! violation as a [`MalformedReason`]. Nothing partially typed leaves this
//! module.

use rfe_types::{well_known, GeneralRecommendations, Metadata, ProcedureRecord, RfeDocument};
use serde_json::{Map, Value};

use crate::normalize::tidy;
use crate::types::{LoadConfig, MalformedReason};

/// Parses raw bytes into a validated document.
pub fn parse_document(bytes: &[u8], config: &LoadConfig) -> Result<RfeDocument, MalformedReason> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| MalformedReason::InvalidJson {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    document_from_value(value, config)
}

/// Validates a JSON value as a document.
pub fn document_from_value(
    value: Value,
    config: &LoadConfig,
) -> Result<RfeDocument, MalformedReason> {
    let Value::Object(mut root) = value else {
        return Err(MalformedReason::NotAnObject);
    };

    let metadata = take_section(&mut root, well_known::SECTION_METADATA)?;
    let general = take_section(&mut root, well_known::SECTION_GENERAL)?;
    let data = take_section(&mut root, well_known::SECTION_DATA)?;

    let metadata: Metadata =
        serde_json::from_value(metadata).map_err(|e| MalformedReason::InvalidSection {
            section: well_known::SECTION_METADATA,
            message: e.to_string(),
        })?;

    let general: GeneralRecommendations =
        serde_json::from_value(general).map_err(|e| MalformedReason::InvalidSection {
            section: well_known::SECTION_GENERAL,
            message: e.to_string(),
        })?;

    let Value::Array(rows) = data else {
        return Err(MalformedReason::InvalidSection {
            section: well_known::SECTION_DATA,
            message: "expected an array of records".to_string(),
        });
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value::<ProcedureRecord>(row).map_err(|e| {
                MalformedReason::InvalidRecord {
                    index,
                    message: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_document(
        RfeDocument {
            metadata,
            recommandations_generales: general,
            data: records,
        },
        config,
    )
}

/// Applies field rules to an already typed document.
///
/// With `trim_fields`, every record field is tidied before the emptiness
/// check, so a whitespace-only `acte` is rejected as empty.
pub fn validate_document(
    mut document: RfeDocument,
    config: &LoadConfig,
) -> Result<RfeDocument, MalformedReason> {
    if config.trim_fields {
        document.data.iter_mut().for_each(tidy_record);
    }

    for (index, record) in document.data.iter().enumerate() {
        if record.specialty.trim().is_empty() {
            return Err(MalformedReason::EmptyField {
                index,
                field: well_known::FIELD_SPECIALTY,
            });
        }
        if record.procedure.trim().is_empty() {
            return Err(MalformedReason::EmptyField {
                index,
                field: well_known::FIELD_PROCEDURE,
            });
        }
    }

    if document.data.is_empty() && !config.allow_empty {
        return Err(MalformedReason::EmptyDataset);
    }

    if document.recommandations_generales.is_empty() && config.default_general_recommendations {
        document.recommandations_generales = GeneralRecommendations::sfar_2024_defaults();
    }

    Ok(document)
}

fn take_section(
    root: &mut Map<String, Value>,
    section: &'static str,
) -> Result<Value, MalformedReason> {
    root.remove(section)
        .ok_or(MalformedReason::MissingSection { section })
}

fn tidy_record(record: &mut ProcedureRecord) {
    record.specialty = tidy(&record.specialty);
    record.procedure = tidy(&record.procedure);

    for field in [
        &mut record.antibiotic,
        &mut record.dosage,
        &mut record.allergy_alternative,
        &mut record.reinjection_interval,
        &mut record.duration,
        &mut record.grade,
        &mut record.comment,
    ] {
        *field = field.as_deref().map(tidy).filter(|v| !v.is_empty());
    }
}
