//! Top-level document shape.

use serde::{Deserialize, Serialize};

use crate::{GeneralRecommendations, Metadata, ProcedureRecord};

/// The extracted RFE document, as written by the extraction job.
///
/// This is the only durable contract between the extraction job and the
/// rest of the system. All three sections are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RfeDocument {
    /// Provenance of the document.
    pub metadata: Metadata,
    /// Guidance shared by all procedures.
    pub recommandations_generales: GeneralRecommendations,
    /// Procedure records, in source table order.
    pub data: Vec<ProcedureRecord>,
}
