//! RFE enumeration types.
//!
//! This module provides enum representations for the coded values that
//! appear in the recommendation document: evidence grades and the topics of
//! the general recommendations.

use serde::{Deserialize, Serialize};

/// Evidence grade attached to a recommendation.
///
/// # Examples
///
/// ```
/// use rfe_types::EvidenceGrade;
///
/// let grade = EvidenceGrade::from_label("GRADE 2");
/// assert_eq!(grade, Some(EvidenceGrade::Grade2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceGrade {
    /// Strong recommendation ("GRADE 1").
    Grade1,
    /// Weak recommendation ("GRADE 2").
    Grade2,
    /// Expert opinion, no graded evidence ("Avis d'experts").
    ExpertOpinion,
}

impl EvidenceGrade {
    /// Label for a strong recommendation.
    pub const GRADE_1_LABEL: &'static str = "GRADE 1";
    /// Label for a weak recommendation.
    pub const GRADE_2_LABEL: &'static str = "GRADE 2";
    /// Label for an expert opinion.
    pub const EXPERT_OPINION_LABEL: &'static str = "Avis d'experts";

    /// Creates an EvidenceGrade from its document label.
    ///
    /// Matching ignores case and surrounding whitespace. Returns `None` if
    /// the label is not recognized.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(Self::GRADE_1_LABEL) {
            Some(Self::Grade1)
        } else if label.eq_ignore_ascii_case(Self::GRADE_2_LABEL) {
            Some(Self::Grade2)
        } else if label.to_lowercase() == Self::EXPERT_OPINION_LABEL.to_lowercase() {
            Some(Self::ExpertOpinion)
        } else {
            None
        }
    }

    /// Returns the document label for this grade.
    pub fn to_label(self) -> &'static str {
        match self {
            Self::Grade1 => Self::GRADE_1_LABEL,
            Self::Grade2 => Self::GRADE_2_LABEL,
            Self::ExpertOpinion => Self::EXPERT_OPINION_LABEL,
        }
    }
}

/// Topic of a general recommendation.
///
/// Each topic corresponds to a fixed key of the `recommandations_generales`
/// section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// When to administer the first dose relative to incision.
    Timing,
    /// Intra-operative reinjection intervals.
    Reinjection,
    /// Total duration of the prophylaxis.
    Duration,
}

impl Topic {
    /// Document key for the timing topic.
    pub const TIMING_KEY: &'static str = "timing";
    /// Document key for the reinjection topic.
    pub const REINJECTION_KEY: &'static str = "reinjection";
    /// Document key for the duration topic.
    pub const DURATION_KEY: &'static str = "duree";

    /// All topics, in document order.
    pub const ALL: [Topic; 3] = [Topic::Timing, Topic::Reinjection, Topic::Duration];

    /// Creates a Topic from its document key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            Self::TIMING_KEY => Some(Self::Timing),
            Self::REINJECTION_KEY => Some(Self::Reinjection),
            Self::DURATION_KEY => Some(Self::Duration),
            _ => None,
        }
    }

    /// Returns the document key for this topic.
    pub fn to_key(self) -> &'static str {
        match self {
            Self::Timing => Self::TIMING_KEY,
            Self::Reinjection => Self::REINJECTION_KEY,
            Self::Duration => Self::DURATION_KEY,
        }
    }
}
