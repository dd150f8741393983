//! General recommendation types.
//!
//! The `recommandations_generales` section holds guidance that applies
//! across procedures: administration timing, reinjection intervals and
//! total duration. Each topic is either free text or a structured object
//! (description, grade, per-agent intervals, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::Topic;

/// Guidance for one topic of the general recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Guidance {
    /// Plain text guidance, e.g. "30 min avant incision".
    Text(String),
    /// Structured guidance as found in the document.
    Structured(Map<String, Value>),
}

impl Guidance {
    /// Returns the guidance as text, if it is plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Guidance::Text(text) => Some(text),
            Guidance::Structured(_) => None,
        }
    }

    /// Returns a human-readable summary of the guidance.
    ///
    /// Plain text is returned as-is. For structured guidance the
    /// `description` entry is preferred; otherwise the object is rendered
    /// as compact JSON.
    pub fn summary(&self) -> String {
        match self {
            Guidance::Text(text) => text.clone(),
            Guidance::Structured(map) => match map.get("description") {
                Some(Value::String(description)) => description.clone(),
                _ => Value::Object(map.clone()).to_string(),
            },
        }
    }

    /// Returns the evidence grade label carried by structured guidance.
    pub fn grade(&self) -> Option<&str> {
        match self {
            Guidance::Text(_) => None,
            Guidance::Structured(map) => map.get("grade").and_then(Value::as_str),
        }
    }

    /// Returns true if the guidance carries no information.
    pub fn is_empty(&self) -> bool {
        match self {
            Guidance::Text(text) => text.trim().is_empty(),
            Guidance::Structured(map) => map.is_empty(),
        }
    }
}

impl From<&str> for Guidance {
    fn from(text: &str) -> Self {
        Guidance::Text(text.to_string())
    }
}

/// The general recommendations shared by every procedure record.
///
/// Exactly one instance exists per loaded dataset. Keys outside the three
/// known topics are preserved in `other` so that an exported document
/// matches its source.
///
/// # Examples
///
/// ```
/// use rfe_types::{GeneralRecommendations, Topic};
///
/// let general: GeneralRecommendations =
///     serde_json::from_str(r#"{"timing": "30 min avant incision"}"#).unwrap();
///
/// assert_eq!(
///     general.get(Topic::Timing).and_then(|g| g.as_text()),
///     Some("30 min avant incision")
/// );
/// assert!(general.get(Topic::Duration).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralRecommendations {
    /// Administration timing relative to incision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<Guidance>,
    /// Intra-operative reinjection guidance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinjection: Option<Guidance>,
    /// Total duration guidance.
    #[serde(rename = "duree", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Guidance>,
    /// Additional topics present in the document.
    #[serde(flatten)]
    pub other: BTreeMap<String, Guidance>,
}

impl GeneralRecommendations {
    /// Returns the guidance for a topic.
    pub fn get(&self, topic: Topic) -> Option<&Guidance> {
        match topic {
            Topic::Timing => self.timing.as_ref(),
            Topic::Reinjection => self.reinjection.as_ref(),
            Topic::Duration => self.duration.as_ref(),
        }
    }

    /// Returns the guidance for a document key, including extra topics.
    pub fn get_key(&self, key: &str) -> Option<&Guidance> {
        match Topic::from_key(key) {
            Some(topic) => self.get(topic),
            None => self.other.get(key),
        }
    }

    /// Iterates over all present topics as `(key, guidance)` pairs.
    ///
    /// Known topics come first in document order, then extra keys sorted.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Guidance)> {
        Topic::ALL
            .into_iter()
            .filter_map(move |topic| self.get(topic).map(|g| (topic.to_key(), g)))
            .chain(self.other.iter().map(|(k, g)| (k.as_str(), g)))
    }

    /// Returns true if no topic is present.
    pub fn is_empty(&self) -> bool {
        self.timing.is_none()
            && self.reinjection.is_none()
            && self.duration.is_none()
            && self.other.is_empty()
    }

    /// The general recommendations of the 2024 RFE.
    ///
    /// Used in place of an empty `recommandations_generales` section.
    pub fn sfar_2024_defaults() -> Self {
        let timing = json!({
            "description": "Administration au plus tôt 60 min avant, au plus tard avant l'incision",
            "vancomycine": "Début de perfusion 60 à 30 min avant incision (durée 60 min)",
            "grade": "GRADE 1"
        });
        let reinjection = json!({
            "description": "Réadministrer en cas de chirurgie prolongée, toutes les 2 demi-vies",
            "intervalles": {
                "céfoxitine": "2h (1g)",
                "céfuroxime": "2h (0.75g)",
                "amoxicilline/clavulanate": "2h (1g)",
                "céfazoline": "4h (1g)",
                "clindamycine": "4h (450mg)",
                "vancomycine": "8h (10mg/kg)"
            },
            "sans_reinjection": ["gentamicine", "métronidazole", "teicoplanine"],
            "grade": "GRADE 2"
        });
        let duration = json!({
            "description": "Pas de prolongation au-delà de la fin de chirurgie",
            "grade": "GRADE 1"
        });

        Self {
            timing: structured(timing),
            reinjection: structured(reinjection),
            duration: structured(duration),
            other: BTreeMap::new(),
        }
    }
}

fn structured(value: Value) -> Option<Guidance> {
    match value {
        Value::Object(map) => Some(Guidance::Structured(map)),
        _ => None,
    }
}
