//! Document provenance.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Provenance of an extracted RFE document.
///
/// `total_records` and `specialites` are written by the extraction job as
/// a convenience; the loader cross-checks them against the records but
/// never trusts them over the data itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Source document name (e.g. "SFAR - RFE Antibioprophylaxie 2024").
    #[serde(default)]
    pub source: String,
    /// Version of the source document.
    #[serde(default)]
    pub version: String,
    /// ISO-8601 timestamp of the extraction run.
    #[serde(default)]
    pub date_extraction: String,
    /// Record count declared by the extraction job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
    /// Specialties declared by the extraction job.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialites: Vec<String>,
}

impl Metadata {
    /// Parses `date_extraction`.
    ///
    /// Accepts RFC 3339 timestamps (converted to UTC), naive ISO-8601
    /// date-times with optional fractional seconds, and bare dates.
    /// Returns `None` if the value is empty or unparseable.
    pub fn extracted_at(&self) -> Option<NaiveDateTime> {
        let raw = self.date_extraction.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_date(date: &str) -> Metadata {
        Metadata {
            source: "SFAR - RFE Antibioprophylaxie 2024".to_string(),
            version: "2.0".to_string(),
            date_extraction: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_extracted_at_formats() {
        let naive = with_date("2024-11-05T14:30:00.123456").extracted_at().unwrap();
        assert_eq!(naive.date(), NaiveDate::from_ymd_opt(2024, 11, 5).unwrap());

        let offset = with_date("2024-11-05T14:30:00+01:00").extracted_at().unwrap();
        assert_eq!(offset.format("%H:%M").to_string(), "13:30");

        let date_only = with_date("2024-11-05").extracted_at().unwrap();
        assert_eq!(date_only.format("%H:%M:%S").to_string(), "00:00:00");

        assert!(with_date("").extracted_at().is_none());
        assert!(with_date("hier").extracted_at().is_none());
    }

    #[test]
    fn test_optional_fields_skipped() {
        let json = serde_json::to_value(with_date("2024-11-05")).unwrap();
        assert!(json.get("total_records").is_none());
        assert!(json.get("specialites").is_none());

        let parsed: Metadata = serde_json::from_str(
            r#"{"source": "S", "version": "1", "date_extraction": "2024-01-01",
                "total_records": 3, "specialites": ["ORL"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.total_records, Some(3));
        assert_eq!(parsed.specialites, vec!["ORL"]);
    }
}
