//! Read-only queries over a loaded dataset.

use std::sync::Arc;

use rfe_loader::normalize::{fold, slugify};
use rfe_loader::{Dataset, DatasetStats};
use rfe_types::{GeneralRecommendations, ProcedureRecord};
use serde::Serialize;

/// A specialty with its slug and record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialtySummary {
    /// Label as written in the document.
    pub name: String,
    /// URL-friendly form of the label.
    pub slug: String,
    /// Number of records under this label.
    pub count: usize,
}

/// Provenance and counts of the active dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    /// Source document name.
    pub source: String,
    /// Source document version.
    pub version: String,
    /// Extraction timestamp as written.
    pub date_extraction: String,
    /// Record count.
    pub record_count: usize,
    /// Distinct specialty count.
    pub specialty_count: usize,
    /// Records with no first-line antibiotic.
    pub without_antibiotic: usize,
    /// Records with a recognized evidence grade.
    pub graded: usize,
}

/// Query service bound to one immutable dataset.
///
/// Every operation is a pure function of the dataset and its arguments, so
/// a `QueryService` can be cloned and shared across threads freely.
/// Returned records borrow from the dataset.
///
/// Absence is never an error here: an empty query, an unknown specialty or
/// an empty dataset all give empty results.
#[derive(Debug, Clone)]
pub struct QueryService {
    dataset: Arc<Dataset>,
}

impl QueryService {
    /// Creates a service over the given dataset.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Returns the underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Searches records whose procedure name contains `query`.
    ///
    /// Case, diacritics and whitespace are folded on both sides; results
    /// keep source order. A blank query returns nothing.
    pub fn search_by_procedure(&self, query: &str) -> Vec<&ProcedureRecord> {
        self.search(query, None)
    }

    /// Procedure search, optionally restricted to specialties whose
    /// folded label contains `specialty_filter`.
    ///
    /// A blank filter is the same as no filter.
    pub fn search(&self, query: &str, specialty_filter: Option<&str>) -> Vec<&ProcedureRecord> {
        let folded_query = fold(query);
        if folded_query.is_empty() {
            return Vec::new();
        }

        let positions = self.dataset.procedure_matches(&folded_query);
        let records = self.dataset.resolve(&positions);

        match specialty_filter.map(fold).filter(|f| !f.is_empty()) {
            Some(filter) => records
                .into_iter()
                .filter(|r| fold(&r.specialty).contains(&filter))
                .collect(),
            None => records,
        }
    }

    /// Searches records whose antibiotic contains `query`, with the same
    /// matching policy as [`QueryService::search_by_procedure`].
    pub fn search_by_antibiotic(&self, query: &str) -> Vec<&ProcedureRecord> {
        let folded_query = fold(query);
        if folded_query.is_empty() {
            return Vec::new();
        }

        self.dataset.resolve(&self.dataset.antibiotic_matches(&folded_query))
    }

    /// Returns the distinct specialty labels in first-seen order.
    pub fn list_specialties(&self) -> &[String] {
        self.dataset.specialties()
    }

    /// Returns every specialty with its slug and record count, in
    /// first-seen order.
    pub fn specialty_summaries(&self) -> Vec<SpecialtySummary> {
        self.dataset
            .specialties()
            .iter()
            .map(|name| SpecialtySummary {
                name: name.clone(),
                slug: slugify(name),
                count: self.dataset.specialty_positions(name).len(),
            })
            .collect()
    }

    /// Returns the records of a specialty, matched exactly but ignoring
    /// case. Unknown specialties give an empty result.
    pub fn list_procedures_for_specialty(&self, specialty: &str) -> Vec<&ProcedureRecord> {
        self.dataset.records_for_specialty(specialty)
    }

    /// Returns the records of the specialty with the given slug.
    pub fn list_procedures_for_slug(&self, slug: &str) -> Vec<&ProcedureRecord> {
        self.dataset.records_for_slug(slug)
    }

    /// Returns the general recommendations.
    pub fn general_recommendations(&self) -> &GeneralRecommendations {
        self.dataset.general_recommendations()
    }

    /// Returns provenance and counts.
    pub fn info(&self) -> DatasetInfo {
        let metadata = self.dataset.metadata();
        let DatasetStats {
            record_count,
            specialty_count,
            without_antibiotic,
            graded,
        } = self.dataset.stats();

        DatasetInfo {
            source: metadata.source.clone(),
            version: metadata.version.clone(),
            date_extraction: metadata.date_extraction.clone(),
            record_count,
            specialty_count,
            without_antibiotic,
            graded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfe_loader::{load_from_str, LoadConfig};
    use rfe_types::{Guidance, Topic};

    fn make_service(data: &str, general: &str) -> QueryService {
        let json = format!(
            r#"{{
                "metadata": {{"source": "SFAR", "version": "2.0", "date_extraction": "2024-11-05"}},
                "recommandations_generales": {general},
                "data": {data}
            }}"#
        );
        QueryService::new(Arc::new(load_from_str(&json, LoadConfig::default()).unwrap()))
    }

    fn hip_service() -> QueryService {
        make_service(
            r#"[{"specialite": "Chirurgie orthopédique", "acte": "Prothèse totale de hanche",
                 "antibiotique": "Céfazoline", "posologie": "2g IV", "grade": "GRADE 1"}]"#,
            r#"{"timing": "30 min avant incision"}"#,
        )
    }

    fn mixed_service() -> QueryService {
        make_service(
            r#"[
                {"specialite": "Chirurgie orthopédique", "acte": "Prothèse totale de hanche", "antibiotique": "Céfazoline"},
                {"specialite": "Urologie", "acte": "Néphrectomie", "antibiotique": "Céfazoline"},
                {"specialite": "Chirurgie orthopédique", "acte": "Prothèse totale de genou", "antibiotique": "Céfazoline"},
                {"specialite": "Chirurgie digestive", "acte": "Chirurgie colorectale", "antibiotique": "Céfoxitine"},
                {"specialite": "Urologie", "acte": "Cystoscopie"},
                {"specialite": "Urologie", "acte": "Cystoscopie", "antibiotique": "Fosfomycine"}
            ]"#,
            r#"{"timing": "T", "reinjection": "R", "duree": "D"}"#,
        )
    }

    fn procedures<'a>(records: &[&'a ProcedureRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.procedure.as_str()).collect()
    }

    #[test]
    fn test_hip_scenario() {
        let service = hip_service();

        for query in ["hanche", "HANCHE", "hanché", "  Hanche  "] {
            let found = service.search_by_procedure(query);
            assert_eq!(found.len(), 1, "query {query:?}");
            assert_eq!(found[0].procedure, "Prothèse totale de hanche");
            assert_eq!(found[0].antibiotic.as_deref(), Some("Céfazoline"));
            assert_eq!(found[0].dosage.as_deref(), Some("2g IV"));
            assert_eq!(found[0].grade.as_deref(), Some("GRADE 1"));
        }
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let service = mixed_service();
        assert!(service.search_by_procedure("").is_empty());
        assert!(service.search_by_procedure("   ").is_empty());
        assert!(service.search("", Some("Urologie")).is_empty());
        assert!(service.search_by_antibiotic("").is_empty());
    }

    #[test]
    fn test_every_record_found_by_own_procedure() {
        let service = mixed_service();
        for record in service.dataset().records() {
            let found = service.search_by_procedure(&record.procedure);
            assert!(
                found.iter().any(|r| std::ptr::eq(*r, record)),
                "{} not found by its own name",
                record.procedure
            );
        }
    }

    #[test]
    fn test_search_keeps_source_order() {
        let service = mixed_service();
        assert_eq!(
            procedures(&service.search_by_procedure("prothese")),
            vec!["Prothèse totale de hanche", "Prothèse totale de genou"]
        );
        assert_eq!(
            procedures(&service.search_by_procedure("e")).len(),
            service.dataset().len()
        );
    }

    #[test]
    fn test_search_does_not_match_specialty() {
        let service = mixed_service();
        assert!(service.search_by_procedure("urologie").is_empty());
        assert_eq!(
            procedures(&service.search_by_procedure("chirurgie")),
            vec!["Chirurgie colorectale"]
        );
    }

    #[test]
    fn test_search_with_specialty_filter() {
        let service = mixed_service();
        assert_eq!(
            procedures(&service.search("chirurgie", Some("digestive"))).len(),
            1
        );
        assert!(service.search("chirurgie", Some("orthopedique")).is_empty());
        assert_eq!(
            procedures(&service.search("prothese", Some("ORTHOPÉDIQUE"))),
            vec!["Prothèse totale de hanche", "Prothèse totale de genou"]
        );
        assert_eq!(service.search("prothese", Some("  ")).len(), 2);
    }

    #[test]
    fn test_duplicates_all_returned() {
        let service = mixed_service();
        let found = service.search_by_procedure("cystoscopie");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].antibiotic, None);
        assert_eq!(found[1].antibiotic.as_deref(), Some("Fosfomycine"));
    }

    #[test]
    fn test_search_by_antibiotic() {
        let service = mixed_service();
        assert_eq!(service.search_by_antibiotic("cefazoline").len(), 3);
        assert_eq!(
            procedures(&service.search_by_antibiotic("CÉFOXITINE")),
            vec!["Chirurgie colorectale"]
        );
        assert!(service.search_by_antibiotic("vancomycine").is_empty());
    }

    #[test]
    fn test_antibiotic_search_skips_no_prophylaxis_rows() {
        let service = make_service(
            r#"[
                {"specialite": "ORL", "acte": "Amygdalectomie", "antibiotique": "Pas d'antibioprophylaxie"},
                {"specialite": "Urologie", "acte": "Néphrectomie", "antibiotique": "Céfazoline"}
            ]"#,
            r#"{"timing": "T"}"#,
        );

        assert!(service.search_by_antibiotic("antibio").is_empty());
        assert_eq!(procedures(&service.search_by_antibiotic("cefazoline")), vec!["Néphrectomie"]);
    }

    #[test]
    fn test_list_specialties_first_seen() {
        let service = make_service(
            r#"[
                {"specialite": "Chirurgie orthopédique", "acte": "Prothèse totale de hanche"},
                {"specialite": "Urologie", "acte": "Néphrectomie"}
            ]"#,
            "{}",
        );
        assert_eq!(service.list_specialties(), ["Chirurgie orthopédique", "Urologie"]);

        let mixed = mixed_service();
        assert_eq!(
            mixed.list_specialties(),
            ["Chirurgie orthopédique", "Urologie", "Chirurgie digestive"]
        );
    }

    #[test]
    fn test_list_procedures_for_specialty() {
        let service = mixed_service();
        assert_eq!(
            procedures(&service.list_procedures_for_specialty("urologie")),
            vec!["Néphrectomie", "Cystoscopie", "Cystoscopie"]
        );
        assert_eq!(
            service
                .list_procedures_for_specialty("CHIRURGIE ORTHOPÉDIQUE")
                .len(),
            2
        );
        // exact label, not substring
        assert!(service.list_procedures_for_specialty("Chirurgie").is_empty());
        assert!(service.list_procedures_for_specialty("Neurochirurgie").is_empty());
    }

    #[test]
    fn test_unknown_specialties_are_empty() {
        let service = mixed_service();
        let known = service.list_specialties().to_vec();
        for candidate in ["ORL", "Ophtalmologie", "", "Uro"] {
            assert!(!known.iter().any(|k| k.eq_ignore_ascii_case(candidate)));
            assert!(service.list_procedures_for_specialty(candidate).is_empty());
        }
    }

    #[test]
    fn test_specialty_summaries_and_slugs() {
        let service = mixed_service();
        let summaries = service.specialty_summaries();
        assert_eq!(
            summaries[0],
            SpecialtySummary {
                name: "Chirurgie orthopédique".to_string(),
                slug: "chirurgie-orthopedique".to_string(),
                count: 2,
            }
        );
        assert_eq!(summaries[1].count, 3);
        assert_eq!(summaries.len(), 3);

        assert_eq!(
            procedures(&service.list_procedures_for_slug("chirurgie-digestive")),
            vec!["Chirurgie colorectale"]
        );
        assert!(service.list_procedures_for_slug("orl").is_empty());
    }

    #[test]
    fn test_case_variant_specialties_are_one_entry() {
        let service = make_service(
            r#"[
                {"specialite": "Urologie", "acte": "A"},
                {"specialite": "UROLOGIE", "acte": "B"}
            ]"#,
            r#"{"timing": "T"}"#,
        );

        assert_eq!(service.list_specialties(), ["Urologie"]);
        assert_eq!(
            service.specialty_summaries(),
            vec![SpecialtySummary {
                name: "Urologie".to_string(),
                slug: "urologie".to_string(),
                count: 2,
            }]
        );

        for summary in service.specialty_summaries() {
            assert_eq!(service.list_procedures_for_specialty(&summary.name).len(), summary.count);
            assert_eq!(service.list_procedures_for_slug(&summary.slug).len(), summary.count);
        }
        assert_eq!(service.info().specialty_count, 1);
    }

    #[test]
    fn test_general_recommendations() {
        let service = hip_service();
        assert_eq!(
            service.general_recommendations().timing,
            Some(Guidance::from("30 min avant incision"))
        );
        assert_eq!(
            service
                .general_recommendations()
                .get(Topic::Timing)
                .and_then(Guidance::as_text),
            Some("30 min avant incision")
        );
    }

    #[test]
    fn test_empty_dataset() {
        let service = make_service("[]", r#"{"timing": "T"}"#);
        assert!(service.list_specialties().is_empty());
        assert!(service.specialty_summaries().is_empty());
        assert!(service.search_by_procedure("hanche").is_empty());
        assert!(service.list_procedures_for_specialty("Urologie").is_empty());
        assert_eq!(service.info().record_count, 0);
    }

    #[test]
    fn test_info() {
        let info = mixed_service().info();
        assert_eq!(info.source, "SFAR");
        assert_eq!(info.version, "2.0");
        assert_eq!(info.record_count, 6);
        assert_eq!(info.specialty_count, 3);
        assert_eq!(info.without_antibiotic, 1);
    }
}
