//! gRPC server implementation.

use rfe_types::Guidance;
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::handle::{DatasetHandle, ServiceError};
use crate::proto::{
    admin_service_server::AdminService, list_procedures_request::Selector,
    prophylaxis_service_server::ProphylaxisService, GetDatasetInfoRequest, GetDatasetInfoResponse,
    GetGeneralRecommendationsRequest, GetGeneralRecommendationsResponse, Guidance as ProtoGuidance,
    ListProceduresRequest, ListSpecialtiesRequest, ListSpecialtiesResponse, ProcedureRecord,
    RecordsResponse, ReloadRequest, ReloadResponse, SearchAntibioticsRequest,
    SearchProceduresRequest, Specialty,
};
use crate::query::QueryService;

/// RFE gRPC Server.
#[derive(Clone, Debug)]
pub struct RfeServer {
    handle: DatasetHandle,
}

impl RfeServer {
    /// Creates a new server over the given handle.
    pub fn new(handle: DatasetHandle) -> Self {
        Self { handle }
    }

    /// Returns the dataset handle.
    pub fn handle(&self) -> &DatasetHandle {
        &self.handle
    }

    /// Takes a query snapshot, mapping a missing dataset to
    /// `FAILED_PRECONDITION`.
    fn query(&self) -> Result<QueryService, Status> {
        self.handle.query().map_err(to_status)
    }

    /// Convert internal record to proto ProcedureRecord
    fn to_proto_record(record: &rfe_types::ProcedureRecord) -> ProcedureRecord {
        ProcedureRecord {
            specialty: record.specialty.clone(),
            procedure: record.procedure.clone(),
            antibiotic: record.antibiotic.clone(),
            dosage: record.dosage.clone(),
            allergy_alternative: record.allergy_alternative.clone(),
            reinjection_interval: record.reinjection_interval.clone(),
            duration: record.duration.clone(),
            grade: record.grade.clone(),
            comment: record.comment.clone(),
        }
    }

    fn to_records_response(records: Vec<&rfe_types::ProcedureRecord>) -> RecordsResponse {
        RecordsResponse {
            records: records.into_iter().map(Self::to_proto_record).collect(),
        }
    }

    /// Convert a general recommendation topic to proto Guidance
    fn to_proto_guidance(topic: &str, guidance: &Guidance) -> ProtoGuidance {
        let json = match guidance {
            Guidance::Text(_) => String::new(),
            Guidance::Structured(map) => serde_json::Value::Object(map.clone()).to_string(),
        };

        ProtoGuidance {
            topic: topic.to_string(),
            summary: guidance.summary(),
            json,
            grade: guidance.grade().map(str::to_string),
        }
    }
}

fn to_status(err: ServiceError) -> Status {
    match err {
        ServiceError::PreconditionViolation | ServiceError::NoSource => {
            Status::failed_precondition(err.to_string())
        }
        ServiceError::Load(e) => Status::internal(e.to_string()),
    }
}

#[tonic::async_trait]
impl ProphylaxisService for RfeServer {
    async fn search_procedures(
        &self,
        request: Request<SearchProceduresRequest>,
    ) -> Result<Response<RecordsResponse>, Status> {
        let req = request.into_inner();
        let service = self.query()?;

        let filter = Some(req.specialty_filter.as_str()).filter(|f| !f.trim().is_empty());
        let records = service.search(&req.query, filter);
        debug!(query = %req.query, hits = records.len(), "procedure search");

        Ok(Response::new(Self::to_records_response(records)))
    }

    async fn search_antibiotics(
        &self,
        request: Request<SearchAntibioticsRequest>,
    ) -> Result<Response<RecordsResponse>, Status> {
        let query = request.into_inner().query;
        let service = self.query()?;

        let records = service.search_by_antibiotic(&query);
        debug!(query = %query, hits = records.len(), "antibiotic search");

        Ok(Response::new(Self::to_records_response(records)))
    }

    async fn list_specialties(
        &self,
        _request: Request<ListSpecialtiesRequest>,
    ) -> Result<Response<ListSpecialtiesResponse>, Status> {
        let service = self.query()?;

        let specialties = service
            .specialty_summaries()
            .into_iter()
            .map(|s| Specialty {
                name: s.name,
                slug: s.slug,
                count: s.count as u32,
            })
            .collect();

        Ok(Response::new(ListSpecialtiesResponse { specialties }))
    }

    async fn list_procedures(
        &self,
        request: Request<ListProceduresRequest>,
    ) -> Result<Response<RecordsResponse>, Status> {
        let selector = request
            .into_inner()
            .selector
            .ok_or_else(|| Status::invalid_argument("specialty or slug is required"))?;
        let service = self.query()?;

        let records = match &selector {
            Selector::Specialty(specialty) => service.list_procedures_for_specialty(specialty),
            Selector::Slug(slug) => service.list_procedures_for_slug(slug),
        };

        Ok(Response::new(Self::to_records_response(records)))
    }

    async fn get_general_recommendations(
        &self,
        _request: Request<GetGeneralRecommendationsRequest>,
    ) -> Result<Response<GetGeneralRecommendationsResponse>, Status> {
        let service = self.query()?;

        let topics = service
            .general_recommendations()
            .entries()
            .map(|(topic, guidance)| Self::to_proto_guidance(topic, guidance))
            .collect();

        Ok(Response::new(GetGeneralRecommendationsResponse { topics }))
    }

    async fn get_dataset_info(
        &self,
        _request: Request<GetDatasetInfoRequest>,
    ) -> Result<Response<GetDatasetInfoResponse>, Status> {
        let info = self.query()?.info();

        Ok(Response::new(GetDatasetInfoResponse {
            source: info.source,
            version: info.version,
            date_extraction: info.date_extraction,
            record_count: info.record_count as u32,
            specialty_count: info.specialty_count as u32,
            without_antibiotic: info.without_antibiotic as u32,
            graded: info.graded as u32,
        }))
    }
}

#[tonic::async_trait]
impl AdminService for RfeServer {
    async fn reload(
        &self,
        _request: Request<ReloadRequest>,
    ) -> Result<Response<ReloadResponse>, Status> {
        let handle = self.handle.clone();

        // Reading and indexing the document is blocking work.
        let result = tokio::task::spawn_blocking(move || handle.reload())
            .await
            .map_err(|e| Status::internal(format!("reload task failed: {}", e)))?;

        let response = match result {
            Ok(count) => ReloadResponse {
                reloaded: true,
                record_count: count as u32,
                error: String::new(),
            },
            Err(ServiceError::Load(e)) => ReloadResponse {
                reloaded: false,
                record_count: self
                    .handle
                    .snapshot()
                    .map(|d| d.len() as u32)
                    .unwrap_or_default(),
                error: e.to_string(),
            },
            Err(e) => return Err(to_status(e)),
        };

        Ok(Response::new(response))
    }
}
