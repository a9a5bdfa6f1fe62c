use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::models::{AiSummary, AnalysisPayload, NewPatient, Patient, UploadAck, UploadFile};

/// Backend liveness answer from `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

/// One operation per backend endpoint.
///
/// Calls are independent: no retry, caching, timeout or coalescing of
/// identical concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientGateway: Send + Sync {
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;

    async fn patient_analysis(&self, patient_id: i64) -> Result<AnalysisPayload, ApiError>;

    async fn upload_file(&self, file: UploadFile, patient_id: Option<i64>) -> Result<UploadAck, ApiError>;

    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, ApiError>;

    /// Best-effort: any failure yields an empty list.
    async fn search_patients(&self, query: &str) -> Vec<Patient>;

    /// `Ok(None)` when the patient has no stored summary yet.
    async fn ai_summary(&self, patient_id: i64) -> Result<Option<AiSummary>, ApiError>;

    /// Runs the agent board on the backend and waits for the result.
    async fn generate_ai_summary(&self, patient_id: i64) -> Result<AiSummary, ApiError>;
}
