//! HTTP implementation of [`PatientGateway`] against the analysis backend.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};
use url::Url;
use validator::Validate;

use super::error::{failure_message, ApiError};
use super::gateway::{HealthStatus, PatientGateway};
use crate::config::ApiSettings;
use crate::models::{AgentDetails, AiSummary, AnalysisPayload, NewPatient, Patient, UploadAck, UploadFile};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

const HEALTH_FAILED: &str = "Network response was not ok";
const ANALYSIS_FAILED: &str = "Failed to fetch patient analysis";
const UPLOAD_FAILED: &str = "Upload failed";
const CREATE_FAILED: &str = "Failed to create patient";
const SEARCH_FAILED: &str = "Failed to search patients";
const SUMMARY_FETCH_FAILED: &str = "Failed to fetch AI summary";
const SUMMARY_GENERATE_FAILED: &str = "Failed to generate AI summary";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

/// The GET summary endpoint answers `{"summary": null, ...}` when nothing is stored.
#[derive(Debug, Deserialize)]
struct StoredSummary {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    date: Option<NaiveDateTime>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    agent_details: Option<AgentDetails>,
}

impl StoredSummary {
    fn into_summary(self) -> Option<AiSummary> {
        let summary = self.summary.filter(|text| !text.trim().is_empty())?;
        Some(AiSummary {
            id: self.id,
            date: self.date,
            summary,
            details: self.agent_details.unwrap_or_default(),
        })
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::new(&settings.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(request: RequestBuilder, context: &'static str) -> Result<Response, ApiError> {
        request.send().await.map_err(|source| {
            error!(error = %source, "{}", context);
            ApiError::Transport { context, source }
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, context: &'static str) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { context, source })?;

        if !status.is_success() {
            let message = failure_message(&body, context);
            error!(%status, %message, "{}", context);
            return Err(ApiError::Status { status, message });
        }

        serde_json::from_slice(&body).map_err(|source| {
            error!(error = %source, "{}", context);
            ApiError::Decode { context, source }
        })
    }

    /// Search without degrading failures, for views that want to tell
    /// "no matches" apart from "search unavailable".
    #[instrument(skip(self))]
    pub async fn try_search_patients(&self, query: &str) -> Result<Vec<Patient>, ApiError> {
        let url = self.endpoint("patients/search")?;
        let response = Self::send(self.http.get(url).query(&[("query", query)]), SEARCH_FAILED).await?;
        Self::read_json(response, SEARCH_FAILED).await
    }
}

#[async_trait]
impl PatientGateway for ApiClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("health")?;
        let response = Self::send(self.http.get(url), HEALTH_FAILED).await?;
        Self::read_json(response, HEALTH_FAILED).await
    }

    #[instrument(skip(self))]
    async fn patient_analysis(&self, patient_id: i64) -> Result<AnalysisPayload, ApiError> {
        let url = self.endpoint(&format!("patient/{}/analysis", patient_id))?;
        let response = Self::send(self.http.get(url), ANALYSIS_FAILED).await?;
        Self::read_json(response, ANALYSIS_FAILED).await
    }

    #[instrument(skip(self, file), fields(file = %file.file_name, size = file.bytes.len()))]
    async fn upload_file(&self, file: UploadFile, patient_id: Option<i64>) -> Result<UploadAck, ApiError> {
        let url = self.endpoint("upload")?;
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|source| ApiError::Transport {
                context: UPLOAD_FAILED,
                source,
            })?;

        let mut form = Form::new().part("file", part);
        if let Some(patient_id) = patient_id {
            form = form.text("patient_id", patient_id.to_string());
        }

        let response = Self::send(self.http.post(url).multipart(form), UPLOAD_FAILED).await?;
        Self::read_json(response, UPLOAD_FAILED).await
    }

    #[instrument(skip(self, patient), fields(name = %patient.name))]
    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, ApiError> {
        patient.validate()?;
        let url = self.endpoint("patients/create")?;
        let response = Self::send(self.http.post(url).json(patient), CREATE_FAILED).await?;
        Self::read_json(response, CREATE_FAILED).await
    }

    async fn search_patients(&self, query: &str) -> Vec<Patient> {
        match self.try_search_patients(query).await {
            Ok(patients) => patients,
            Err(err) => {
                warn!(error = %err, "patient search unavailable, showing no results");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn ai_summary(&self, patient_id: i64) -> Result<Option<AiSummary>, ApiError> {
        let url = self.endpoint(&format!("patient/{}/ai_summary", patient_id))?;
        let response = Self::send(self.http.get(url), SUMMARY_FETCH_FAILED).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(patient_id, "no stored AI summary");
            return Ok(None);
        }
        let stored: StoredSummary = Self::read_json(response, SUMMARY_FETCH_FAILED).await?;
        Ok(stored.into_summary())
    }

    #[instrument(skip(self))]
    async fn generate_ai_summary(&self, patient_id: i64) -> Result<AiSummary, ApiError> {
        let url = self.endpoint(&format!("patient/{}/ai_summary", patient_id))?;
        let response = Self::send(self.http.post(url), SUMMARY_GENERATE_FAILED).await?;
        Self::read_json(response, SUMMARY_GENERATE_FAILED).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_api_prefix_when_joining() {
        let client = ApiClient::new("http://127.0.0.1:5000/api").unwrap();
        assert_eq!(
            client.endpoint("patient/7/analysis").unwrap().as_str(),
            "http://127.0.0.1:5000/api/patient/7/analysis"
        );

        let slashed = ApiClient::new("http://127.0.0.1:5000/api/").unwrap();
        assert_eq!(slashed.endpoint("health").unwrap().as_str(), "http://127.0.0.1:5000/api/health");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::Url(_))));
    }

    #[test]
    fn stored_summary_without_text_is_absent() {
        let stored: StoredSummary = serde_json::from_str(r#"{"summary": null, "agent_details": null}"#).unwrap();
        assert!(stored.into_summary().is_none());
    }

    #[test]
    fn stored_summary_with_blank_text_is_absent() {
        let stored: StoredSummary =
            serde_json::from_str(r#"{"id": 3, "summary": "  ", "agent_details": {"vitals": "ok"}}"#).unwrap();
        assert!(stored.into_summary().is_none());
    }
}
