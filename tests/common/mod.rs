#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use fake::faker::name::en::Name;
use fake::Fake;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use noah_dashboard::api::{ApiError, HealthStatus, PatientGateway};
use noah_dashboard::models::{AgentDetails, AiSummary, AnalysisPayload, NewPatient, Patient, UploadAck, UploadFile};

pub fn patient(id: i64) -> Patient {
    Patient {
        id,
        name: Name().fake(),
        age: Some((18u32..90).fake()),
        gender: Some("Female".to_string()),
        contact_info: None,
        address: None,
    }
}

pub fn named_patient(id: i64, name: &str) -> Patient {
    Patient {
        name: name.to_string(),
        ..patient(id)
    }
}

/// In-memory backend whose responses can be held back or made to fail.
#[derive(Default)]
pub struct ScriptedGateway {
    pub patients: Vec<Patient>,
    failing_analyses: HashSet<i64>,
    rejected_uploads: HashSet<String>,
    stored_summaries: HashMap<i64, String>,
    failing_generations: HashSet<i64>,
    analysis_gates: Mutex<HashMap<i64, oneshot::Receiver<()>>>,
    upload_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    summary_gates: Mutex<HashMap<i64, oneshot::Receiver<()>>>,
    generation_gates: Mutex<HashMap<i64, oneshot::Receiver<()>>>,
    analysis_calls: Mutex<Vec<i64>>,
    search_calls: Mutex<Vec<String>>,
    upload_calls: Mutex<Vec<(String, Option<i64>)>>,
    summary_calls: Mutex<Vec<i64>>,
    generate_calls: Mutex<Vec<i64>>,
}

impl ScriptedGateway {
    pub fn with_patients(patients: Vec<Patient>) -> Self {
        Self {
            patients,
            ..Self::default()
        }
    }

    pub fn fail_analysis(mut self, patient_id: i64) -> Self {
        self.failing_analyses.insert(patient_id);
        self
    }

    pub fn reject_upload(mut self, file_name: &str) -> Self {
        self.rejected_uploads.insert(file_name.to_string());
        self
    }

    pub fn with_stored_summary(mut self, patient_id: i64, text: &str) -> Self {
        self.stored_summaries.insert(patient_id, text.to_string());
        self
    }

    pub fn fail_generation(mut self, patient_id: i64) -> Self {
        self.failing_generations.insert(patient_id);
        self
    }

    /// The analysis for `patient_id` will not resolve until the returned sender fires.
    pub fn hold_analysis(&self, patient_id: i64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.analysis_gates.lock().unwrap().insert(patient_id, rx);
        tx
    }

    pub fn hold_upload(&self, file_name: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.upload_gates.lock().unwrap().insert(file_name.to_string(), rx);
        tx
    }

    pub fn hold_summary(&self, patient_id: i64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.summary_gates.lock().unwrap().insert(patient_id, rx);
        tx
    }

    pub fn hold_generation(&self, patient_id: i64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.generation_gates.lock().unwrap().insert(patient_id, rx);
        tx
    }

    pub fn summary_calls(&self) -> Vec<i64> {
        self.summary_calls.lock().unwrap().clone()
    }

    pub fn generate_calls(&self) -> Vec<i64> {
        self.generate_calls.lock().unwrap().clone()
    }

    pub fn analysis_calls(&self) -> Vec<i64> {
        self.analysis_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<(String, Option<i64>)> {
        self.upload_calls.lock().unwrap().clone()
    }

    fn find(&self, patient_id: i64) -> Patient {
        self.patients
            .iter()
            .find(|p| p.id == patient_id)
            .cloned()
            .unwrap_or_else(|| patient(patient_id))
    }
}

#[async_trait]
impl PatientGateway for ScriptedGateway {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: Some("ok".into()),
            message: "Backend is connected!".into(),
        })
    }

    async fn patient_analysis(&self, patient_id: i64) -> Result<AnalysisPayload, ApiError> {
        self.analysis_calls.lock().unwrap().push(patient_id);
        let gate = self.analysis_gates.lock().unwrap().remove(&patient_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing_analyses.contains(&patient_id) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to fetch patient analysis".into(),
            });
        }
        Ok(AnalysisPayload::empty(self.find(patient_id)))
    }

    async fn upload_file(&self, file: UploadFile, patient_id: Option<i64>) -> Result<UploadAck, ApiError> {
        self.upload_calls.lock().unwrap().push((file.file_name.clone(), patient_id));
        let gate = self.upload_gates.lock().unwrap().remove(&file.file_name);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.rejected_uploads.contains(&file.file_name) {
            return Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                message: "File type not allowed".into(),
            });
        }
        Ok(UploadAck {
            message: "File uploaded.".into(),
            filename: Some(file.file_name),
        })
    }

    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, ApiError> {
        Ok(Patient {
            id: 1000,
            name: patient.name.clone(),
            age: Some(patient.age),
            gender: Some(patient.gender.clone()),
            contact_info: Some(patient.contact.clone()),
            address: Some(patient.address.clone()),
        })
    }

    async fn search_patients(&self, query: &str) -> Vec<Patient> {
        self.search_calls.lock().unwrap().push(query.to_string());
        let needle = query.to_lowercase();
        self.patients
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    async fn ai_summary(&self, patient_id: i64) -> Result<Option<AiSummary>, ApiError> {
        self.summary_calls.lock().unwrap().push(patient_id);
        let gate = self.summary_gates.lock().unwrap().remove(&patient_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self.stored_summaries.get(&patient_id).map(|text| summary_of(text)))
    }

    async fn generate_ai_summary(&self, patient_id: i64) -> Result<AiSummary, ApiError> {
        self.generate_calls.lock().unwrap().push(patient_id);
        let gate = self.generation_gates.lock().unwrap().remove(&patient_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing_generations.contains(&patient_id) {
            return Err(ApiError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "AI Analysis Unavailable".into(),
            });
        }
        Ok(summary_of(&format!("Generated for #{}", patient_id)))
    }
}

fn summary_of(text: &str) -> AiSummary {
    AiSummary {
        id: None,
        date: None,
        summary: text.to_string(),
        details: AgentDetails {
            vitals: Some(format!("{} (vitals)", text)),
            labs: None,
            risks: None,
        },
    }
}
