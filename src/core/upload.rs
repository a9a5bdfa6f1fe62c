//! Upload list behind the drop zones.
//!
//! Progress shown while a request is in flight is simulated: it climbs by a
//! fixed step on a timer and stalls at the ceiling until the backend answers.
//! It does not track bytes on the wire.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{ApiError, PatientGateway};
use crate::config::UploadSettings;
use crate::models::{UploadAck, UploadFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Completed,
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadEntry {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    /// Percentage, 0..=100.
    pub progress: u8,
    pub status: UploadStatus,
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub id: Uuid,
    pub result: Result<UploadAck, ApiError>,
}

#[derive(Clone)]
pub struct UploadQueue {
    gateway: Arc<dyn PatientGateway>,
    settings: UploadSettings,
    patient_id: Option<i64>,
    entries: Arc<Mutex<Vec<UploadEntry>>>,
}

impl UploadQueue {
    pub fn new(gateway: Arc<dyn PatientGateway>, settings: UploadSettings) -> Self {
        Self {
            gateway,
            settings,
            patient_id: None,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Attach every upload from this queue to `patient_id`.
    pub fn for_patient(mut self, patient_id: i64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub async fn entries(&self) -> Vec<UploadEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn entry(&self, id: Uuid) -> Option<UploadEntry> {
        self.entries.lock().await.iter().find(|entry| entry.id == id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub async fn upload(&self, file: UploadFile) -> UploadOutcome {
        let id = Uuid::new_v4();
        self.entries.lock().await.push(UploadEntry {
            id,
            name: file.file_name.clone(),
            size: file.size(),
            content_type: file.content_type.clone(),
            progress: 0,
            status: UploadStatus::Uploading,
        });
        info!(%id, file = %file.file_name, "upload started");

        let ticker = tokio::spawn(simulate_progress(self.entries.clone(), id, self.settings.clone()));
        let result = self.gateway.upload_file(file, self.patient_id).await;
        ticker.abort();

        if let Some(entry) = self.entries.lock().await.iter_mut().find(|entry| entry.id == id) {
            match &result {
                Ok(_) => {
                    entry.progress = 100;
                    entry.status = UploadStatus::Completed;
                }
                Err(err) => {
                    warn!(%id, file = %entry.name, error = %err, "upload failed");
                    entry.status = UploadStatus::Errored(err.to_string());
                }
            }
        }

        UploadOutcome { id, result }
    }

    /// Upload a dropped batch; every file gets its own entry and request.
    pub async fn upload_all(&self, files: Vec<UploadFile>) -> Vec<UploadOutcome> {
        join_all(files.into_iter().map(|file| self.upload(file))).await
    }
}

async fn simulate_progress(entries: Arc<Mutex<Vec<UploadEntry>>>, id: Uuid, settings: UploadSettings) {
    let tick = settings.progress_tick().max(Duration::from_millis(1));
    let ceiling = settings.progress_ceiling.min(100);
    let mut interval = interval_at(Instant::now() + tick, tick);
    loop {
        interval.tick().await;
        let mut entries = entries.lock().await;
        match entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if entry.status == UploadStatus::Uploading => {
                if entry.progress < ceiling {
                    entry.progress = entry.progress.saturating_add(settings.progress_step).min(ceiling);
                }
            }
            // Finished or removed from the list.
            _ => break,
        }
    }
}
