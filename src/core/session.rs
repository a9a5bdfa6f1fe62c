//! The selected patient and its most recent analysis, shared by every view.
//!
//! Each fetch is tagged with a request token taken at dispatch; a response
//! whose token is no longer the latest is dropped, so a slow answer for a
//! previously selected patient can never overwrite the current one.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::notify::Notifier;
use crate::api::PatientGateway;
use crate::models::AnalysisPayload;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load patient data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is in flight; the previous payload (if any) is still shown.
    Loading,
    Loaded,
    /// The last fetch failed and the payload was cleared.
    Failed,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub patient_id: i64,
    pub state: LoadState,
    pub analysis: Option<Arc<AnalysisPayload>>,
    request: u64,
}

impl SessionSnapshot {
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

/// What happened to a single `select`/`refresh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    Failed,
    /// A newer fetch was dispatched before this one resolved; its result was dropped.
    Superseded,
    /// The patient was already selected, nothing was fetched.
    Unchanged,
}

pub struct PatientSession {
    gateway: Arc<dyn PatientGateway>,
    notifier: Notifier,
    state: watch::Sender<SessionSnapshot>,
}

impl PatientSession {
    pub fn new(gateway: Arc<dyn PatientGateway>, notifier: Notifier, default_patient_id: i64) -> Self {
        let (state, _) = watch::channel(SessionSnapshot {
            patient_id: default_patient_id,
            state: LoadState::Idle,
            analysis: None,
            request: 0,
        });
        Self {
            gateway,
            notifier,
            state,
        }
    }

    /// Create the session and load the default patient.
    pub async fn open(gateway: Arc<dyn PatientGateway>, notifier: Notifier, default_patient_id: i64) -> Self {
        let session = Self::new(gateway, notifier, default_patient_id);
        session.refresh().await;
        session
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn patient_id(&self) -> i64 {
        self.state.borrow().patient_id
    }

    /// Switch to `patient_id` and fetch its analysis.
    pub async fn select(&self, patient_id: i64) -> FetchOutcome {
        let unchanged = {
            let current = self.state.borrow();
            current.patient_id == patient_id && current.state != LoadState::Idle
        };
        if unchanged {
            return FetchOutcome::Unchanged;
        }
        info!(patient_id, "patient selected");
        self.load(patient_id).await
    }

    /// Refetch the current patient without changing the selection.
    pub async fn refresh(&self) -> FetchOutcome {
        let patient_id = self.patient_id();
        self.load(patient_id).await
    }

    async fn load(&self, patient_id: i64) -> FetchOutcome {
        let mut token = 0;
        self.state.send_modify(|snapshot| {
            snapshot.request += 1;
            token = snapshot.request;
            snapshot.patient_id = patient_id;
            snapshot.state = LoadState::Loading;
        });
        debug!(patient_id, token, "fetching patient analysis");

        let result = self.gateway.patient_analysis(patient_id).await;
        if let Err(err) = &result {
            warn!(patient_id, token, error = %err, "patient analysis fetch failed");
        }

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|snapshot| {
            if snapshot.request != token {
                return false;
            }
            match result {
                Ok(payload) => {
                    snapshot.analysis = Some(Arc::new(payload));
                    snapshot.state = LoadState::Loaded;
                    outcome = FetchOutcome::Loaded;
                }
                Err(_) => {
                    snapshot.analysis = None;
                    snapshot.state = LoadState::Failed;
                    outcome = FetchOutcome::Failed;
                }
            }
            true
        });

        match outcome {
            FetchOutcome::Failed => self.notifier.error(LOAD_FAILED_MESSAGE),
            FetchOutcome::Superseded => debug!(patient_id, token, "dropping superseded analysis response"),
            _ => {}
        }
        outcome
    }
}
