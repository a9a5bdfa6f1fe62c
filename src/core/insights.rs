//! AI medical board: stored summary lookup, on-demand generation, and the
//! per-agent report views.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::notify::Notifier;
use crate::api::{ApiError, PatientGateway};
use crate::models::{AgentDetails, AgentRole, AiSummary};

pub const GENERATION_FAILED_MESSAGE: &str =
    "Unable to generate analysis. Please ensure the local AI engine is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Working,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightView {
    /// The scribe's executive summary.
    Summary,
    Report(AgentRole),
}

#[derive(Debug, Clone)]
pub struct InsightsSnapshot {
    pub patient_id: i64,
    pub state: AgentState,
    pub summary: Option<String>,
    pub details: Option<AgentDetails>,
    pub view: InsightView,
    epoch: u64,
}

impl InsightsSnapshot {
    /// Text for the currently selected view, if the board has it.
    pub fn visible_text(&self) -> Option<&str> {
        match self.view {
            InsightView::Summary => self.summary.as_deref(),
            InsightView::Report(role) => self.details.as_ref().and_then(|details| details.report(role)),
        }
    }
}

pub struct InsightsPanel {
    gateway: Arc<dyn PatientGateway>,
    notifier: Notifier,
    state: watch::Sender<InsightsSnapshot>,
}

impl InsightsPanel {
    pub fn new(gateway: Arc<dyn PatientGateway>, notifier: Notifier, patient_id: i64) -> Self {
        let (state, _) = watch::channel(InsightsSnapshot {
            patient_id,
            state: AgentState::Idle,
            summary: None,
            details: None,
            view: InsightView::Summary,
            epoch: 0,
        });
        Self {
            gateway,
            notifier,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<InsightsSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> InsightsSnapshot {
        self.state.borrow().clone()
    }

    /// Reset the board for `patient_id` and pull any stored summary.
    pub async fn show_patient(&self, patient_id: i64) -> bool {
        self.state.send_modify(|snapshot| {
            snapshot.epoch += 1;
            snapshot.patient_id = patient_id;
            snapshot.state = AgentState::Idle;
            snapshot.summary = None;
            snapshot.details = None;
            snapshot.view = InsightView::Summary;
        });
        self.load_stored().await
    }

    /// Returns whether a stored summary was found and applied. Ignored while
    /// a generation is running.
    pub async fn load_stored(&self) -> bool {
        let (patient_id, epoch) = self.target();
        if self.state.borrow().state == AgentState::Working {
            debug!(patient_id, "generation running, skipping stored summary");
            return false;
        }
        match self.gateway.ai_summary(patient_id).await {
            Ok(Some(summary)) => self.apply(epoch, summary),
            Ok(None) => {
                debug!(patient_id, "no saved analysis found");
                false
            }
            Err(err) => {
                debug!(patient_id, error = %err, "no saved analysis found");
                false
            }
        }
    }

    /// Run the agent board on the backend for the current patient.
    pub async fn generate(&self) -> Result<(), ApiError> {
        let mut ticket = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.state == AgentState::Working {
                return false;
            }
            // A stored-summary load still in flight belongs to the old epoch.
            snapshot.epoch += 1;
            snapshot.state = AgentState::Working;
            snapshot.summary = None;
            ticket = Some((snapshot.patient_id, snapshot.epoch));
            true
        });
        let (patient_id, epoch) = match ticket {
            Some(ticket) => ticket,
            None => {
                debug!("generation already running");
                return Ok(());
            }
        };

        info!(patient_id, "generating AI summary");
        match self.gateway.generate_ai_summary(patient_id).await {
            Ok(summary) => {
                self.apply(epoch, summary);
                Ok(())
            }
            Err(err) => {
                let current = self.state.send_if_modified(|snapshot| {
                    if snapshot.epoch != epoch {
                        return false;
                    }
                    snapshot.summary = Some(GENERATION_FAILED_MESSAGE.to_string());
                    snapshot.state = AgentState::Idle;
                    true
                });
                if current {
                    self.notifier.error(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Switch the visible report. Only allowed once the board is done.
    pub fn select_view(&self, view: InsightView) -> bool {
        self.state.send_if_modified(|snapshot| {
            if snapshot.state != AgentState::Done || snapshot.view == view {
                return false;
            }
            snapshot.view = view;
            true
        })
    }

    fn target(&self) -> (i64, u64) {
        let snapshot = self.state.borrow();
        (snapshot.patient_id, snapshot.epoch)
    }

    fn apply(&self, epoch: u64, summary: AiSummary) -> bool {
        self.state.send_if_modified(|snapshot| {
            if snapshot.epoch != epoch {
                debug!(patient_id = snapshot.patient_id, "dropping summary for previous patient");
                return false;
            }
            snapshot.summary = Some(summary.summary);
            snapshot.details = Some(summary.details);
            snapshot.state = AgentState::Done;
            true
        })
    }
}
