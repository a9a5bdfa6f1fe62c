//! Data returned by, and submitted to, the analysis backend.

pub mod analysis;
pub mod patient;
pub mod summary;
pub mod upload;

pub use analysis::{AnalysisPayload, ClinicalNoteInsight, History, LabEntry, RiskPrediction, Trend, Trends, VitalsEntry};
pub use patient::{NewPatient, Patient};
pub use summary::{AgentDetails, AgentRole, AiSummary};
pub use upload::{UploadAck, UploadCategory, UploadFile};
