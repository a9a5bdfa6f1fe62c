//! Dashboard state: the shared patient session and the controllers behind
//! the search box, upload zones, and AI board.

pub mod insights;
pub mod notify;
pub mod search;
pub mod session;
pub mod upload;

pub use insights::{AgentState, InsightView, InsightsPanel, InsightsSnapshot};
pub use notify::{Level, Notification, Notifier};
pub use search::{PatientSearch, SearchResults};
pub use session::{FetchOutcome, LoadState, PatientSession, SessionSnapshot};
pub use upload::{UploadEntry, UploadOutcome, UploadQueue, UploadStatus};
