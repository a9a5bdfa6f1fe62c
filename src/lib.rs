//! Noah dashboard client library
//!
//! Talks to the patient analysis backend and holds the dashboard state
//! shared by every view: the selected patient, search suggestions, the
//! upload list, and the AI medical board.

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod ui;
pub mod utils;

pub use api::{ApiClient, ApiError, PatientGateway};
pub use crate::core::{Notifier, PatientSession};
