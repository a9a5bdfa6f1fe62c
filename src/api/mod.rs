//! API module for the Noah dashboard
//!
//! Everything that talks to the analysis backend over HTTP.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::ApiClient;
pub use error::ApiError;
pub use gateway::{HealthStatus, PatientGateway};
