#![forbid(unsafe_code)]

//! Core domain model and business logic for the Vita health assistant.
//!
//! This crate provides:
//! - Credential store (file-backed username -> password digest mapping)
//! - Authentication (register / login)
//! - Metrics engine (BMI, BMR, daily water intake)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod auth;
pub mod metrics;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{CredentialStore, Credentials, FileStore, MemoryStore};
pub use auth::{hash_password, Authenticator};
pub use metrics::{bmi, bmr, bmr_for, compute_report, water_intake_liters, MetricsReport};
