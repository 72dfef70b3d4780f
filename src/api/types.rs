//! Shared types for the patient API layer.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::config::ServiceConfig;
use crate::db;
use crate::models::Patient;
use crate::validation::PatientValidator;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared, read-only context for all routes and middleware.
///
/// Holds no connection: each handler opens its own for one operation.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ServiceConfig>,
    pub validator: Arc<PatientValidator>,
}

impl ApiContext {
    pub fn new(config: ServiceConfig) -> Self {
        let validator = PatientValidator::new(config.allowed_email_domains.clone());
        Self {
            config: Arc::new(config),
            validator: Arc::new(validator),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.config.db_path
    }

    /// Open a connection scoped to the calling handler.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        Ok(db::connect(self.db_path())?)
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct SortedPatientsResponse {
    pub sorted_patients: Vec<Patient>,
}

/// Raw query tokens; validated by `patients::parse_sort_request`.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}
