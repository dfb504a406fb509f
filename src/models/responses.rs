use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_ready: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Non-error "nothing to return" response, e.g. an empty collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableResponse {
    pub success: bool,
    pub message: String,
}

impl UnavailableResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Bookkeeping returned alongside nearest-hospital results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestMeta {
    pub total_in_db: usize,
    pub skipped_no_coords: usize,
}

/// Response for incident creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportIncidentResponse {
    pub success: bool,
    pub incident_id: String,
}
