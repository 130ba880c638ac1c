//! `/api/health` endpoint.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    pub timestamp: DateTime<Utc>,
}

pub fn health_check(start_time: Instant) -> HealthResponse {
    HealthResponse {
        success: true,
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        timestamp: Utc::now(),
    }
}
