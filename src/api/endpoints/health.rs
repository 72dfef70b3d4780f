//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// `GET /` — connection check for the dashboard.
pub async fn check() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Patient records service is live",
        version: crate::config::APP_VERSION,
    })
}
