//! Health probes for the chat server

use std::time::Instant;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: ChatChecks,
}

/// What the chat endpoint needs to give useful answers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChatChecks {
    pub system_prompt_loaded: bool,
    pub tools: usize,
}

impl ChatChecks {
    fn ready(&self) -> bool {
        self.system_prompt_loaded && self.tools > 0
    }
}

pub struct HealthHandler {
    checks: ChatChecks,
    started: Instant,
}

impl HealthHandler {
    pub fn new(tools_registered: usize, system_prompt_loaded: bool) -> Self {
        Self {
            checks: ChatChecks {
                system_prompt_loaded,
                tools: tools_registered,
            },
            started: Instant::now(),
        }
    }

    /// Always 200 with the current chat checks
    pub async fn health(&self) -> impl IntoResponse {
        Json(HealthReport {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.started.elapsed().as_secs(),
            checks: self.checks,
        })
    }

    /// 503 until a system prompt is loaded and at least one tool is registered
    pub async fn ready(&self) -> impl IntoResponse {
        let (code, status) = if self.checks.ready() {
            (StatusCode::OK, "ready")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
        };
        (code, Json(json!({ "status": status, "checks": self.checks })))
    }

    pub async fn live(&self) -> impl IntoResponse {
        Json(json!({ "status": "alive" }))
    }
}
