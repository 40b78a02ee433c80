//! Request/response boundary for serverless invocation
//!
//! The handler never fails: pipeline errors become a 500 envelope carrying
//! the stringified error chain.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::insights::{generate_insights, InsightConfig};

pub const STATUS_OK: u16 = 200;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Gateway-style response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: STATUS_OK,
            headers,
            body,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status_code: STATUS_INTERNAL_ERROR,
            headers: BTreeMap::new(),
            body: json!({ "error": message }).to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Compute the stress insights for one invocation.
///
/// `event` and `context` are accepted for gateway compatibility and ignored.
pub fn lambda_handler(_event: &Value, _context: &Value, config: &InsightConfig) -> HandlerResponse {
    let result = generate_insights(config).and_then(|report| report.response.to_json());

    match result {
        Ok(body) => HandlerResponse::ok(body),
        Err(err) => {
            let message = format!("{:#}", err);
            tracing::error!(error = %message, "insight invocation failed");
            HandlerResponse::error(&message)
        }
    }
}
