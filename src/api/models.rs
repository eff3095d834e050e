//! API data models

use serde::{Deserialize, Serialize};

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Body of the ping endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub ping: String,
}

impl PingResponse {
    pub fn pong() -> Self {
        Self {
            ping: "pong".to_string(),
        }
    }
}
