use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::api::models::ErrorResponse;

/// Custom error type for the geo service
#[derive(Debug)]
pub enum GeoError {
    /// Lookup database failure other than "address not found"
    Database(String),
    /// Configuration error
    Config(String),
    /// IO error
    Io(std::io::Error),
    /// Other errors
    Other(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Database(msg) => write!(f, "Database error: {}", msg),
            GeoError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GeoError::Io(err) => write!(f, "IO error: {}", err),
            GeoError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Io(err)
    }
}

impl From<maxminddb::MaxMindDBError> for GeoError {
    fn from(err: maxminddb::MaxMindDBError) -> Self {
        GeoError::Database(err.to_string())
    }
}

impl From<toml::de::Error> for GeoError {
    fn from(err: toml::de::Error) -> Self {
        GeoError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Other(err.to_string())
    }
}

impl GeoError {
    fn code(&self) -> &'static str {
        match self {
            GeoError::Database(_) => "DATABASE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for GeoError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: Some(self.code().to_string()),
        })
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
