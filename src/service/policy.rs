//! Response body shape
//!
//! Query flags are detected by presence alone, so `?compact=false` still
//! selects the compact body.

use serde::Serialize;
use url::form_urlencoded;

use crate::error::Result;
use crate::model::GeoResponse;

pub const COMPACT: &str = "compact";
pub const AUTH_ONLY: &str = "auth_only";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueryFlags {
    pub compact: bool,
    pub auth_only: bool,
}

impl QueryFlags {
    pub fn from_query(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes()).fold(Self::default(), |mut flags, (key, _)| {
            match key.as_ref() {
                COMPACT => flags.compact = true,
                AUTH_ONLY => flags.auth_only = true,
                _ => {}
            }
            flags
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Sorted keys, four space indent
    Pretty,
    Compact,
    /// Status and headers only
    Suppressed,
}

impl BodyMode {
    pub fn decide(flags: QueryFlags, header_auth_only: bool) -> Self {
        if flags.compact {
            BodyMode::Compact
        } else if flags.auth_only || header_auth_only {
            BodyMode::Suppressed
        } else {
            BodyMode::Pretty
        }
    }

    /// Serialized body with its trailing newline, or `None` when suppressed.
    pub fn render(self, response: &GeoResponse) -> Result<Option<String>> {
        let mut body = match self {
            BodyMode::Suppressed => return Ok(None),
            BodyMode::Compact => serde_json::to_string(response)?,
            BodyMode::Pretty => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                response.serialize(&mut serializer)?;
                String::from_utf8_lossy(&buf).into_owned()
            }
        };
        body.push('\n');
        Ok(Some(body))
    }
}
