//! Request and response envelope types for the cgminer RPC API.
//!
//! Requests are a single JSON object naming the command and, optionally, one
//! string parameter. Responses wrap a `STATUS` block and a command-specific
//! payload list (`DEVS`, `POOLS`, `SUMMARY`, `STATS`) in one JSON object.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::types::{Device, MinerStats, PoolInfo, SummaryStats};

/// A single command sent to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRequest {
    command: String,

    // Absent and empty are distinct to the daemon for some commands, so an
    // empty parameter is never put on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<String>,
}

impl CommandRequest {
    /// Create a request with no parameter.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameter: None,
        }
    }

    /// Create a request with a parameter. An empty parameter is dropped.
    pub fn with_parameter(command: impl Into<String>, parameter: impl Into<String>) -> Self {
        let parameter = parameter.into();
        Self {
            command: command.into(),
            parameter: (!parameter.is_empty()).then_some(parameter),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Serialize to the JSON bytes written on the wire.
    pub fn encode(&self) -> ApiResult<Vec<u8>> {
        if self.command.is_empty() {
            return Err(ApiError::Encoding("command name is empty".to_string()));
        }
        serde_json::to_vec(self).map_err(|e| ApiError::Encoding(e.to_string()))
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(f, "{}|{}", self.command, parameter),
            None => write!(f, "{}", self.command),
        }
    }
}

/// Status letter reported by the daemon for a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum StatusCode {
    Success,
    Info,
    Warning,
    Error,
    Fatal,
    /// Letter not defined by the API
    Unknown(String),
}

impl StatusCode {
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl From<String> for StatusCode {
    fn from(letter: String) -> Self {
        match letter.as_str() {
            "S" => StatusCode::Success,
            "I" => StatusCode::Info,
            "W" => StatusCode::Warning,
            "E" => StatusCode::Error,
            "F" => StatusCode::Fatal,
            _ => StatusCode::Unknown(letter),
        }
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::Unknown(String::new())
    }
}

/// One entry of the `STATUS` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusEntry {
    #[serde(rename = "STATUS")]
    pub status: StatusCode,

    #[serde(rename = "Code")]
    pub code: i64,

    #[serde(rename = "Description")]
    pub description: String,

    /// Daemon timestamp (Unix epoch seconds)
    #[serde(rename = "When")]
    pub when: i64,

    /// Human-readable message, e.g. "1 GPU(s)"
    #[serde(rename = "Msg")]
    pub msg: String,
}

/// Response to `devs`.
#[derive(Debug, Deserialize)]
pub(crate) struct DevsResponse {
    #[serde(rename = "STATUS")]
    pub status: Vec<StatusEntry>,
    #[serde(rename = "DEVS", default)]
    pub devs: Vec<Device>,
}

/// Response to `pools`.
#[derive(Debug, Deserialize)]
pub(crate) struct PoolsResponse {
    #[serde(rename = "STATUS")]
    pub status: Vec<StatusEntry>,
    #[serde(rename = "POOLS", default)]
    pub pools: Vec<PoolInfo>,
}

/// Response to `summary`.
#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    #[serde(rename = "STATUS")]
    pub status: Vec<StatusEntry>,
    #[serde(rename = "SUMMARY", default)]
    pub summary: Vec<SummaryStats>,
}

/// Response to `stats`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    #[serde(rename = "STATUS")]
    pub status: Vec<StatusEntry>,
    #[serde(rename = "STATS", default)]
    pub stats: Vec<MinerStats>,
}

/// Response carrying only a status block (`addpool` and friends).
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(rename = "STATUS")]
    pub status: Vec<StatusEntry>,
}

/// Access to the status block shared by every envelope.
pub(crate) trait Envelope {
    fn status(&self) -> &[StatusEntry];
}

macro_rules! impl_envelope {
    ($($ty:ty),* $(,)?) => {
        $(impl Envelope for $ty {
            fn status(&self) -> &[StatusEntry] {
                &self.status
            }
        })*
    };
}

impl_envelope!(
    DevsResponse,
    PoolsResponse,
    SummaryResponse,
    StatsResponse,
    StatusResponse,
);
