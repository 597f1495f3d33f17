//! # Wire Contract
//!
//! JSON shapes exchanged with the HTTP/UI layer:
//!
//! * request: `{"target": "...", "port_range": "..."}`
//! * success: `{"target": "...", "results": [{"port": 80, "state": "open", "service": "http"}]}`
//! * failure: `{"error": "..."}` with a non-2xx status

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineErrorKind};
use crate::models::{PortState, ProbeOutcome, ScanRequest, ScanResult};
use crate::network::ports::DEFAULT_PORT_RANGE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequestBody {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub port_range: Option<String>,
}

impl From<ScanRequestBody> for ScanRequest {
    fn from(body: ScanRequestBody) -> Self {
        let port_range: String = body
            .port_range
            .filter(|range| !range.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PORT_RANGE.to_string());
        ScanRequest::new(body.target, port_range)
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub port: u16,
    pub state: PortState,
    pub service: String,
}

impl From<&ProbeOutcome> for PortRecord {
    fn from(outcome: &ProbeOutcome) -> Self {
        Self {
            port: outcome.port,
            state: outcome.state,
            service: outcome.service.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub target: String,
    pub results: Vec<PortRecord>,
}

impl From<&ScanResult> for ScanResponse {
    fn from(result: &ScanResult) -> Self {
        Self {
            target: result.target.clone(),
            results: result.results.iter().map(PortRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip)]
    kind: Option<EngineErrorKind>,
}

impl ErrorResponse {
    /// HTTP status an adapter should answer with.
    pub fn status(&self) -> u16 {
        match self.kind {
            Some(EngineErrorKind::InvalidInput) => 400,
            Some(EngineErrorKind::ScanFailed) | None => 500,
        }
    }
}

impl From<&EngineError> for ErrorResponse {
    fn from(err: &EngineError) -> Self {
        Self {
            error: err.detail(),
            kind: Some(err.kind()),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
