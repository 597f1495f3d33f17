//! # Error Taxonomy
//!
//! Every failure the scanner can produce, from a single malformed token in a
//! port expression up to a target that cannot be resolved at all.
//!
//! * [`ParseError`]: the port expression is unusable. Never retried.
//! * [`ProbeError`]: a classified per-port network failure. Always folded
//!   into a `filtered` outcome, never propagated.
//! * [`ScanError`]: the scheduler could not produce any outcomes.
//! * [`EngineError`]: what the facade hands back to callers.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Why a port expression was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorReason {
    /// The whole expression is empty or whitespace.
    Empty,
    /// A comma-separated slot is empty, e.g. `80,,443`.
    EmptyToken,
    /// The token is not a decimal number.
    InvalidNumber,
    /// The number is outside `1..=65535`.
    OutOfRange,
    /// A range whose start is greater than its end.
    ReversedRange,
    /// A `-` without a bound on one side, or more than one `-`.
    MalformedRange,
}

impl fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg: &str = match self {
            Self::Empty => "port expression is empty",
            Self::EmptyToken => "empty port token",
            Self::InvalidNumber => "not a valid port number",
            Self::OutOfRange => "port must be between 1 and 65535",
            Self::ReversedRange => "range start is greater than range end",
            Self::MalformedRange => "malformed port range",
        };
        f.write_str(msg)
    }
}

/// A rejected port expression, carrying the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: '{token}'")]
pub struct ParseError {
    pub reason: ParseErrorReason,
    pub token: String,
}

impl ParseError {
    pub fn new(reason: ParseErrorReason, token: impl Into<String>) -> Self {
        Self {
            reason,
            token: token.into(),
        }
    }
}

/// A network-level failure attached to a `filtered` outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// No answer within the per-probe timeout.
    #[error("no response within {}ms", .after.as_millis())]
    Timeout { after: Duration },
    /// The scan-wide deadline passed before this port was settled.
    #[error("scan deadline exceeded before the probe completed")]
    DeadlineExceeded,
    /// The host or network was reported unreachable.
    #[error("target unreachable ({kind})")]
    Unreachable { kind: String },
    /// Any other socket error without a definitive port signal.
    #[error("connection failed ({kind}): {message}")]
    Io { kind: String, message: String },
}

impl ProbeError {
    /// Both the per-probe timer and the scan deadline count as timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::DeadlineExceeded)
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        let kind: String = format!("{:?}", err.kind());
        match err.kind() {
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                Self::Unreachable { kind }
            }
            _ => Self::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

/// A scheduler failure that leaves no per-port outcomes to report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("could not resolve '{host}': {reason}")]
    Resolution { host: String, reason: String },
    #[error("no ports to scan")]
    NoPorts,
    #[error("{requested} ports requested, but the configured limit is {limit}")]
    TooManyPorts { requested: usize, limit: usize },
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of an [`EngineError`], used by adapters to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    InvalidInput,
    ScanFailed,
}

/// The only error type returned by the scan facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid port range: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl EngineError {
    pub fn kind(&self) -> EngineErrorKind {
        match self {
            Self::InvalidInput(_) | Self::Parse(_) => EngineErrorKind::InvalidInput,
            Self::Scan(ScanError::TooManyPorts { .. } | ScanError::InvalidConfig(_)) => {
                EngineErrorKind::InvalidInput
            }
            Self::Scan(_) => EngineErrorKind::ScanFailed,
        }
    }

    /// Human-readable message for end users.
    pub fn detail(&self) -> String {
        self.to_string()
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
