//! # Scan Target Model
//!
//! Syntax check for the host a scan is aimed at. A target is either:
//! * An IPv4 or IPv6 literal (e.g. `192.168.1.5`, `::1`, `[::1]`).
//! * A hostname (e.g. `scanme.example.org`).
//!
//! Nothing here touches the network; resolution happens in the scheduler.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

const MAX_HOSTNAME_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("target is required")]
    Empty,
    #[error("hostname is longer than 255 characters")]
    TooLong,
    #[error("invalid character '{0}' in hostname")]
    InvalidChar(char),
    #[error("invalid hostname label in '{0}'")]
    InvalidLabel(String),
}

/// A syntactically valid scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Ip(IpAddr),
    Hostname(String),
}

impl Target {
    /// The string handed to the resolver.
    pub fn host(&self) -> String {
        match self {
            Self::Ip(ip) => ip.to_string(),
            Self::Hostname(name) => name.clone(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Hostname(name) => f.write_str(name),
        }
    }
}

impl FromStr for Target {
    type Err = TargetError;

    /// Parses a string into a `Target`.
    ///
    /// Surrounding whitespace is ignored. IP literals win over hostnames,
    /// so `10.0.0.1` is never treated as a name. IPv6 literals may be written
    /// in URL brackets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: &str = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }

        if let Some(inner) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return inner
                .parse::<Ipv6Addr>()
                .map(|ip| Self::Ip(IpAddr::V6(ip)))
                .map_err(|_| TargetError::InvalidChar('['));
        }

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }

        parse_hostname(s).map(Self::Hostname)
    }
}

fn parse_hostname(s: &str) -> Result<String, TargetError> {
    if s.len() > MAX_HOSTNAME_LEN {
        return Err(TargetError::TooLong);
    }

    if let Some(bad) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(TargetError::InvalidChar(bad));
    }

    // A single trailing dot marks a fully-qualified name.
    let name: &str = s.strip_suffix('.').unwrap_or(s);
    let labels_ok: bool = name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
    });
    if !labels_ok {
        return Err(TargetError::InvalidLabel(s.to_string()));
    }

    Ok(s.to_ascii_lowercase())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
