//! # Port Set Model
//!
//! Parses port expressions such as `80,443,8000-8010` into a [`PortSpec`]:
//! an ascending, duplicate-free set of TCP ports in `1..=65535`.
//!
//! Parsing is all-or-nothing. The first bad token aborts with a
//! [`ParseError`] and nothing else is returned.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{ParseError, ParseErrorReason};

/// The port range used when a request does not name one.
pub const DEFAULT_PORT_RANGE: &str = "1-1024";

/// An ordered set of distinct ports to probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortSpec {
    ports: Vec<u16>,
}

impl PortSpec {
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.ports
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.binary_search(&port).is_ok()
    }
}

impl FromStr for PortSpec {
    type Err = ParseError;

    /// Parses a comma-separated list of single ports (`N`) and inclusive
    /// ranges (`N-M`). Whitespace around tokens and around `-` is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl FromIterator<u16> for PortSpec {
    /// Collects arbitrary ports, dropping `0` and duplicates.
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let set: BTreeSet<u16> = iter.into_iter().filter(|port| *port != 0).collect();
        Self {
            ports: set.into_iter().collect(),
        }
    }
}

impl From<RangeInclusive<u16>> for PortSpec {
    fn from(range: RangeInclusive<u16>) -> Self {
        range.collect()
    }
}

impl<'a> IntoIterator for &'a PortSpec {
    type Item = u16;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u16>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.iter().copied()
    }
}

impl fmt::Display for PortSpec {
    /// Renders the set in compact form, collapsing consecutive runs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first: bool = true;
        let mut iter = self.ports.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end: u16 = start;
            while let Some(&next) = iter.peek() {
                if next != end + 1 {
                    break;
                }
                end = next;
                iter.next();
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

/// Parses a port expression into a [`PortSpec`].
pub fn parse(expr: &str) -> Result<PortSpec, ParseError> {
    if expr.trim().is_empty() {
        return Err(ParseError::new(ParseErrorReason::Empty, expr));
    }

    let mut set: BTreeSet<u16> = BTreeSet::new();
    for raw in expr.split(',') {
        let token: &str = raw.trim();
        if token.is_empty() {
            return Err(ParseError::new(ParseErrorReason::EmptyToken, raw));
        }
        set.extend(parse_token(token)?);
    }

    Ok(PortSpec {
        ports: set.into_iter().collect(),
    })
}

fn parse_token(token: &str) -> Result<RangeInclusive<u16>, ParseError> {
    let Some((start_str, end_str)) = token.split_once('-') else {
        let port: u16 = parse_port(token, token)?;
        return Ok(port..=port);
    };

    let (start_str, end_str) = (start_str.trim(), end_str.trim());
    if start_str.is_empty() || end_str.is_empty() || end_str.contains('-') {
        return Err(ParseError::new(ParseErrorReason::MalformedRange, token));
    }

    let start: u16 = parse_port(start_str, token)?;
    let end: u16 = parse_port(end_str, token)?;
    if start > end {
        return Err(ParseError::new(ParseErrorReason::ReversedRange, token));
    }
    Ok(start..=end)
}

/// Parses one bound. Errors report the whole `token` it belongs to.
fn parse_port(s: &str, token: &str) -> Result<u16, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorReason::InvalidNumber, token));
    }
    // Digits only, so the only possible failure is overflow.
    let value: u32 = s
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorReason::OutOfRange, token))?;
    match u16::try_from(value) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ParseError::new(ParseErrorReason::OutOfRange, token)),
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
