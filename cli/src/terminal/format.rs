use colored::*;
use portr_common::models::{PortState, ProbeOutcome};

use crate::terminal::colors;

const PORT_WIDTH: usize = 10;
const STATE_WIDTH: usize = 10;

pub fn state_color(state: PortState) -> Color {
    match state {
        PortState::Open => colors::OPEN,
        PortState::Closed => colors::CLOSED,
        PortState::Filtered => colors::FILTERED,
    }
}

pub fn table_header() -> String {
    format!(
        "{:<PORT_WIDTH$}{:<STATE_WIDTH$}{}",
        "PORT", "STATE", "SERVICE"
    )
    .color(colors::PRIMARY)
    .bold()
    .to_string()
}

/// One `PORT  STATE  SERVICE` row. Padding is applied before coloring so
/// escape codes do not skew the columns.
pub fn outcome_row(outcome: &ProbeOutcome) -> String {
    let port: String = format!("{:<PORT_WIDTH$}", format!("{}/tcp", outcome.port));
    let state: String = format!("{:<STATE_WIDTH$}", outcome.state);
    let mut row: String = format!(
        "{}{}{}",
        port.color(colors::ACCENT),
        state.color(state_color(outcome.state)).bold(),
        outcome.service.color(colors::TEXT_DEFAULT)
    );
    if let Some(err) = &outcome.error {
        row.push_str(&format!(" {}", format!("({err})").color(colors::SEPARATOR)));
    }
    row
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
