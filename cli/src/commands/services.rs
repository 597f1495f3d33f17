use colored::*;
use portr_common::config::Config;
use portr_common::network::service::{self, ServiceEntry};
use serde::Serialize;

use crate::terminal::{colors, print};

#[derive(Serialize)]
struct ServiceRecord {
    port: u16,
    protocol: &'static str,
    name: &'static str,
}

impl From<&ServiceEntry> for ServiceRecord {
    fn from(entry: &ServiceEntry) -> Self {
        Self {
            port: entry.port,
            protocol: entry.protocol,
            name: entry.name,
        }
    }
}

/// Lists the well-known port table.
pub fn services(cfg: &Config) -> anyhow::Result<()> {
    let entries: &[ServiceEntry] = service::entries();

    if cfg.json {
        let records: Vec<ServiceRecord> = entries.iter().map(ServiceRecord::from).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print::header("well-known services", cfg.quiet);
    for entry in entries {
        let port: String = format!("{:<10}", format!("{}/{}", entry.port, entry.protocol));
        print::print(&format!(
            "{}{}",
            port.color(colors::ACCENT),
            entry.name.color(colors::TEXT_DEFAULT)
        ));
    }
    if cfg.quiet == 0 {
        print::end_of_program();
    }
    Ok(())
}
