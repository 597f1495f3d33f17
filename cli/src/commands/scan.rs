use std::time::Duration;

use colored::*;
use portr_common::config::{Config, ScanConfig};
use portr_common::error::EngineError;
use portr_common::models::{PortState, ScanRequest, ScanResult};
use portr_common::wire::{ErrorResponse, ScanResponse};
use portr_core::scanner::{ScanEngine, ScanProgress};
use tracing::{debug, error};

use crate::commands::ScanArgs;
use crate::pprint;
use crate::terminal::spinner::{self, ScanBar};
use crate::terminal::{colors, format, print};

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    let engine: ScanEngine = ScanEngine::new(scan_config(&args));
    let request: ScanRequest = ScanRequest::new(args.target, args.ports);
    debug!("Scan settings: {:?}", engine.config());

    if cfg.quiet == 0 && !cfg.json {
        print::header("starting scanner", cfg.quiet);
    }

    let bar: ScanBar = ScanBar::start(!cfg.json && cfg.quiet < 2);
    let handle = bar.handle();
    let progress: ScanProgress = ScanProgress::with_callback(move |completed, total| {
        spinner::report_scan_progress(&handle, completed, total);
    });

    let outcome: Result<ScanResult, EngineError> = engine.scan_with_progress(&request, &progress).await;
    bar.finish();

    match outcome {
        Ok(result) if cfg.json => print_json(&ScanResponse::from(&result)),
        Ok(result) => {
            scan_ends(&result, cfg);
            Ok(())
        }
        Err(err) => {
            if cfg.json {
                print_json(&ErrorResponse::from(&err))?;
            } else {
                error!("{}", err.detail());
            }
            Err(err.into())
        }
    }
}

pub fn scan_config(args: &ScanArgs) -> ScanConfig {
    ScanConfig::default()
        .with_concurrency(args.concurrency)
        .with_probe_timeout(Duration::from_millis(args.timeout))
        .with_global_timeout(args.global_timeout.map(Duration::from_millis))
        .with_resolve_timeout(Duration::from_millis(args.resolve_timeout))
        .with_max_ports(args.max_ports)
        .with_retries(args.retries)
        .with_randomized_order(args.randomize)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scan_ends(result: &ScanResult, cfg: &Config) {
    print::header("Scan Report", cfg.quiet);
    if cfg.quiet < 2 {
        print::aligned_line("Target", result.target.as_str());
        print::aligned_line("Address", result.address.to_string().color(colors::IP_ADDR));
        print::aligned_line("Ports", result.results.len().to_string());
        pprint!();
    }

    print_table(result, cfg);
    print_summary(result, cfg);
}

fn print_table(result: &ScanResult, cfg: &Config) {
    let rows: Vec<String> = result
        .results
        .iter()
        .filter(|outcome| cfg.show_all || outcome.is_open())
        .map(format::outcome_row)
        .collect();

    if rows.is_empty() {
        print::no_results();
        return;
    }

    if cfg.quiet < 2 {
        print::print(&format::table_header());
    }
    for row in &rows {
        print::print(row);
    }
}

fn print_summary(result: &ScanResult, cfg: &Config) {
    let open: ColoredString = format!("{} open", result.count(PortState::Open)).bold().green();
    let closed: ColoredString = format!("{} closed", result.count(PortState::Closed)).bold().red();
    let filtered: ColoredString = format!("{} filtered", result.count(PortState::Filtered))
        .bold()
        .yellow();
    let total_time: ColoredString = format!("{:.2}s", result.elapsed().as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Scan Complete: {open}, {closed}, {filtered} in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
            print::end_of_program();
        }
        1 => {
            pprint!();
            print::print_status(output.to_string());
        }
        _ => {}
    }
}
