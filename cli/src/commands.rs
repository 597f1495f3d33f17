pub mod scan;
pub mod services;

use clap::{Args, Parser, Subcommand};
use portr_common::config::{Config, DEFAULT_CONCURRENCY};
use portr_common::network::ports::DEFAULT_PORT_RANGE;

#[derive(Parser)]
#[command(name = "portr")]
#[command(version, about = "A concurrent TCP port scanner.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output (-q hides banners, -qq prints results only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the TCP ports of a single host
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// List the well-known port table
    #[command(alias = "ls")]
    Services,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Hostname or IP address to scan
    pub target: String,

    /// Ports to scan, e.g. "22,80,443,8000-8100"
    #[arg(short, long, default_value = DEFAULT_PORT_RANGE)]
    pub ports: String,

    /// Maximum number of simultaneous probes
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-probe timeout in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    pub timeout: u64,

    /// Overall scan deadline in milliseconds, name resolution included
    #[arg(short, long)]
    pub global_timeout: Option<u64>,

    /// Hostname resolution timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub resolve_timeout: u64,

    /// Extra attempts for ports that come back filtered
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Probe ports in random order
    #[arg(long)]
    pub randomize: bool,

    /// Refuse scans covering more ports than this
    #[arg(long)]
    pub max_ports: Option<usize>,

    /// Also list closed and filtered ports
    #[arg(short, long)]
    pub all: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let show_all: bool = match &self.command {
            Commands::Scan(args) => args.all,
            Commands::Services => false,
        };
        Config {
            quiet: self.quiet,
            json: self.json,
            show_all,
            no_banner: self.no_banner,
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
