mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan, services};
use portr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.config();

    logging::init_logging(commands.verbose, &cfg);
    print::banner(&cfg);

    match commands.command {
        Commands::Scan(args) => scan::scan(args, &cfg).await,
        Commands::Services => services::services(&cfg),
    }
}
