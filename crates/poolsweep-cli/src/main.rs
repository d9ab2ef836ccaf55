mod cli;
mod commands;
mod output;

use anyhow::Result;
use cli::{Cli, Command, LogFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => fmt.init(),
        LogFormat::Json => fmt.json().init(),
    }

    match cli.command {
        Command::Sweep { regions, sweepers, page_size, endpoint } => {
            commands::sweep(cli.config, regions, sweepers, page_size, endpoint).await
        }
        Command::List => commands::list(),
        Command::Precheck { region, endpoint } => {
            commands::precheck(cli.config, region, endpoint).await
        }
        Command::CheckDestroyed { region, endpoint, ids } => {
            commands::check_destroyed(cli.config, region, endpoint, ids).await
        }
        Command::Render(args) => commands::render(args),
    }
}
