mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use commands::Outcome;
use dyfetch::config::Config;
use dyfetch::observability;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let config = Config::load_with_file(cli.config)?;
    observability::init_tracing(&config.logging.level);

    match commands::run(cli.command, &config).await? {
        Outcome::Found => Ok(ExitCode::SUCCESS),
        Outcome::Absent => Ok(ExitCode::FAILURE),
    }
}
