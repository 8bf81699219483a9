use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::LevelFilter;

mod extract;
mod specs;

/// Extracts securities tables from bank statement PDFs into spreadsheets.
#[derive(Parser)]
#[command(name = "secblk", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the bundled table specifications with their numbers.
    Specs(specs::Command),
    /// Extracts tables from a PDF.
    Extract(extract::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    use Command::*;
    match &args.command {
        Specs(cmd) => specs::run(cmd),
        Extract(cmd) => extract::run(cmd),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }
}
