//! codeatlas binary entry point

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use codeatlas::cli::{Cli, Command};
use codeatlas::commands;
use codeatlas::config::{Config, DEFAULT_CONFIG_NAME};
use codeatlas::error::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Parse { file, pretty } => commands::run_parse(file, *pretty),
        Command::Scan { dir, pretty } => commands::run_scan(dir, &config, *pretty),
        Command::Index { dir } => commands::run_index(dir, &config),
        Command::Symbols { dir } => commands::run_symbols(dir, &config),
        Command::Debt { dir, format } => commands::run_debt(dir, &config, *format),
        Command::Changes { since, until } => commands::run_changes(&config, since, until),
        Command::Init => {
            let path = Path::new(DEFAULT_CONFIG_NAME);
            Config::write_default(path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}
