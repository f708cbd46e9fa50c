//! cm CLI
//!
//! Keeps system configuration files in an overlay directory.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::{Context, Overrides};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command.clone() else {
        println!("Nothing to do. Run {} for usage.", "cm --help".cyan());
        return Ok(());
    };

    // Setup happens before any command touches either tree.
    let context = Context::init(&Overrides::from(&cli))?;
    tracing::debug!(?command, "Running command");
    execute_command(&context, command)
}

fn execute_command(context: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Add { paths, json } => commands::run_add(context, &paths, json),
        Commands::Rm { paths } => commands::run_rm(context, &paths),
        Commands::List { paths, json } => commands::run_list(context, &paths, json),
        Commands::Pull { paths, json } => commands::run_pull(context, &paths, json),
        Commands::Push { paths, json } => commands::run_push(context, &paths, json),
        Commands::Diff { reverse, paths } => commands::run_diff(context, &paths, reverse),
        Commands::Status { reverse, paths } => commands::run_status(context, &paths, reverse),
    }
}
