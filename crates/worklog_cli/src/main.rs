//! `worklog` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, load configuration and start file logging.
//! - Dispatch to one command handler; handlers own all terminal output.

use anyhow::Result;
use clap::Parser;

mod commands;
mod output;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = worklog_core::Config::load();
    start_logging(&config.log_level);

    match cli.command {
        Commands::Start(args) => commands::daily::start(&config, cli.workplace, args).await,
        Commands::Add(args) => commands::daily::add(&config, cli.workplace, args),
        Commands::AddMany => commands::daily::add_many(&config, cli.workplace),
        Commands::Done(args) => commands::daily::done(&config, cli.workplace, args),
        Commands::List(args) => commands::daily::list(&config, cli.workplace, args),
        Commands::Review(args) => commands::daily::review(&config, cli.workplace, args),
        Commands::Delete(args) => commands::daily::delete(&config, cli.workplace, args),
        Commands::Summarize => commands::daily::summarize(&config, cli.workplace).await,
        Commands::Workplace(cmd) => commands::workplace::run(config, cmd),
    }
}

fn start_logging(level: &str) {
    let Some(log_dir) = worklog_core::default_log_dir() else {
        return;
    };
    if let Err(err) = worklog_core::init_logging(level, &log_dir) {
        output::warn(&format!("file logging disabled: {err}"));
    }
}
