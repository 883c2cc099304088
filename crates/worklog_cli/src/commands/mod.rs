pub mod daily;
pub mod workplace;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use worklog_core::{Config, DailyService, FsNoteRepository, SummaryClient};

use crate::output;

#[derive(Parser)]
#[command(
    name = "worklog",
    version,
    about = "Daily work log kept as markdown notes",
    long_about = "Keeps one markdown note per day and workplace.\n\n`start` carries yesterday's \
                  open items into today and records an AI summary of what got done."
)]
pub struct Cli {
    /// Workplace to operate on (defaults to WORKPLACE_NAME)
    #[arg(short, long, global = true, env = "WORKLOG_WORKPLACE")]
    pub workplace: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the day: reconcile the previous note and open today's")]
    Start(StartArgs),

    #[command(about = "Add one pending item to today's note")]
    Add(AddArgs),

    #[command(about = "Add one pending item per line read from stdin")]
    AddMany,

    #[command(about = "Mark pending items of today's note completed")]
    Done(DoneArgs),

    #[command(about = "Show today's note")]
    List(ListArgs),

    #[command(about = "Mark items of the previous note completed")]
    Review(ReviewArgs),

    #[command(about = "Delete items from today's note, or the whole note")]
    Delete(DeleteArgs),

    #[command(about = "Summarize today's completed work")]
    Summarize,

    #[command(subcommand, about = "List, add and rename workplaces")]
    Workplace(workplace::WorkplaceCommand),
}

#[derive(Args)]
pub struct StartArgs {
    /// Numbers of previous pending items that were completed; others carry over
    #[arg(short, long, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    pub complete: Vec<u32>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Pending item numbers as shown by `list`
    #[arg(required = true, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    pub numbers: Vec<u32>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show pending items
    #[arg(long)]
    pub pending: bool,
}

#[derive(Args)]
pub struct ReviewArgs {
    /// Numbers of previous pending items to mark completed
    #[arg(short, long, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    pub complete: Vec<u32>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Delete today's note file
    #[arg(long, conflicts_with_all = ["pending", "completed"])]
    pub all: bool,

    /// Pending item numbers to delete
    #[arg(long, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    pub pending: Vec<u32>,

    /// Completed item numbers to delete
    #[arg(long, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    pub completed: Vec<u32>,
}

/// Command context: resolved workplace plus a service bound to it.
pub struct Session {
    pub workplace: String,
    pub today: NaiveDate,
    pub service: DailyService<FsNoteRepository>,
}

impl Session {
    /// Resolves the workplace, ensures the notes directory and binds a service.
    ///
    /// `with_summarizer` attaches the summary backend client.
    pub fn open(config: &Config, workplace: Option<String>, with_summarizer: bool) -> Result<Self> {
        let workplace = config.resolve_workplace(workplace.as_deref())?;
        config
            .ensure_notes_dir()
            .context("failed to prepare notes directory")?;
        let repo = FsNoteRepository::try_new(&config.notes_dir, &workplace)?;
        let mut service = DailyService::new(repo);

        if with_summarizer {
            match SummaryClient::new(&config.server_url, &config.ai_provider, &config.ai_model) {
                Ok(client) => service = service.with_summarizer(Box::new(client)),
                Err(err) => output::warn(&format!("summary backend disabled: {err}")),
            }
        }

        Ok(Self {
            workplace,
            today: Local::now().date_naive(),
            service,
        })
    }
}

/// Converts 1-based item numbers into zero-based indices.
pub fn to_indices(numbers: &[u32]) -> Vec<usize> {
    numbers
        .iter()
        .filter_map(|number| usize::try_from(*number).ok())
        .filter_map(|number| number.checked_sub(1))
        .collect()
}

/// Expands 1-based "completed" numbers into a per-item verdict list.
pub fn to_verdicts(numbers: &[u32], item_count: usize) -> Vec<bool> {
    let mut verdicts = vec![false; item_count];
    for index in to_indices(numbers) {
        if let Some(verdict) = verdicts.get_mut(index) {
            *verdict = true;
        }
    }
    verdicts
}
