use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use worklog_core::repo::note_repo::rename_workplace;
use worklog_core::Config;

use crate::output;

#[derive(Subcommand)]
pub enum WorkplaceCommand {
    #[command(about = "List configured workplaces")]
    List,

    #[command(about = "Add a workplace")]
    Add(WorkplaceAddArgs),

    #[command(about = "Rename a workplace and its note files")]
    Rename(WorkplaceRenameArgs),
}

#[derive(Args)]
pub struct WorkplaceAddArgs {
    /// Workplace name, used in note file names
    pub name: String,
}

#[derive(Args)]
pub struct WorkplaceRenameArgs {
    /// Current workplace name
    pub old: String,

    /// New workplace name
    pub new: String,
}

pub fn run(mut config: Config, cmd: WorkplaceCommand) -> Result<()> {
    match cmd {
        WorkplaceCommand::List => {
            output::header("Workplaces");
            for workplace in &config.workplaces {
                if *workplace == config.default_workplace {
                    println!("  {workplace} (default)");
                } else {
                    println!("  {workplace}");
                }
            }
        }
        WorkplaceCommand::Add(args) => {
            config.add_workplace(&args.name)?;
            output::success(&format!("Added workplace {}", args.name.trim()));
        }
        WorkplaceCommand::Rename(args) => {
            let (new, renamed) = rename_everywhere(&mut config, &args.old, &args.new)?;
            output::success(&format!(
                "Renamed {} to {new} ({renamed} note file(s) moved)",
                args.old
            ));
        }
    }
    Ok(())
}

/// Renames note files first, then the configured workplace, so a failed file
/// rename leaves the config pointing at the files that still exist.
fn rename_everywhere(config: &mut Config, old: &str, new: &str) -> Result<(String, usize)> {
    let new = config.check_rename(old, new)?;
    let renamed = if config.notes_dir.is_dir() {
        rename_workplace(&config.notes_dir, old, &new)
            .context("failed to rename note files; config left unchanged")?
    } else {
        0
    };
    config
        .rename_workplace(old, &new)
        .context("note files renamed, but saving the config failed")?;
    Ok((new, renamed))
}
