use anyhow::Result;
use std::io::BufRead;
use worklog_core::{Config, Note, SummaryOutcome, TodaySummary};

use super::{
    to_indices, to_verdicts, AddArgs, DeleteArgs, DoneArgs, ListArgs, ReviewArgs, Session,
    StartArgs,
};
use crate::output;

const LONG_DATE_FORMAT: &str = "%A, %B %-d, %Y";

fn banner(title: &str, session: &Session) {
    output::title(&format!("{title} ({})", session.workplace));
    output::muted(&session.today.format(LONG_DATE_FORMAT).to_string());
    output::divider();
}

pub async fn start(config: &Config, workplace: Option<String>, args: StartArgs) -> Result<()> {
    let session = Session::open(config, workplace, true)?;
    banner("Daily Workflow", &session);

    let pending_before = session
        .service
        .previous_note(session.today)?
        .map(|note| note.pending_work.len())
        .unwrap_or(0);
    let verdicts = to_verdicts(&args.complete, pending_before);
    let report = session.service.start(session.today, &verdicts).await?;

    if report.created_today {
        output::success("Created today's note");
    } else {
        output::info("Today's note already exists");
    }
    match report.previous_file.as_deref() {
        Some(path) => output::info(&format!(
            "Reviewed {} ({} completed, {} carried forward)",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            report.newly_completed,
            report.carried_forward
        )),
        None => output::muted("No previous note found. Fresh start!"),
    }
    if let SummaryOutcome::Generated(text) = &report.summary {
        output::summary("Yesterday", text);
    }
    if let Some(warning) = report.summary.warning() {
        output::warn(&warning);
    }

    println!();
    print_note(&report.today, false);
    Ok(())
}

pub fn add(config: &Config, workplace: Option<String>, args: AddArgs) -> Result<()> {
    let session = Session::open(config, workplace, false)?;
    let text = args.text.join(" ");
    let (note, added) = session.service.add_items(session.today, [text.as_str()])?;
    if added == 0 {
        output::warn("empty item skipped");
        return Ok(());
    }
    output::success(&format!(
        "Added to {} ({} pending)",
        session.workplace,
        note.pending_work.len()
    ));
    Ok(())
}

pub fn add_many(config: &Config, workplace: Option<String>) -> Result<()> {
    let session = Session::open(config, workplace, false)?;
    let lines = std::io::stdin()
        .lock()
        .lines()
        .collect::<std::io::Result<Vec<String>>>()?;
    let (note, added) = session.service.add_items(session.today, &lines)?;

    if added == 0 {
        output::muted("No tasks added.");
        return Ok(());
    }
    output::success(&format!("Added {added} task(s) to {}", session.workplace));
    output::items(&note.pending_work);
    Ok(())
}

pub fn done(config: &Config, workplace: Option<String>, args: DoneArgs) -> Result<()> {
    let session = Session::open(config, workplace, false)?;
    let Some((note, moved)) = session
        .service
        .complete_items(session.today, &to_indices(&args.numbers))?
    else {
        output::muted("No note for today. Run `worklog start` first.");
        return Ok(());
    };
    if moved == 0 {
        output::warn("no matching pending items");
    } else {
        output::success(&format!("Marked {moved} item(s) completed"));
    }
    print_note(&note, false);
    Ok(())
}

pub fn list(config: &Config, workplace: Option<String>, args: ListArgs) -> Result<()> {
    let session = Session::open(config, workplace, false)?;
    let Some(note) = session.service.today_note(session.today)? else {
        output::muted("No note for today. Run `worklog start` first.");
        return Ok(());
    };
    banner("Today", &session);
    output::muted(&format!(
        "{} pending, {} completed",
        note.pending_work.len(),
        note.completed_work.len()
    ));
    output::summary("Yesterday", &note.yesterday_summary);
    println!();
    print_note(&note, args.pending);
    Ok(())
}

pub fn review(config: &Config, workplace: Option<String>, args: ReviewArgs) -> Result<()> {
    let session = Session::open(config, workplace, false)?;
    let Some(previous) = session.service.previous_note(session.today)? else {
        output::muted("No previous note found.");
        return Ok(());
    };
    banner("Review", &session);
    output::muted(&previous.title);

    if args.complete.is_empty() {
        print_note(&previous, true);
        output::muted("Use `worklog review --complete N...` to mark items completed.");
        return Ok(());
    }

    let verdicts = to_verdicts(&args.complete, previous.pending_work.len());
    if let Some(report) = session.service.review(session.today, &verdicts)? {
        output::success(&format!(
            "Marked {} item(s) completed",
            report.newly_completed
        ));
        print_note(&report.note, false);
    }
    Ok(())
}

pub fn delete(config: &Config, workplace: Option<String>, args: DeleteArgs) -> Result<()> {
    let session = Session::open(config, workplace, false)?;

    if args.all {
        if session.service.delete_today(session.today)? {
            output::success(&format!("Deleted today's note for {}", session.workplace));
        } else {
            output::muted("No note for today.");
        }
        return Ok(());
    }
    if args.pending.is_empty() && args.completed.is_empty() {
        output::warn("nothing to delete; pass --all, --pending or --completed");
        return Ok(());
    }

    let Some((note, removed)) = session.service.remove_items(
        session.today,
        &to_indices(&args.pending),
        &to_indices(&args.completed),
    )?
    else {
        output::muted("No note for today.");
        return Ok(());
    };
    output::success(&format!("Deleted {removed} item(s)"));
    print_note(&note, false);
    Ok(())
}

pub async fn summarize(config: &Config, workplace: Option<String>) -> Result<()> {
    let session = Session::open(config, workplace, true)?;
    let completed = session
        .service
        .today_note(session.today)?
        .map(|note| note.completed_work)
        .unwrap_or_default();

    banner("Work Summary", &session);
    if !completed.is_empty() {
        output::header("Completed Work");
        output::items(&completed);
        println!();
        output::info("Generating AI summary...");
    }

    match session.service.summarize_today(session.today).await? {
        TodaySummary::NoNote => output::muted("No note for today."),
        TodaySummary::NothingCompleted => {
            output::muted(&format!(
                "No completed work items to summarize in {}.",
                session.workplace
            ));
            output::muted("Use `worklog done` to mark items as completed first.");
        }
        TodaySummary::Generated(text) => output::summary("Summary", &text),
    }
    Ok(())
}

fn print_note(note: &Note, pending_only: bool) {
    output::header("Pending Work");
    if note.has_pending_work() {
        output::items(&note.pending_work);
    } else {
        output::muted("  (none)");
    }
    if pending_only {
        return;
    }
    println!();
    output::header("Work Completed");
    if note.has_completed_work() {
        output::items(&note.completed_work);
    } else {
        output::muted("  (none)");
    }
}
