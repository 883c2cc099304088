//! Note encoder.

use super::{
    COMPLETED_HEADING, FRONTMATTER_FENCE, PENDING_HEADING, SUMMARY_PREFIX,
    YESTERDAY_SUMMARY_PREFIX,
};
use crate::model::note::{Note, NOTE_DATE_FORMAT};
use crate::model::work_item::{single_line, WorkItem};
use std::fmt::Write;

/// Renders a note into its markdown file content.
///
/// Layout: frontmatter, `# title`, optional summary lines, then the pending
/// and completed sections. Summary lines are omitted when empty.
pub fn render_note(note: &Note) -> String {
    let mut out = String::new();

    out.push_str(FRONTMATTER_FENCE);
    out.push('\n');
    push_line(&mut out, format_args!("id: {}", note.id));
    push_list(&mut out, "aliases", &note.aliases);
    push_list(&mut out, "tags", &note.tags);
    if let Some(date) = note.date {
        push_line(&mut out, format_args!("date: {}", date.format(NOTE_DATE_FORMAT)));
    }
    out.push_str(FRONTMATTER_FENCE);
    out.push_str("\n\n");

    push_line(&mut out, format_args!("# {}", note.title));
    out.push('\n');

    let summary = single_line(&note.summary);
    let yesterday_summary = single_line(&note.yesterday_summary);
    if !summary.is_empty() {
        push_line(&mut out, format_args!("{SUMMARY_PREFIX} {summary}"));
    }
    if !yesterday_summary.is_empty() {
        push_line(
            &mut out,
            format_args!("{YESTERDAY_SUMMARY_PREFIX} {yesterday_summary}"),
        );
    }
    if !summary.is_empty() || !yesterday_summary.is_empty() {
        out.push('\n');
    }

    push_section(&mut out, PENDING_HEADING, &note.pending_work, ' ');
    out.push('\n');
    push_section(&mut out, COMPLETED_HEADING, &note.completed_work, 'x');

    out
}

fn push_line(out: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    let _ = out.write_fmt(args);
    out.push('\n');
}

fn push_list(out: &mut String, key: &str, values: &[String]) {
    if values.is_empty() {
        push_line(out, format_args!("{key}: []"));
        return;
    }
    push_line(out, format_args!("{key}:"));
    for value in values {
        push_line(out, format_args!("  - {value}"));
    }
}

fn push_section(out: &mut String, heading: &str, items: &[WorkItem], mark: char) {
    out.push_str(heading);
    out.push_str("\n\n");
    // Items may be built field by field; keep only what the decoder can read back.
    for text in items.iter().map(|item| single_line(&item.text)) {
        if !text.is_empty() {
            push_line(out, format_args!("- [{mark}] {text}"));
        }
    }
}
