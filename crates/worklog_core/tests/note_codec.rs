use chrono::NaiveDate;
use worklog_core::{parse_note, read_note, render_note, Note, WorkItem};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

const HAND_WRITTEN: &str = "---
id: Acme-18-Jan-2025
aliases:
tags:
  - acme
  - job
date: 2025-01-18
---

# 2025-01-18

summary:: Fixed the login flow.
yesterday's summary:: Planned the sprint.

## Pending Work

- [ ] write release notes
- [ ] review PR #42

## Work Completed

- [x] fix login
- [X] deploy staging
";

#[test]
fn hand_written_note_is_decoded_field_by_field() {
    let note = parse_note(HAND_WRITTEN);

    assert_eq!(note.id, "Acme-18-Jan-2025");
    assert_eq!(note.tags, vec!["acme", "job"]);
    assert!(note.aliases.is_empty());
    assert_eq!(note.date, Some(day(18)));
    assert_eq!(note.title, "2025-01-18");
    assert_eq!(note.summary, "Fixed the login flow.");
    assert_eq!(note.yesterday_summary, "Planned the sprint.");
    assert_eq!(
        note.pending_work,
        vec![
            WorkItem::pending("write release notes"),
            WorkItem::pending("review PR #42"),
        ]
    );
    assert_eq!(
        note.completed_work,
        vec![WorkItem::done("fix login"), WorkItem::done("deploy staging")]
    );
}

#[test]
fn written_note_reads_back_with_same_content() {
    let dir = tempfile::tempdir().unwrap();
    let mut note = Note::new(day(19), "Acme");
    note.yesterday_summary = "Shipped v2.".to_string();
    note.add_pending_item("carry me");
    note.add_completed_item("done thing");

    let path = dir.path().join("2025-01-19-Acme.md");
    std::fs::write(&path, render_note(&note)).unwrap();
    let loaded = read_note(&path).unwrap();

    assert_eq!(loaded.file_path, path);
    assert_eq!(loaded.id, note.id);
    assert_eq!(loaded.tags, note.tags);
    assert_eq!(loaded.date, note.date);
    assert_eq!(loaded.title, note.title);
    assert_eq!(loaded.summary, "");
    assert_eq!(loaded.yesterday_summary, "Shipped v2.");
    assert_eq!(loaded.pending_work, note.pending_work);
    assert_eq!(loaded.completed_work, note.completed_work);
}

#[test]
fn checkbox_lines_outside_work_sections_are_ignored() {
    let text = "# 2025-01-18\n\n- [ ] stray item\n\n## Pending Work\n\n- [ ] real item\n- not a checkbox\n";
    let note = parse_note(text);
    assert_eq!(note.pending_work, vec![WorkItem::pending("real item")]);
    assert!(note.completed_work.is_empty());
}

#[test]
fn every_fence_line_toggles_frontmatter() {
    let text = "---\nid: x\n---\n# t\n## Pending Work\n- [ ] a\n---\n  - sneaky\n- [ ] b\n";
    let note = parse_note(text);
    assert_eq!(note.title, "t");
    assert_eq!(note.tags, vec!["sneaky"]);
    assert_eq!(note.pending_work, vec![WorkItem::pending("a")]);
}

#[test]
fn closing_a_later_fence_resumes_the_interrupted_section() {
    let text = "## Pending Work\n- [ ] a\n---\ndate: 2025-01-18\n---\n- [ ] b\n";
    let note = parse_note(text);
    assert_eq!(note.date, Some(day(18)));
    assert_eq!(
        note.pending_work,
        vec![WorkItem::pending("a"), WorkItem::pending("b")]
    );
}

#[test]
fn both_summaries_and_messy_items_survive_a_write_read_cycle() {
    let mut note = Note::new(day(19), "Acme");
    note.summary = "Closed the release.\nAlso reviewed docs.".to_string();
    note.yesterday_summary = "Planned the release.".to_string();
    note.add_pending_item("first line\nsecond line");
    note.add_pending_item("trailing  ");
    note.add_completed_item("");
    note.add_completed_item("[x] looks like a box");

    let loaded = parse_note(&render_note(&note));

    assert_eq!(loaded.summary, "Closed the release. Also reviewed docs.");
    assert_eq!(loaded.yesterday_summary, "Planned the release.");
    assert_eq!(loaded.pending_work, note.pending_work);
    assert_eq!(
        loaded.pending_work,
        vec![
            WorkItem::pending("first line second line"),
            WorkItem::pending("trailing"),
        ]
    );
    assert_eq!(loaded.completed_work, note.completed_work);
    assert_eq!(loaded.completed_work.len(), 1);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_note(&dir.path().join("nope.md")).unwrap_err();
    assert!(err.to_string().contains("nope.md"));
}
