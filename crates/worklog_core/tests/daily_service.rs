mod common;

use common::{day, FakeSummarizer};
use worklog_core::{
    DailyService, FsNoteRepository, Note, NoteRepository, SummaryOutcome, TodaySummary,
    WorkflowError,
};

fn service_in(dir: &std::path::Path) -> DailyService<FsNoteRepository> {
    DailyService::new(FsNoteRepository::try_new(dir, "Acme").unwrap())
}

fn seed_previous(repo: &FsNoteRepository, pending: &[&str]) {
    let mut note = Note::new(day(17), "Acme");
    for text in pending {
        note.add_pending_item(*text);
    }
    repo.write_note(&mut note).unwrap();
}

#[tokio::test]
async fn start_reconciles_and_persists_both_notes() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path())
        .with_summarizer(Box::new(FakeSummarizer::replying("Wrapped up A.")));
    seed_previous(service.repo(), &["A", "B"]);

    let report = service.start(day(19), &[true, false]).await.unwrap();

    assert!(report.created_today);
    assert_eq!(report.newly_completed, 1);
    assert_eq!(report.carried_forward, 1);
    assert_eq!(
        report.previous_file.as_deref(),
        Some(dir.path().join("2025-01-17-Acme.md").as_path())
    );
    assert!(matches!(report.summary, SummaryOutcome::Generated(_)));

    let previous = service.repo().find_by_date(day(17)).unwrap().unwrap();
    assert!(previous.pending_work.is_empty());
    assert_eq!(previous.completed_work[0].text, "A");
    assert_eq!(previous.summary, "Wrapped up A.");

    let today = service.repo().find_by_date(day(19)).unwrap().unwrap();
    assert_eq!(today.pending_work[0].text, "B");
    assert_eq!(today.yesterday_summary, "Wrapped up A.");
    assert_eq!(today.id, "Acme-19-Jan-2025");
}

#[tokio::test]
async fn start_on_existing_note_keeps_its_items() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    service.add_items(day(19), ["already planned"]).unwrap();
    seed_previous(service.repo(), &["carried"]);

    let report = service.start(day(19), &[]).await.unwrap();

    assert!(!report.created_today);
    assert!(matches!(report.summary, SummaryOutcome::NotRequested));
    let texts: Vec<_> = report
        .today
        .pending_work
        .iter()
        .map(|item| item.text.as_str())
        .collect();
    assert_eq!(texts, vec!["already planned", "carried"]);
}

#[tokio::test]
async fn first_ever_start_writes_only_today() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    let report = service.start(day(19), &[]).await.unwrap();

    assert!(report.previous_file.is_none());
    assert_eq!(service.repo().list_note_dates().unwrap(), vec![day(19)]);
}

#[test]
fn add_complete_and_remove_items_on_today() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    let (_, added) = service
        .add_items(day(19), ["one", "  ", "two", "three"])
        .unwrap();
    assert_eq!(added, 3);

    let (note, moved) = service.complete_items(day(19), &[2, 0, 9]).unwrap().unwrap();
    assert_eq!(moved, 2);
    assert_eq!(note.pending_work[0].text, "two");
    let completed: Vec<_> = note.completed_work.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(completed, vec!["three", "one"]);

    let (note, removed) = service.remove_items(day(19), &[0], &[1]).unwrap().unwrap();
    assert_eq!(removed, 2);
    assert!(note.pending_work.is_empty());
    assert_eq!(note.completed_work[0].text, "three");

    let stored = service.today_note(day(19)).unwrap().unwrap();
    assert_eq!(stored, note);
}

#[test]
fn item_mutations_without_today_note_report_none() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    assert!(service.complete_items(day(19), &[0]).unwrap().is_none());
    assert!(service.remove_items(day(19), &[0], &[]).unwrap().is_none());
    assert!(!service.delete_today(day(19)).unwrap());
}

#[test]
fn review_marks_previous_items_without_carrying() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    seed_previous(service.repo(), &["A", "B", "C"]);

    let report = service.review(day(19), &[false, true, true]).unwrap().unwrap();

    assert_eq!(report.newly_completed, 2);
    let stored = service.previous_note(day(19)).unwrap().unwrap();
    assert_eq!(stored.pending_work[0].text, "A");
    assert_eq!(stored.completed_work.len(), 2);
    assert!(!service.repo().note_exists(day(19)));
}

#[tokio::test]
async fn summarize_today_requires_completed_work_and_backend() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    assert_eq!(
        service.summarize_today(day(19)).await.unwrap(),
        TodaySummary::NoNote
    );

    service.add_items(day(19), ["open"]).unwrap();
    assert_eq!(
        service.summarize_today(day(19)).await.unwrap(),
        TodaySummary::NothingCompleted
    );

    service.complete_items(day(19), &[0]).unwrap();
    assert!(matches!(
        service.summarize_today(day(19)).await,
        Err(WorkflowError::SummarizerUnavailable)
    ));

    let service = service.with_summarizer(Box::new(FakeSummarizer::replying("Closed open.")));
    assert_eq!(
        service.summarize_today(day(19)).await.unwrap(),
        TodaySummary::Generated("Closed open.".to_string())
    );
}

#[tokio::test]
async fn summarize_today_surfaces_backend_failure() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path()).with_summarizer(Box::new(FakeSummarizer::silent()));
    service.add_items(day(19), ["x"]).unwrap();
    service.complete_items(day(19), &[0]).unwrap();

    let err = service.summarize_today(day(19)).await.unwrap_err();
    assert_eq!(err.to_string(), "no response received");
}
