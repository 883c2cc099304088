//! Note repository contracts and filesystem implementation.
//!
//! # Responsibility
//! - Resolve notes by `(workplace, date)` and find the most recent earlier note.
//! - Persist notes as whole-file overwrites.
//! - Rename all files of a workplace.
//!
//! # Invariants
//! - One repository instance is bound to exactly one workplace.
//! - Only files named exactly `YYYY-MM-DD-<Workplace>.md` belong to a workplace.
//! - "Most recent before" uses strict date inequality.

use crate::codec::{read_note, render_note, CodecError, FRONTMATTER_FENCE};
use crate::model::note::{note_filename, workplace_tag, Note, NOTE_DATE_FORMAT};
use chrono::NaiveDate;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static NOTE_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)\.md$").expect("valid note file name regex")
});

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note lookup and persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Directory listing, write, rename or delete failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Reading an existing note failed.
    Codec(CodecError),
    /// Workplace name cannot be encoded into a file name.
    InvalidWorkplace(String),
    /// A rename target already exists.
    RenameConflict(PathBuf),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error at `{}`: {source}", path.display()),
            Self::Codec(err) => write!(f, "{err}"),
            Self::InvalidWorkplace(name) => write!(f, "invalid workplace name: `{name}`"),
            Self::RenameConflict(path) => {
                write!(f, "refusing to overwrite existing note `{}`", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec(err) => Some(err),
            Self::InvalidWorkplace(_) | Self::RenameConflict(_) => None,
        }
    }
}

impl From<CodecError> for RepoError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RepoError + '_ {
    move |source| RepoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Repository interface for one workplace's daily notes.
pub trait NoteRepository {
    /// Workplace this repository is bound to.
    fn workplace(&self) -> &str;
    /// Returns the note for `date`, or `None` when no file exists.
    fn find_by_date(&self, date: NaiveDate) -> RepoResult<Option<Note>>;
    /// Returns the latest note strictly before `date`.
    fn find_most_recent_before(&self, date: NaiveDate) -> RepoResult<Option<Note>>;
    /// Returns whether a note file exists for `date`.
    fn note_exists(&self, date: NaiveDate) -> bool;
    /// Writes the full note, assigning its canonical path when unset.
    fn write_note(&self, note: &mut Note) -> RepoResult<()>;
    /// Deletes the note file for `date`. Returns `false` when none existed.
    fn delete_note(&self, date: NaiveDate) -> RepoResult<bool>;
    /// Lists dates of all notes of this workplace, ascending.
    fn list_note_dates(&self) -> RepoResult<Vec<NaiveDate>>;

    /// Builds a fresh, unsaved note for `date`.
    fn create_today_note(&self, date: NaiveDate) -> Note {
        Note::new(date, self.workplace())
    }
}

/// Notes directory backed repository.
#[derive(Debug, Clone)]
pub struct FsNoteRepository {
    notes_dir: PathBuf,
    workplace: String,
}

impl FsNoteRepository {
    /// Binds a repository to `workplace` under `notes_dir`.
    ///
    /// Rejects names that would escape the directory or break the file
    /// name convention.
    pub fn try_new(notes_dir: impl Into<PathBuf>, workplace: &str) -> RepoResult<Self> {
        let workplace = validate_workplace(workplace)?;
        Ok(Self {
            notes_dir: notes_dir.into(),
            workplace,
        })
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Canonical path of the note for `date`.
    pub fn note_path(&self, date: NaiveDate) -> PathBuf {
        self.notes_dir.join(note_filename(date, &self.workplace))
    }

    /// Creates the notes directory if needed.
    pub fn ensure_notes_dir(&self) -> RepoResult<()> {
        std::fs::create_dir_all(&self.notes_dir).map_err(io_error(&self.notes_dir))
    }

    /// Returns `(date, path)` for every regular note file of this workplace, unsorted.
    fn scan_note_files(&self) -> RepoResult<Vec<(NaiveDate, PathBuf)>> {
        let entries = std::fs::read_dir(&self.notes_dir).map_err(io_error(&self.notes_dir))?;
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&self.notes_dir))?;
            if !entry.file_type().is_ok_and(|kind| kind.is_file()) {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(date) = parse_note_file_name(file_name, &self.workplace) {
                found.push((date, entry.path()));
            }
        }
        Ok(found)
    }
}

impl NoteRepository for FsNoteRepository {
    fn workplace(&self) -> &str {
        &self.workplace
    }

    fn find_by_date(&self, date: NaiveDate) -> RepoResult<Option<Note>> {
        let path = self.note_path(date);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(read_note(&path)?))
    }

    fn find_most_recent_before(&self, date: NaiveDate) -> RepoResult<Option<Note>> {
        let latest = self
            .scan_note_files()?
            .into_iter()
            .filter(|(note_date, _)| *note_date < date)
            .max_by_key(|(note_date, _)| *note_date);

        match latest {
            Some((_, path)) => Ok(Some(read_note(&path)?)),
            None => Ok(None),
        }
    }

    fn note_exists(&self, date: NaiveDate) -> bool {
        self.note_path(date).is_file()
    }

    fn write_note(&self, note: &mut Note) -> RepoResult<()> {
        if note.file_path.as_os_str().is_empty() {
            let Some(date) = note.date else {
                return Err(RepoError::Io {
                    path: self.notes_dir.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "note has neither a file path nor a date",
                    ),
                });
            };
            note.file_path = self.note_path(date);
        }

        let path = note.file_path.clone();
        match std::fs::write(&path, render_note(note)) {
            Ok(()) => {
                info!(
                    "event=note_write module=repo status=ok file={} pending={} completed={}",
                    display_name(&path),
                    note.pending_work.len(),
                    note.completed_work.len()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=note_write module=repo status=error file={} error={}",
                    display_name(&path),
                    source
                );
                Err(RepoError::Io { path, source })
            }
        }
    }

    fn delete_note(&self, date: NaiveDate) -> RepoResult<bool> {
        let path = self.note_path(date);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(
                    "event=note_delete module=repo status=ok file={}",
                    display_name(&path)
                );
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(RepoError::Io { path, source }),
        }
    }

    fn create_today_note(&self, date: NaiveDate) -> Note {
        let mut note = Note::new(date, &self.workplace);
        note.file_path = self.note_path(date);
        note
    }

    fn list_note_dates(&self) -> RepoResult<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self
            .scan_note_files()?
            .into_iter()
            .map(|(date, _)| date)
            .collect();
        dates.sort_unstable();
        Ok(dates)
    }
}

/// Extracts the note date from a file name belonging to `workplace`.
///
/// Returns `None` for other workplaces, missing or unparsable dates.
pub fn parse_note_file_name(file_name: &str, workplace: &str) -> Option<NaiveDate> {
    let caps = NOTE_FILE_RE.captures(file_name)?;
    if caps.get(2)?.as_str() != workplace {
        return None;
    }
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), NOTE_DATE_FORMAT).ok()
}

/// Trims and validates a workplace name for use in file names and ids.
pub fn validate_workplace(name: &str) -> RepoResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains(['/', '\\', ','])
        || trimmed == "."
        || trimmed == ".."
    {
        return Err(RepoError::InvalidWorkplace(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Renames every note of `old` to `new` inside `notes_dir`.
///
/// File names are rewritten first. Inside each file only the frontmatter `id:`
/// prefix and the workplace tag entry change; everything else is kept
/// byte for byte. Fails without touching anything when a target file exists.
/// Returns the number of renamed files.
pub fn rename_workplace(notes_dir: &Path, old: &str, new: &str) -> RepoResult<usize> {
    let old_repo = FsNoteRepository::try_new(notes_dir, old)?;
    let new_repo = FsNoteRepository::try_new(notes_dir, new)?;

    let mut files = old_repo.scan_note_files()?;
    files.sort_by_key(|(date, _)| *date);
    let moves: Vec<(PathBuf, PathBuf)> = files
        .into_iter()
        .map(|(date, old_path)| (old_path, new_repo.note_path(date)))
        .collect();
    if let Some((_, taken)) = moves.iter().find(|(_, new_path)| new_path.exists()) {
        return Err(RepoError::RenameConflict(taken.clone()));
    }

    for (old_path, new_path) in &moves {
        std::fs::rename(old_path, new_path).map_err(io_error(old_path))?;
        let content = std::fs::read_to_string(new_path).map_err(io_error(new_path))?;
        let rewritten =
            rewrite_workplace_refs(&content, old_repo.workplace(), new_repo.workplace());
        if rewritten != content {
            std::fs::write(new_path, rewritten).map_err(io_error(new_path))?;
        }
    }

    info!(
        "event=workplace_rename module=repo status=ok renamed_files={}",
        moves.len()
    );
    Ok(moves.len())
}

/// Rewrites the `id:` prefix and the workplace tag entry of the leading
/// frontmatter block. Lines outside it are returned unchanged.
pub fn rewrite_workplace_refs(content: &str, old: &str, new: &str) -> String {
    let old_prefix = format!("{old}-");
    let old_tag_entry = format!("  - {}", workplace_tag(old));
    let new_tag_entry = format!("  - {}", workplace_tag(new));

    let mut out = String::with_capacity(content.len());
    let mut fences = 0;
    for raw in content.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        let ending = &raw[line.len()..];
        if line == FRONTMATTER_FENCE {
            fences += 1;
        } else if fences == 1 {
            if let Some(id) = line.strip_prefix("id:") {
                if let Some(rest) = id.trim().strip_prefix(&old_prefix) {
                    out.push_str(&format!("id: {new}-{rest}{ending}"));
                    continue;
                }
            } else if line.trim_end() == old_tag_entry {
                out.push_str(&new_tag_entry);
                out.push_str(ending);
                continue;
            }
        }
        out.push_str(raw);
    }
    out
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
