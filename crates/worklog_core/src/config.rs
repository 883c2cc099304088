//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve notes directory, workplaces and summary backend settings.
//! - Persist workplace list changes back into the config file.
//!
//! # Invariants
//! - Process environment wins over the config file; the file wins over defaults.
//! - `workplaces` is never empty.
//!
//! # See also
//! - crates/worklog_cli/src/main.rs

use crate::logging::default_log_level;
use crate::repo::note_repo::validate_workplace;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const KEY_NOTES_LOCATION: &str = "WORK_NOTES_LOCATION";
pub const KEY_WORKPLACE_NAME: &str = "WORKPLACE_NAME";
pub const KEY_WORKPLACES: &str = "WORKPLACES";
pub const KEY_SERVER: &str = "OPENCODE_SERVER";
pub const KEY_AI_PROVIDER: &str = "AI_PROVIDER";
pub const KEY_AI_MODEL: &str = "AI_MODEL";
pub const KEY_LOG_LEVEL: &str = "WORKLOG_LOG_LEVEL";

const DEFAULT_NOTES_LOCATION: &str = "~/Documents/obsidian-notes/Inbox/work";
const DEFAULT_WORKPLACE: &str = "Work";
const DEFAULT_SERVER: &str = "http://127.0.0.1:4096";
const DEFAULT_AI_PROVIDER: &str = "github-copilot";
const DEFAULT_AI_MODEL: &str = "claude-sonnet-4";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading/saving error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file exists but could not be opened or read.
    File {
        path: PathBuf,
        source: dotenv::Error,
    },
    DuplicateWorkplace(String),
    WorkplaceNotFound(String),
    InvalidWorkplace(String),
    /// Home directory could not be resolved for the config file.
    NoHomeDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "config i/o error at `{}`: {source}", path.display())
            }
            Self::File { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::DuplicateWorkplace(name) => write!(f, "workplace '{name}' already exists"),
            Self::WorkplaceNotFound(name) => write!(f, "workplace '{name}' not found"),
            Self::InvalidWorkplace(name) => write!(f, "invalid workplace name: `{name}`"),
            Self::NoHomeDir => write!(f, "home directory could not be resolved"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::File { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub notes_dir: PathBuf,
    /// Workplace used when none is selected explicitly.
    pub default_workplace: String,
    pub workplaces: Vec<String>,
    pub server_url: String,
    pub ai_provider: String,
    pub ai_model: String,
    pub log_level: String,
    /// File that `add_workplace`/`rename_workplace` persist into.
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Loads `~/.config/worklog/config` into the environment (without
    /// overriding existing variables) and resolves the configuration.
    pub fn load() -> Self {
        let config_file = default_config_path();
        if let Some(path) = config_file.as_deref() {
            match apply_config_file(path) {
                Ok(applied) => info!(
                    "event=config_load module=config status=ok source=file applied={applied}"
                ),
                Err(err) => warn!("event=config_load module=config status=error error={err}"),
            }
        }
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        config.config_file = config_file;
        config
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let default_workplace = get(KEY_WORKPLACE_NAME, DEFAULT_WORKPLACE);
        let mut workplaces = split_workplaces(&get(KEY_WORKPLACES, ""));
        if workplaces.is_empty() {
            workplaces.push(default_workplace.clone());
        }

        Self {
            notes_dir: expand_home(&get(KEY_NOTES_LOCATION, DEFAULT_NOTES_LOCATION)),
            default_workplace,
            workplaces,
            server_url: get(KEY_SERVER, DEFAULT_SERVER)
                .trim_end_matches('/')
                .to_string(),
            ai_provider: get(KEY_AI_PROVIDER, DEFAULT_AI_PROVIDER),
            ai_model: get(KEY_AI_MODEL, DEFAULT_AI_MODEL),
            log_level: get(KEY_LOG_LEVEL, default_log_level()),
            config_file: None,
        }
    }

    /// Creates the notes directory recursively.
    pub fn ensure_notes_dir(&self) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.notes_dir).map_err(|source| ConfigError::Io {
            path: self.notes_dir.clone(),
            source,
        })
    }

    /// Resolves a workplace selection against the configured list.
    ///
    /// `None` selects the default workplace; matching is case-insensitive and
    /// returns the configured spelling.
    pub fn resolve_workplace(&self, requested: Option<&str>) -> ConfigResult<String> {
        let requested = requested.unwrap_or(&self.default_workplace).trim();
        self.workplaces
            .iter()
            .find(|workplace| workplace.eq_ignore_ascii_case(requested))
            .cloned()
            .ok_or_else(|| ConfigError::WorkplaceNotFound(requested.to_string()))
    }

    /// Adds a workplace and persists the list.
    pub fn add_workplace(&mut self, name: &str) -> ConfigResult<()> {
        let name = validate_workplace(name)
            .map_err(|_| ConfigError::InvalidWorkplace(name.to_string()))?;
        if self.has_workplace(&name) {
            return Err(ConfigError::DuplicateWorkplace(name));
        }
        self.workplaces.push(name);
        self.save_workplaces()
    }

    /// Checks that `old` is configured and `new` is a free, valid name.
    ///
    /// Returns the trimmed new name. Nothing is changed.
    pub fn check_rename(&self, old: &str, new: &str) -> ConfigResult<String> {
        let new = validate_workplace(new)
            .map_err(|_| ConfigError::InvalidWorkplace(new.to_string()))?;
        if !self.workplaces.iter().any(|workplace| workplace == old) {
            return Err(ConfigError::WorkplaceNotFound(old.to_string()));
        }
        if self.has_workplace(&new) {
            return Err(ConfigError::DuplicateWorkplace(new));
        }
        Ok(new)
    }

    /// Renames a workplace and persists the list.
    pub fn rename_workplace(&mut self, old: &str, new: &str) -> ConfigResult<()> {
        let new = self.check_rename(old, new)?;
        let slot = self
            .workplaces
            .iter_mut()
            .find(|workplace| workplace.as_str() == old)
            .ok_or_else(|| ConfigError::WorkplaceNotFound(old.to_string()))?;
        *slot = new.clone();
        if self.default_workplace == old {
            self.default_workplace = new;
        }
        self.save_workplaces()
    }

    fn has_workplace(&self, name: &str) -> bool {
        self.workplaces
            .iter()
            .any(|workplace| workplace.eq_ignore_ascii_case(name))
    }

    fn save_workplaces(&self) -> ConfigResult<()> {
        let path = self.config_file.as_deref().ok_or(ConfigError::NoHomeDir)?;
        let mut values = read_config_file(path)?;
        values.insert(KEY_WORKPLACES.to_string(), self.workplaces.join(","));
        write_config_file(path, &values)?;
        info!(
            "event=config_save module=config status=ok workplaces={}",
            self.workplaces.len()
        );
        Ok(())
    }
}

/// `~/.config/worklog/config`, when a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("worklog").join("config"))
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn split_workplaces(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sets every key of the config file that the process environment does not
/// already define. Returns how many variables were set.
pub fn apply_config_file(path: &Path) -> ConfigResult<usize> {
    let mut applied = 0;
    for (key, value) in read_config_file(path)? {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            applied += 1;
        }
    }
    Ok(applied)
}

/// Reads the `KEY=value` config file. A missing file is empty; lines that do
/// not parse are skipped with a warning and reading continues.
fn read_config_file(path: &Path) -> ConfigResult<BTreeMap<String, String>> {
    let entries = match dotenv::from_path_iter(path) {
        Ok(entries) => entries,
        Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(BTreeMap::new())
        }
        Err(source) => {
            return Err(ConfigError::File {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut values = BTreeMap::new();
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                values.insert(key, value);
            }
            Err(err) => {
                warn!("event=config_load module=config status=skipped_line error={err}");
            }
        }
    }
    Ok(values)
}

fn write_config_file(path: &Path, values: &BTreeMap<String, String>) -> ConfigResult<()> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content: String = values
        .iter()
        .map(|(key, value)| format!("{key}={}\n", quote_value(value)))
        .collect();
    std::fs::write(path, content).map_err(io_err)
}

/// Single-quotes values the config parser would otherwise split or expand.
fn quote_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| !c.is_whitespace() && !matches!(c, '#' | '"' | '\'' | '$' | '\\'));
    if plain || value.contains('\'') {
        value.to_string()
    } else {
        format!("'{value}'")
    }
}
