//! Change events and the change log sink.

use crate::error::ApiError;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Timestamp layout of a change log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether an event brackets a whole pass or reports a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Lifecycle,
    Change,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Started,
    Completed,
    Aborted { error: String },
    Copied {
        name: String,
        source: PathBuf,
        replica: PathBuf,
    },
    Updated { name: String, replica: PathBuf },
    Deleted { name: String, replica: PathBuf },
}

impl ChangeKind {
    pub fn level(&self) -> EventLevel {
        match self {
            ChangeKind::Started | ChangeKind::Completed | ChangeKind::Aborted { .. } => {
                EventLevel::Lifecycle
            }
            _ => EventLevel::Change,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Started => write!(f, "Starting data synchronization."),
            ChangeKind::Completed => write!(f, "Data synchronization complete."),
            ChangeKind::Aborted { error } => write!(f, "Data synchronization aborted: {}", error),
            ChangeKind::Copied {
                name,
                source,
                replica,
            } => write!(
                f,
                "\"{}\" copied from \"{}\" to \"{}\".",
                name,
                source.display(),
                replica.display()
            ),
            ChangeKind::Updated { name, replica } => {
                write!(f, "\"{}\" updated at \"{}\".", name, replica.display())
            }
            ChangeKind::Deleted { name, replica } => {
                write!(f, "\"{}\" deleted from \"{}\".", name, replica.display())
            }
        }
    }
}

/// One human-readable change log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub timestamp: DateTime<Local>,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn now(kind: ChangeKind) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
        }
    }

    pub fn level(&self) -> EventLevel {
        self.kind.level()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// `[YYYY-MM-DD HH:MM:SS] message`
    pub fn to_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.kind)
    }
}

/// Receiver of change events.
///
/// Called synchronously right after the action an event describes.
pub trait ChangeLog {
    fn emit(&self, event: ChangeEvent);
}

impl<T: ChangeLog + ?Sized> ChangeLog for &T {
    fn emit(&self, event: ChangeEvent) {
        (**self).emit(event)
    }
}

/// Keeps events in memory, in emission order
#[derive(Debug, Default)]
pub struct MemoryChangeLog {
    events: Mutex<Vec<ChangeEvent>>,
}

impl MemoryChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<ChangeKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }

    /// Per-entry events only
    pub fn changes(&self) -> Vec<ChangeKind> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level() == EventLevel::Change)
            .map(|e| e.kind.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ChangeLog for MemoryChangeLog {
    fn emit(&self, event: ChangeEvent) {
        self.events.lock().push(event);
    }
}

/// Append-only change log file, optionally echoed to stdout
pub struct FileChangeLog {
    path: PathBuf,
    file: Mutex<File>,
    echo: bool,
}

impl FileChangeLog {
    /// Open `path` for appending, creating it and its parent directories
    pub fn open(path: impl Into<PathBuf>, echo: bool) -> Result<Self, ApiError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ChangeLogError(format!(
                    "Failed to create change log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                ApiError::ChangeLogError(format!(
                    "Failed to open change log {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            echo,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangeLog for FileChangeLog {
    fn emit(&self, event: ChangeEvent) {
        let line = event.to_line();
        info!(target: "treemirror::changes", "{}", event.kind);

        if self.echo {
            println!("{}", line);
        }

        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "{}", line).and_then(|()| file.flush()) {
            // The sink has no error channel; a lost line must not abort the pass
            warn!(path = %self.path.display(), error = %e, "Failed to write change log line");
        }
    }
}
