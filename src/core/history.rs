//! # History Persistence
//!
//! Past question/response pairs live in a single JSON file (an array of
//! `{question, response, timestamp}` objects), rewritten in full after every
//! append or delete.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) so a crash mid-write
//! never leaves a truncated history behind.
//!
//! ```text
//! storage order:  [oldest, ..., newest]     (what's on disk)
//! display order:  [newest, ..., oldest]     (what the sidebar shows)
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Format used for entry timestamps (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of question characters shown in a sidebar label.
pub const LABEL_CHARS: usize = 30;

/// One answered question. Never edited after creation, only deleted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub response: String,
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryEntry {
    /// Timestamp for display; older files may lack one.
    pub fn display_timestamp(&self) -> &str {
        if self.timestamp.is_empty() {
            "No time"
        } else {
            &self.timestamp
        }
    }
}

#[derive(Debug)]
pub enum HistoryError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "history I/O error: {e}"),
            HistoryError::Parse(e) => write!(f, "history file is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<io::Error> for HistoryError {
    fn from(e: io::Error) -> Self {
        HistoryError::Io(e)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Parse(e)
    }
}

/// Flat-file store for the question history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full history. A missing or unreadable file is an empty
    /// history; only malformed JSON is an error.
    pub fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            info!("No history file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                warn!(
                    "Cannot read history file {}, starting empty: {}",
                    self.path.display(),
                    e
                );
                return Ok(Vec::new());
            }
        };
        let entries: Vec<HistoryEntry> = serde_json::from_str(&json)?;
        info!(
            "Loaded {} history entries from {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }

    /// Overwrite the file with the full sequence.
    pub fn save(&self, history: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        atomic_write_json(&self.path, history)?;
        debug!(
            "Saved {} history entries to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), HistoryError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Current local time in the history timestamp format.
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Map a newest-first display index to its position in storage order.
pub fn display_to_storage(len: usize, display_index: usize) -> Option<usize> {
    (display_index < len).then(|| len - 1 - display_index)
}

/// Entries in display order (newest first), paired with their display index.
pub fn display_order(history: &[HistoryEntry]) -> impl Iterator<Item = (usize, &HistoryEntry)> {
    history.iter().rev().enumerate()
}

/// Sidebar label: the first 30 characters of the question plus an ellipsis.
pub fn question_label(question: &str) -> String {
    let head: String = question.chars().take(LABEL_CHARS).collect();
    format!("{head}...")
}
