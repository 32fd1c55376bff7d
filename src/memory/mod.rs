use chrono::{DateTime, Utc};
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Append-only text log. Backs both the conversation history, whose tail is
/// replayed as context on every call, and the notes file.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `entry` followed by a blank line.
    pub fn append(&self, entry: &str) -> std::io::Result<()> {
        let mut f = fs::OpenOptions::new().create(true).append(true).open(&self.path)?;
        f.write_all(entry.as_bytes())?;
        f.write_all(b"\n\n")?;
        Ok(())
    }

    /// Best-effort [`append`](Self::append): a failed write is logged and dropped.
    pub fn record(&self, entry: &str) {
        if let Err(e) = self.append(entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "history append failed");
        }
    }

    /// Last `max_chars` characters of the log; empty when missing or unreadable.
    pub fn read_window(&self, max_chars: usize) -> String {
        let data = match fs::read(&self.path) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no history to read");
                return String::new();
            }
        };
        let content = String::from_utf8_lossy(&data);
        let total = content.chars().count();
        if total <= max_chars {
            return content.into_owned();
        }
        content.chars().skip(total - max_chars).collect()
    }
}

/// Record appended to the notes file when a run ends.
pub fn closing_note(project: &str, run_id: Uuid, at: DateTime<Utc>) -> String {
    format!("[{}] [run {run_id}] Process finished for project: {project}", at.to_rfc3339())
}
