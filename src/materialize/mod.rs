use colored::Colorize;
use fs_err as fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::agents::{profile_for, ContentGenerator};
use crate::errors::{ErrorKind, FreshError};
use crate::prompt;
use crate::safety::resolve_within;
use crate::ux::Progress;
use crate::wire::{Language, Subtask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Generated,
    /// Unrecognized language; a comment naming the file and its purpose was written.
    Placeholder,
    /// Generation failed; the file exists but is empty.
    Degraded(ErrorKind),
    /// Nothing was written.
    Failed(ErrorKind),
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub filename: String,
    pub language: Language,
    pub path: Option<PathBuf>,
    pub status: FileStatus,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MaterializeSummary {
    pub files: Vec<FileOutcome>,
}

impl MaterializeSummary {
    pub fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn bytes_written(&self) -> u64 {
        self.files.iter().map(|o| o.bytes).sum()
    }
}

/// Write `data` to `path` through a temp file in the same directory, creating
/// parents as needed. An existing file is replaced.
pub fn write_file(path: &Path, data: &str) -> Result<(), FreshError> {
    let target = path.display().to_string();
    let parent = path.parent().unwrap_or(Path::new(""));
    fs::create_dir_all(parent).map_err(|e| FreshError::io(&target, e))?;
    let tmp = NamedTempFile::new_in(parent).map_err(|e| FreshError::io(&target, e))?;
    fs::write(tmp.path(), data).map_err(|e| FreshError::io(&target, e))?;
    tmp.persist(path).map_err(|e| FreshError::io(&target, e.into()))?;
    Ok(())
}

pub struct Materializer<'a> {
    gen: &'a ContentGenerator<'a>,
    progress: bool,
}

impl<'a> Materializer<'a> {
    pub fn new(gen: &'a ContentGenerator<'a>) -> Self {
        Self { gen, progress: false }
    }

    pub fn with_progress(mut self, on: bool) -> Self {
        self.progress = on;
        self
    }

    /// Produce one file per subtask under `root`, in plan order. A failure on
    /// one subtask never stops the rest; each gets an outcome in the summary.
    pub async fn materialize(&self, plan: &[Subtask], root: &Path, project: &str) -> MaterializeSummary {
        let memory = self.gen.gateway().memory();
        let progress = Progress::new(plan.len() as u64, self.progress);
        let mut summary = MaterializeSummary::default();

        for task in plan {
            progress.start(format!("{} ({})", task.filename, task.language));
            let mut outcome = FileOutcome {
                filename: task.filename.clone(),
                language: task.language.clone(),
                path: None,
                status: FileStatus::Generated,
                bytes: 0,
            };

            let abs = match resolve_within(root, &task.filename) {
                Ok(p) => p,
                Err(e) => {
                    let msg = format!("Error writing {}: {e}", task.filename);
                    tracing::warn!(file = %task.filename, kind = %e.kind(), "{msg}");
                    memory.record(&msg);
                    progress.line(format!("{} {}", "✗".red(), msg));
                    outcome.status = FileStatus::Failed(e.kind());
                    summary.files.push(outcome);
                    progress.done();
                    continue;
                }
            };

            let content = match profile_for(&task.language) {
                Some(profile) => {
                    match self.gen.generate_content(profile, &task.filename, &task.description, project).await {
                        Ok(c) => c,
                        Err(e) => {
                            progress.line(format!("{} {} ({}): {e}", "!".yellow(), task.filename, task.language));
                            outcome.status = FileStatus::Degraded(e.kind());
                            String::new()
                        }
                    }
                }
                None => {
                    outcome.status = FileStatus::Placeholder;
                    prompt::placeholder(&task.filename, &task.description)
                }
            };

            match write_file(&abs, &content) {
                Ok(()) => {
                    memory.record(&format!("File created: {}", abs.display()));
                    tracing::info!(file = %abs.display(), language = %task.language, bytes = content.len(), "file created");
                    progress.line(format!("{} File created: {}", "✓".green(), abs.display()));
                    outcome.bytes = content.len() as u64;
                    outcome.path = Some(abs);
                }
                Err(e) => {
                    let msg = format!("Error writing {}: {e}", task.filename);
                    tracing::warn!(file = %task.filename, kind = %e.kind(), "{msg}");
                    memory.record(&msg);
                    progress.line(format!("{} {}", "✗".red(), msg));
                    outcome.status = FileStatus::Failed(e.kind());
                }
            }
            summary.files.push(outcome);
            progress.done();
        }

        progress.finish();
        summary
    }
}
