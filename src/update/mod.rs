use colored::Colorize;
use fs_err as fs;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::agents::{label_for_extension, ContentGenerator};
use crate::errors::{ErrorKind, FreshError};
use crate::materialize::write_file;
use crate::memory::MemoryStore;
use crate::ux::Progress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Rewritten by the model.
    Improved,
    /// Not a recognized source file; copied byte-for-byte.
    Copied,
    /// Read, model call, or write failed; no destination file.
    Skipped(ErrorKind),
    /// Matched an exclude pattern or is the destination tree; not walked.
    Excluded,
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub source: PathBuf,
    pub dest: Option<PathBuf>,
    pub status: UpdateStatus,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    pub files: Vec<UpdateOutcome>,
}

impl UpdateSummary {
    pub fn count(&self, pred: impl Fn(&UpdateStatus) -> bool) -> usize {
        self.files.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn bytes_written(&self) -> u64 {
        self.files.iter().map(|o| o.bytes).sum()
    }
}

pub struct Updater<'a> {
    gen: &'a ContentGenerator<'a>,
    exclude: Vec<Pattern>,
    progress: bool,
}

impl<'a> Updater<'a> {
    pub fn new(gen: &'a ContentGenerator<'a>, exclude: &[String]) -> Self {
        let exclude = exclude
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pat) => Some(pat),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();
        Self { gen, exclude, progress: false }
    }

    pub fn with_progress(mut self, on: bool) -> Self {
        self.progress = on;
        self
    }

    fn is_excluded(&self, rel: &Path) -> bool {
        self.exclude.iter().any(|pat| {
            pat.matches_path(rel)
                || rel
                    .components()
                    .any(|c| pat.matches(&c.as_os_str().to_string_lossy()))
        })
    }

    /// Mirror `src` into `dst`. Recognized source files are rewritten by the
    /// model, everything else is copied verbatim. Entries matching an exclude
    /// pattern, and `dst` itself when it lives inside `src`, are not walked but
    /// still get an outcome.
    pub async fn update_tree(&self, src: &Path, dst: &Path) -> UpdateSummary {
        let memory = self.gen.gateway().memory();
        let mut summary = UpdateSummary::default();

        if let Err(e) = fs::create_dir_all(dst) {
            let msg = format!("Error creating {}: {e}", dst.display());
            tracing::warn!(dir = %dst.display(), "{msg}");
            memory.record(&msg);
        }
        let dst_canon = fs::canonicalize(dst).ok();

        let mut files: Vec<DirEntry> = Vec::new();
        let mut excluded: Vec<PathBuf> = Vec::new();
        let walker = WalkDir::new(src).into_iter().filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let rel = e.path().strip_prefix(src).unwrap_or(e.path());
            let nested_dst = match (&dst_canon, e.file_type().is_dir()) {
                (Some(d), true) => fs::canonicalize(e.path()).map(|p| &p == d).unwrap_or(false),
                _ => false,
            };
            if nested_dst || self.is_excluded(rel) {
                excluded.push(e.path().to_path_buf());
                return false;
            }
            true
        });
        for entry in walker {
            match entry {
                Ok(e) if e.file_type().is_file() => files.push(e),
                // links are not followed by the walk; one pointing at a file is mirrored through it
                Ok(e) if e.path_is_symlink() && e.path().is_file() => files.push(e),
                Ok(e) if e.path_is_symlink() => {
                    let path = e.path().to_path_buf();
                    let err = FreshError::io(
                        path.display().to_string(),
                        std::io::Error::new(std::io::ErrorKind::InvalidInput, "link target is not a regular file"),
                    );
                    summary.files.push(skip_entry(memory, path, err));
                }
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().unwrap_or(src).to_path_buf();
                    let err = FreshError::io(path.display().to_string(), e.into());
                    summary.files.push(skip_entry(memory, path, err));
                }
            }
        }

        for path in excluded {
            memory.record(&format!("Excluded from update: {}", path.display()));
            tracing::info!(path = %path.display(), "excluded from update");
            summary.files.push(UpdateOutcome {
                source: path,
                dest: None,
                status: UpdateStatus::Excluded,
                bytes: 0,
            });
        }

        let progress = Progress::new(files.len() as u64, self.progress);
        for entry in files {
            let source = entry.path();
            let rel = source.strip_prefix(src).unwrap_or(source);
            let dest = dst.join(rel);
            progress.start(rel.display().to_string());

            let label = source
                .extension()
                .and_then(|e| e.to_str())
                .and_then(label_for_extension);
            let result = match label {
                Some(label) => self.improve_one(memory, &progress, source, &dest, label).await,
                None => copy_one(memory, &progress, source, &dest),
            };
            let outcome = match result {
                Ok((status, bytes)) => UpdateOutcome {
                    source: source.to_path_buf(),
                    dest: Some(dest),
                    status,
                    bytes,
                },
                Err(kind) => UpdateOutcome {
                    source: source.to_path_buf(),
                    dest: None,
                    status: UpdateStatus::Skipped(kind),
                    bytes: 0,
                },
            };
            summary.files.push(outcome);
            progress.done();
        }

        progress.finish();
        summary
    }

    async fn improve_one(
        &self,
        memory: &MemoryStore,
        progress: &Progress,
        source: &Path,
        dest: &Path,
        label: &str,
    ) -> Result<(UpdateStatus, u64), ErrorKind> {
        let shown = source.display().to_string();
        progress.line(format!("Updating {shown} ({label})..."));

        let original = match fs::read_to_string(source) {
            Ok(s) => s,
            Err(e) => {
                let err = FreshError::io(&shown, e);
                let msg = format!("Error reading {shown}: {err}");
                tracing::warn!(file = %shown, kind = %err.kind(), "{msg}");
                memory.record(&msg);
                progress.line(format!("{} {msg}", "✗".red()));
                return Err(err.kind());
            }
        };

        let improved = match self.gen.improve(label, &shown, &original).await {
            Ok(s) => s,
            Err(e) => {
                progress.line(format!("{} {shown} ({label}): {e}", "✗".red()));
                return Err(e.kind());
            }
        };

        if let Err(e) = write_file(dest, &improved) {
            let msg = format!("Error writing {}: {e}", dest.display());
            tracing::warn!(file = %dest.display(), kind = %e.kind(), "{msg}");
            memory.record(&msg);
            progress.line(format!("{} {msg}", "✗".red()));
            return Err(e.kind());
        }
        memory.record(&format!("File updated: {}", dest.display()));
        progress.line(format!("{} File updated: {}", "✓".green(), dest.display()));
        Ok((UpdateStatus::Improved, improved.len() as u64))
    }
}

fn skip_entry(memory: &MemoryStore, path: PathBuf, err: FreshError) -> UpdateOutcome {
    let msg = format!("Error reading {}: {err}", path.display());
    tracing::warn!(kind = %err.kind(), "{msg}");
    memory.record(&msg);
    println!("{} {msg}", "✗".red());
    UpdateOutcome {
        source: path,
        dest: None,
        status: UpdateStatus::Skipped(err.kind()),
        bytes: 0,
    }
}

fn copy_one(memory: &MemoryStore, progress: &Progress, source: &Path, dest: &Path) -> Result<(UpdateStatus, u64), ErrorKind> {
    let copied = dest
        .parent()
        .map(fs::create_dir_all)
        .unwrap_or(Ok(()))
        .and_then(|_| fs::copy(source, dest));
    match copied {
        Ok(bytes) => {
            memory.record(&format!("File copied unchanged: {}", dest.display()));
            progress.line(format!("{} File copied unchanged: {}", "=".cyan(), dest.display()));
            Ok((UpdateStatus::Copied, bytes))
        }
        Err(e) => {
            let err = FreshError::io(dest.display().to_string(), e);
            let msg = format!("Error copying {}: {err}", source.display());
            tracing::warn!(file = %source.display(), kind = %err.kind(), "{msg}");
            memory.record(&msg);
            progress.line(format!("{} {msg}", "✗".red()));
            Err(err.kind())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gateway::Gateway;
    use crate::provider::mock::MockProvider;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff, 0xfe];

    fn seed(src: &Path) {
        fs::create_dir_all(src.join("pkg")).unwrap();
        fs::write(src.join("pkg/calc.py"), "def add(a,b): return a+b\n").unwrap();
        fs::write(src.join("logo.png"), PNG).unwrap();
    }

    #[tokio::test]
    async fn source_is_improved_and_binary_is_copied() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let src = dir.path().join("app");
        seed(&src);
        let mock = MockProvider::new().reply("```python\ndef add(a, b):\n    return a + b\n```");
        let gw = Gateway::new(Box::new(mock.clone()), &cfg);
        let gen = ContentGenerator::new(&gw);

        let sum = Updater::new(&gen, &cfg.update_exclude).update_tree(&src, &cfg.updated_dir).await;

        assert_eq!(fs::read(cfg.updated_dir.join("logo.png")).unwrap(), PNG);
        assert_eq!(
            fs::read_to_string(cfg.updated_dir.join("pkg/calc.py")).unwrap(),
            "def add(a, b):\n    return a + b"
        );
        assert_eq!(sum.count(|s| *s == UpdateStatus::Improved), 1);
        assert_eq!(sum.count(|s| *s == UpdateStatus::Copied), 1);
        assert!(mock.requests()[0].input.contains("def add(a,b): return a+b"));
        assert!(mock.requests()[0].input.contains("expert in Python development"));

        let history = fs::read_to_string(&cfg.history_path).unwrap();
        assert!(history.contains("File updated: "));
        assert!(history.contains("File copied unchanged: "));
    }

    #[tokio::test]
    async fn failed_transform_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let src = dir.path().join("app");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.rs"), "fn main(){}").unwrap();
        fs::write(src.join("bad.js"), [0xff, 0xfe, 0x00]).unwrap();
        let gw = Gateway::new(Box::new(MockProvider::new().fail("quota exceeded")), &cfg);
        let gen = ContentGenerator::new(&gw);

        let sum = Updater::new(&gen, &[]).update_tree(&src, &cfg.updated_dir).await;

        assert!(!cfg.updated_dir.join("main.rs").exists());
        assert!(!cfg.updated_dir.join("bad.js").exists());
        let mut kinds: Vec<String> = sum
            .files
            .iter()
            .map(|o| match &o.status {
                UpdateStatus::Skipped(k) => k.to_string(),
                other => format!("{other:?}"),
            })
            .collect();
        kinds.sort();
        assert_eq!(kinds, ["io", "transport"]);

        let history = fs::read_to_string(&cfg.history_path).unwrap();
        assert!(history.contains("Error reading "));
        assert!(history.contains("in Rust: transport error"));
    }

    #[tokio::test]
    async fn excluded_entries_and_nested_destination_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let src = dir.path().join("app");
        fs::create_dir_all(src.join(".git")).unwrap();
        fs::create_dir_all(src.join("node_modules/left-pad")).unwrap();
        fs::write(src.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::write(src.join("node_modules/left-pad/index.js"), "module.exports = 1").unwrap();
        fs::write(src.join("notes.txt"), "keep me").unwrap();
        let dst = src.join("out");
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("stale.txt"), "from a previous run").unwrap();

        let mock = MockProvider::new();
        let gw = Gateway::new(Box::new(mock.clone()), &cfg);
        let gen = ContentGenerator::new(&gw);
        let sum = Updater::new(&gen, &[".git".into(), "node_modules".into()])
            .update_tree(&src, &dst)
            .await;

        assert_eq!(sum.count(|s| *s == UpdateStatus::Copied), 1);
        assert_eq!(sum.count(|s| *s == UpdateStatus::Excluded), 3);
        assert_eq!(fs::read_to_string(dst.join("notes.txt")).unwrap(), "keep me");
        assert!(!dst.join(".git").exists());
        assert!(!dst.join("out").exists());
        assert!(mock.requests().is_empty());

        let history = fs::read_to_string(&cfg.history_path).unwrap();
        assert!(history.contains(&format!("Excluded from update: {}", src.join(".git").display())));
        assert!(history.contains(&format!("Excluded from update: {}", src.join("node_modules").display())));
        assert!(history.contains(&format!("Excluded from update: {}", dst.display())));
    }

    #[tokio::test]
    async fn default_config_mirrors_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let src = dir.path().join("app");
        fs::create_dir_all(src.join("docs/target")).unwrap();
        fs::write(src.join("docs/target/spec.txt"), "requirements").unwrap();
        fs::write(src.join("target"), "a plain file").unwrap();
        fs::write(src.join("keep.txt"), "kept").unwrap();

        let gw = Gateway::new(Box::new(MockProvider::new()), &cfg);
        let gen = ContentGenerator::new(&gw);
        let sum = Updater::new(&gen, &cfg.update_exclude).update_tree(&src, &cfg.updated_dir).await;

        assert_eq!(sum.files.len(), 3);
        assert_eq!(sum.count(|s| *s == UpdateStatus::Copied), 3);
        assert_eq!(fs::read_to_string(cfg.updated_dir.join("docs/target/spec.txt")).unwrap(), "requirements");
        assert_eq!(fs::read_to_string(cfg.updated_dir.join("target")).unwrap(), "a plain file");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_links_are_mirrored_and_dangling_links_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let src = dir.path().join("app");
        fs::create_dir_all(&src).unwrap();
        let shared = dir.path().join("shared.txt");
        fs::write(&shared, "shared settings").unwrap();
        std::os::unix::fs::symlink(&shared, src.join("settings.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), src.join("broken.txt")).unwrap();

        let gw = Gateway::new(Box::new(MockProvider::new()), &cfg);
        let gen = ContentGenerator::new(&gw);
        let sum = Updater::new(&gen, &cfg.update_exclude).update_tree(&src, &cfg.updated_dir).await;

        assert_eq!(sum.count(|s| *s == UpdateStatus::Copied), 1);
        assert_eq!(sum.count(|s| *s == UpdateStatus::Skipped(ErrorKind::Io)), 1);
        assert_eq!(fs::read_to_string(cfg.updated_dir.join("settings.txt")).unwrap(), "shared settings");
        assert!(!cfg.updated_dir.join("broken.txt").exists());
        let history = fs::read_to_string(&cfg.history_path).unwrap();
        assert!(history.contains(&format!("Error reading {}", src.join("broken.txt").display())));
    }

    #[test]
    fn glob_excludes_match_components_and_paths() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let gw = Gateway::new(Box::new(MockProvider::new()), &cfg);
        let gen = ContentGenerator::new(&gw);
        let up = Updater::new(&gen, &["*.lock".into(), "docs/*.md".into(), "[".into()]);

        assert!(up.is_excluded(Path::new("Cargo.lock")));
        assert!(up.is_excluded(Path::new("docs/intro.md")));
        assert!(!up.is_excluded(Path::new("README.md")));
        assert!(!up.is_excluded(Path::new("src/lib.rs")));
    }
}
