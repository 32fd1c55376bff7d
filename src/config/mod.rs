use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{Args, ProviderKind};

/// Run configuration handed to every component at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub history_path: PathBuf,
    pub notes_path: PathBuf,
    pub memory_chars: usize,
    pub project_dir: PathBuf,
    pub updated_dir: PathBuf,
    pub timeout_secs: u64,
    pub openai_url: String,
    pub anthropic_url: String,
    pub anthropic_version: String,
    pub ollama_url: String,
    /// Glob patterns; a matching file or directory is left out of an update walk
    /// and reported as excluded. Empty unless set in the config file.
    pub update_exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-4o-mini".into(),
            history_path: "history.txt".into(),
            notes_path: "notes.txt".into(),
            memory_chars: 2000,
            project_dir: "playground".into(),
            updated_dir: "playground_updated".into(),
            timeout_secs: 120,
            openai_url: "https://api.openai.com".into(),
            anthropic_url: "https://api.anthropic.com".into(),
            anthropic_version: "2023-06-01".into(),
            ollama_url: "http://localhost:11434".into(),
            update_exclude: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw).with_context(|| format!("parsing config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(p) = args.provider {
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if let Some(o) = &args.out {
            self.project_dir = o.into();
        }
        if let Some(o) = &args.update_out {
            self.updated_dir = o.into();
        }
        if let Some(h) = &args.history {
            self.history_path = h.into();
        }
        if let Some(n) = &args.notes {
            self.notes_path = n.into();
        }
        if let Some(c) = args.memory_chars {
            self.memory_chars = c;
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
    }

    /// Config rooted in `dir`, so runs never share history or output files.
    #[cfg(test)]
    pub fn isolated(dir: &Path) -> Self {
        Self {
            history_path: dir.join("history.txt"),
            notes_path: dir.join("notes.txt"),
            project_dir: dir.join("playground"),
            updated_dir: dir.join("playground_updated"),
            ..Self::default()
        }
    }
}
