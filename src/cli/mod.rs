use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "open-ai", alias = "openai")]
    OpenAI,
    #[value(alias = "anthropic")]
    Anthropic,
    #[value(alias = "ollama")]
    Ollama,
}

#[derive(Parser, Debug)]
#[command(
    name = "fresh_codegen",
    version,
    about = "Plan a project with an LLM, generate its files, and optionally improve an existing tree"
)]
pub struct Args {
    /// Optional TOML config file; flags below override its values.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    /// Project description. Prompted for when omitted.
    #[arg(long)]
    pub project: Option<String>,

    /// Directory the generated project is written to.
    #[arg(long)]
    pub out: Option<String>,

    /// Existing project to improve after generation. Skips the yes/no prompt.
    #[arg(long, conflicts_with = "no_update")]
    pub update: Option<String>,

    /// Directory the improved copy of `--update` is written to.
    #[arg(long)]
    pub update_out: Option<String>,

    /// Never ask to update an existing project.
    #[arg(long, default_value_t = false)]
    pub no_update: bool,

    #[arg(long)]
    pub history: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Trailing characters of the history fed back as context on each call.
    #[arg(long)]
    pub memory_chars: Option<usize>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
