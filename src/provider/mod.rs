use anyhow::Result;
use async_trait::async_trait;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::wire::RespondRequest;

pub mod anthropic;
pub mod ollama;
pub mod openai;

#[cfg(test)]
pub mod mock;

/// A text-generation endpoint. One call, one response text; no retries.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn respond(&self, req: &RespondRequest) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    let p: DynProvider = match cfg.provider {
        ProviderKind::OpenAI => Box::new(openai::OpenAIProvider::new(&cfg.openai_url, cfg.timeout_secs)?),
        ProviderKind::Anthropic => Box::new(anthropic::Anthropic::new(
            &cfg.anthropic_url,
            &cfg.anthropic_version,
            cfg.timeout_secs,
        )?),
        ProviderKind::Ollama => Box::new(ollama::Ollama::new(&cfg.ollama_url, cfg.timeout_secs)?),
    };
    Ok(p)
}
