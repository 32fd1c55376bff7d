use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::wire::RespondRequest;

/// OpenAI Responses API. The request body is the logical respond() call as-is.
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(default)]
    r#type: String,
    #[serde(default)]
    text: String,
}

/// The convenience `output_text` when the server sends it, otherwise every
/// `output_text` part of every output message, concatenated.
fn extract_output_text(body: ResponsesBody) -> Option<String> {
    if let Some(t) = body.output_text {
        return Some(t);
    }
    let parts: Vec<String> = body
        .output
        .into_iter()
        .flat_map(|item| item.content)
        .filter(|c| c.r#type == "output_text")
        .map(|c| c.text)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

#[async_trait]
impl super::Provider for OpenAIProvider {
    async fn respond(&self, req: &RespondRequest) -> Result<String> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY env var is not set"))?;
        let url = format!("{}/v1/responses", self.base_url);
        tracing::debug!(%url, model = %req.model, input_chars = req.input.len(), "POST");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(req)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("openai read body failed")?;
        tracing::debug!(%status, body = %text, "openai raw response");

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({}): {}", status, text));
        }

        let parsed: ResponsesBody = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}\nRaw: {text}"))?;
        extract_output_text(parsed).ok_or_else(|| anyhow!("openai: response had no output text"))
    }
}
