use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;
use crate::wire::RespondRequest;

pub struct Ollama {
    client: Client,
    url: String,
}

impl Ollama {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
        Ok(Self { client, url: url.trim_end_matches('/').to_string() })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

fn to_messages(req: &RespondRequest) -> Vec<Msg<'_>> {
    let mut msgs = Vec::with_capacity(2);
    if !req.instructions.is_empty() {
        msgs.push(Msg { role: "system", content: &req.instructions });
    }
    msgs.push(Msg { role: "user", content: &req.input });
    msgs
}

#[async_trait]
impl Provider for Ollama {
    async fn respond(&self, req: &RespondRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.url);
        let body = ChatRequest {
            model: &req.model,
            messages: to_messages(req),
            stream: req.stream,
        };
        tracing::debug!(%url, model = %req.model, "POST");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;
        tracing::debug!(%status, body = %text, "ollama raw response");

        if !status.is_success() {
            return Err(anyhow!("Ollama API error ({}): {}", status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("ollama response parse error: {e}\nRaw: {text}"))?;
        Ok(parsed.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_only_when_instructed() {
        let mut req = RespondRequest {
            model: "llama3".into(),
            input: "hi".into(),
            instructions: String::new(),
            tools: vec![],
            stream: false,
        };
        assert_eq!(to_messages(&req).len(), 1);
        req.instructions = "be terse".into();
        let msgs = to_messages(&req);
        assert_eq!(msgs[0].role, "system");
        assert_eq!(msgs[1].content, "hi");
    }
}
