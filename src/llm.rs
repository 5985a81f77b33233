//! LLM Client: one configured model handle on an Ollama-compatible backend.
//!
//! Invocation is synchronous from the caller's point of view: the call
//! returns once the full response text is available. No retry, no
//! streaming, no per-call parameter tuning.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::models::ChatTurn;

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatTurn>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

/// Run one blocking chat completion and return the full response text.
pub async fn complete(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: Vec<ChatTurn>,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: config.chat_model.clone(),
        messages,
        stream: false,
    };

    let resp = client
        .post(&url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .json(&req)
        .send()
        .await
        .context("Failed to reach model backend")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Model backend returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("Failed to parse model backend response")?;
    Ok(body.message.content)
}

/// Strip ChatML control tokens from text headed into the prompt, so user
/// input and retrieved snippets cannot smuggle role markers.
pub fn sanitize_for_prompt(text: &str) -> String {
    text.replace("<|im_start|>", "").replace("<|im_end|>", "")
}
