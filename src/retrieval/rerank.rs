//! Cross-encoder reranker via an OpenAI-compatible `/v1/rerank` endpoint.
//!
//! One batch request scores every (query, document) pair; scores come back
//! as raw logits and are sigmoid-normalized to 0-1.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::RerankerConfig;
use crate::models::SearchDoc;

#[derive(Serialize)]
struct RerankRequest {
    model: String,
    query: String,
    documents: Vec<String>,
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResultRaw>,
}

#[derive(Deserialize)]
struct RerankResultRaw {
    index: usize,
    relevance_score: f32,
}

/// Rerank documents against a query and keep the best `top_k`.
///
/// When no reranker is configured, the call fails, or the input is empty,
/// this degrades to identity truncation: the first `top_k` documents in
/// their original order, with no scores attached.
pub async fn rerank(
    client: &reqwest::Client,
    config: &RerankerConfig,
    query: &str,
    docs: Vec<SearchDoc>,
    top_k: usize,
) -> Vec<SearchDoc> {
    if config.base_url.is_none() || docs.is_empty() {
        return truncate(docs, top_k);
    }

    match score_documents(client, config, query, &docs).await {
        Ok(scored) => apply_scores(docs, scored, top_k),
        Err(e) => {
            tracing::warn!("Re-ranking failed, keeping search order: {e}");
            truncate(docs, top_k)
        }
    }
}

fn truncate(mut docs: Vec<SearchDoc>, top_k: usize) -> Vec<SearchDoc> {
    docs.truncate(top_k);
    docs
}

/// Reorder documents by descending score and keep `top_k`. Documents the
/// reranker did not score are dropped from contention.
fn apply_scores(docs: Vec<SearchDoc>, scored: Vec<(usize, f32)>, top_k: usize) -> Vec<SearchDoc> {
    let mut docs: Vec<Option<SearchDoc>> = docs.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(top_k.min(scored.len()));

    for (index, score) in scored {
        if out.len() == top_k {
            break;
        }
        if let Some(slot) = docs.get_mut(index) {
            if let Some(mut doc) = slot.take() {
                doc.score = Some(score);
                out.push(doc);
            }
        }
    }

    out
}

/// Call the reranker endpoint. Returns (index, normalized score) pairs
/// sorted by score descending.
async fn score_documents(
    client: &reqwest::Client,
    config: &RerankerConfig,
    query: &str,
    docs: &[SearchDoc],
) -> Result<Vec<(usize, f32)>> {
    let base_url = config
        .base_url
        .as_deref()
        .context("Reranker base_url not configured")?;
    let model = config.model.as_deref().unwrap_or("default");

    let url = format!("{}/v1/rerank", base_url.trim_end_matches('/'));

    let req_body = RerankRequest {
        model: model.to_string(),
        query: query.to_string(),
        documents: docs.iter().map(|d| d.content.clone()).collect(),
        top_n: docs.len(),
    };

    let timeout = Duration::from_secs(config.timeout_secs.min(30));

    let resp = client
        .post(&url)
        .timeout(timeout)
        .json(&req_body)
        .send()
        .await
        .context("Failed to reach reranker endpoint")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Reranker returned {status}: {body}");
    }

    let body: RerankResponse = resp
        .json()
        .await
        .context("Failed to parse reranker response")?;

    let mut results: Vec<(usize, f32)> = body
        .results
        .into_iter()
        .map(|r| (r.index, sigmoid(r.relevance_score)))
        .collect();

    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(results)
}

/// Sigmoid normalization: maps raw logits to 0-1 range.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
