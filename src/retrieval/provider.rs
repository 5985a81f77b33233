//! Web search provider client.
//!
//! Talks to a SearXNG-style metasearch endpoint:
//! `GET {base}/search?q=<query>&format=json` returning
//! `{ "results": [{ "title", "url", "content" }, ..] }`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::models::SearchDoc;

#[derive(Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    results: Vec<ProviderResult>,
}

#[derive(Deserialize)]
struct ProviderResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

/// Query the search provider. Errors here are the provider's problem
/// (network, bad payload); the retrieval layer decides how to degrade.
pub async fn search(
    client: &reqwest::Client,
    config: &SearchConfig,
    query: &str,
) -> Result<Vec<SearchDoc>> {
    let base_url = config
        .base_url
        .as_deref()
        .context("Search provider base_url not configured")?;

    let url = format!("{}/search", base_url.trim_end_matches('/'));

    let resp = client
        .get(&url)
        .query(&[("q", query), ("format", "json")])
        .timeout(Duration::from_secs(config.timeout_secs))
        .send()
        .await
        .context("Failed to reach search provider")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Search provider returned {status}: {body}");
    }

    let body: ProviderResponse = resp
        .json()
        .await
        .context("Failed to parse search provider response")?;

    Ok(body
        .results
        .into_iter()
        .take(config.num_results)
        .map(|r| SearchDoc {
            title: r.title,
            url: r.url,
            content: r.content,
            score: None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(server: &mockito::Server) -> SearchConfig {
        SearchConfig {
            base_url: Some(server.url()),
            num_results: 5,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_search_parses_results_in_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search.*".into()))
            .with_status(200)
            .with_body(
                r#"{"results":[
                    {"title":"A","url":"https://a","content":"alpha"},
                    {"title":"B","url":"https://b","content":"beta"}
                ]}"#,
            )
            .create_async()
            .await;

        let docs = search(&reqwest::Client::new(), &config_for(&server), "greek letters")
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "A");
        assert_eq!(docs[1].content, "beta");
        assert!(docs[0].score.is_none());
    }

    #[tokio::test]
    async fn test_search_caps_at_num_results() {
        let mut server = mockito::Server::new_async().await;
        let results: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"title":"t{i}","url":"https://u{i}","content":"c{i}"}}"#))
            .collect();
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search.*".into()))
            .with_status(200)
            .with_body(format!(r#"{{"results":[{}]}}"#, results.join(",")))
            .create_async()
            .await;

        let mut config = config_for(&server);
        config.num_results = 3;
        let docs = search(&reqwest::Client::new(), &config, "q").await.unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[tokio::test]
    async fn test_search_errors_on_provider_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search.*".into()))
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = search(&reqwest::Client::new(), &config_for(&server), "q")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_search_errors_when_unconfigured() {
        let config = SearchConfig {
            base_url: None,
            num_results: 5,
            timeout_secs: 5,
        };
        assert!(search(&reqwest::Client::new(), &config, "q").await.is_err());
    }
}
