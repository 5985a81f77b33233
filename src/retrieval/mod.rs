//! Retrieval Service: web search plus cross-encoder reranking.
//!
//! Search is decoupled from reranking so a cheap provider can be paired
//! with a more expensive precision step, and so provider failures degrade
//! to "answer with general knowledge, no citations" instead of failing the
//! whole chat turn.

pub mod provider;
pub mod rerank;

use crate::config::Config;
use crate::models::SearchDoc;

/// Outcome of the search + rerank step.
///
/// `degraded` distinguishes "the provider errored" from a genuine empty
/// result set; callers observe the same empty-docs contract either way.
#[derive(Debug, Clone)]
pub struct Retrieved {
    pub docs: Vec<SearchDoc>,
    pub degraded: bool,
}

/// Run the full retrieval step for a query. Never fails: provider errors
/// are logged and reported as an empty, degraded result.
pub async fn retrieve(client: &reqwest::Client, config: &Config, query: &str) -> Retrieved {
    if config.search.base_url.is_none() {
        tracing::debug!("Search provider not configured, skipping retrieval");
        return Retrieved {
            docs: Vec::new(),
            degraded: false,
        };
    }

    let results = match provider::search(client, &config.search, query).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!("Search failed, continuing without citations: {e}");
            return Retrieved {
                docs: Vec::new(),
                degraded: true,
            };
        }
    };

    let docs = rerank::rerank(
        client,
        &config.reranker,
        query,
        results,
        config.reranker.top_k,
    )
    .await;

    Retrieved {
        docs,
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_retrieve_without_provider_is_empty_not_degraded() {
        let config = Config::default();
        let out = retrieve(&reqwest::Client::new(), &config, "anything").await;
        assert!(out.docs.is_empty());
        assert!(!out.degraded);
    }

    #[tokio::test]
    async fn test_retrieve_marks_provider_failure_as_degraded() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search.*".into()))
            .with_status(503)
            .create_async()
            .await;

        let mut config = Config::default();
        config.search.base_url = Some(server.url());
        let out = retrieve(&reqwest::Client::new(), &config, "anything").await;
        assert!(out.docs.is_empty());
        assert!(out.degraded);
    }

    #[tokio::test]
    async fn test_retrieve_truncates_to_top_k_without_reranker() {
        let mut server = mockito::Server::new_async().await;
        let results: Vec<String> = (0..5)
            .map(|i| format!(r#"{{"title":"t{i}","url":"https://u{i}","content":"c{i}"}}"#))
            .collect();
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search.*".into()))
            .with_status(200)
            .with_body(format!(r#"{{"results":[{}]}}"#, results.join(",")))
            .create_async()
            .await;

        let mut config = Config::default();
        config.search.base_url = Some(server.url());
        let out = retrieve(&reqwest::Client::new(), &config, "anything").await;
        assert_eq!(out.docs.len(), config.reranker.top_k);
        assert_eq!(out.docs[0].title, "t0");
        assert!(!out.degraded);
    }
}
