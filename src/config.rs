use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// sqlx database URL (SQLite)
    pub database_url: String,
    /// LLM backend configuration
    pub llm: LlmConfig,
    /// Web search provider configuration
    pub search: SearchConfig,
    /// Cross-encoder reranker configuration
    pub reranker: RerankerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the model backend (Ollama-compatible)
    pub base_url: String,
    /// Model name for chat completions
    pub chat_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Configuration for the web search provider (a SearXNG-style JSON API).
/// If `base_url` is None, search is disabled and chat turns proceed
/// without citations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub base_url: Option<String>,
    /// How many results to request from the provider
    pub num_results: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Configuration for the cross-encoder reranker sidecar (e.g. llama-server
/// with a reranker model). If `base_url` is None, reranking falls back to
/// identity truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankerConfig {
    /// Base URL for the reranker API (e.g. "http://127.0.0.1:8082")
    pub base_url: Option<String>,
    /// Model name to send in the rerank request
    pub model: Option<String>,
    /// Request timeout in seconds (capped at 30)
    pub timeout_secs: u64,
    /// How many documents survive reranking
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://data/lumina.db".to_string(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            reranker: RerankerConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            chat_model: "qwen3:14b".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            num_results: 5,
            timeout_secs: 15,
        }
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            timeout_secs: 10,
            top_k: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("LUMINA_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.llm.timeout_secs = v;
            }
        }
        if let Ok(url) = std::env::var("SEARCH_BASE_URL") {
            config.search.base_url = Some(url);
        }
        if let Ok(val) = std::env::var("SEARCH_NUM_RESULTS") {
            if let Ok(v) = val.parse() {
                config.search.num_results = v;
            }
        }
        if let Ok(val) = std::env::var("SEARCH_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.search.timeout_secs = v;
            }
        }
        if let Ok(url) = std::env::var("RERANKER_BASE_URL") {
            config.reranker.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("RERANKER_MODEL") {
            config.reranker.model = Some(model);
        }
        if let Ok(val) = std::env::var("RERANKER_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.reranker.timeout_secs = v.min(30); // Cap at 30s
            }
        }
        if let Ok(val) = std::env::var("RERANKER_TOP_K") {
            if let Ok(v) = val.parse() {
                config.reranker.top_k = v;
            }
        }

        config
    }
}
