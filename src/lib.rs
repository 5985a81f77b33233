//! # lumina-search
//!
//! A retrieval-augmented chat backend: accept a user question, run a web
//! search, rerank the results with a cross-encoder, feed the top passages
//! plus conversation history to a language model, and persist the exchange.
//!
//! ## Request flow
//!
//! ```text
//!   POST /api/chat
//!        │
//!        ▼
//!   ┌───────────────┐     ┌──────────────────┐
//!   │ Search provider│ ──▶ │ Cross-encoder    │
//!   │ (top 5 docs)   │     │ rerank (top 3)   │
//!   └───────────────┘     └────────┬─────────┘
//!                                  │ context block
//!                                  ▼
//!   ┌─────────────────────────────────────────┐
//!   │ Prompt: system(context) + history + input│──▶ model backend
//!   └────────────────────┬────────────────────┘
//!                        │ response
//!                        ▼
//!   ┌─────────────────────────────────────────┐
//!   │ Persist user + assistant messages,       │
//!   │ attach sources to the assistant message  │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! Search failures degrade to an empty result set so the turn still
//! answers from general knowledge, just without citations.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, database, and service endpoints
//! - [`models`] - Shared data types: `Role`, `SearchDoc`, request/response types
//! - [`store`] - Conversation Store over sqlx/SQLite with cascading deletes
//! - [`history`] - Per-session history adapter consumed by the chat pipeline
//! - [`retrieval`] - Web search provider + cross-encoder reranker
//! - [`llm`] - Blocking chat completion against an Ollama-compatible backend
//! - [`api`] - Axum HTTP handlers for chat, search, history, and conversations
//! - [`state`] - Shared application state: config, pool, HTTP client

pub mod api;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod retrieval;
pub mod state;
pub mod store;
