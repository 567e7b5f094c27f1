//! KnowledgeDB Client Library
//!
//! HTTP client for the KnowledgeDB document, graph and memory API.
//!
//! ```rust,no_run
//! use serde_json::json;
//!
//! # async fn run() -> knowledgedb::Result<()> {
//! let db = knowledgedb::Client::new("http://localhost:5000/db/usr_abc/myapp", "kdb_...");
//!
//! db.insert("users", json!({"name": "Alice", "age": 25})).await?;
//! let adults = db.find("users", Some(json!({"age": {"$gte": 18}})), None).await?;
//! let friends = db.graph().traverse("Alice", None).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod graph;
mod live;
mod memory;
mod vectors;

pub use client::Client;
pub use graph::GraphApi;
pub use live::LiveStream;
pub use memory::MemoryApi;
pub use vectors::VectorApi;

pub use knowledgedb_core::{
    AskOptions, Config, ConfigError, ForgetOptions, HybridWeights, ListOptions, LiveEvent,
    MemoryType, Method, RecallOptions, RequestDescriptor, SearchMode, SearchOptions,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Non-2xx response. Displays as the bare server message
    /// (`"not found"`, `"HTTP 500"`, ...).
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("API key is not a valid header value")]
    InvalidApiKey,
}

impl ClientError {
    /// Human-readable message; for server errors exactly the text the
    /// service reported, or `HTTP <status>`.
    pub fn message(&self) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status for server errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
