//! KnowledgeDB Core Library
//!
//! Transport-free building blocks shared by the KnowledgeDB client crates:
//! - Client configuration (endpoint + API key)
//! - Request descriptors and URL helpers
//! - Request builders for every document, graph, memory and vector endpoint
//! - Wire models (option types, memory types, live events)
//!
//! Nothing in here performs I/O beyond reading a config file. Every builder
//! maps typed arguments onto a `(method, path, body)` triple that the HTTP
//! client in `knowledgedb-rs` sends as-is.

pub mod config;
pub mod documents;
pub mod graph;
pub mod memory;
pub mod models;
pub mod request;
pub mod vectors;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use models::*;
pub use request::{Method, RequestDescriptor};
