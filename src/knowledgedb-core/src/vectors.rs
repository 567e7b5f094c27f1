//! Request builders for vector search, enhanced hybrid search, similarity
//! and index management endpoints.
//!
//! The API-key routes for `/hybrid/enhanced` and `/retrieve-for-llm` share
//! the service's strict search validator, which only knows `query`, `mode`,
//! `collections`, `graphDepth` and `limit`. Weights and `contextLimit` are
//! therefore left out unless the caller asks for them, and the server
//! applies the same defaults (0.4/0.3/0.3 and 10).

use serde::Serialize;

use crate::models::HybridWeights;
use crate::request::{Method, RequestDescriptor};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_SIMILAR_LIMIT: u32 = 5;

#[derive(Serialize)]
struct VectorSearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    collections: Option<&'a [String]>,
    limit: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HybridSearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    collections: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_vector: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_keyword: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_graph: Option<f64>,
    limit: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimilarRequest<'a> {
    doc_id: &'a str,
    limit: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collections: Option<&'a [String]>,
}

/// POST /vector/search
pub fn search(
    query: &str,
    collections: Option<&[String]>,
    limit: Option<u32>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/vector/search").with_json(&VectorSearchRequest {
        query,
        collections,
        limit: limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    })
}

/// POST /hybrid/enhanced
///
/// `weights` are only sent when given; `None` means the server defaults.
pub fn hybrid(
    query: &str,
    weights: Option<HybridWeights>,
    collections: Option<&[String]>,
    limit: Option<u32>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/hybrid/enhanced").with_json(&HybridSearchRequest {
        query,
        collections,
        weight_vector: weights.map(|w| w.vector),
        weight_keyword: weights.map(|w| w.keyword),
        weight_graph: weights.map(|w| w.graph),
        limit: limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    })
}

/// POST /{collection}/similar
pub fn similar(
    collection: &str,
    doc_id: &str,
    limit: Option<u32>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, format!("/{}/similar", collection)).with_json(
        &SimilarRequest {
            doc_id,
            limit: limit.unwrap_or(DEFAULT_SIMILAR_LIMIT),
        },
    )
}

/// POST /{collection}/index/build (no body)
pub fn build_index(collection: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, format!("/{}/index/build", collection))
}

/// GET /{collection}/index/stats
pub fn index_stats(collection: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/{}/index/stats", collection))
}

/// GET /{collection}/embeddings/export?format={format}
pub fn export_embeddings(collection: &str, format: Option<&str>) -> RequestDescriptor {
    RequestDescriptor::get(format!(
        "/{}/embeddings/export?format={}",
        collection,
        format.unwrap_or("json")
    ))
}

/// POST /retrieve-for-llm
pub fn retrieve_for_llm(
    query: &str,
    collections: Option<&[String]>,
    context_limit: Option<u32>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/retrieve-for-llm").with_json(&RetrieveRequest {
        query,
        context_limit,
        collections,
    })
}
