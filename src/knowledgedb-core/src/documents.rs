//! Request builders for the collection (CRUD), search, ask, analytics and
//! export endpoints.

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{AskOptions, SearchMode, SearchOptions};
use crate::request::{Method, RequestDescriptor};

#[derive(Serialize)]
struct InsertOneRequest<'a, T: Serialize + ?Sized> {
    document: &'a T,
}

#[derive(Serialize)]
struct InsertManyRequest<'a, T: Serialize> {
    documents: &'a [T],
}

#[derive(Serialize)]
struct FindRequest {
    query: Value,
    options: Value,
}

#[derive(Serialize)]
struct UpdateRequest {
    query: Value,
    update: Value,
    multi: bool,
}

#[derive(Serialize)]
struct DeleteRequest {
    query: Value,
    multi: bool,
}

#[derive(Serialize)]
struct CountRequest {
    query: Value,
}

#[derive(Serialize)]
struct RollbackRequest {
    version: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    collections: Option<&'a [String]>,
    graph_depth: u32,
    limit: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AskRequest<'a> {
    question: &'a str,
    context_depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    collections: Option<&'a [String]>,
    limit: u32,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// POST /{collection}/insert
///
/// A JSON array is sent as `{"documents": [...]}`, anything else as
/// `{"document": ...}`. Only the shape of `documents` decides.
pub fn insert(collection: &str, documents: Value) -> RequestDescriptor {
    let body = if documents.is_array() {
        json!({ "documents": documents })
    } else {
        json!({ "document": documents })
    };
    RequestDescriptor::new(Method::Post, format!("/{}/insert", collection)).with_value(body)
}

/// POST /{collection}/insert with `{"document": ...}`
pub fn insert_one<T>(collection: &str, document: &T) -> serde_json::Result<RequestDescriptor>
where
    T: Serialize + ?Sized,
{
    RequestDescriptor::new(Method::Post, format!("/{}/insert", collection))
        .with_json(&InsertOneRequest { document })
}

/// POST /{collection}/insert with `{"documents": [...]}`
pub fn insert_many<T>(collection: &str, documents: &[T]) -> serde_json::Result<RequestDescriptor>
where
    T: Serialize,
{
    RequestDescriptor::new(Method::Post, format!("/{}/insert", collection))
        .with_json(&InsertManyRequest { documents })
}

/// POST /{collection}/find
pub fn find(
    collection: &str,
    query: Option<Value>,
    options: Option<Value>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, format!("/{}/find", collection)).with_json(
        &FindRequest {
            query: query.unwrap_or_else(empty_object),
            options: options.unwrap_or_else(empty_object),
        },
    )
}

/// PUT /{collection}/update
pub fn update(
    collection: &str,
    query: Value,
    update: Value,
    multi: Option<bool>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Put, format!("/{}/update", collection)).with_json(
        &UpdateRequest {
            query,
            update,
            multi: multi.unwrap_or(false),
        },
    )
}

/// DELETE /{collection}/delete
pub fn delete(
    collection: &str,
    query: Value,
    multi: Option<bool>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Delete, format!("/{}/delete", collection)).with_json(
        &DeleteRequest {
            query,
            multi: multi.unwrap_or(false),
        },
    )
}

/// POST /{collection}/count
pub fn count(collection: &str, query: Option<Value>) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, format!("/{}/count", collection)).with_json(
        &CountRequest {
            query: query.unwrap_or_else(empty_object),
        },
    )
}

/// GET /collections
pub fn collections() -> RequestDescriptor {
    RequestDescriptor::get("/collections")
}

/// GET /{collection}/{doc_id}/history
pub fn history(collection: &str, doc_id: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/{}/{}/history", collection, doc_id))
}

/// POST /{collection}/{doc_id}/rollback
pub fn rollback(
    collection: &str,
    doc_id: &str,
    version: u64,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(
        Method::Post,
        format!("/{}/{}/rollback", collection, doc_id),
    )
    .with_json(&RollbackRequest { version })
}

/// POST /search
pub fn search(query: &str, options: &SearchOptions) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/search").with_json(&SearchRequest {
        query,
        mode: options.mode,
        collections: options.collections.as_deref(),
        graph_depth: options.graph_depth,
        limit: options.limit,
    })
}

/// POST /ask
pub fn ask(question: &str, options: &AskOptions) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/ask").with_json(&AskRequest {
        question,
        context_depth: options.depth,
        collections: options.collections.as_deref(),
        limit: options.limit,
    })
}

/// POST /{collection}/analytics with `config` as the whole body
pub fn analytics(collection: &str, config: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, format!("/{}/analytics", collection)).with_value(config)
}

/// GET /{collection}/export?format={format}
pub fn export(collection: &str, format: Option<&str>) -> RequestDescriptor {
    RequestDescriptor::get(format!(
        "/{}/export?format={}",
        collection,
        format.unwrap_or("json")
    ))
}

/// GET /{collection}/live (server-sent events)
pub fn live(collection: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/{}/live", collection))
}
