use crate::{Client, Result};
use knowledgedb_core::vectors;
use knowledgedb_core::HybridWeights;
use serde_json::Value;

/// Vector search, similarity and embedding index operations, borrowed from
/// a [`Client`] via [`Client::vectors`].
#[derive(Debug, Clone, Copy)]
pub struct VectorApi<'a> {
    client: &'a Client,
}

impl<'a> VectorApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Semantic search over embeddings
    pub async fn search(
        &self,
        query: &str,
        collections: Option<&[String]>,
        limit: Option<u32>,
    ) -> Result<Value> {
        self.client
            .send(vectors::search(query, collections, limit)?)
            .await
    }

    /// Keyword + graph + vector search blended with `weights`.
    ///
    /// Pass `None` to use the server's default blend. The API-key route
    /// validates bodies strictly and answers 400 when weights are sent.
    pub async fn hybrid(
        &self,
        query: &str,
        weights: Option<HybridWeights>,
        collections: Option<&[String]>,
        limit: Option<u32>,
    ) -> Result<Value> {
        self.client
            .send(vectors::hybrid(query, weights, collections, limit)?)
            .await
    }

    /// Documents similar to `doc_id`
    pub async fn similar(&self, collection: &str, doc_id: &str, limit: Option<u32>) -> Result<Value> {
        self.client
            .send(vectors::similar(collection, doc_id, limit)?)
            .await
    }

    pub async fn build_index(&self, collection: &str) -> Result<Value> {
        self.client.send(vectors::build_index(collection)).await
    }

    pub async fn index_stats(&self, collection: &str) -> Result<Value> {
        self.client.send(vectors::index_stats(collection)).await
    }

    /// Export embeddings as JSON
    pub async fn export_embeddings(&self, collection: &str) -> Result<Value> {
        self.client
            .send(vectors::export_embeddings(collection, None))
            .await
    }

    /// Export embeddings as CSV text
    pub async fn export_embeddings_csv(&self, collection: &str) -> Result<String> {
        self.client
            .send_text(vectors::export_embeddings(collection, Some("csv")))
            .await
    }

    /// Context passages for a RAG prompt. `context_limit` is only sent
    /// when given; the server default is 10.
    pub async fn retrieve_for_llm(
        &self,
        query: &str,
        collections: Option<&[String]>,
        context_limit: Option<u32>,
    ) -> Result<Value> {
        self.client
            .send(vectors::retrieve_for_llm(query, collections, context_limit)?)
            .await
    }
}
