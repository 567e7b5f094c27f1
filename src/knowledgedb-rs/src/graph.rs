use crate::{Client, Result};
use knowledgedb_core::graph;
use serde_json::Value;

/// Knowledge-graph operations, borrowed from a [`Client`] via
/// [`Client::graph`].
#[derive(Debug, Clone, Copy)]
pub struct GraphApi<'a> {
    client: &'a Client,
}

impl<'a> GraphApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn nodes(&self) -> Result<Value> {
        self.client.send(graph::nodes()).await
    }

    pub async fn edges(&self) -> Result<Value> {
        self.client.send(graph::edges()).await
    }

    pub async fn stats(&self) -> Result<Value> {
        self.client.send(graph::stats()).await
    }

    pub async fn node(&self, entity_id: &str) -> Result<Value> {
        self.client.send(graph::node(entity_id)).await
    }

    /// Search entities by text; the query is percent-encoded
    pub async fn search(&self, query: &str) -> Result<Value> {
        self.client.send(graph::search(query)).await
    }

    /// Walk outward from `start_node`; `depth` defaults to 2
    pub async fn traverse(&self, start_node: &str, depth: Option<u32>) -> Result<Value> {
        self.client.send(graph::traverse(start_node, depth)?).await
    }

    /// Shortest path between two labels
    pub async fn path(&self, from_label: &str, to_label: &str) -> Result<Value> {
        self.client.send(graph::path(from_label, to_label)?).await
    }

    pub async fn link(&self, from_label: &str, to_label: &str, relation: &str) -> Result<Value> {
        self.client
            .send(graph::link(from_label, to_label, relation)?)
            .await
    }

    pub async fn delete_link(&self, edge_id: &str) -> Result<Value> {
        self.client.send(graph::delete_link(edge_id)).await
    }
}
