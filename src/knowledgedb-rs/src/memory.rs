use crate::{Client, Result};
use knowledgedb_core::memory;
use knowledgedb_core::{ForgetOptions, ListOptions, MemoryType, RecallOptions};
use serde_json::Value;

/// Agent memory operations, borrowed from a [`Client`] via
/// [`Client::memory`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryApi<'a> {
    client: &'a Client,
}

impl<'a> MemoryApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Store a memory; `tags` is sent as `[]` when not given
    pub async fn remember(
        &self,
        agent_id: &str,
        mem_type: MemoryType,
        content: &str,
        tags: Option<&[String]>,
    ) -> Result<Value> {
        self.client
            .send(memory::remember(agent_id, mem_type, content, tags)?)
            .await
    }

    pub async fn recall(&self, agent_id: &str, query: &str, options: &RecallOptions) -> Result<Value> {
        self.client
            .send(memory::recall(agent_id, query, options)?)
            .await
    }

    pub async fn forget(&self, agent_id: &str, options: &ForgetOptions) -> Result<Value> {
        self.client.send(memory::forget(agent_id, options)?).await
    }

    pub async fn list(&self, agent_id: &str, options: &ListOptions) -> Result<Value> {
        self.client.send(memory::list(agent_id, options)).await
    }
}
