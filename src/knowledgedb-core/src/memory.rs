//! Request builders for agent memory endpoints.
//!
//! Optional fields are left out of the body (or query string) entirely when
//! not supplied; `null` is never sent.

use serde::Serialize;

use crate::models::{ForgetOptions, ListOptions, MemoryType, RecallOptions};
use crate::request::{Method, RequestDescriptor};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RememberRequest<'a> {
    agent_id: &'a str,
    #[serde(rename = "type")]
    mem_type: MemoryType,
    content: &'a str,
    tags: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecallRequest<'a> {
    agent_id: &'a str,
    query: &'a str,
    limit: u32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    mem_type: Option<MemoryType>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ForgetRequest<'a> {
    agent_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    older_than: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    mem_type: Option<MemoryType>,
}

/// POST /memory/remember; `tags` defaults to `[]`
pub fn remember(
    agent_id: &str,
    mem_type: MemoryType,
    content: &str,
    tags: Option<&[String]>,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/memory/remember").with_json(&RememberRequest {
        agent_id,
        mem_type,
        content,
        tags: tags.unwrap_or(&[]),
    })
}

/// POST /memory/recall
pub fn recall(
    agent_id: &str,
    query: &str,
    options: &RecallOptions,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/memory/recall").with_json(&RecallRequest {
        agent_id,
        query,
        limit: options.limit,
        mem_type: options.mem_type,
    })
}

/// DELETE /memory/forget; an empty `older_than` counts as absent
pub fn forget(agent_id: &str, options: &ForgetOptions) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Delete, "/memory/forget").with_json(&ForgetRequest {
        agent_id,
        older_than: options.older_than.as_deref().filter(|v| !v.is_empty()),
        mem_type: options.mem_type,
    })
}

/// GET /memory/list?agentId=..&limit=..&skip=..[&type=..]
///
/// Parameter order is fixed so identical calls produce identical URLs.
/// Values are inserted as given.
pub fn list(agent_id: &str, options: &ListOptions) -> RequestDescriptor {
    let mut params = format!(
        "agentId={}&limit={}&skip={}",
        agent_id, options.limit, options.skip
    );
    if let Some(mem_type) = options.mem_type {
        params.push_str("&type=");
        params.push_str(mem_type.as_str());
    }
    RequestDescriptor::get(format!("/memory/list?{}", params))
}
