//! Request builders for the knowledge-graph endpoints.
//!
//! Entity, label and edge identifiers are inserted into paths verbatim;
//! only the free-text graph search query is percent-encoded.

use serde::Serialize;

use crate::request::{encode_query_text, Method, RequestDescriptor};

/// Default traversal depth
pub const DEFAULT_TRAVERSE_DEPTH: u32 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TraverseRequest<'a> {
    start_node: &'a str,
    depth: u32,
}

#[derive(Serialize)]
struct PathRequest<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkRequest<'a> {
    from_label: &'a str,
    to_label: &'a str,
    relation: &'a str,
}

pub fn nodes() -> RequestDescriptor {
    RequestDescriptor::get("/graph/nodes")
}

pub fn edges() -> RequestDescriptor {
    RequestDescriptor::get("/graph/edges")
}

pub fn stats() -> RequestDescriptor {
    RequestDescriptor::get("/graph/stats")
}

pub fn node(entity_id: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/graph/node/{}", entity_id))
}

/// GET /graph/search?q={query}
pub fn search(query: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/graph/search?q={}", encode_query_text(query)))
}

pub fn traverse(start_node: &str, depth: Option<u32>) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/graph/traverse").with_json(&TraverseRequest {
        start_node,
        depth: depth.unwrap_or(DEFAULT_TRAVERSE_DEPTH),
    })
}

pub fn path(from_label: &str, to_label: &str) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/graph/path").with_json(&PathRequest {
        from: from_label,
        to: to_label,
    })
}

pub fn link(
    from_label: &str,
    to_label: &str,
    relation: &str,
) -> serde_json::Result<RequestDescriptor> {
    RequestDescriptor::new(Method::Post, "/graph/link").with_json(&LinkRequest {
        from_label,
        to_label,
        relation,
    })
}

pub fn delete_link(edge_id: &str) -> RequestDescriptor {
    RequestDescriptor::delete(format!("/graph/link/{}", edge_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_paths() {
        assert_eq!(nodes().path, "/graph/nodes");
        assert_eq!(edges().path, "/graph/edges");
        assert_eq!(stats().path, "/graph/stats");
        assert_eq!(node("ent_42").path, "/graph/node/ent_42");
        assert!(nodes().body.is_none());
        assert_eq!(node("ent_42").method, Method::Get);
    }

    #[test]
    fn test_search_query_is_encoded() {
        assert_eq!(search("alice").path, "/graph/search?q=alice");
        assert_eq!(
            search("machine learning & AI").path,
            "/graph/search?q=machine%20learning%20%26%20AI"
        );
        assert_eq!(search("a=b?c#d").path, "/graph/search?q=a%3Db%3Fc%23d");
    }

    #[test]
    fn test_traverse_body() {
        let req = traverse("Alice", None).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/graph/traverse");
        assert_eq!(req.body, Some(json!({"startNode": "Alice", "depth": 2})));

        let req = traverse("Alice", Some(4)).unwrap();
        assert_eq!(req.body, Some(json!({"startNode": "Alice", "depth": 4})));
    }

    #[test]
    fn test_path_and_link_bodies() {
        let req = path("Alice", "Bob").unwrap();
        assert_eq!(req.path, "/graph/path");
        assert_eq!(req.body, Some(json!({"from": "Alice", "to": "Bob"})));

        let req = link("Alice", "Bob", "knows").unwrap();
        assert_eq!(req.path, "/graph/link");
        assert_eq!(
            req.body,
            Some(json!({"fromLabel": "Alice", "toLabel": "Bob", "relation": "knows"}))
        );
    }

    #[test]
    fn test_delete_link_path_is_verbatim() {
        let req = delete_link("edge_7");
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "/graph/link/edge_7");
        assert!(req.body.is_none());
    }
}
