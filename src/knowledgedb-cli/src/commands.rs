use anyhow::{Context, Result};
use futures::StreamExt;
use knowledgedb::{
    AskOptions, Client, ForgetOptions, HybridWeights, ListOptions, RecallOptions, SearchOptions,
};
use knowledgedb_core::config::{API_KEY_ENV, ENDPOINT_ENV};
use knowledgedb_core::Config;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

use crate::cli::{Command, ConnectionArgs, GraphCommand, MemoryCommand, VectorCommand};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "knowledgedb.json";

/// Result of one command
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Text(String),
}

impl Output {
    pub fn render(&self, compact: bool) -> Result<String> {
        match self {
            Output::Json(value) if compact => Ok(serde_json::to_string(value)?),
            Output::Json(value) => Ok(serde_json::to_string_pretty(value)?),
            Output::Text(text) => Ok(text.clone()),
        }
    }
}

/// Resolve connection settings: flags/environment over the config file.
///
/// An explicit `--config` must load; the default `knowledgedb.json` is
/// optional.
pub fn resolve_config(args: &ConnectionArgs) -> Result<Config> {
    let base = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Config::load(DEFAULT_CONFIG_FILE).unwrap_or_else(|err| {
                tracing::warn!("Failed to load {}, ignoring it: {}", DEFAULT_CONFIG_FILE, err);
                Config::default()
            })
        }
        None => Config::default(),
    };

    // clap already folded the environment variables into the flags
    let config = base.overlay(|key| match key {
        ENDPOINT_ENV => args.endpoint.clone(),
        API_KEY_ENV => args.api_key.clone(),
        _ => None,
    });

    config
        .validate()
        .context("Set --endpoint/--api-key, KNOWLEDGEDB_ENDPOINT/KNOWLEDGEDB_API_KEY, or a config file")?;

    tracing::debug!(endpoint = config.endpoint(), "Resolved configuration");
    Ok(config)
}

/// Execute one command against the API.
///
/// `watch` writes events to `out` as they arrive and returns `None` when the
/// stream ends; every other command returns its result.
pub async fn run<W: Write>(client: &Client, command: Command, out: &mut W) -> Result<Option<Output>> {
    let value = match command {
        Command::Insert {
            collection,
            documents,
        } => client.insert(&collection, documents).await?,
        Command::Find {
            collection,
            query,
            options,
        } => client.find(&collection, query, options).await?,
        Command::Update {
            collection,
            query,
            update,
            multi,
        } => client.update(&collection, query, update, Some(multi)).await?,
        Command::Delete {
            collection,
            query,
            multi,
        } => client.delete(&collection, query, Some(multi)).await?,
        Command::Count { collection, query } => client.count(&collection, query).await?,
        Command::Collections => client.collections().await?,
        Command::History { collection, doc_id } => client.history(&collection, &doc_id).await?,
        Command::Rollback {
            collection,
            doc_id,
            version,
        } => client.rollback(&collection, &doc_id, version).await?,
        Command::Search {
            query,
            mode,
            collections,
            graph_depth,
            limit,
        } => {
            let options = SearchOptions {
                mode,
                collections,
                graph_depth,
                limit,
            };
            client.search(&query, &options).await?
        }
        Command::Ask {
            question,
            depth,
            collections,
            limit,
        } => {
            let options = AskOptions {
                depth,
                collections,
                limit,
            };
            client.ask(&question, &options).await?
        }
        Command::Analytics {
            collection,
            aggregation,
        } => client.analytics(&collection, aggregation).await?,
        Command::Export { collection, format } => {
            if format == "csv" {
                return Ok(Some(Output::Text(client.export_csv(&collection).await?)));
            }
            client.export_collection(&collection, Some(format.as_str())).await?
        }
        Command::Watch { collection } => {
            watch(client, &collection, out).await?;
            return Ok(None);
        }
        Command::Graph(command) => run_graph(client, command).await?,
        Command::Memory(command) => run_memory(client, command).await?,
        Command::Vector(command) => return Ok(Some(run_vector(client, command).await?)),
    };

    Ok(Some(Output::Json(value)))
}

async fn run_graph(client: &Client, command: GraphCommand) -> knowledgedb::Result<Value> {
    let graph = client.graph();
    match command {
        GraphCommand::Nodes => graph.nodes().await,
        GraphCommand::Edges => graph.edges().await,
        GraphCommand::Stats => graph.stats().await,
        GraphCommand::Node { entity_id } => graph.node(&entity_id).await,
        GraphCommand::Search { query } => graph.search(&query).await,
        GraphCommand::Traverse { start_node, depth } => graph.traverse(&start_node, depth).await,
        GraphCommand::Path { from, to } => graph.path(&from, &to).await,
        GraphCommand::Link { from, to, relation } => graph.link(&from, &to, &relation).await,
        GraphCommand::Unlink { edge_id } => graph.delete_link(&edge_id).await,
    }
}

async fn run_memory(client: &Client, command: MemoryCommand) -> knowledgedb::Result<Value> {
    let memory = client.memory();
    match command {
        MemoryCommand::Remember {
            agent_id,
            mem_type,
            content,
            tags,
        } => {
            memory
                .remember(&agent_id, mem_type, &content, tags.as_deref())
                .await
        }
        MemoryCommand::Recall {
            agent_id,
            query,
            limit,
            mem_type,
        } => {
            let options = RecallOptions { limit, mem_type };
            memory.recall(&agent_id, &query, &options).await
        }
        MemoryCommand::Forget {
            agent_id,
            older_than,
            mem_type,
        } => {
            let options = ForgetOptions {
                older_than,
                mem_type,
            };
            memory.forget(&agent_id, &options).await
        }
        MemoryCommand::List {
            agent_id,
            mem_type,
            limit,
            skip,
        } => {
            let options = ListOptions {
                mem_type,
                limit,
                skip,
            };
            memory.list(&agent_id, &options).await
        }
    }
}

async fn run_vector(client: &Client, command: VectorCommand) -> knowledgedb::Result<Output> {
    let vectors = client.vectors();
    let value = match command {
        VectorCommand::Search {
            query,
            collections,
            limit,
        } => vectors.search(&query, collections.as_deref(), limit).await?,
        VectorCommand::Hybrid {
            query,
            collections,
            limit,
            weight_vector,
            weight_keyword,
            weight_graph,
        } => {
            // Any explicit weight sends all three; unset ones keep the default
            let weights = (weight_vector.is_some()
                || weight_keyword.is_some()
                || weight_graph.is_some())
            .then(|| {
                let defaults = HybridWeights::default();
                HybridWeights {
                    vector: weight_vector.unwrap_or(defaults.vector),
                    keyword: weight_keyword.unwrap_or(defaults.keyword),
                    graph: weight_graph.unwrap_or(defaults.graph),
                }
            });
            vectors
                .hybrid(&query, weights, collections.as_deref(), limit)
                .await?
        }
        VectorCommand::Similar {
            collection,
            doc_id,
            limit,
        } => vectors.similar(&collection, &doc_id, limit).await?,
        VectorCommand::BuildIndex { collection } => vectors.build_index(&collection).await?,
        VectorCommand::IndexStats { collection } => vectors.index_stats(&collection).await?,
        VectorCommand::Retrieve {
            query,
            collections,
            context_limit,
        } => {
            vectors
                .retrieve_for_llm(&query, collections.as_deref(), context_limit)
                .await?
        }
        VectorCommand::Export { collection, format } => {
            if format == "csv" {
                return Ok(Output::Text(vectors.export_embeddings_csv(&collection).await?));
            }
            vectors.export_embeddings(&collection).await?
        }
    };

    Ok(Output::Json(value))
}

async fn watch<W: Write>(client: &Client, collection: &str, out: &mut W) -> Result<()> {
    let mut events = client.subscribe(collection).await?;

    while let Some(event) = events.next().await {
        let event = event?;
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
        out.flush()?;
    }

    tracing::info!(collection, "Live stream closed by server");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["kdb"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_resolve_config_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"endpoint": "http://file/db/u/app/", "api_key": "kdb_file"}}"#
        )
        .unwrap();

        let args = ConnectionArgs {
            endpoint: Some("http://flag/db/u/app".to_string()),
            api_key: None,
            config: Some(file.path().to_path_buf()),
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.endpoint(), "http://flag/db/u/app");
        assert_eq!(config.api_key(), "kdb_file");
    }

    #[test]
    fn test_resolve_config_requires_api_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"endpoint": "http://file/db/u/app"}}"#).unwrap();

        let args = ConnectionArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_resolve_config_explicit_file_must_exist() {
        let args = ConnectionArgs {
            config: Some("/no/such/knowledgedb.json".into()),
            ..Default::default()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_render_output() {
        let output = Output::Json(json!({"a": 1}));
        assert_eq!(output.render(true).unwrap(), r#"{"a":1}"#);
        assert_eq!(output.render(false).unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(Output::Text("x,y".into()).render(false).unwrap(), "x,y");
    }

    #[tokio::test]
    async fn test_run_dispatches_commands() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/db/u/app/users/update"))
            .and(body_json(json!({"query": {"name": "Alice"}, "update": {"age": 26}, "multi": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"modifiedCount": 2})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/db/u/app/memory/remember"))
            .and(body_json(json!({
                "agentId": "agent_1",
                "type": "semantic",
                "content": "likes tea",
                "tags": ["a", "b"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new(format!("{}/db/u/app", server.uri()), "kdb_test");
        let mut sink = Vec::new();

        let cli = parse(&["update", "users", r#"{"name":"Alice"}"#, r#"{"age":26}"#, "--multi"]);
        let output = run(&client, cli.command, &mut sink).await.unwrap();
        assert_eq!(output, Some(Output::Json(json!({"modifiedCount": 2}))));

        let cli = parse(&[
            "memory", "remember", "agent_1", "semantic", "likes tea", "--tags", "a,b",
        ]);
        let output = run(&client, cli.command, &mut sink).await.unwrap();
        assert_eq!(output, Some(Output::Json(json!({"id": "m1"}))));
    }

    #[tokio::test]
    async fn test_run_watch_writes_event_lines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/db/u/app/users/live"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "data: {\"type\":\"connected\"}\n\ndata: {\"type\":\"document.deleted\",\"document\":{\"_id\":\"1\"}}\n\n",
            ))
            .mount(&server)
            .await;

        let client = Client::new(format!("{}/db/u/app", server.uri()), "kdb_test");
        let mut sink = Vec::new();

        let output = run(&client, parse(&["watch", "users"]).command, &mut sink)
            .await
            .unwrap();
        assert!(output.is_none());

        let text = String::from_utf8(sink).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "connected");
        assert_eq!(lines[1]["document"]["_id"], "1");
    }

    #[tokio::test]
    async fn test_run_vector_commands() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/db/u/app/hybrid/enhanced"))
            .and(body_json(json!({"query": "tea", "limit": 10})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/db/u/app/hybrid/enhanced"))
            .and(body_json(json!({
                "query": "tea",
                "weightVector": 0.6,
                "weightKeyword": 0.3,
                "weightGraph": 0.3,
                "limit": 10
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [1]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/db/u/app/papers/embeddings/export"))
            .and(query_param("format", "csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("docId\nd1\n"))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new(format!("{}/db/u/app", server.uri()), "kdb_test");
        let mut sink = Vec::new();

        let output = run(&client, parse(&["vector", "hybrid", "tea"]).command, &mut sink)
            .await
            .unwrap();
        assert_eq!(output, Some(Output::Json(json!({"results": []}))));

        let cli = parse(&["vector", "hybrid", "tea", "--weight-vector", "0.6"]);
        let output = run(&client, cli.command, &mut sink).await.unwrap();
        assert_eq!(output, Some(Output::Json(json!({"results": [1]}))));

        let cli = parse(&["vector", "export", "papers", "--format", "csv"]);
        let output = run(&client, cli.command, &mut sink).await.unwrap();
        assert_eq!(output, Some(Output::Text("docId\nd1\n".to_string())));
    }

    #[tokio::test]
    async fn test_run_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/db/u/app/graph/node/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Node not found"})))
            .mount(&server)
            .await;

        let client = Client::new(format!("{}/db/u/app", server.uri()), "kdb_test");
        let err = run(&client, parse(&["graph", "node", "ghost"]).command, &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Node not found");
    }
}
