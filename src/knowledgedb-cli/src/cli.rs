use clap::{Args, Parser, Subcommand};
use knowledgedb_core::{MemoryType, SearchMode};
use serde_json::Value;
use std::path::PathBuf;

/// Command-line client for a KnowledgeDB database
#[derive(Debug, Parser)]
#[command(name = "kdb", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Also write JSON logs to rotating files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Database endpoint, e.g. http://localhost:5000/db/usr_abc/myapp
    #[arg(long, env = "KNOWLEDGEDB_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// API key sent as x-api-key
    #[arg(long, env = "KNOWLEDGEDB_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// JSON config file with `endpoint` and `api_key`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Insert a document, or every element of a JSON array
    Insert {
        collection: String,
        #[arg(value_parser = parse_json)]
        documents: Value,
    },
    /// Find documents matching a query
    Find {
        collection: String,
        #[arg(long, value_parser = parse_json)]
        query: Option<Value>,
        #[arg(long, value_parser = parse_json)]
        options: Option<Value>,
    },
    /// Update documents matching a query
    Update {
        collection: String,
        #[arg(value_parser = parse_json)]
        query: Value,
        #[arg(value_parser = parse_json)]
        update: Value,
        /// Apply to every match instead of the first
        #[arg(long)]
        multi: bool,
    },
    /// Delete documents matching a query
    Delete {
        collection: String,
        #[arg(value_parser = parse_json)]
        query: Value,
        #[arg(long)]
        multi: bool,
    },
    /// Count documents matching a query
    Count {
        collection: String,
        #[arg(long, value_parser = parse_json)]
        query: Option<Value>,
    },
    /// List collections
    Collections,
    /// Show the version history of a document
    History { collection: String, doc_id: String },
    /// Restore a document to an earlier version
    Rollback {
        collection: String,
        doc_id: String,
        version: u64,
    },
    /// Keyword / graph / hybrid search
    Search {
        query: String,
        #[arg(long, default_value = "hybrid", value_parser = parse_search_mode)]
        mode: SearchMode,
        #[arg(long, value_delimiter = ',')]
        collections: Option<Vec<String>>,
        #[arg(long, default_value_t = 2)]
        graph_depth: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Ask a question answered from graph context
    Ask {
        question: String,
        #[arg(long, default_value_t = 3)]
        depth: u32,
        #[arg(long, value_delimiter = ',')]
        collections: Option<Vec<String>>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Run an aggregation described by a JSON config
    Analytics {
        collection: String,
        #[arg(value_name = "CONFIG", value_parser = parse_json)]
        aggregation: Value,
    },
    /// Export a collection as JSON or CSV
    Export {
        collection: String,
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Stream live changes of a collection, one JSON event per line
    Watch { collection: String },
    /// Knowledge-graph operations
    #[command(subcommand)]
    Graph(GraphCommand),
    /// Agent memory operations
    #[command(subcommand)]
    Memory(MemoryCommand),
    /// Vector search and index operations
    #[command(subcommand)]
    Vector(VectorCommand),
}

#[derive(Debug, Subcommand)]
pub enum GraphCommand {
    Nodes,
    Edges,
    Stats,
    Node {
        entity_id: String,
    },
    Search {
        query: String,
    },
    Traverse {
        start_node: String,
        #[arg(long)]
        depth: Option<u32>,
    },
    Path {
        from: String,
        to: String,
    },
    Link {
        from: String,
        to: String,
        relation: String,
    },
    /// Delete an edge
    Unlink {
        edge_id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum MemoryCommand {
    Remember {
        agent_id: String,
        #[arg(value_parser = parse_memory_type)]
        mem_type: MemoryType,
        content: String,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
    Recall {
        agent_id: String,
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: u32,
        #[arg(long = "type", value_parser = parse_memory_type)]
        mem_type: Option<MemoryType>,
    },
    Forget {
        agent_id: String,
        #[arg(long)]
        older_than: Option<String>,
        #[arg(long = "type", value_parser = parse_memory_type)]
        mem_type: Option<MemoryType>,
    },
    List {
        agent_id: String,
        #[arg(long = "type", value_parser = parse_memory_type)]
        mem_type: Option<MemoryType>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        skip: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum VectorCommand {
    Search {
        query: String,
        #[arg(long, value_delimiter = ',')]
        collections: Option<Vec<String>>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Keyword + graph + vector search; weights are sent only when set
    Hybrid {
        query: String,
        #[arg(long, value_delimiter = ',')]
        collections: Option<Vec<String>>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        weight_vector: Option<f64>,
        #[arg(long)]
        weight_keyword: Option<f64>,
        #[arg(long)]
        weight_graph: Option<f64>,
    },
    Similar {
        collection: String,
        doc_id: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    BuildIndex {
        collection: String,
    },
    IndexStats {
        collection: String,
    },
    Retrieve {
        query: String,
        #[arg(long, value_delimiter = ',')]
        collections: Option<Vec<String>>,
        #[arg(long)]
        context_limit: Option<u32>,
    },
    /// Export a collection's embeddings as JSON or CSV
    Export {
        collection: String,
        #[arg(long, default_value = "json")]
        format: String,
    },
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {}", e))
}

fn parse_search_mode(s: &str) -> Result<SearchMode, String> {
    s.parse().map_err(|e: knowledgedb_core::UnknownVariant| e.to_string())
}

fn parse_memory_type(s: &str) -> Result<MemoryType, String> {
    s.parse().map_err(|e: knowledgedb_core::UnknownVariant| e.to_string())
}
