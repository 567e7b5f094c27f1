//! kdb - command-line client for KnowledgeDB
//!
//! Every subcommand performs one API call and prints the JSON response.
//!
//! ```bash
//! export KNOWLEDGEDB_ENDPOINT=http://localhost:5000/db/usr_abc/myapp
//! export KNOWLEDGEDB_API_KEY=kdb_...
//! kdb insert users '{"name": "Alice", "age": 25}'
//! kdb graph traverse Alice --depth 3
//! kdb memory recall agent_1 "tea" --type semantic
//! ```

pub mod cli;
pub mod commands;
pub mod telemetry;

pub use cli::Cli;
pub use commands::{resolve_config, run, Output};
