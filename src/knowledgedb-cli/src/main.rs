use anyhow::Result;
use clap::Parser;
use knowledgedb::Client;
use knowledgedb_cli::{commands, telemetry, Cli};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive until exit so file logs are flushed
    let _guard = telemetry::init_telemetry(cli.log_dir.as_deref(), cli.verbose)?;

    let config = commands::resolve_config(&cli.connection)?;
    tracing::info!("Using endpoint {}", config.endpoint());

    let client = Client::from_config(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(output) = commands::run(&client, cli.command, &mut out).await? {
        writeln!(out, "{}", output.render(cli.compact)?)?;
    }

    Ok(())
}
