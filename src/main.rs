use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskboard_server::ServerConfig;
use taskboard_store::seed;
use taskboard_store::{Database, TaskRepo};
use taskboard_telemetry::{LogFormat, TelemetryConfig};

/// Task list REST server backed by SQLite.
#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Task list REST server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Host to bind (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides PORT).
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Path to the SQLite database (overrides DATABASE_PATH).
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Insert sample tasks into the database.
    Seed,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = &self.db_path {
            config.database_path.clone_from(path);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    taskboard_telemetry::init_telemetry(&TelemetryConfig {
        format: cli.log_format,
        ..TelemetryConfig::default()
    })
    .context("Failed to initialise logging")?;

    let config = cli.server_config();
    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.database_path.display()
        )
    })?;
    let repo = TaskRepo::new(db);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, repo).await,
        Command::Seed => {
            let seeded = seed::seed_sample_tasks(&repo).context("Failed to seed sample tasks")?;
            let total = repo.count().context("Failed to count tasks")?;
            tracing::info!(count = seeded.len(), total, "sample tasks created");
            Ok(())
        }
    }
}

async fn serve(config: &ServerConfig, repo: TaskRepo) -> Result<()> {
    let handle = taskboard_server::start(config, Arc::new(repo))
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;

    tracing::info!(
        addr = %handle.local_addr(),
        db = %config.database_path.display(),
        "taskboard ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl+c")?;

    tracing::info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["taskboard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "seed",
            "--port",
            "4000",
            "--db-path",
            "/tmp/seeded.db",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Seed));
        assert_eq!(cli.log_format, LogFormat::Json);

        let config = cli.server_config();
        assert_eq!(config.port, 4000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/seeded.db"));
    }

    #[test]
    fn cli_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["taskboard", "--log-format", "xml"]).is_err());
    }
}
