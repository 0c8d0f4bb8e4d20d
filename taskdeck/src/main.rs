//! `TaskDeck` — terminal client for a remote task list.
//!
//! Runs an interactive session over a task API server. Configuration via
//! CLI flags, environment variables, or config file
//! (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Session against the default API (http://localhost:3000/api)
//! cargo run --bin taskdeck
//!
//! # Custom server, starting on the pending view
//! cargo run --bin taskdeck -- --base-url http://tasks.example.com/api --filter pending
//!
//! # Offline demo mode (in-process task table, nothing persists)
//! cargo run --bin taskdeck -- --offline
//! ```

use std::io::{self, Write as _};
use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::gateway::{HttpGateway, MemoryGateway, TaskGateway};
use taskdeck::repl::{self, Outcome, ParseError, Session};
use taskdeck::store::TaskStore;
use taskdeck_proto::task::TaskQuery;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before the session starts (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck starting");

    let query = TaskQuery::new(
        cli.filter.unwrap_or_default(),
        cli.search.unwrap_or_default(),
    );

    let result = if cli.offline {
        println!("offline mode: tasks live in this process only");
        run_session(TaskStore::new(MemoryGateway::new(), query)).await
    } else {
        let gateway = HttpGateway::new(config.base_url.clone(), config.request_timeout)
            .map_err(io::Error::other)?;
        println!("task API: {}", config.base_url);
        run_session(TaskStore::new(gateway, query)).await
    };

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, which belongs to the session).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Interactive loop: read a line, parse, execute against the store, print.
async fn run_session<G: TaskGateway>(store: TaskStore<G>) -> io::Result<()> {
    let mut session = Session::new(store);
    println!("{}", session.start().await.trim_end());
    println!("type `help` for the command reference");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };
        match repl::parse_command(&line) {
            Ok(command) => match session.execute(command).await {
                Outcome::Output(text) => println!("{}", text.trim_end()),
                Outcome::Quit => break,
            },
            Err(ParseError::Empty) => {}
            Err(error) => println!("{error}"),
        }
    }
    Ok(())
}
