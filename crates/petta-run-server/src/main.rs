//! petta-run server binary
//!
//! Hosts the PeTTa execution pipeline behind a single HTTP endpoint so the
//! editor frontend can submit MeTTa snippets and read back normalized
//! interpreter output.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use petta_run_server::{
    shutdown_signal, PettaRunServer, PettaRunner, RunnerConfig, ServerConfig,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments for the run server.
#[derive(Parser, Debug)]
#[command(name = "petta-run-server")]
#[command(about = "HTTP service that runs MeTTa snippets through the PeTTa translator")]
#[command(version)]
struct Args {
    /// Server bind address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// SWI-Prolog binary hosting the translator
    #[arg(long, default_value = "swipl")]
    interpreter: PathBuf,

    /// Path to the translator's main Prolog file
    #[arg(long, default_value = "petta/src/main.pl")]
    entry_point: PathBuf,

    /// Hard wall-clock limit for one execution, in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// CORS allowed origins (comma-separated; empty allows any origin)
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origins: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level_filter = args.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let bind_addr: SocketAddr = args
        .bind
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", args.bind, e))?;

    let runner_config = RunnerConfig::new(args.entry_point)
        .with_interpreter(args.interpreter)
        .with_timeout(Duration::from_secs(args.timeout));
    if !runner_config.entry_point.exists() {
        log::warn!(
            "PeTTa entry point {} does not exist; /run will report an error until it does",
            runner_config.entry_point.display()
        );
    }
    log::info!(
        "Runner configured: interpreter={}, entry_point={}, timeout={}s",
        runner_config.interpreter.display(),
        runner_config.entry_point.display(),
        runner_config.timeout.as_secs()
    );
    let runner = PettaRunner::new(runner_config);

    let cors_origins: Vec<String> = args
        .cors_origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let server_config = ServerConfig::new()
        .with_bind_addr(bind_addr)
        .with_cors_origins(cors_origins);

    let server = PettaRunServer::with_config(runner, server_config);
    server.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}
