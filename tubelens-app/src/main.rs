//! TubeLens server binary.
//!
//! Loads configuration, initialises logging, wires the analyst behind the
//! web surface, and serves the single-page app.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tubelens_analyst::{AgentAnalyst, AnalystConfig};
use tubelens_common::observability::{init_logging, LogOptions};
use tubelens_config::TubelensConfigLoader;
use tubelens_web::{build_app, AppState, SessionStore};
use tubelens_youtube::YouTubeClient;

#[derive(Parser, Debug)]
#[command(name = "tubelens", about = "YouTube video analyzer web app", version)]
struct Args {
    /// Path to the configuration file (YAML/TOML/JSON).
    #[arg(short, long, env = "TUBELENS_CONFIG", default_value = "tubelens.yaml")]
    config: PathBuf,

    /// Override the listen address from the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = TubelensConfigLoader::new()
        .with_file(&args.config)
        .load()
        .context("failed to load configuration")?;

    let (log_path, _log_guard) = init_logging(LogOptions {
        dir: None,
        stderr: cfg.logging.stderr,
        json: cfg.logging.json,
    })?;
    eprintln!("logging to {}", log_path.display());

    let analyst = AgentAnalyst::new(
        AnalystConfig {
            model: cfg.analyst.model.clone(),
            endpoint: cfg.analyst.endpoint.clone(),
            temperature: cfg.analyst.temperature,
            max_tokens: cfg.analyst.max_tokens,
        },
        YouTubeClient::new()?,
    );

    let state = AppState {
        sessions: SessionStore::new(),
        analyst: Arc::new(analyst),
    };
    let app = build_app(state);

    let bind_addr = args.bind.unwrap_or(cfg.server.bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, model = %cfg.analyst.model, "tubelens listening");
    eprintln!("tubelens listening on http://{bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
