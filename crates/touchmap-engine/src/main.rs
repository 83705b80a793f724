//! touchmap-replay: feeds a recorded input scenario through the engine.
//!
//! Every touch entity the engine emits is printed to stdout as one JSON
//! object per line, so runs can be diffed and piped into other tools.
//!
//! # Usage
//!
//! ```text
//! touchmap-replay --scenario <PATH> [OPTIONS]
//!
//! Options:
//!   --scenario  <PATH>   Scenario TOML file (mappings + input steps)
//!   --config    <PATH>   Engine configuration TOML [default: touchmap.toml]
//!   --log-level <LEVEL>  Log filter used when RUST_LOG is unset
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Default         | Description                   |
//! |-------------------|-----------------|-------------------------------|
//! | `TOUCHMAP_CONFIG` | `touchmap.toml` | Engine configuration file     |
//! | `TOUCHMAP_LOG`    | from config     | Log filter                    |
//!
//! A missing configuration file is not an error; the defaults apply.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use touchmap_core::{PointerManager, TouchEntity};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use touchmap_engine::application::emitter::TouchSink;
use touchmap_engine::application::engine::InputToTouchEngine;
use touchmap_engine::application::observation_task::TickDriver;
use touchmap_engine::infrastructure::scenario::Scenario;
use touchmap_engine::infrastructure::storage::config::load_config;
use touchmap_engine::infrastructure::touch_sink::ChannelTouchSink;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays key and mouse input through the input-to-touch engine.
#[derive(Debug, Parser)]
#[command(
    name = "touchmap-replay",
    about = "Replay key and mouse input through the input-to-touch mapping engine",
    version
)]
struct Cli {
    /// Scenario file holding mappings and input steps.
    #[arg(long)]
    scenario: PathBuf,

    /// Engine configuration file.
    #[arg(long, default_value = "touchmap.toml", env = "TOUCHMAP_CONFIG")]
    config: PathBuf,

    /// Log filter used when `RUST_LOG` is unset; overrides the configured
    /// `log_level`.
    #[arg(long, env = "TOUCHMAP_LOG")]
    log_level: Option<String>,
}

/// Prints every entity as a JSON line until the sink side closes.
async fn print_entities(mut rx: UnboundedReceiver<TouchEntity>) -> usize {
    let mut printed = 0;
    while let Some(entity) = rx.recv().await {
        match serde_json::to_string(&entity) {
            Ok(line) => {
                println!("{line}");
                printed += 1;
            }
            Err(e) => error!("failed to encode touch entity: {e}"),
        }
    }
    printed
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    let fallback = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.engine.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();

    let scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("failed to load scenario from {}", cli.scenario.display()))?;
    let provider = scenario.build_provider().context("invalid scenario mappings")?;
    let settings = scenario.settings(&config).context("invalid engine settings")?;

    let (sink, rx) = ChannelTouchSink::channel();
    let printer = tokio::spawn(print_entities(rx));

    let engine = InputToTouchEngine::new(
        Arc::new(provider),
        Arc::new(sink) as Arc<dyn TouchSink>,
        Arc::new(PointerManager::new()),
        TickDriver::current(),
        settings,
    );
    info!(
        scenario = %cli.scenario.display(),
        device_type = ?engine.device_type(),
        "touchmap-replay starting"
    );

    let report = scenario.replay(&engine).await?;
    let lifted = engine.reset(report.elapsed_us);
    drop(engine);

    let printed = printer.await.context("printer task failed")?;
    info!(
        handled = report.handled,
        discarded = report.discarded,
        lifted,
        printed,
        "touchmap-replay finished"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
