//! QuestMind agent entry point.
//!
//! Reads one instruction per line from stdin in the form
//! `<player-uuid> <instruction text>`, runs each through the worker pool
//! against the simulated backend, and prints every terminal record to stdout
//! as a single JSON line. Logs go to stderr.
//!
//! ```text
//! stdin --> WorkerPool --> Orchestrator --> SimulatedChain
//!                |
//!                v
//!          ChannelSink --> stdout (JSON lines)
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use questmind_agent::config::{LogFormat, LoggingConfig};
use questmind_agent::{
    ChannelSink, GameStateCache, JsonFile, Orchestrator, PoolConfig, QuestMindConfig,
    SimulatedChain, WeightStore, WorkerPool,
};
use questmind_types::PlayerId;

/// Application entry point.
///
/// Loads configuration, initializes logging, wires the orchestrator to the
/// simulated backend, then feeds stdin into the worker pool until EOF.
///
/// # Errors
///
/// Returns an error if configuration is invalid or stdin cannot be read.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = QuestMindConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        max_concurrent = config.agent.max_concurrent_executions,
        timeout_secs = config.agent.instruction_timeout_secs,
        cache_ttl_secs = config.agent.cache_ttl_secs,
        weights_path = %config.optimizer.weights_path.display(),
        quest_types = ?config.game.quest_types,
        "configuration loaded"
    );

    let chain = Arc::new(SimulatedChain::with_dev_heroes());
    let weights = WeightStore::open(JsonFile::new(&config.optimizer.weights_path));
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&chain),
        chain,
        GameStateCache::new(config.agent.cache_ttl()),
        weights,
        config.rules(),
        config.agent.max_instruction_length,
    ));

    let (sink, mut records) = ChannelSink::new(config.agent.queue_capacity);
    let pool = WorkerPool::spawn(
        orchestrator,
        Arc::new(sink),
        PoolConfig::from_settings(&config.agent),
    );

    let printer = tokio::spawn(async move {
        while let Some(record) = records.recv().await {
            match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(
                    instruction_id = %record.instruction_id,
                    error = %e,
                    "failed to serialize terminal record"
                ),
            }
        }
    });

    info!("questmind-agent ready, reading instructions from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((player, text)) = line.split_once(char::is_whitespace) else {
            warn!(line, "expected `<player-uuid> <instruction>`, skipping");
            continue;
        };
        let player: PlayerId = match player.parse() {
            Ok(player) => player,
            Err(e) => {
                warn!(player, error = %e, "invalid player id, skipping");
                continue;
            }
        };
        pool.submit(player, text.trim()).await?;
    }

    info!("stdin closed, draining worker pool");
    pool.shutdown().await;
    printer.await.context("record printer task failed")?;
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`. Output goes to stderr so stdout
/// carries only terminal records.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
