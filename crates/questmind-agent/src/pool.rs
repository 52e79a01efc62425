//! Bounded worker pool that runs submitted instructions.
//!
//! ```text
//! submit --> queue --> dispatcher --> [player lock] --> [slot] --> orchestrator
//!                                                                     |
//!                                     sink <-- lifecycle finish <-----+
//! ```
//!
//! The dispatcher admits at most `max_concurrent + queue_capacity` units at
//! a time and stops draining the queue while at that bound, so a full queue
//! makes `submit` wait.
//!
//! Each unit of work takes its player's lock before it asks for an execution
//! slot, so at most one instruction per player runs at a time and a player
//! with a backlog never pins slots other players could use. The orchestrator
//! call runs in its own task under the configured timeout: a panic surfaces
//! as a `JoinError` and becomes a `fault` result, a timeout aborts the task
//! and invalidates the player's cached snapshot.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use questmind_types::{CommandResult, FailureReason, Instruction, InstructionId, PlayerId};

use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::gateway::{GameStateGateway, LedgerGateway};
use crate::orchestrator::Orchestrator;
use crate::sink::LifecycleSink;
use crate::weight_store::WeightPersistence;

/// Worker pool sizing and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Instructions executing at once.
    pub max_concurrent: usize,
    /// Submitted instructions buffered in the queue. The dispatcher also
    /// admits this many units beyond `max_concurrent` to wait for a player
    /// lock or a slot; past both bounds `submit` waits.
    pub queue_capacity: usize,
    /// Wall-clock limit per instruction.
    pub instruction_timeout: Duration,
    /// Seed for the per-instruction RNGs. `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl PoolConfig {
    /// Pool settings from the `agent` config section.
    pub const fn from_settings(settings: &AgentSettings) -> Self {
        Self {
            max_concurrent: settings.max_concurrent_executions,
            queue_capacity: settings.queue_capacity,
            instruction_timeout: settings.instruction_timeout(),
            rng_seed: settings.rng_seed,
        }
    }
}

/// Handle for submitting instructions to the pool.
#[derive(Debug)]
pub struct WorkerPool {
    tx: mpsc::Sender<Instruction>,
    dispatcher: JoinHandle<()>,
}

impl WorkerPool {
    /// Start the dispatcher on the current tokio runtime.
    pub fn spawn<S, L, P, K>(
        orchestrator: Arc<Orchestrator<S, L, P>>,
        sink: Arc<K>,
        config: PoolConfig,
    ) -> Self
    where
        S: GameStateGateway,
        L: LedgerGateway,
        P: WeightPersistence,
        K: LifecycleSink,
    {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let admit_limit = config
            .max_concurrent
            .max(1)
            .saturating_add(config.queue_capacity);
        let shared = Arc::new(Shared {
            orchestrator,
            sink,
            slots: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            player_locks: DashMap::new(),
            timeout: config.instruction_timeout,
        });
        let rng = config
            .rng_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let dispatcher = tokio::spawn(dispatch(shared, rx, rng, admit_limit));
        info!(
            max_concurrent = config.max_concurrent,
            queue_capacity = config.queue_capacity,
            timeout_secs = config.instruction_timeout.as_secs(),
            "worker pool started"
        );
        Self { tx, dispatcher }
    }

    /// Queue `text` for `player`. Returns the pending instruction's id.
    ///
    /// Waits while the queue is full and the dispatcher is at its
    /// admission bound.
    pub async fn submit(
        &self,
        player: PlayerId,
        text: impl Into<String>,
    ) -> Result<InstructionId, AgentError> {
        let instruction = Instruction::new(player, text);
        let id = instruction.id;
        self.tx.send(instruction).await.map_err(|closed| {
            debug!(instruction_id = %closed.0.id, "submit after shutdown");
            AgentError::PoolClosed
        })?;
        debug!(instruction_id = %id, player_id = %player, "instruction queued");
        Ok(id)
    }

    /// Stop accepting work and wait for every queued instruction to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.dispatcher.await {
            warn!(error = %e, "worker pool dispatcher ended abnormally");
        }
        info!("worker pool stopped");
    }
}

struct Shared<S, L, P, K> {
    orchestrator: Arc<Orchestrator<S, L, P>>,
    sink: Arc<K>,
    slots: Arc<Semaphore>,
    player_locks: DashMap<PlayerId, Arc<Mutex<()>>>,
    timeout: Duration,
}

async fn dispatch<S, L, P, K>(
    shared: Arc<Shared<S, L, P, K>>,
    mut rx: mpsc::Receiver<Instruction>,
    mut rng: StdRng,
    admit_limit: usize,
) where
    S: GameStateGateway,
    L: LedgerGateway,
    P: WeightPersistence,
    K: LifecycleSink,
{
    let mut units = JoinSet::new();
    loop {
        while units.len() >= admit_limit {
            if let Some(done) = units.join_next().await {
                log_unit_exit(&done);
            }
        }
        let Some(instruction) = rx.recv().await else {
            break;
        };
        let seed: u64 = rng.random();
        units.spawn(run_unit(Arc::clone(&shared), instruction, seed));
        while let Some(done) = units.try_join_next() {
            log_unit_exit(&done);
        }
    }
    while let Some(done) = units.join_next().await {
        log_unit_exit(&done);
    }
}

fn log_unit_exit(done: &Result<(), JoinError>) {
    if let Err(e) = done {
        warn!(error = %e, "unit of work ended abnormally");
    }
}

async fn run_unit<S, L, P, K>(shared: Arc<Shared<S, L, P, K>>, mut instruction: Instruction, seed: u64)
where
    S: GameStateGateway,
    L: LedgerGateway,
    P: WeightPersistence,
    K: LifecycleSink,
{
    let player = instruction.player_id;
    let lock = Arc::clone(
        shared
            .player_locks
            .entry(player)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value(),
    );
    let exclusive = Arc::clone(&lock).lock_owned().await;
    let Ok(slot) = Arc::clone(&shared.slots).acquire_owned().await else {
        warn!(instruction_id = %instruction.id, "execution slots closed, dropping instruction");
        return;
    };

    if let Err(e) = instruction.begin(Utc::now()) {
        warn!(instruction_id = %instruction.id, error = %e, "cannot start instruction");
        return;
    }
    debug!(instruction_id = %instruction.id, player_id = %player, "instruction processing");

    let result = execute(&shared, player, instruction.text.clone(), seed).await;
    drop(slot);
    drop(exclusive);
    drop(lock);
    shared
        .player_locks
        .remove_if(&player, |_, l| Arc::strong_count(l) == 1);

    match instruction.finish(result, Utc::now()) {
        Ok(record) => {
            info!(
                instruction_id = %record.instruction_id,
                player_id = %record.player_id,
                status = %record.status,
                reason = ?record.result.failure(),
                "instruction finished"
            );
            shared.sink.record(record).await;
        }
        Err(e) => warn!(instruction_id = %instruction.id, error = %e, "cannot finish instruction"),
    }
}

async fn execute<S, L, P, K>(
    shared: &Shared<S, L, P, K>,
    player: PlayerId,
    text: String,
    seed: u64,
) -> CommandResult
where
    S: GameStateGateway,
    L: LedgerGateway,
    P: WeightPersistence,
    K: LifecycleSink,
{
    let orchestrator = Arc::clone(&shared.orchestrator);
    let mut work = tokio::spawn(async move {
        let mut rng = StdRng::seed_from_u64(seed);
        orchestrator.process(player, &text, &mut rng).await
    });

    match tokio::time::timeout(shared.timeout, &mut work).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => fault_result(e),
        Err(_elapsed) => {
            work.abort();
            shared.orchestrator.cache().invalidate(player);
            let limit_secs = shared.timeout.as_secs();
            warn!(player_id = %player, limit_secs, "instruction timed out");
            CommandResult::failed(
                format!("Instruction timed out after {limit_secs} seconds"),
                FailureReason::Timeout { limit_secs },
            )
        }
    }
}

fn fault_result(error: JoinError) -> CommandResult {
    let (category, message) = if error.is_panic() {
        ("panic", panic_message(error.into_panic().as_ref()))
    } else {
        ("cancelled", error.to_string())
    };
    warn!(category, message = %message, "unit of work faulted");
    CommandResult::failed(
        format!("Error processing instruction: {message}"),
        FailureReason::Fault {
            category: category.to_owned(),
            message,
        },
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
