//! Process-wide optimization weights with pluggable persistence.
//!
//! Updates are serialized through a single mutex that is only held for the
//! in-memory fold. Each update stamps a generation number and the file is
//! written afterwards on tokio's blocking pool; a write carrying an older
//! generation than one already written is skipped, so the file never moves
//! backwards. Persistence failures are logged and dropped: the in-memory
//! weights stay authoritative for the life of the process.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use questmind_engine::Outcome;
use questmind_engine::learning;
use questmind_types::OptimizationWeights;

use crate::error::WeightStoreError;

/// Where the weights live between runs.
pub trait WeightPersistence: Send + Sync + 'static {
    /// Previously saved weights, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<OptimizationWeights>, WeightStoreError>;

    /// Overwrite the saved weights.
    fn save(&self, weights: &OptimizationWeights) -> Result<(), WeightStoreError>;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Persist to `path`. Parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeightPersistence for JsonFile {
    fn load(&self) -> Result<Option<OptimizationWeights>, WeightStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, weights: &OptimizationWeights) -> Result<(), WeightStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(weights)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Keeps weights in memory only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ephemeral;

impl WeightPersistence for Ephemeral {
    fn load(&self) -> Result<Option<OptimizationWeights>, WeightStoreError> {
        Ok(None)
    }

    fn save(&self, _weights: &OptimizationWeights) -> Result<(), WeightStoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Versioned {
    weights: OptimizationWeights,
    generation: u64,
}

/// Persistence plus the newest generation handed to it.
#[derive(Debug)]
struct Writer<P> {
    persistence: P,
    written: Mutex<u64>,
}

impl<P: WeightPersistence> Writer<P> {
    /// Save `snapshot` unless a newer generation was already written.
    /// `None` means the snapshot was superseded.
    fn save_if_newer(&self, snapshot: Versioned) -> Option<Result<(), WeightStoreError>> {
        let mut written = lock(&self.written);
        if snapshot.generation <= *written {
            return None;
        }
        *written = snapshot.generation;
        Some(self.persistence.save(&snapshot.weights))
    }
}

/// The shared weight set.
#[derive(Debug)]
pub struct WeightStore<P> {
    current: Mutex<Versioned>,
    writer: Arc<Writer<P>>,
}

impl<P: WeightPersistence> WeightStore<P> {
    /// Load saved weights, falling back to the defaults.
    ///
    /// A missing file yields the defaults silently. An unreadable or
    /// malformed file is logged and also yields the defaults.
    pub fn open(persistence: P) -> Self {
        let weights = match persistence.load() {
            Ok(Some(weights)) => weights,
            Ok(None) => OptimizationWeights::default(),
            Err(e) => {
                warn!(error = %e, "failed to load optimization weights, using defaults");
                OptimizationWeights::default()
            }
        };
        Self {
            current: Mutex::new(Versioned {
                weights,
                generation: 0,
            }),
            writer: Arc::new(Writer {
                persistence,
                written: Mutex::new(0),
            }),
        }
    }

    /// Current weights.
    pub fn current(&self) -> OptimizationWeights {
        lock(&self.current).weights
    }

    /// Fold `outcome` into the weights and persist the result.
    ///
    /// Returns the updated weights whether or not persistence succeeded.
    pub async fn update(&self, outcome: Outcome) -> OptimizationWeights {
        let snapshot = {
            let mut current = lock(&self.current);
            current.weights = learning::apply(current.weights, outcome);
            current.generation = current.generation.saturating_add(1);
            *current
        };

        let writer = Arc::clone(&self.writer);
        match tokio::task::spawn_blocking(move || writer.save_if_newer(snapshot)).await {
            Ok(Some(Ok(()))) => debug!(
                generation = snapshot.generation,
                quest_success_rate = snapshot.weights.quest_success_rate,
                reward_efficiency = snapshot.weights.reward_efficiency,
                "optimization weights updated"
            ),
            Ok(Some(Err(e))) => warn!(error = %e, "failed to persist optimization weights"),
            Ok(None) => debug!(
                generation = snapshot.generation,
                "optimization weights superseded before write"
            ),
            Err(e) => warn!(error = %e, "optimization weight writer ended abnormally"),
        }
        snapshot.weights
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
