//! Short-lived cache of hero snapshots keyed by player.
//!
//! Successful actions write their effect into the cached snapshot
//! optimistically, so reads inside the TTL window see the new state without
//! another gateway round trip. Entries are timestamped with
//! [`tokio::time::Instant`], which makes expiry controllable from paused-time
//! tests.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use questmind_types::{HeroSnapshot, PlayerId};

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: HeroSnapshot,
    stored_at: Instant,
}

/// Hero snapshots with a fixed time-to-live.
#[derive(Debug)]
pub struct GameStateCache {
    entries: DashMap<PlayerId, CacheEntry>,
    ttl: Duration,
}

impl GameStateCache {
    /// An empty cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// The cached snapshot for `player`, if present and fresh.
    ///
    /// Expired entries are evicted on read.
    pub fn get(&self, player: PlayerId) -> Option<HeroSnapshot> {
        let fresh = self
            .entries
            .get(&player)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.snapshot.clone());
        if fresh.is_none() {
            self.evict_if_stale(player);
        }
        fresh
    }

    /// Remove `player`'s entry only if it is still stale under the shard
    /// lock, so a `put` racing with the read survives.
    fn evict_if_stale(&self, player: PlayerId) {
        self.entries.remove_if(&player, |_, entry| !self.is_fresh(entry));
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.stored_at.elapsed() < self.ttl
    }

    /// Store `snapshot` as the current state for `player`.
    pub fn put(&self, player: PlayerId, snapshot: HeroSnapshot) {
        self.entries.insert(
            player,
            CacheEntry {
                snapshot,
                stored_at: Instant::now(),
            },
        );
    }

    /// Apply `change` to the cached snapshot in place and refresh its
    /// timestamp. Returns `false` if there was no entry to update.
    pub fn update(&self, player: PlayerId, change: impl FnOnce(&mut HeroSnapshot)) -> bool {
        let Some(mut entry) = self.entries.get_mut(&player) else {
            return false;
        };
        change(&mut entry.snapshot);
        entry.stored_at = Instant::now();
        true
    }

    /// Drop the entry for `player` so the next read goes to the gateway.
    pub fn invalidate(&self, player: PlayerId) {
        self.entries.remove(&player);
    }

    /// Number of entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
