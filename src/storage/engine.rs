//! Store with TTL-Aware Mutation Semantics
//!
//! This module implements the authoritative key-value mapping for emberkv.
//! The mapping itself is plain `HashMap` bookkeeping; the interesting part
//! is how every mutation keeps the [`ExpirationIndex`] in step so the
//! background sweep always knows which key expires next.
//!
//! ## Expiration policy
//!
//! The store uses the active-sweep policy: a background task removes due
//! keys on a fixed cadence, and reads answer directly from the current
//! mapping. A read issued between a deadline elapsing and the next sweep
//! pass can still observe the value; that staleness is bounded by one sweep
//! interval. There are no per-access expiration checks.
//!
//! ## Concurrency model
//!
//! One `RwLock` guards the combined `{mapping, index}` state, shared
//! between callers and the sweep task. Reads (`get`, `exists`, `ttl`) take
//! the read lock; every mutation and the sweep take the write lock, so no
//! observer can see a torn heap or a torn mapping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use bytes::Bytes;
use thiserror::Error;

use crate::storage::expiration::ExpirationIndex;
use crate::storage::sweep::{SweepConfig, Sweeper};

/// A value stored under a key.
///
/// Values are opaque to the store with one exception: `incr`/`decr` operate
/// on the `Integer` variant and refuse everything else. The variant is
/// fixed at write time, so the numeric check is a plain match rather than
/// a parse of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit counter, the only variant `incr`/`decr` accept.
    Integer(i64),
    /// An opaque binary payload. The store never inspects it.
    Blob(Bytes),
}

impl Value {
    /// Returns the integer payload, or `None` for a blob.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Blob(_) => None,
        }
    }

    /// Returns the binary payload, or `None` for an integer.
    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Value::Integer(_) => None,
            Value::Blob(data) => Some(data),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::Blob(data)
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::Blob(Bytes::from(data))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Blob(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Blob(Bytes::from(s))
    }
}

/// Errors returned by store operations.
///
/// Absence is never an error: `get` returns `None` and `del`/`expire` on a
/// missing key are no-ops. Only the counter operations can fail.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// `incr`/`decr` hit a key whose value is not an integer. The stored
    /// value is left unmodified.
    #[error("value is not an integer")]
    TypeMismatch,

    /// The counter would leave the `i64` range. The stored value is left
    /// unmodified.
    #[error("increment or decrement would overflow")]
    Overflow,
}

/// Store statistics.
#[derive(Debug, Clone, Copy)]
pub struct StoreStats {
    /// Number of keys currently stored.
    pub keys: usize,
    /// Number of keys tracked by the expiration index.
    pub pending_expirations: usize,
    /// Total keys removed by the sweep over the store's lifetime.
    pub expired: u64,
}

/// The mapping and its expiration index, guarded together.
#[derive(Debug, Default)]
struct State {
    data: HashMap<String, Value>,
    expirations: ExpirationIndex,
}

/// State shared between the store handle and the sweep task.
#[derive(Debug)]
pub(crate) struct Shared {
    state: RwLock<State>,
    expired_count: AtomicU64,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            expired_count: AtomicU64::new(0),
        }
    }

    /// Drains every entry due at `now` from the index and removes the
    /// corresponding keys from the mapping. Called by the sweep task.
    ///
    /// An index entry whose key is missing from the mapping is treated as
    /// already satisfied and skipped without complaint.
    ///
    /// Returns the number of keys removed.
    pub(crate) fn sweep_due(&self, now: Instant) -> u64 {
        let mut state = self.state.write().unwrap();

        let mut removed = 0u64;
        while let Some(key) = state.expirations.pop_due(now) {
            if state.data.remove(&key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            self.expired_count.fetch_add(removed, Ordering::Relaxed);
        }
        removed
    }
}

/// An embeddable in-memory key-value store with per-key TTL expiration.
///
/// The store owns its background sweep task: the task is spawned when the
/// store is constructed and signalled to stop by [`shutdown`](Self::shutdown),
/// [`flush_all`](Self::flush_all), or dropping the store. Construction must
/// therefore happen inside a Tokio runtime.
///
/// # Example
///
/// ```
/// use emberkv::{Store, Value};
///
/// # tokio_test::block_on(async {
/// let store = Store::new();
///
/// store.set("name", "ember");
/// assert_eq!(store.get("name"), Some(Value::from("ember")));
///
/// assert_eq!(store.incr("hits"), Ok(1));
/// assert_eq!(store.decr("hits"), Ok(0));
/// # });
/// ```
#[derive(Debug)]
pub struct Store {
    shared: Arc<Shared>,
    sweeper: Sweeper,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a store with the default sweep cadence.
    pub fn new() -> Self {
        Self::with_config(SweepConfig::default())
    }

    /// Creates a store and spawns its sweep task with the given config.
    pub fn with_config(config: SweepConfig) -> Self {
        let shared = Arc::new(Shared::new());
        let sweeper = Sweeper::start(Arc::clone(&shared), config);
        Self { shared, sweeper }
    }

    /// Upserts `key` to `value`.
    ///
    /// Any pending expiration for the key is cleared unconditionally:
    /// setting a value resets expiration state, whether or not the key
    /// previously existed.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let mut state = self.shared.state.write().unwrap();
        state.expirations.remove(&key);
        state.data.insert(key, value.into());
    }

    /// Returns the value for `key`, or `None` if absent.
    ///
    /// Under the active-sweep policy this reads the current mapping
    /// directly; a key whose deadline has elapsed but which the sweep has
    /// not yet visited is still returned, for at most one sweep interval.
    pub fn get(&self, key: &str) -> Option<Value> {
        let state = self.shared.state.read().unwrap();
        state.data.get(key).cloned()
    }

    /// Removes `key` from the mapping and from the expiration index.
    ///
    /// Returns `true` if the key existed. Deleting an absent key is a no-op.
    pub fn del(&self, key: &str) -> bool {
        let mut state = self.shared.state.write().unwrap();
        state.expirations.remove(key);
        state.data.remove(key).is_some()
    }

    /// Schedules `key` to expire `ttl` from now.
    ///
    /// Replaces any pending expiration for the key. If the key is not in
    /// the mapping this is a no-op returning `false`: a TTL cannot be set
    /// on a non-existent key, and no orphaned index entry is created that
    /// could later expire a recreated value.
    pub fn expire(&self, key: &str, ttl: Duration) -> bool {
        let mut state = self.shared.state.write().unwrap();
        if !state.data.contains_key(key) {
            return false;
        }
        state.expirations.insert(key, Instant::now() + ttl);
        true
    }

    /// Increments `key`'s counter by one, creating it at `1` if absent.
    pub fn incr(&self, key: &str) -> Result<i64, StoreError> {
        self.add(key, 1)
    }

    /// Decrements `key`'s counter by one, creating it at `-1` if absent.
    pub fn decr(&self, key: &str) -> Result<i64, StoreError> {
        self.add(key, -1)
    }

    fn add(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        let mut state = self.shared.state.write().unwrap();
        match state.data.get_mut(key) {
            Some(Value::Integer(n)) => {
                let next = n.checked_add(delta).ok_or(StoreError::Overflow)?;
                *n = next;
                Ok(next)
            }
            Some(_) => Err(StoreError::TypeMismatch),
            None => {
                // A counter born from incr/decr starts at the delta itself
                // and carries no expiration.
                state.data.insert(key.to_string(), Value::Integer(delta));
                Ok(delta)
            }
        }
    }

    /// Returns `true` if `key` is currently in the mapping.
    pub fn exists(&self, key: &str) -> bool {
        let state = self.shared.state.read().unwrap();
        state.data.contains_key(key)
    }

    /// Returns the remaining time before `key` expires, or `None` if the
    /// key has no pending expiration (including when it is absent).
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let state = self.shared.state.read().unwrap();
        state
            .expirations
            .deadline(key)
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Drops any pending expiration for `key`, keeping its value.
    ///
    /// Returns `true` if an expiration was pending.
    pub fn persist(&self, key: &str) -> bool {
        let mut state = self.shared.state.write().unwrap();
        state.expirations.remove(key)
    }

    /// Empties the mapping and the expiration index together, then stops
    /// the sweep task.
    ///
    /// Both structures are cleared under a single lock acquisition, so no
    /// observer can see one cleared and not the other. No pending
    /// expiration fires afterward.
    pub fn flush_all(&self) {
        {
            let mut state = self.shared.state.write().unwrap();
            state.data.clear();
            state.expirations.clear();
        }
        self.sweeper.stop();
    }

    /// Stops the sweep task without touching stored data.
    ///
    /// The sweeper is also stopped when the store is dropped; this exists
    /// for hosts that tear down in stages.
    pub fn shutdown(&self) {
        self.sweeper.stop();
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        let state = self.shared.state.read().unwrap();
        state.data.len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of store statistics.
    pub fn stats(&self) -> StoreStats {
        let state = self.shared.state.read().unwrap();
        StoreStats {
            keys: state.data.len(),
            pending_expirations: state.expirations.len(),
            expired: self.shared.expired_count.load(Ordering::Relaxed),
        }
    }
}
