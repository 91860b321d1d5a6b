//! # emberkv - An Embeddable In-Memory Key-Value Store with TTL Expiration
//!
//! emberkv is a small in-process key-value store meant to live inside a
//! larger service as a local cache layer. It offers CRUD operations,
//! atomic numeric increment/decrement, and per-key time-to-live
//! expiration. It is a library, not a server: there is no wire protocol
//! and no listener, just the in-process operation set.
//!
//! ## Features
//!
//! - **Indexed expiration heap**: registering, replacing, or cancelling a
//!   key's TTL costs O(log n); the next key to expire is known in O(1)
//! - **Active sweep**: a background Tokio task removes due keys on a fixed
//!   cadence, so memory is reclaimed even for keys never touched again
//! - **Typed values**: integers and opaque binary payloads, so `incr`/`decr`
//!   type checking is a variant match, not a parse
//! - **Owned lifecycle**: the sweep task starts with the store and is
//!   stopped by `flush_all`, `shutdown`, or drop
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                          Store                            │
//! │                                                           │
//! │   set / get / del / expire        ┌────────────────────┐  │
//! │   incr / decr / exists ──────────>│ HashMap<K, Value>  │  │
//! │   ttl / persist / flush_all       └────────────────────┘  │
//! │             │                                             │
//! │             │ register / replace / cancel TTL             │
//! │             ▼                                             │
//! │   ┌────────────────────┐    pop due    ┌──────────────┐   │
//! │   │  ExpirationIndex   │<──────────────│   Sweeper    │   │
//! │   │ (indexed min-heap) │               │ (Tokio task) │   │
//! │   └────────────────────┘               └──────────────┘   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use emberkv::{Store, Value};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! // The sweep task spawns at construction, so this needs a runtime.
//! let store = Store::new();
//!
//! store.set("name", "ember");
//! assert_eq!(store.get("name"), Some(Value::from("ember")));
//!
//! store.set("hits", 9i64);
//! assert_eq!(store.incr("hits"), Ok(10));
//!
//! store.expire("hits", Duration::from_millis(20));
//! tokio::time::sleep(Duration::from_millis(300)).await;
//! assert!(!store.exists("hits"));
//! # });
//! ```
//!
//! ## Expiration semantics
//!
//! - `expire` on a missing key is a no-op; a TTL never outlives its key
//! - `set` clears any pending TTL, so an overwritten key does not expire
//!   at its originally scheduled time
//! - Reads answer from the current mapping; a due-but-unswept key remains
//!   visible for at most one sweep interval
//!
//! ## Concurrency
//!
//! All shared state sits behind one `RwLock`, shared between callers and
//! the sweep task. The store is safe to use from multiple threads, but it
//! is a single-lock design: it serializes writers rather than sharding.
//!
//! ## Module Overview
//!
//! - [`storage::engine`]: the store and its TTL-aware mutation semantics
//! - [`storage::expiration`]: the key-indexed min-heap over deadlines
//! - [`storage::sweep`]: the background sweep task and its lifecycle

pub mod storage;

// Re-export commonly used types for convenience
pub use storage::{Store, StoreError, StoreStats, SweepConfig, Value};

/// Version of emberkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
