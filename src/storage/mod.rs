//! Storage Module
//!
//! The three parts of emberkv and how they compose:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                      Store                       │
//! │   ┌───────────────────┐  ┌─────────────────────┐ │
//! │   │ HashMap<K, Value> │  │   ExpirationIndex   │ │
//! │   │   (the mapping)   │  │ (indexed min-heap)  │ │
//! │   └───────────────────┘  └─────────────────────┘ │
//! │              one RwLock around both              │
//! └──────────────────────────────────────────────────┘
//!                          ▲
//!                          │ pop_due / remove key
//!              ┌───────────┴───────────┐
//!              │        Sweeper        │
//!              │ (background Tokio     │
//!              │  task, fixed cadence) │
//!              └───────────────────────┘
//! ```
//!
//! The store delegates expiration bookkeeping to the index; the index
//! never touches the mapping, it only reports what is due; the sweep pulls
//! due entries from the index and removes the matching keys from the
//! mapping.

pub mod engine;
pub mod expiration;
pub mod sweep;

// Re-export commonly used types
pub use engine::{Store, StoreError, StoreStats, Value};
pub use expiration::ExpirationIndex;
pub use sweep::{SweepConfig, Sweeper};
