//! Storage is organized through [snapshot_store::SnapshotStore].
//! The basic idea is:
//!  - There is a plain string key-value store, by default a directory of json files.
//!  - The whole tracker state is stored as one json value under a single key.
//!  - Missing or broken values fall back to the built-in defaults.

pub mod kv_store;
pub mod snapshot_store;
