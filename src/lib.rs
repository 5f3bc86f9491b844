//! # lumenkv
//!
//! An embeddable, single-node, ordered key-value storage engine built on a
//! **log-structured merge tree (LSM-tree)**. Writes are durable before
//! acknowledgement; reads observe the most recent write for a key; segments
//! are periodically merged to reclaim space from overwritten keys.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                      Engine                        │
//! │  ┌───────────────┐        ┌─────────────────────┐  │
//! │  │   Memtable     │        │      Segments       │  │
//! │  │ (skip list)    │        │   (immutable, mmap)  │  │
//! │  │     + WAL      │        │   oldest → newest    │  │
//! │  └───────┬────────┘        └──────────┬───────────┘  │
//! │          │            flush           │              │
//! │          └───────────────────────────►│              │
//! │                                       │              │
//! │                              ┌────────▼─────────┐    │
//! │                              │    Compactor      │    │
//! │                              │ (k-way, newest-   │    │
//! │                              │  wins merge)       │    │
//! │                              └────────────────────┘    │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`codec`] | Length-prefixed `(key, value)` record framing shared by the WAL and segments |
//! | [`skiplist`] | Probabilistic ordered map backing the memtable |
//! | [`wal`] | Append-only, crash-durable write-ahead log |
//! | [`sstable`] | Immutable, memory-mapped on-disk segment format |
//! | [`compaction`] | Newest-wins k-way merge of several segments into one |
//! | [`engine`] | The coordinator: `open`/`put`/`get`/`flush`/`close` |
//! | [`error`] | The `StorageError` taxonomy shared by every component above |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lumenkv::engine::{Engine, EngineConfig};
//!
//! let config = EngineConfig { memtable_threshold: 1000, ..EngineConfig::default() };
//! let mut engine = Engine::open("/tmp/my_db", config).unwrap();
//!
//! engine.put(b"hello".to_vec(), b"world".to_vec()).unwrap();
//! assert_eq!(engine.get(b"hello").unwrap(), Some(b"world".to_vec()));
//!
//! engine.flush().unwrap();
//! engine.close().unwrap();
//! ```
//!
//! ## Non-goals
//!
//! Multi-process concurrency, multi-key transactions, secondary indexes,
//! a public range-scan API, replication, deletions, and WAL recovery on
//! open are all out of scope — see each module's docs for the rationale.

#![allow(dead_code)]

pub mod codec;
pub mod compaction;
pub mod engine;
pub mod error;
pub mod skiplist;
pub mod sstable;
pub mod wal;
