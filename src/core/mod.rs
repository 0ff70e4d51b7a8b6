//! core
//!
//! Core domain types, the repository snapshot, and read-only graph queries.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, CommitId, FileRef, etc.
//! - [`commit`] - Commit records and the tagged parent variant
//! - [`state`] - The repository snapshot and its JSON form
//! - [`graph`] - Commit DAG queries (depth, first-parent walks)
//! - [`verify`] - Fast verification of snapshot invariants
//! - [`config`] - Configuration schema and loading
//! - [`samples`] - Built-in datasets
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Snapshots are plain values; nothing in this layer mutates shared state
//! - All verification is deterministic

pub mod commit;
pub mod config;
pub mod graph;
pub mod samples;
pub mod state;
pub mod types;
pub mod verify;
