//! branchlab - a simulated Git repository with a live commit-graph layout
//!
//! branchlab models commits, branches, HEAD, the staging area and the
//! working directory in memory, interprets a restricted `git` command
//! grammar against that model, and lays the resulting commit graph out
//! into deterministic 2D geometry.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, drives sessions)
//! - [`command`] - Interprets one command line into at most one mutation
//! - [`engine`] - Owns the current snapshot and applies pure transitions
//! - [`layout`] - Pure function from a snapshot to render geometry
//! - [`core`] - Domain types, snapshot format, graph queries, verification
//! - [`ui`] - Terminal output
//!
//! # Correctness Invariants
//!
//! 1. Every branch ref, HEAD and every parent link resolves after every
//!    operation
//! 2. A rejected command leaves the snapshot byte-identical
//! 3. Each successful command appends exactly one log line
//! 4. Layout output depends only on the snapshot and the layout parameters

pub mod cli;
pub mod command;
pub mod core;
pub mod engine;
pub mod layout;
pub mod ui;
