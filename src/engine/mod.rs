//! engine
//!
//! Owns the current snapshot and moves it forward.
//!
//! # Architecture
//!
//! Every state change follows one path:
//!
//! ```text
//! Mutation -> transition (pure) -> verify -> Repository swaps snapshot
//! ```
//!
//! - [`transition`] holds the pure `(&RepoState, &Mutation) -> Result<RepoState, _>`
//!   functions.
//! - [`repository`] is the single owner of the current snapshot.
//! - [`ledger`] records what was typed and shown.
//! - [`session`] ties a repository, the interpreter and a ledger together.
//!
//! # Invariants
//!
//! - Nothing outside [`repository::Repository`] replaces the snapshot
//! - A transition either produces a verified snapshot or changes nothing
//! - Commit ids are never re-issued within a process
//!
//! # Example
//!
//! ```
//! use branchlab::engine::{Context, SnapshotSource};
//!
//! let ctx = Context::default();
//! let state = SnapshotSource::default().load(&ctx).unwrap();
//! assert_eq!(state.head.name().as_str(), "feature");
//! ```

pub mod ids;
pub mod ledger;
pub mod repository;
pub mod session;
pub mod transition;

pub use ids::{IdSource, RandomIds, SequentialIds};
pub use ledger::{CommandRecall, HistoryLedger, LineKind, TerminalLine, Transcript};
pub use repository::{Applied, Repository};
pub use session::Session;
pub use transition::{ModelError, Mutation, ResetMode};

use std::path::PathBuf;

use crate::core::samples::Sample;
use crate::core::state::{RepoState, SnapshotError};
use crate::ui::output::{self, Verbosity};

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Output verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Resolve a path against the working directory override.
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Errors from loading or saving snapshots.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Snapshot file could not be read or written.
    #[error("snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON was malformed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Where a session's starting snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// A built-in dataset.
    Sample(Sample),
    /// A snapshot JSON file, trusted as-is.
    File(PathBuf),
}

impl Default for SnapshotSource {
    fn default() -> Self {
        SnapshotSource::Sample(Sample::Tutorial)
    }
}

impl SnapshotSource {
    /// Produce the snapshot.
    ///
    /// # Errors
    ///
    /// File sources fail on I/O or JSON errors.
    pub fn load(&self, ctx: &Context) -> Result<RepoState, EngineError> {
        match self {
            SnapshotSource::Sample(sample) => {
                output::debug(format!("loading {} sample", sample.name()), ctx.verbosity());
                Ok(sample.state())
            }
            SnapshotSource::File(path) => {
                let path = ctx.resolve(path);
                output::debug(format!("loading snapshot {}", path.display()), ctx.verbosity());
                let json = std::fs::read_to_string(&path).map_err(|source| EngineError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(RepoState::from_json(&json)?)
            }
        }
    }
}

/// Write a snapshot as pretty JSON.
///
/// # Errors
///
/// Fails on encode or write errors.
pub fn save_snapshot(ctx: &Context, state: &RepoState, path: &std::path::Path) -> Result<(), EngineError> {
    let path = ctx.resolve(path);
    let json = state.to_json_pretty()?;
    std::fs::write(&path, json).map_err(|source| EngineError::Io {
        path: path.clone(),
        source,
    })?;
    output::debug(format!("saved snapshot {}", path.display()), ctx.verbosity());
    Ok(())
}
