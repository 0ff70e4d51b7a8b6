//! engine::repository
//!
//! The single owner of the current snapshot.
//!
//! # Architecture
//!
//! [`Repository`] is the only component that swaps snapshots. Every
//! operation goes through one path:
//!
//! ```text
//! Mutation -> transition::apply -> core::verify -> swap
//! ```
//!
//! A transition that fails its preconditions, or whose output does not
//! verify, is reported as [`Applied::Unchanged`] and the previous snapshot
//! stays in place, untouched.
//!
//! # Silent no-ops
//!
//! Operations invoked directly on the repository never return `Err` and
//! never panic. Callers that want a structured failure (the command
//! interpreter) check preconditions first, or inspect the returned
//! [`Applied`].
//!
//! # Example
//!
//! ```
//! use branchlab::core::samples;
//! use branchlab::core::types::FileId;
//! use branchlab::engine::repository::Repository;
//!
//! let mut repo = Repository::new(samples::tutorial());
//! assert!(repo.stage(FileId(6)).is_changed());
//! assert!(!repo.stage(FileId(6)).is_changed());
//! assert!(repo.commit("Wire the API").is_changed());
//! ```

use super::ids::{IdSource, RandomIds};
use super::transition::{self, ModelError, Mutation, ResetMode};
use crate::core::state::{RepoState, SnapshotError};
use crate::core::types::{BranchName, CommitId, FileId, FileRef, Fingerprint};
use crate::core::verify::fast_verify;
use crate::ui::output::{self, Verbosity};

/// Outcome of a repository operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new snapshot is current.
    Changed,
    /// The snapshot is byte-identical to before; the reason is attached.
    Unchanged(ModelError),
}

impl Applied {
    /// Whether the snapshot was replaced.
    pub fn is_changed(&self) -> bool {
        matches!(self, Applied::Changed)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&ModelError> {
        match self {
            Applied::Changed => None,
            Applied::Unchanged(reason) => Some(reason),
        }
    }
}

/// Owns the canonical repository state.
pub struct Repository {
    state: RepoState,
    initial: RepoState,
    ids: Box<dyn IdSource>,
    /// `None` once every `u32` file id has been handed out.
    next_file_id: Option<u32>,
    verbosity: Verbosity,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("state", &self.state)
            .field("next_file_id", &self.next_file_id)
            .finish_non_exhaustive()
    }
}

fn next_file_id_for(state: &RepoState) -> Option<u32> {
    state.max_file_id().map_or(Some(0), |id| id.0.checked_add(1))
}

impl Repository {
    /// Take ownership of a trusted snapshot, issuing random commit ids.
    pub fn new(state: RepoState) -> Self {
        Self::with_ids(state, Box::new(RandomIds::new()))
    }

    /// Take ownership of a trusted snapshot with a specific id source.
    pub fn with_ids(state: RepoState, ids: Box<dyn IdSource>) -> Self {
        Self {
            next_file_id: next_file_id_for(&state),
            initial: state.clone(),
            state,
            ids,
            verbosity: Verbosity::Normal,
        }
    }

    /// Report rejected operations at this verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// The current snapshot.
    pub fn state(&self) -> &RepoState {
        &self.state
    }

    /// The id the next added file will get, if any remain.
    pub fn next_file_id(&self) -> Option<u32> {
        self.next_file_id
    }

    /// Apply a mutation atomically.
    pub fn apply(&mut self, mutation: &Mutation) -> Applied {
        let next = match transition::apply(&self.state, mutation, self.ids.as_mut()) {
            Ok(next) => next,
            Err(reason) => return self.reject(mutation, reason),
        };

        let verified = fast_verify(&next);
        if !verified.ok {
            let detail = verified
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return self.reject(mutation, ModelError::Invariant(detail));
        }

        output::debug(
            format!("applied: {}", mutation.description()),
            self.verbosity,
        );
        self.state = next;
        Applied::Changed
    }

    fn reject(&self, mutation: &Mutation, reason: ModelError) -> Applied {
        output::debug(
            format!("rejected {}: {}", mutation.description(), reason),
            self.verbosity,
        );
        Applied::Unchanged(reason)
    }

    /// Append a line to the operation log.
    ///
    /// Used by drivers of operations that do not log themselves.
    pub fn append_log(&mut self, line: impl Into<String>) {
        self.state.logs.push(line.into());
    }

    // =========================================================================
    // Staging
    // =========================================================================

    /// Move a working-directory file to the staging area.
    pub fn stage(&mut self, file: FileId) -> Applied {
        self.apply(&Mutation::Stage { file })
    }

    /// Move a staged file back to the working directory.
    pub fn unstage(&mut self, file: FileId) -> Applied {
        self.apply(&Mutation::Unstage { file })
    }

    /// Stage every working-directory file.
    pub fn stage_all(&mut self) -> Applied {
        self.apply(&Mutation::StageAll)
    }

    /// Unstage every staged file.
    pub fn unstage_all(&mut self) -> Applied {
        self.apply(&Mutation::UnstageAll)
    }

    /// Drop all uncommitted files.
    pub fn discard_all_changes(&mut self) -> Applied {
        self.apply(&Mutation::DiscardAllChanges)
    }

    /// Create a new untracked file with the next unused id.
    ///
    /// Without a name the file is called `Component-<id>.tsx`.
    pub fn add_file(&mut self, name: Option<&str>) -> Applied {
        let Some(id) = self.next_file_id else {
            output::debug("rejected add file: file ids exhausted", self.verbosity);
            return Applied::Unchanged(ModelError::FileIdsExhausted);
        };
        let name = match name {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => format!("Component-{id}.tsx"),
        };
        let applied = self.apply(&Mutation::AddFile {
            file: FileRef::new(id, name),
        });
        if applied.is_changed() {
            self.next_file_id = id.checked_add(1);
        }
        applied
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Commit the staging area. Empty message or empty staging is a no-op.
    pub fn commit(&mut self, message: &str) -> Applied {
        self.apply(&Mutation::Commit {
            message: message.to_string(),
        })
    }

    /// Create a branch off HEAD.
    pub fn create_branch(&mut self, name: &BranchName) -> Applied {
        self.apply(&Mutation::CreateBranch { name: name.clone() })
    }

    /// Create a branch off HEAD and switch to it.
    pub fn create_and_switch(&mut self, name: &BranchName) -> Applied {
        self.apply(&Mutation::CreateAndSwitch { name: name.clone() })
    }

    /// Delete a branch.
    pub fn delete_branch(&mut self, name: &BranchName) -> Applied {
        self.apply(&Mutation::DeleteBranch { name: name.clone() })
    }

    /// Rename a branch.
    pub fn rename_branch(&mut self, from: &BranchName, to: &BranchName) -> Applied {
        self.apply(&Mutation::RenameBranch {
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Move HEAD to another branch.
    pub fn switch_branch(&mut self, name: &BranchName) -> Applied {
        self.apply(&Mutation::SwitchBranch { name: name.clone() })
    }

    /// Merge a branch into HEAD.
    pub fn merge(&mut self, source: &BranchName) -> Applied {
        self.apply(&Mutation::Merge {
            source: source.clone(),
        })
    }

    /// Move HEAD's branch to another branch's tip.
    pub fn rebase(&mut self, target: &BranchName) -> Applied {
        self.apply(&Mutation::Rebase {
            target: target.clone(),
        })
    }

    /// Replay a commit onto HEAD.
    pub fn cherry_pick(&mut self, commit: &CommitId) -> Applied {
        self.apply(&Mutation::CherryPick {
            commit: commit.clone(),
        })
    }

    /// Undo a commit's file changes on HEAD.
    pub fn revert(&mut self, commit: &CommitId) -> Applied {
        self.apply(&Mutation::Revert {
            commit: commit.clone(),
        })
    }

    /// Move HEAD's branch to a commit.
    pub fn reset(&mut self, commit: &CommitId, mode: ResetMode) -> Applied {
        self.apply(&Mutation::Reset {
            commit: commit.clone(),
            mode,
        })
    }

    /// Replace HEAD's commit.
    pub fn amend(&mut self, message: Option<&str>) -> Applied {
        self.apply(&Mutation::Amend {
            message: message.map(str::to_string),
        })
    }

    // =========================================================================
    // Whole-snapshot operations
    // =========================================================================

    /// Restore the snapshot this repository was created with.
    pub fn reset_app(&mut self) {
        self.state = self.initial.clone();
        self.next_file_id = next_file_id_for(&self.state);
    }

    /// Replace the current snapshot wholesale.
    ///
    /// The snapshot is trusted; no invariant checks run. The next file id
    /// becomes one past the highest id it contains.
    pub fn load_snapshot(&mut self, state: RepoState) {
        self.next_file_id = next_file_id_for(&state);
        self.state = state;
    }

    /// Hash of the canonical snapshot encoding.
    pub fn fingerprint(&self) -> Result<Fingerprint, SnapshotError> {
        self.state.fingerprint()
    }
}
