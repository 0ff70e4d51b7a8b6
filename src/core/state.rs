//! core::state
//!
//! The repository snapshot.
//!
//! A [`RepoState`] is a complete, self-consistent value: commits, branch
//! refs, HEAD, the operation log, the working directory and the staging
//! area. Mutations never edit a snapshot in place; the engine derives a new
//! snapshot and swaps it in whole.
//!
//! # Snapshot format
//!
//! ```json
//! {
//!   "commits":  { "f9821b": { "id": "f9821b", "parent": null, "message": "...", "files": [] } },
//!   "branches": { "main": { "name": "main", "commitId": "f9821b", "position": 0 } },
//!   "HEAD": { "type": "branch", "name": "main" },
//!   "logs": [],
//!   "workingDirectory": [],
//!   "stagingArea": []
//! }
//! ```
//!
//! Imported snapshots are trusted: loading performs no invariant checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::commit::Commit;
use super::types::{BranchName, CommitId, FileId, FileRef, Fingerprint};

/// Errors from snapshot import/export.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A named pointer to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: BranchName,
    pub commit_id: CommitId,
    /// Lane sort key; lowest free value is assigned on creation.
    #[serde(default)]
    pub position: u32,
}

/// The active ref. Always a branch; detached HEAD is not modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Head {
    Branch { name: BranchName },
}

impl Head {
    /// HEAD pointing at `name`.
    pub fn branch(name: BranchName) -> Self {
        Head::Branch { name }
    }

    /// The branch HEAD names.
    pub fn name(&self) -> &BranchName {
        match self {
            Head::Branch { name } => name,
        }
    }
}

/// A complete repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoState {
    pub commits: BTreeMap<CommitId, Commit>,
    pub branches: BTreeMap<BranchName, Branch>,
    #[serde(rename = "HEAD")]
    pub head: Head,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub working_directory: Vec<FileRef>,
    #[serde(default)]
    pub staging_area: Vec<FileRef>,
}

impl RepoState {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Parse` if the document is not a snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Parse)
    }

    /// Encode the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Encode)
    }

    /// Fingerprint of the canonical (compact JSON) encoding.
    ///
    /// Maps are ordered, so equal snapshots always encode identically.
    pub fn fingerprint(&self) -> Result<Fingerprint, SnapshotError> {
        let bytes = serde_json::to_vec(self).map_err(SnapshotError::Encode)?;
        Ok(Fingerprint::compute(&bytes))
    }

    /// The branch HEAD points at, if it resolves.
    pub fn head_branch(&self) -> Option<&Branch> {
        self.branches.get(self.head.name())
    }

    /// The commit id at the tip of HEAD's branch.
    pub fn head_commit_id(&self) -> Option<&CommitId> {
        self.head_branch().map(|b| &b.commit_id)
    }

    /// The commit at the tip of HEAD's branch.
    pub fn head_commit(&self) -> Option<&Commit> {
        self.head_commit_id().and_then(|id| self.commits.get(id))
    }

    /// Look up a commit by id string.
    pub fn commit(&self, id: &str) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// Look up a branch by name string.
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    /// Lowest non-negative position not used by any branch.
    pub fn next_free_position(&self) -> u32 {
        let mut used: Vec<u32> = self.branches.values().map(|b| b.position).collect();
        used.sort_unstable();
        used.dedup();
        let mut candidate = 0;
        for position in used {
            if position != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }

    /// Highest file id known anywhere in the snapshot.
    pub fn max_file_id(&self) -> Option<FileId> {
        self.commits
            .values()
            .flat_map(|c| c.files.iter())
            .chain(self.working_directory.iter())
            .chain(self.staging_area.iter())
            .map(|f| f.id)
            .max()
    }

    /// Find a working-directory file by name.
    pub fn working_file(&self, name: &str) -> Option<&FileRef> {
        self.working_directory.iter().find(|f| f.name == name)
    }

    /// Find a staged file by name.
    pub fn staged_file(&self, name: &str) -> Option<&FileRef> {
        self.staging_area.iter().find(|f| f.name == name)
    }

    /// Branches ordered by lane: ascending position, ties broken by name.
    pub fn branches_by_position(&self) -> Vec<&Branch> {
        let mut sorted: Vec<&Branch> = self.branches.values().collect();
        sorted.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        sorted
    }
}
