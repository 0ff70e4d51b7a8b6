//! core::verify
//!
//! Fast snapshot verification.
//!
//! Checks the invariants every mutation must preserve:
//! - Every parent reference resolves to an existing commit
//! - The commit graph is acyclic
//! - Every branch ref resolves to an existing commit
//! - HEAD names an existing branch
//! - `main` exists
//! - Branch map keys agree with the branch records they index
//! - No duplicate file ids inside the working directory or staging area
//! - Working directory and staging area are disjoint by file id
//!
//! # Invariants
//!
//! - Never mutates the snapshot
//! - Must be deterministic (errors are reported in a fixed order)

use std::collections::HashSet;

use thiserror::Error;

use super::graph::CommitGraph;
use super::state::RepoState;
use super::types::{FileId, FileRef};

/// Errors from verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("commit {child} references missing parent {parent}")]
    ParentMissing { child: String, parent: String },

    #[error("cycle detected in commit graph at: {0}")]
    CycleDetected(String),

    #[error("branch '{branch}' points at missing commit {commit}")]
    BranchTargetMissing { branch: String, commit: String },

    #[error("branch record '{record}' is stored under key '{key}'")]
    BranchKeyMismatch { key: String, record: String },

    #[error("HEAD names missing branch '{0}'")]
    HeadMissing(String),

    #[error("branch 'main' does not exist")]
    MainMissing,

    #[error("file id {id} appears twice in the {area}")]
    DuplicateFile { id: FileId, area: &'static str },

    #[error("file id {0} is both staged and unstaged")]
    FileInBothAreas(FileId),
}

/// Result of fast verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }
}

/// Verify every snapshot invariant.
pub fn fast_verify(state: &RepoState) -> VerifyResult {
    let mut errors = Vec::new();
    let graph = CommitGraph::new(&state.commits);

    for (child, parent) in graph.dangling_parents() {
        errors.push(VerifyError::ParentMissing {
            child: child.to_string(),
            parent: parent.to_string(),
        });
    }

    if let Some(commit) = graph.find_cycle() {
        errors.push(VerifyError::CycleDetected(commit.to_string()));
    }

    for (key, branch) in &state.branches {
        if key != &branch.name {
            errors.push(VerifyError::BranchKeyMismatch {
                key: key.to_string(),
                record: branch.name.to_string(),
            });
        }
        if !state.commits.contains_key(&branch.commit_id) {
            errors.push(VerifyError::BranchTargetMissing {
                branch: key.to_string(),
                commit: branch.commit_id.to_string(),
            });
        }
    }

    if !state.branches.contains_key(state.head.name()) {
        errors.push(VerifyError::HeadMissing(state.head.name().to_string()));
    }

    if state.branch("main").is_none() {
        errors.push(VerifyError::MainMissing);
    }

    let unstaged = check_unique(&state.working_directory, "working directory", &mut errors);
    let staged = check_unique(&state.staging_area, "staging area", &mut errors);
    let mut overlap: Vec<FileId> = unstaged.intersection(&staged).copied().collect();
    overlap.sort_unstable();
    errors.extend(overlap.into_iter().map(VerifyError::FileInBothAreas));

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}

fn check_unique(
    files: &[FileRef],
    area: &'static str,
    errors: &mut Vec<VerifyError>,
) -> HashSet<FileId> {
    let mut seen = HashSet::new();
    for file in files {
        if !seen.insert(file.id) {
            errors.push(VerifyError::DuplicateFile { id: file.id, area });
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;
    use crate::core::types::{BranchName, CommitId};

    #[test]
    fn tutorial_state_is_valid() {
        let result = fast_verify(&samples::tutorial());
        assert!(result.ok, "{:?}", result.errors);
    }

    #[test]
    fn showcase_state_is_valid() {
        let result = fast_verify(&samples::showcase());
        assert!(result.ok, "{:?}", result.errors);
    }

    #[test]
    fn dangling_branch_detected() {
        let mut state = samples::tutorial();
        state
            .branches
            .get_mut("feature")
            .unwrap()
            .commit_id = CommitId::new("nowhere").unwrap();
        let result = fast_verify(&state);
        assert!(!result.ok);
        assert_eq!(
            result.errors,
            vec![VerifyError::BranchTargetMissing {
                branch: "feature".into(),
                commit: "nowhere".into(),
            }]
        );
    }

    #[test]
    fn head_and_main_must_exist() {
        let mut state = samples::tutorial();
        state.branches.remove("main");
        state.head = crate::core::state::Head::branch(BranchName::new("ghost").unwrap());
        let result = fast_verify(&state);
        assert!(result.errors.contains(&VerifyError::HeadMissing("ghost".into())));
        assert!(result.errors.contains(&VerifyError::MainMissing));
    }

    #[test]
    fn file_in_both_areas_detected() {
        let mut state = samples::tutorial();
        let file = state.working_directory[0].clone();
        state.staging_area.push(file.clone());
        let result = fast_verify(&state);
        assert_eq!(result.errors, vec![VerifyError::FileInBothAreas(file.id)]);
    }

    #[test]
    fn duplicate_file_detected() {
        let mut state = samples::tutorial();
        let file = state.staging_area[0].clone();
        state.staging_area.push(file.clone());
        let result = fast_verify(&state);
        assert_eq!(
            result.errors,
            vec![VerifyError::DuplicateFile {
                id: file.id,
                area: "staging area"
            }]
        );
    }
}
