//! engine::transition
//!
//! Pure transition functions over repository snapshots.
//!
//! # Architecture
//!
//! A [`Mutation`] is a typed description of one model operation. [`apply`]
//! maps `(&RepoState, &Mutation)` to either a brand new snapshot or a
//! [`ModelError`]; the input snapshot is never touched, so a rejected
//! mutation leaves nothing to roll back.
//!
//! Operations that change history (commit, branch, switch, merge, rebase,
//! cherry-pick, revert, reset, amend) append exactly one line to the
//! snapshot's log. File-shuffling operations (stage, unstage, add) do not;
//! whoever drives them records the line instead.
//!
//! # Invariants
//!
//! - `apply` is deterministic given the same id source state
//! - On `Err`, no snapshot was produced
//! - Log entries are only ever appended

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::IdSource;
use crate::core::commit::{Commit, Parent};
use crate::core::graph::CommitGraph;
use crate::core::state::{Branch, Head, RepoState};
use crate::core::types::{BranchName, CommitId, FileId, FileRef};

/// How far a reset reaches beyond moving the branch ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetMode {
    /// Move the ref only.
    Soft,
    /// Move the ref, fold staged and rolled-back files into the working directory.
    Mixed,
    /// Move the ref, empty the working directory and staging area.
    Hard,
}

impl ResetMode {
    /// Parse a `--soft` / `--mixed` / `--hard` flag.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--soft" => Some(ResetMode::Soft),
            "--mixed" => Some(ResetMode::Mixed),
            "--hard" => Some(ResetMode::Hard),
            _ => None,
        }
    }

    /// Mode name without dashes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetMode::Soft => "soft",
            ResetMode::Mixed => "mixed",
            ResetMode::Hard => "hard",
        }
    }
}

impl fmt::Display for ResetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single model operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mutation {
    /// Move a file from the working directory to the staging area.
    Stage { file: FileId },
    /// Move a file from the staging area back to the working directory.
    Unstage { file: FileId },
    /// Stage every working-directory file.
    StageAll,
    /// Unstage every staged file.
    UnstageAll,
    /// Drop every uncommitted file.
    DiscardAllChanges,
    /// Create a new untracked file.
    AddFile { file: FileRef },
    /// Commit the staging area onto HEAD.
    Commit { message: String },
    /// Create a branch (with its empty commit) off HEAD.
    CreateBranch { name: BranchName },
    /// Create a branch and move HEAD onto it.
    CreateAndSwitch { name: BranchName },
    /// Delete a branch ref.
    DeleteBranch { name: BranchName },
    /// Rename a branch ref.
    RenameBranch { from: BranchName, to: BranchName },
    /// Move HEAD to another branch.
    SwitchBranch { name: BranchName },
    /// Merge another branch into HEAD.
    Merge { source: BranchName },
    /// Move HEAD's ref to another branch's tip.
    Rebase { target: BranchName },
    /// Replay a commit's message and files onto HEAD.
    CherryPick { commit: CommitId },
    /// Undo a commit's file changes on HEAD.
    Revert { commit: CommitId },
    /// Move HEAD's ref to a commit.
    Reset { commit: CommitId, mode: ResetMode },
    /// Replace HEAD's commit.
    Amend { message: Option<String> },
}

impl Mutation {
    /// Whether a successful application appends its own log line.
    pub fn is_self_logging(&self) -> bool {
        !matches!(
            self,
            Mutation::Stage { .. }
                | Mutation::Unstage { .. }
                | Mutation::StageAll
                | Mutation::UnstageAll
                | Mutation::DiscardAllChanges
                | Mutation::AddFile { .. }
        )
    }

    /// Get a human-readable description of this mutation.
    pub fn description(&self) -> String {
        match self {
            Mutation::Stage { file } => format!("stage file {file}"),
            Mutation::Unstage { file } => format!("unstage file {file}"),
            Mutation::StageAll => "stage all files".to_string(),
            Mutation::UnstageAll => "unstage all files".to_string(),
            Mutation::DiscardAllChanges => "discard all changes".to_string(),
            Mutation::AddFile { file } => format!("add file '{}'", file.name),
            Mutation::Commit { message } => format!("commit \"{message}\""),
            Mutation::CreateBranch { name } => format!("create branch '{name}'"),
            Mutation::CreateAndSwitch { name } => format!("create and switch to '{name}'"),
            Mutation::DeleteBranch { name } => format!("delete branch '{name}'"),
            Mutation::RenameBranch { from, to } => format!("rename '{from}' to '{to}'"),
            Mutation::SwitchBranch { name } => format!("switch to '{name}'"),
            Mutation::Merge { source } => format!("merge '{source}'"),
            Mutation::Rebase { target } => format!("rebase onto '{target}'"),
            Mutation::CherryPick { commit } => format!("cherry-pick {commit}"),
            Mutation::Revert { commit } => format!("revert {commit}"),
            Mutation::Reset { commit, mode } => format!("reset --{mode} {commit}"),
            Mutation::Amend { .. } => "amend HEAD".to_string(),
        }
    }
}

/// Reasons a mutation is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("file {0} is not in the working directory")]
    NotInWorkingDirectory(FileId),

    #[error("file {0} is not staged")]
    NotStaged(FileId),

    #[error("working directory is empty")]
    NothingToStage,

    #[error("staging area is empty")]
    NothingStaged,

    #[error("no changes to discard")]
    NoChanges,

    #[error("file id {0} is already in use")]
    FileIdInUse(FileId),

    #[error("commit message is empty")]
    EmptyMessage,

    #[error("nothing to commit: staging area is empty")]
    NothingToCommit,

    #[error("branch '{0}' already exists")]
    BranchExists(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("branch '{0}' is protected")]
    ProtectedBranch(String),

    #[error("cannot delete the checked-out branch '{0}'")]
    DeleteCurrentBranch(String),

    #[error("branch is already named '{0}'")]
    SameName(String),

    #[error("already on branch '{0}'")]
    AlreadyOnBranch(String),

    #[error("cannot merge branch '{0}' into itself")]
    MergeIntoSelf(String),

    #[error("cannot rebase branch '{0}' onto itself")]
    RebaseOntoSelf(String),

    #[error("commit {0} not found")]
    CommitNotFound(String),

    #[error("HEAD does not resolve to a commit")]
    HeadUnresolved,

    #[error("commit ids exhausted")]
    IdsExhausted,

    #[error("file ids exhausted")]
    FileIdsExhausted,

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Apply a mutation, producing the next snapshot.
///
/// # Errors
///
/// Returns the first precondition the mutation fails. `state` is left as it was.
///
/// # Example
///
/// ```
/// use branchlab::core::samples;
/// use branchlab::engine::ids::SequentialIds;
/// use branchlab::engine::transition::{apply, Mutation};
///
/// let state = samples::tutorial();
/// let mut ids = SequentialIds::default();
/// let next = apply(&state, &Mutation::Commit { message: "Add API".into() }, &mut ids).unwrap();
///
/// assert!(next.staging_area.is_empty());
/// assert_eq!(next.logs.last().unwrap(), "Created commit 000001: \"Add API\"");
/// ```
pub fn apply(
    state: &RepoState,
    mutation: &Mutation,
    ids: &mut dyn IdSource,
) -> Result<RepoState, ModelError> {
    let mut next = state.clone();
    match mutation {
        Mutation::Stage { file } => stage(&mut next, *file)?,
        Mutation::Unstage { file } => unstage(&mut next, *file)?,
        Mutation::StageAll => {
            if next.working_directory.is_empty() {
                return Err(ModelError::NothingToStage);
            }
            let moved = std::mem::take(&mut next.working_directory);
            next.staging_area.extend(moved);
        }
        Mutation::UnstageAll => {
            if next.staging_area.is_empty() {
                return Err(ModelError::NothingStaged);
            }
            let moved = std::mem::take(&mut next.staging_area);
            next.working_directory.extend(moved);
        }
        Mutation::DiscardAllChanges => {
            if next.working_directory.is_empty() && next.staging_area.is_empty() {
                return Err(ModelError::NoChanges);
            }
            next.working_directory.clear();
            next.staging_area.clear();
        }
        Mutation::AddFile { file } => {
            let taken = next
                .working_directory
                .iter()
                .chain(next.staging_area.iter())
                .any(|f| f.id == file.id);
            if taken {
                return Err(ModelError::FileIdInUse(file.id));
            }
            next.working_directory.push(file.clone());
        }
        Mutation::Commit { message } => commit(&mut next, message, ids)?,
        Mutation::CreateBranch { name } => {
            let id = create_branch(&mut next, name, ids)?;
            next.logs.push(format!("Created branch '{name}' at {id}"));
        }
        Mutation::CreateAndSwitch { name } => {
            create_branch(&mut next, name, ids)?;
            next.head = Head::branch(name.clone());
            next.logs.push(format!("Switched to a new branch '{name}'"));
        }
        Mutation::DeleteBranch { name } => delete_branch(&mut next, name)?,
        Mutation::RenameBranch { from, to } => rename_branch(&mut next, from, to)?,
        Mutation::SwitchBranch { name } => {
            if next.branch(name.as_str()).is_none() {
                return Err(ModelError::BranchNotFound(name.to_string()));
            }
            if next.head.name() == name {
                return Err(ModelError::AlreadyOnBranch(name.to_string()));
            }
            next.head = Head::branch(name.clone());
            next.logs.push(format!("Switched to branch '{name}'"));
        }
        Mutation::Merge { source } => merge(&mut next, source, ids)?,
        Mutation::Rebase { target } => rebase(&mut next, target)?,
        Mutation::CherryPick { commit } => cherry_pick(&mut next, commit, ids)?,
        Mutation::Revert { commit } => revert(&mut next, commit, ids)?,
        Mutation::Reset { commit, mode } => reset(&mut next, commit, *mode)?,
        Mutation::Amend { message } => amend(&mut next, message.as_deref(), ids)?,
    }
    Ok(next)
}

fn head_tip(state: &RepoState) -> Result<CommitId, ModelError> {
    state
        .head_commit()
        .map(|c| c.id.clone())
        .ok_or(ModelError::HeadUnresolved)
}

fn fresh_id(state: &RepoState, ids: &mut dyn IdSource) -> Result<CommitId, ModelError> {
    ids.issue(&state.commits).ok_or(ModelError::IdsExhausted)
}

/// Point HEAD's branch at `id`.
fn advance_head(state: &mut RepoState, id: &CommitId) -> Result<(), ModelError> {
    let head = state.head.name().clone();
    let branch = state
        .branches
        .get_mut(&head)
        .ok_or(ModelError::HeadUnresolved)?;
    branch.commit_id = id.clone();
    Ok(())
}

fn insert_commit(state: &mut RepoState, commit: Commit) {
    state.commits.insert(commit.id.clone(), commit);
}

fn stage(state: &mut RepoState, file: FileId) -> Result<(), ModelError> {
    let index = state
        .working_directory
        .iter()
        .position(|f| f.id == file)
        .ok_or(ModelError::NotInWorkingDirectory(file))?;
    let moved = state.working_directory.remove(index);
    state.staging_area.push(moved);
    Ok(())
}

fn unstage(state: &mut RepoState, file: FileId) -> Result<(), ModelError> {
    let index = state
        .staging_area
        .iter()
        .position(|f| f.id == file)
        .ok_or(ModelError::NotStaged(file))?;
    let moved = state.staging_area.remove(index);
    state.working_directory.push(moved);
    Ok(())
}

fn commit(state: &mut RepoState, message: &str, ids: &mut dyn IdSource) -> Result<(), ModelError> {
    if message.trim().is_empty() {
        return Err(ModelError::EmptyMessage);
    }
    if state.staging_area.is_empty() {
        return Err(ModelError::NothingToCommit);
    }

    let parent = head_tip(state)?;
    let id = fresh_id(state, ids)?;
    let files = std::mem::take(&mut state.staging_area);
    insert_commit(
        state,
        Commit {
            id: id.clone(),
            parent: Parent::Single(parent),
            message: message.to_string(),
            files,
        },
    );
    advance_head(state, &id)?;
    state.logs.push(format!("Created commit {id}: \"{message}\""));
    Ok(())
}

/// Create `name` with a fresh empty commit on top of HEAD. Returns the new commit id.
fn create_branch(
    state: &mut RepoState,
    name: &BranchName,
    ids: &mut dyn IdSource,
) -> Result<CommitId, ModelError> {
    if state.branches.contains_key(name) {
        return Err(ModelError::BranchExists(name.to_string()));
    }

    let parent = head_tip(state)?;
    let id = fresh_id(state, ids)?;
    insert_commit(
        state,
        Commit {
            id: id.clone(),
            parent: Parent::Single(parent),
            message: format!("Create branch '{name}'"),
            files: Vec::new(),
        },
    );
    let position = state.next_free_position();
    state.branches.insert(
        name.clone(),
        Branch {
            name: name.clone(),
            commit_id: id.clone(),
            position,
        },
    );
    Ok(id)
}

fn delete_branch(state: &mut RepoState, name: &BranchName) -> Result<(), ModelError> {
    if !state.branches.contains_key(name) {
        return Err(ModelError::BranchNotFound(name.to_string()));
    }
    if name.is_main() {
        return Err(ModelError::ProtectedBranch(name.to_string()));
    }
    if state.head.name() == name {
        return Err(ModelError::DeleteCurrentBranch(name.to_string()));
    }

    if let Some(removed) = state.branches.remove(name) {
        state
            .logs
            .push(format!("Deleted branch '{name}' (was {})", removed.commit_id));
    }
    Ok(())
}

fn rename_branch(
    state: &mut RepoState,
    from: &BranchName,
    to: &BranchName,
) -> Result<(), ModelError> {
    if !state.branches.contains_key(from) {
        return Err(ModelError::BranchNotFound(from.to_string()));
    }
    if from == to {
        return Err(ModelError::SameName(to.to_string()));
    }
    if state.branches.contains_key(to) {
        return Err(ModelError::BranchExists(to.to_string()));
    }
    if from.is_main() {
        return Err(ModelError::ProtectedBranch(from.to_string()));
    }

    if let Some(mut branch) = state.branches.remove(from) {
        branch.name = to.clone();
        state.branches.insert(to.clone(), branch);
    }
    if state.head.name() == from {
        state.head = Head::branch(to.clone());
    }
    state.logs.push(format!("Renamed branch '{from}' to '{to}'"));
    Ok(())
}

fn merge(
    state: &mut RepoState,
    source: &BranchName,
    ids: &mut dyn IdSource,
) -> Result<(), ModelError> {
    let head = state.head.name().clone();
    if &head == source {
        return Err(ModelError::MergeIntoSelf(source.to_string()));
    }
    let source_tip = state
        .branch(source.as_str())
        .map(|b| b.commit_id.clone())
        .ok_or_else(|| ModelError::BranchNotFound(source.to_string()))?;
    let tip = head_tip(state)?;

    let ours = state.commits.get(&tip).map(|c| c.files.clone()).unwrap_or_default();
    let theirs = state
        .commits
        .get(&source_tip)
        .map(|c| c.files.clone())
        .unwrap_or_default();
    let mut files = ours;
    for file in theirs {
        if !files.iter().any(|f| f.id == file.id) {
            files.push(file);
        }
    }

    let id = fresh_id(state, ids)?;
    insert_commit(
        state,
        Commit {
            id: id.clone(),
            parent: Parent::Merge(tip, source_tip),
            message: format!("Merge branch '{source}' into {head}"),
            files,
        },
    );
    advance_head(state, &id)?;
    state
        .logs
        .push(format!("Merged branch '{source}' into '{head}' ({id})"));
    Ok(())
}

fn rebase(state: &mut RepoState, target: &BranchName) -> Result<(), ModelError> {
    let head = state.head.name().clone();
    if &head == target {
        return Err(ModelError::RebaseOntoSelf(target.to_string()));
    }
    let target_tip = state
        .branch(target.as_str())
        .map(|b| b.commit_id.clone())
        .ok_or_else(|| ModelError::BranchNotFound(target.to_string()))?;

    advance_head(state, &target_tip)?;
    state
        .logs
        .push(format!("Rebased '{head}' onto '{target}' ({target_tip})"));
    Ok(())
}

fn cherry_pick(
    state: &mut RepoState,
    picked: &CommitId,
    ids: &mut dyn IdSource,
) -> Result<(), ModelError> {
    let source = state
        .commits
        .get(picked)
        .cloned()
        .ok_or_else(|| ModelError::CommitNotFound(picked.to_string()))?;
    let tip = head_tip(state)?;
    let id = fresh_id(state, ids)?;

    insert_commit(
        state,
        Commit {
            id: id.clone(),
            parent: Parent::Single(tip),
            message: source.message,
            files: source.files,
        },
    );
    advance_head(state, &id)?;
    let head = state.head.name().clone();
    state
        .logs
        .push(format!("Cherry-picked {picked} onto '{head}' as {id}"));
    Ok(())
}

/// Files left after undoing `reverted` on top of `current`.
///
/// Compared against the reverted commit's first parent: files it added are
/// dropped from `current`, files it dropped are restored unless already
/// present. A root commit is undone by dropping every file it introduced.
fn reverted_files(
    current: &[FileRef],
    reverted: &Commit,
    parent: Option<&Commit>,
) -> Vec<FileRef> {
    let in_list = |list: &[FileRef], id: FileId| list.iter().any(|f| f.id == id);

    let Some(parent) = parent else {
        return current
            .iter()
            .filter(|f| !reverted.has_file(f.id))
            .cloned()
            .collect();
    };

    let added: Vec<FileId> = reverted
        .files
        .iter()
        .filter(|f| !parent.has_file(f.id))
        .map(|f| f.id)
        .collect();
    let removed = parent.files.iter().filter(|f| !reverted.has_file(f.id));

    let mut files: Vec<FileRef> = current
        .iter()
        .filter(|f| !added.contains(&f.id))
        .cloned()
        .collect();
    for file in removed {
        if !in_list(&files, file.id) {
            files.push(file.clone());
        }
    }
    files
}

fn revert(
    state: &mut RepoState,
    target: &CommitId,
    ids: &mut dyn IdSource,
) -> Result<(), ModelError> {
    let reverted = state
        .commits
        .get(target)
        .ok_or_else(|| ModelError::CommitNotFound(target.to_string()))?;
    let tip = head_tip(state)?;
    let current = state
        .commits
        .get(&tip)
        .map(|c| c.files.as_slice())
        .unwrap_or_default();
    let parent = reverted.parent.first().and_then(|p| state.commits.get(p));
    let files = reverted_files(current, reverted, parent);
    let message = format!("Revert \"{}\"", reverted.message);

    let id = fresh_id(state, ids)?;
    insert_commit(
        state,
        Commit {
            id: id.clone(),
            parent: Parent::Single(tip),
            message,
            files,
        },
    );
    advance_head(state, &id)?;
    state.logs.push(format!("Reverted {target} as {id}"));
    Ok(())
}

/// Concatenate file lists, keeping one entry per id: the first position
/// an id appeared at, holding the last value seen for it.
fn merge_by_id(files: impl IntoIterator<Item = FileRef>) -> Vec<FileRef> {
    let mut merged: Vec<FileRef> = Vec::new();
    let mut index: HashMap<FileId, usize> = HashMap::new();
    for file in files {
        match index.get(&file.id) {
            Some(&at) => merged[at] = file,
            None => {
                index.insert(file.id, merged.len());
                merged.push(file);
            }
        }
    }
    merged
}

fn reset(state: &mut RepoState, target: &CommitId, mode: ResetMode) -> Result<(), ModelError> {
    if !state.commits.contains_key(target) {
        return Err(ModelError::CommitNotFound(target.to_string()));
    }
    let old_tip = head_tip(state)?;
    advance_head(state, target)?;

    match mode {
        ResetMode::Soft => {}
        ResetMode::Mixed => {
            let delta = CommitGraph::new(&state.commits).reset_delta(&old_tip, target);
            let working = std::mem::take(&mut state.working_directory);
            let staged = std::mem::take(&mut state.staging_area);
            state.working_directory = merge_by_id(working.into_iter().chain(delta).chain(staged));
        }
        ResetMode::Hard => {
            state.working_directory.clear();
            state.staging_area.clear();
        }
    }

    let head = state.head.name().clone();
    state
        .logs
        .push(format!("Reset '{head}' to {target} (--{mode})"));
    Ok(())
}

fn amend(
    state: &mut RepoState,
    message: Option<&str>,
    ids: &mut dyn IdSource,
) -> Result<(), ModelError> {
    let old = state.head_commit().cloned().ok_or(ModelError::HeadUnresolved)?;
    let id = fresh_id(state, ids)?;

    let message = match message {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ => old.message.clone(),
    };
    let mut files = old.files.clone();
    files.append(&mut state.staging_area);

    state.commits.remove(&old.id);
    for commit in state.commits.values_mut() {
        if commit.parent.references(&old.id) {
            commit.parent = commit.parent.rewrite(&old.id, &id);
        }
    }
    for branch in state.branches.values_mut() {
        if branch.commit_id == old.id {
            branch.commit_id = id.clone();
        }
    }
    insert_commit(
        state,
        Commit {
            id: id.clone(),
            parent: old.parent,
            message,
            files,
        },
    );
    state.logs.push(format!("Amended {} as {id}", old.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;
    use crate::engine::ids::SequentialIds;

    fn branch(name: &str) -> BranchName {
        BranchName::new(name).unwrap()
    }

    fn cid(id: &str) -> CommitId {
        CommitId::new(id).unwrap()
    }

    fn run(state: &RepoState, mutation: Mutation) -> Result<RepoState, ModelError> {
        apply(state, &mutation, &mut SequentialIds::default())
    }

    fn ids_of(files: &[FileRef]) -> Vec<u32> {
        files.iter().map(|f| f.id.0).collect()
    }

    mod staging {
        use super::*;

        #[test]
        fn stage_moves_file_to_end_of_staging() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::Stage { file: FileId(6) }).unwrap();
            assert!(next.working_directory.is_empty());
            assert_eq!(ids_of(&next.staging_area), vec![7, 6]);
            assert_eq!(next.logs, state.logs);
        }

        #[test]
        fn stage_missing_file_rejected() {
            let state = samples::tutorial();
            let err = run(&state, Mutation::Stage { file: FileId(7) }).unwrap_err();
            assert_eq!(err, ModelError::NotInWorkingDirectory(FileId(7)));
        }

        #[test]
        fn unstage_moves_file_back() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::Unstage { file: FileId(7) }).unwrap();
            assert_eq!(ids_of(&next.working_directory), vec![6, 7]);
            assert!(next.staging_area.is_empty());
        }

        #[test]
        fn stage_all_and_unstage_all_preserve_order() {
            let state = samples::tutorial();
            let staged = run(&state, Mutation::StageAll).unwrap();
            assert_eq!(ids_of(&staged.staging_area), vec![7, 6]);
            let unstaged = run(&staged, Mutation::UnstageAll).unwrap();
            assert_eq!(ids_of(&unstaged.working_directory), vec![7, 6]);
            assert_eq!(run(&unstaged, Mutation::UnstageAll), Err(ModelError::NothingStaged));
        }

        #[test]
        fn discard_empties_both_areas() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::DiscardAllChanges).unwrap();
            assert!(next.working_directory.is_empty());
            assert!(next.staging_area.is_empty());
            assert_eq!(run(&next, Mutation::DiscardAllChanges), Err(ModelError::NoChanges));
        }

        #[test]
        fn add_file_rejects_taken_id() {
            let state = samples::tutorial();
            let err = run(
                &state,
                Mutation::AddFile {
                    file: FileRef::new(7, "clash.ts"),
                },
            )
            .unwrap_err();
            assert_eq!(err, ModelError::FileIdInUse(FileId(7)));
        }
    }

    mod commits {
        use super::*;

        #[test]
        fn commit_moves_staging_into_new_tip() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::Commit { message: "x".into() }).unwrap();
            let tip = next.head_commit().unwrap();
            assert_eq!(tip.parent, Parent::Single(cid("d8e9f0")));
            assert_eq!(ids_of(&tip.files), vec![7]);
            assert!(next.staging_area.is_empty());
            assert_eq!(next.logs.len(), state.logs.len() + 1);
        }

        #[test]
        fn empty_staging_rejected() {
            let mut state = samples::tutorial();
            state.staging_area.clear();
            let err = run(&state, Mutation::Commit { message: "x".into() }).unwrap_err();
            assert_eq!(err, ModelError::NothingToCommit);
        }

        #[test]
        fn blank_message_rejected() {
            let state = samples::tutorial();
            let err = run(&state, Mutation::Commit { message: "  ".into() }).unwrap_err();
            assert_eq!(err, ModelError::EmptyMessage);
        }

        #[test]
        fn amend_replaces_head_and_rewrites_refs() {
            let mut state = samples::tutorial();
            // A second branch sharing the tip and a child commit on top of it.
            state.branches.insert(
                branch("mirror"),
                Branch {
                    name: branch("mirror"),
                    commit_id: cid("d8e9f0"),
                    position: 2,
                },
            );
            state.commits.insert(
                cid("child"),
                Commit {
                    id: cid("child"),
                    parent: Parent::Single(cid("d8e9f0")),
                    message: "child".into(),
                    files: vec![],
                },
            );

            let next = run(&state, Mutation::Amend { message: Some("Polished".into()) }).unwrap();
            assert!(next.commit("d8e9f0").is_none());

            let tip = next.head_commit().unwrap();
            assert_eq!(tip.message, "Polished");
            assert_eq!(tip.parent, Parent::Single(cid("c4553b")));
            assert_eq!(ids_of(&tip.files), vec![5, 7]);
            assert_eq!(next.branches["mirror"].commit_id, tip.id);
            assert_eq!(next.commits["child"].parent, Parent::Single(tip.id.clone()));
            assert!(next.staging_area.is_empty());
        }

        #[test]
        fn amend_without_message_keeps_old_message() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::Amend { message: None }).unwrap();
            assert_eq!(next.head_commit().unwrap().message, "Complete feature logic");
        }
    }

    mod branches {
        use super::*;

        #[test]
        fn create_branch_adds_empty_commit_at_free_position() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::CreateBranch { name: branch("dev") }).unwrap();
            let dev = &next.branches["dev"];
            assert_eq!(dev.position, 2);
            let commit = &next.commits[&dev.commit_id];
            assert!(commit.files.is_empty());
            assert_eq!(commit.parent, Parent::Single(cid("d8e9f0")));
            assert_eq!(next.head.name().as_str(), "feature");
        }

        #[test]
        fn create_existing_branch_rejected() {
            let state = samples::tutorial();
            let err = run(&state, Mutation::CreateBranch { name: branch("main") }).unwrap_err();
            assert_eq!(err, ModelError::BranchExists("main".into()));
        }

        #[test]
        fn create_and_switch_logs_once() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::CreateAndSwitch { name: branch("dev") }).unwrap();
            assert_eq!(next.head.name().as_str(), "dev");
            assert_eq!(next.logs.len(), state.logs.len() + 1);
            assert_eq!(next.logs.last().unwrap(), "Switched to a new branch 'dev'");
        }

        #[test]
        fn main_is_never_deletable() {
            let state = samples::tutorial();
            let err = run(&state, Mutation::DeleteBranch { name: branch("main") }).unwrap_err();
            assert_eq!(err, ModelError::ProtectedBranch("main".into()));
        }

        #[test]
        fn current_branch_not_deletable() {
            let state = samples::tutorial();
            let err = run(&state, Mutation::DeleteBranch { name: branch("feature") }).unwrap_err();
            assert_eq!(err, ModelError::DeleteCurrentBranch("feature".into()));
        }

        #[test]
        fn rename_moves_head_along() {
            let state = samples::tutorial();
            let next = run(
                &state,
                Mutation::RenameBranch {
                    from: branch("feature"),
                    to: branch("login"),
                },
            )
            .unwrap();
            assert!(next.branch("feature").is_none());
            assert_eq!(next.branches["login"].name.as_str(), "login");
            assert_eq!(next.branches["login"].position, 1);
            assert_eq!(next.head.name().as_str(), "login");
        }

        #[test]
        fn rename_rejections() {
            let state = samples::tutorial();
            let rename = |from: &str, to: &str| {
                run(
                    &state,
                    Mutation::RenameBranch {
                        from: branch(from),
                        to: branch(to),
                    },
                )
                .unwrap_err()
            };
            assert_eq!(rename("ghost", "x"), ModelError::BranchNotFound("ghost".into()));
            assert_eq!(rename("feature", "feature"), ModelError::SameName("feature".into()));
            assert_eq!(rename("feature", "main"), ModelError::BranchExists("main".into()));
            assert_eq!(rename("main", "trunk"), ModelError::ProtectedBranch("main".into()));
        }

        #[test]
        fn switch_updates_head_only() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::SwitchBranch { name: branch("main") }).unwrap();
            assert_eq!(next.head.name().as_str(), "main");
            assert_eq!(next.working_directory, state.working_directory);
            assert_eq!(next.staging_area, state.staging_area);
            assert_eq!(
                run(&next, Mutation::SwitchBranch { name: branch("main") }),
                Err(ModelError::AlreadyOnBranch("main".into()))
            );
        }
    }

    mod history {
        use super::*;

        #[test]
        fn merge_unions_files_first_parent_first() {
            let state = run(&samples::tutorial(), Mutation::SwitchBranch { name: branch("main") })
                .unwrap();
            let next = run(&state, Mutation::Merge { source: branch("feature") }).unwrap();
            let tip = next.head_commit().unwrap();
            assert_eq!(tip.parent, Parent::Merge(cid("a568e1"), cid("d8e9f0")));
            assert_eq!(ids_of(&tip.files), vec![3, 5]);
            assert_eq!(next.branches["feature"].commit_id, cid("d8e9f0"));
        }

        #[test]
        fn merge_into_self_rejected() {
            let state = samples::tutorial();
            let err = run(&state, Mutation::Merge { source: branch("feature") }).unwrap_err();
            assert_eq!(err, ModelError::MergeIntoSelf("feature".into()));
        }

        #[test]
        fn rebase_moves_ref_to_target_tip() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::Rebase { target: branch("main") }).unwrap();
            assert_eq!(next.branches["feature"].commit_id, cid("a568e1"));
            assert_eq!(next.commits.len(), state.commits.len());
        }

        #[test]
        fn cherry_pick_copies_message_and_files() {
            let state = samples::tutorial();
            let next = run(&state, Mutation::CherryPick { commit: cid("a568e1") }).unwrap();
            let tip = next.head_commit().unwrap();
            assert_eq!(tip.message, "Refactor main component");
            assert_eq!(ids_of(&tip.files), vec![3]);
            assert_eq!(tip.parent, Parent::Single(cid("d8e9f0")));
        }

        #[test]
        fn unknown_commit_rejected() {
            let state = samples::tutorial();
            let unknown = cid("nope");
            for mutation in [
                Mutation::CherryPick { commit: unknown.clone() },
                Mutation::Revert { commit: unknown.clone() },
                Mutation::Reset {
                    commit: unknown.clone(),
                    mode: ResetMode::Hard,
                },
            ] {
                assert_eq!(run(&state, mutation), Err(ModelError::CommitNotFound("nope".into())));
            }
        }

        #[test]
        fn revert_then_revert_restores_file() {
            let mut state = samples::tutorial();
            state.staging_area = vec![FileRef::new(7, "api.ts")];
            let mut ids = SequentialIds::default();
            let added = apply(&state, &Mutation::Commit { message: "api".into() }, &mut ids)
                .unwrap();
            let added_id = added.head_commit_id().unwrap().clone();

            let reverted = apply(&added, &Mutation::Revert { commit: added_id }, &mut ids).unwrap();
            assert!(!reverted.head_commit().unwrap().has_file(FileId(7)));
            assert_eq!(reverted.head_commit().unwrap().message, "Revert \"api\"");

            let revert_id = reverted.head_commit_id().unwrap().clone();
            let restored = apply(&reverted, &Mutation::Revert { commit: revert_id }, &mut ids)
                .unwrap();
            assert_eq!(ids_of(&restored.head_commit().unwrap().files), vec![7]);
        }

        #[test]
        fn revert_root_drops_its_files() {
            let root = Commit {
                id: cid("r"),
                parent: Parent::Root,
                message: "root".into(),
                files: vec![FileRef::new(0, "README.md")],
            };
            let current = vec![FileRef::new(0, "README.md"), FileRef::new(9, "x.ts")];
            assert_eq!(ids_of(&reverted_files(&current, &root, None)), vec![9]);
        }

        #[test]
        fn hard_reset_clears_both_areas() {
            let state = samples::tutorial();
            let next = run(
                &state,
                Mutation::Reset {
                    commit: cid("3009a"),
                    mode: ResetMode::Hard,
                },
            )
            .unwrap();
            assert!(next.working_directory.is_empty());
            assert!(next.staging_area.is_empty());
            assert_eq!(next.branches["feature"].commit_id, cid("3009a"));
            assert!(next.commit("d8e9f0").is_some());
        }

        #[test]
        fn soft_reset_keeps_files() {
            let state = samples::tutorial();
            let next = run(
                &state,
                Mutation::Reset {
                    commit: cid("7a19bf"),
                    mode: ResetMode::Soft,
                },
            )
            .unwrap();
            assert_eq!(next.working_directory, state.working_directory);
            assert_eq!(next.staging_area, state.staging_area);
        }

        #[test]
        fn mixed_reset_folds_range_and_staging_into_working_directory() {
            let state = samples::tutorial();
            let next = run(
                &state,
                Mutation::Reset {
                    commit: cid("7a19bf"),
                    mode: ResetMode::Mixed,
                },
            )
            .unwrap();
            // working (6), then c4553b (4), then staged (7); the old tip is skipped
            assert_eq!(ids_of(&next.working_directory), vec![6, 4, 7]);
            assert!(next.staging_area.is_empty());
            assert_eq!(next.logs.last().unwrap(), "Reset 'feature' to 7a19bf (--mixed)");
        }

        #[test]
        fn merge_by_id_keeps_first_slot_last_value() {
            let merged = merge_by_id(vec![
                FileRef::new(1, "a"),
                FileRef::new(2, "b"),
                FileRef::new(1, "a2"),
            ]);
            assert_eq!(merged, vec![FileRef::new(1, "a2"), FileRef::new(2, "b")]);
        }
    }

    #[test]
    fn self_logging_classification() {
        assert!(!Mutation::Stage { file: FileId(1) }.is_self_logging());
        assert!(!Mutation::StageAll.is_self_logging());
        assert!(Mutation::Commit { message: "m".into() }.is_self_logging());
        assert!(Mutation::Amend { message: None }.is_self_logging());
    }

    #[test]
    fn rejected_mutation_leaves_input_untouched() {
        let state = samples::tutorial();
        let before = state.clone();
        let _ = run(&state, Mutation::DeleteBranch { name: branch("main") });
        assert_eq!(state, before);
    }
}
