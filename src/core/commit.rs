//! core::commit
//!
//! Commit records and their parent linkage.
//!
//! # Wire format
//!
//! The `parent` field is `null` for a root commit, a single id for an
//! ordinary commit, and a two-element array for a merge commit (first
//! element = the branch that received the merge, second = the merged-in
//! tip). In memory this is the tagged [`Parent`] variant so traversal code
//! handles every shape exhaustively.

use serde::{Deserialize, Serialize};

use super::types::{CommitId, FileId, FileRef};

/// Parent linkage of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Option<ParentWire>", into = "Option<ParentWire>")]
pub enum Parent {
    /// A root commit.
    Root,
    /// An ordinary commit.
    Single(CommitId),
    /// A merge commit: (receiving tip, merged-in tip).
    Merge(CommitId, CommitId),
}

/// JSON shape of a non-null `parent` field.
#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentWire {
    One(CommitId),
    Many(Vec<CommitId>),
}

impl TryFrom<Option<ParentWire>> for Parent {
    type Error = String;

    fn try_from(wire: Option<ParentWire>) -> Result<Self, Self::Error> {
        match wire {
            None => Ok(Parent::Root),
            Some(ParentWire::One(id)) => Ok(Parent::Single(id)),
            Some(ParentWire::Many(ids)) => {
                let mut ids = ids.into_iter();
                match (ids.next(), ids.next(), ids.next()) {
                    (None, _, _) => Ok(Parent::Root),
                    (Some(only), None, _) => Ok(Parent::Single(only)),
                    (Some(first), Some(second), None) => Ok(Parent::Merge(first, second)),
                    (Some(_), Some(_), Some(_)) => {
                        Err("a commit has at most two parents".to_string())
                    }
                }
            }
        }
    }
}

impl From<Parent> for Option<ParentWire> {
    fn from(parent: Parent) -> Self {
        match parent {
            Parent::Root => None,
            Parent::Single(id) => Some(ParentWire::One(id)),
            Parent::Merge(first, second) => Some(ParentWire::Many(vec![first, second])),
        }
    }
}

impl Parent {
    /// Flattened parent ids, first parent first.
    pub fn ids(&self) -> impl Iterator<Item = &CommitId> {
        let (first, second) = match self {
            Parent::Root => (None, None),
            Parent::Single(id) => (Some(id), None),
            Parent::Merge(first, second) => (Some(first), Some(second)),
        };
        first.into_iter().chain(second)
    }

    /// The first parent, if any.
    pub fn first(&self) -> Option<&CommitId> {
        match self {
            Parent::Root => None,
            Parent::Single(id) | Parent::Merge(id, _) => Some(id),
        }
    }

    /// Whether any parent slot references `id`.
    pub fn references(&self, id: &CommitId) -> bool {
        self.ids().any(|p| p == id)
    }

    /// Replace every occurrence of `from` with `to`.
    pub fn rewrite(&self, from: &CommitId, to: &CommitId) -> Parent {
        let swap = |id: &CommitId| if id == from { to.clone() } else { id.clone() };
        match self {
            Parent::Root => Parent::Root,
            Parent::Single(id) => Parent::Single(swap(id)),
            Parent::Merge(first, second) => Parent::Merge(swap(first), swap(second)),
        }
    }
}

/// An immutable commit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub parent: Parent,
    pub message: String,
    pub files: Vec<FileRef>,
}

impl Commit {
    /// Whether this commit has no parent.
    pub fn is_root(&self) -> bool {
        matches!(self.parent, Parent::Root)
    }

    /// Whether this commit has two parents.
    pub fn is_merge(&self) -> bool {
        matches!(self.parent, Parent::Merge(..))
    }

    /// Whether a file with this id is embedded in the commit.
    pub fn has_file(&self, id: FileId) -> bool {
        self.files.iter().any(|f| f.id == id)
    }
}
