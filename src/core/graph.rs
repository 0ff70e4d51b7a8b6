//! core::graph
//!
//! Read-only queries over the commit DAG.
//!
//! # Architecture
//!
//! The commit graph is a DAG where:
//! - Nodes are commits keyed by [`CommitId`]
//! - Edges point from child to parent (stored as [`Parent`] on each commit)
//! - Roots have `Parent::Root`
//!
//! Every traversal here is iterative with an explicit work list, so long
//! histories cannot exhaust the stack, and every traversal tolerates a
//! malformed graph: a parent id with no commit behind it contributes
//! nothing, and revisiting a commit ends the walk.
//!
//! [`Parent`]: super::commit::Parent

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::commit::Commit;
use super::types::{CommitId, FileRef};

/// A borrowed view over a commit map.
#[derive(Debug, Clone, Copy)]
pub struct CommitGraph<'a> {
    commits: &'a BTreeMap<CommitId, Commit>,
}

impl<'a> CommitGraph<'a> {
    /// Wrap a commit map.
    pub fn new(commits: &'a BTreeMap<CommitId, Commit>) -> Self {
        Self { commits }
    }

    /// Longest-path distance of every commit from a root.
    ///
    /// `depth(root) = 0` and `depth(c) = 1 + max(depth(p))` over the parents
    /// that exist. A dangling parent id contributes nothing (it counts as
    /// depth -1), so a commit whose only parent is missing sits at depth 0.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use branchlab::core::commit::{Commit, Parent};
    /// use branchlab::core::graph::CommitGraph;
    /// use branchlab::core::types::CommitId;
    ///
    /// let a = CommitId::new("a").unwrap();
    /// let b = CommitId::new("b").unwrap();
    /// let mut commits = BTreeMap::new();
    /// commits.insert(a.clone(), Commit { id: a.clone(), parent: Parent::Root, message: "a".into(), files: vec![] });
    /// commits.insert(b.clone(), Commit { id: b.clone(), parent: Parent::Single(a.clone()), message: "b".into(), files: vec![] });
    ///
    /// let depths = CommitGraph::new(&commits).depths();
    /// assert_eq!(depths[&a], 0);
    /// assert_eq!(depths[&b], 1);
    /// ```
    pub fn depths(&self) -> BTreeMap<CommitId, usize> {
        let mut memo: BTreeMap<CommitId, usize> = BTreeMap::new();
        let mut in_progress: HashSet<&CommitId> = HashSet::new();

        for start in self.commits.keys() {
            if memo.contains_key(start) {
                continue;
            }

            // (commit, parents already pushed)
            let mut stack: Vec<(&CommitId, bool)> = vec![(start, false)];
            while let Some((id, expanded)) = stack.pop() {
                if memo.contains_key(id) {
                    continue;
                }
                let Some(commit) = self.commits.get(id) else {
                    continue;
                };

                if expanded {
                    let depth = commit
                        .parent
                        .ids()
                        .filter_map(|p| memo.get(p).copied())
                        .max()
                        .map_or(0, |d| d + 1);
                    memo.insert(id.clone(), depth);
                    in_progress.remove(id);
                    continue;
                }

                in_progress.insert(id);
                stack.push((id, true));
                for parent in commit.parent.ids() {
                    if self.commits.contains_key(parent)
                        && !memo.contains_key(parent)
                        && !in_progress.contains(parent)
                    {
                        stack.push((parent, false));
                    }
                }
            }
        }

        memo
    }

    /// Commits reached by following first parents from `tip`, tip first.
    ///
    /// Stops at a root, at a missing commit, or on revisiting a commit.
    pub fn first_parent_walk(&self, tip: &CommitId) -> Vec<&'a CommitId> {
        let mut walk = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.commits.get(tip);

        while let Some(commit) = current {
            if !seen.insert(&commit.id) {
                break;
            }
            walk.push(&commit.id);
            current = commit.parent.first().and_then(|p| self.commits.get(p));
        }

        walk
    }

    /// Files a mixed reset hands back to the working directory.
    ///
    /// Walks first parents from `old_tip` and collects the files of every
    /// commit strictly between the two (both ends excluded), in walk order.
    /// When `target` is `old_tip`, its direct parent, or not on that
    /// first-parent chain at all, the delta is empty. Files a later commit
    /// in the range removed are not filtered out; callers get the union of
    /// what each commit carries.
    pub fn reset_delta(&self, old_tip: &CommitId, target: &CommitId) -> Vec<FileRef> {
        let walk = self.first_parent_walk(old_tip);
        let stop = match walk.iter().position(|id| *id == target) {
            Some(stop) if stop > 1 => stop,
            _ => return Vec::new(),
        };

        walk[1..stop]
            .iter()
            .filter_map(|id| self.commits.get(*id))
            .flat_map(|c| c.files.iter().cloned())
            .collect()
    }

    /// Parent references that point at no commit, as (child, missing parent).
    pub fn dangling_parents(&self) -> Vec<(&'a CommitId, &'a CommitId)> {
        self.commits
            .values()
            .flat_map(|c| c.parent.ids().map(move |p| (&c.id, p)))
            .filter(|(_, p)| !self.commits.contains_key(*p))
            .collect()
    }

    /// Check the graph for cycles.
    ///
    /// Returns `Some(commit)` for a commit found on a cycle.
    pub fn find_cycle(&self) -> Option<CommitId> {
        let mut done: BTreeSet<&CommitId> = BTreeSet::new();

        for start in self.commits.keys() {
            if done.contains(start) {
                continue;
            }

            let mut path: HashSet<&CommitId> = HashSet::new();
            // (commit, parents already pushed)
            let mut stack: Vec<(&CommitId, bool)> = vec![(start, false)];
            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    path.remove(id);
                    done.insert(id);
                    continue;
                }
                if done.contains(id) {
                    continue;
                }
                if !path.insert(id) {
                    return Some(id.clone());
                }
                stack.push((id, true));
                if let Some(commit) = self.commits.get(id) {
                    for parent in commit.parent.ids() {
                        if path.contains(parent) {
                            return Some(parent.clone());
                        }
                        if self.commits.contains_key(parent) && !done.contains(parent) {
                            stack.push((parent, false));
                        }
                    }
                }
            }
        }

        None
    }
}
