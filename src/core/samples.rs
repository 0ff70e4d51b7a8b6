//! core::samples
//!
//! Built-in datasets.
//!
//! - [`tutorial`] is the small starting repository a fresh session opens
//!   on: two branches that diverge at `7a19bf`, HEAD on `feature`, one
//!   unstaged and one staged file.
//! - [`showcase`] is a generated history of a busy project: a 75-commit
//!   trunk, twelve feature branches forking at different depths, and ten
//!   merges (five into `main`, the rest between features). It exercises
//!   every layout path: shared ancestors, cross-lane merges, markers and
//!   trunk commits no branch points at any more.
//!
//! Both are pure functions of nothing; calling them twice yields equal
//! snapshots.

use std::collections::BTreeMap;

use super::commit::{Commit, Parent};
use super::state::{Branch, Head, RepoState};
use super::types::{BranchName, CommitId, FileRef};

/// Which built-in dataset to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Tutorial,
    Showcase,
}

impl Sample {
    /// Lowercase name, as typed on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Sample::Tutorial => "tutorial",
            Sample::Showcase => "showcase",
        }
    }

    /// Build the snapshot.
    pub fn state(self) -> RepoState {
        match self {
            Sample::Tutorial => tutorial(),
            Sample::Showcase => showcase(),
        }
    }
}

fn cid(id: impl Into<String>) -> CommitId {
    CommitId::trusted(id)
}

fn bname(name: &str) -> BranchName {
    BranchName::trusted(name)
}

fn insert_branch(
    branches: &mut BTreeMap<BranchName, Branch>,
    name: &str,
    tip: &CommitId,
    position: u32,
) {
    let name = bname(name);
    branches.insert(
        name.clone(),
        Branch {
            name,
            commit_id: tip.clone(),
            position,
        },
    );
}

/// The tutorial starting state.
///
/// ```text
/// f9821b - 3009a - 7a19bf - a568e1          (main)
///                        \
///                         c4553b - d8e9f0   (feature, HEAD)
/// ```
pub fn tutorial() -> RepoState {
    let rows: [(&str, Option<&str>, &str, u32, &str); 6] = [
        ("f9821b", None, "Initial commit", 0, "README.md"),
        ("3009a", Some("f9821b"), "Add project setup", 1, "package.json"),
        ("7a19bf", Some("3009a"), "Release version 1.0", 2, "index.html"),
        ("a568e1", Some("7a19bf"), "Refactor main component", 3, "Main.tsx"),
        ("c4553b", Some("7a19bf"), "Begin feature implementation", 4, "Login.tsx"),
        ("d8e9f0", Some("c4553b"), "Complete feature logic", 5, "Login.css"),
    ];

    let commits = rows
        .iter()
        .map(|(id, parent, message, file_id, file_name)| {
            let commit = Commit {
                id: cid(*id),
                parent: parent.map_or(Parent::Root, |p| Parent::Single(cid(p))),
                message: message.to_string(),
                files: vec![FileRef::new(*file_id, *file_name)],
            };
            (commit.id.clone(), commit)
        })
        .collect();

    let mut branches = BTreeMap::new();
    insert_branch(&mut branches, "main", &cid("a568e1"), 0);
    insert_branch(&mut branches, "feature", &cid("d8e9f0"), 1);

    RepoState {
        commits,
        branches,
        head: Head::branch(bname("feature")),
        logs: vec![
            "Initialized empty Git repository".to_string(),
            "Switched to a new branch 'feature'".to_string(),
        ],
        working_directory: vec![FileRef::new(6, "utils.ts")],
        staging_area: vec![FileRef::new(7, "api.ts")],
    }
}

const TRUNK_COMMITS: usize = 75;

/// (branch, fork point on the trunk, commit count, lane position)
const FEATURES: [(&str, usize, usize, u32); 12] = [
    ("authentication", 10, 12, 1),
    ("dashboard", 22, 15, 2),
    ("api", 15, 20, 3),
    ("security", 40, 4, 4),
    ("mobile", 30, 18, 5),
    ("analytics", 45, 10, 6),
    ("ui", 20, 22, 7),
    ("performance", 50, 6, 8),
    ("i18n", 35, 14, 9),
    ("optimization", 55, 11, 10),
    ("testing", 12, 8, 11),
    ("deployment", 60, 7, 12),
];

/// A merge endpoint: a trunk commit by index, or a feature tip by name.
#[derive(Clone, Copy)]
enum Side {
    Trunk(usize),
    Tip(&'static str),
}

/// (receiving side, merged-in branch, message, branch that moves)
const MERGES: [(Side, &str, &str, &str); 10] = [
    (Side::Trunk(25), "authentication", "Merge authentication into main", "main"),
    (Side::Trunk(35), "security", "Merge security hotfix into main", "main"),
    (Side::Trunk(45), "dashboard", "Merge dashboard into main", "main"),
    (Side::Trunk(55), "api", "Merge API redesign into main", "main"),
    (Side::Trunk(65), "mobile", "Merge mobile support into main", "main"),
    (Side::Tip("dashboard"), "analytics", "Merge analytics into dashboard", "dashboard"),
    (Side::Tip("ui"), "mobile", "Merge mobile changes into UI branch", "ui"),
    (Side::Tip("api"), "authentication", "Merge auth improvements into API", "api"),
    (Side::Trunk(70), "performance", "Merge performance fixes into main", "main"),
    (Side::Tip("testing"), "deployment", "Merge deployment config into testing", "testing"),
];

const FILE_KINDS: [&str; 10] = [
    "component", "service", "util", "model", "controller", "middleware", "config", "test",
    "style", "asset",
];
const FILE_EXTENSIONS: [&str; 10] = [
    ".ts", ".tsx", ".js", ".jsx", ".css", ".scss", ".json", ".md", ".yml", ".xml",
];
const MESSAGE_TEMPLATES: [&str; 12] = [
    "Add {feature} functionality",
    "Fix issue #{n} in {module}",
    "Refactor {component} for better performance",
    "Update package-{m} to latest version",
    "Implement {feature} tests",
    "Optimize {module} hot path",
    "Add {feature} validation",
    "Hotfix for critical bug in {module}",
    "Document {component} props",
    "Add error handling for {feature}",
    "Add logging to {module}",
    "Cleanup unused imports in {component}",
];
const FEATURE_WORDS: [&str; 10] = [
    "authentication", "dashboard", "reporting", "analytics", "messaging", "notifications",
    "search", "upload", "export", "integration",
];
const MODULE_WORDS: [&str; 10] = [
    "user-service", "api-gateway", "database", "cache", "queue", "auth-module", "logging",
    "monitoring", "backup", "scheduler",
];
const COMPONENT_WORDS: [&str; 10] = [
    "UserProfile", "DataTable", "Navigation", "Modal", "Form", "Chart", "Sidebar", "Header",
    "Footer", "Card",
];

/// Deterministic, index-unique commit id: four hex digits of the index
/// followed by a two-digit hex check value.
fn showcase_id(index: usize) -> CommitId {
    let check = (index * 37 + 11) % 256;
    cid(format!("{index:04x}{check:02x}"))
}

fn file_name(counter: u32) -> String {
    let i = counter as usize;
    format!(
        "{}{}{}",
        FILE_KINDS[i % FILE_KINDS.len()],
        i / 10,
        FILE_EXTENSIONS[i % FILE_EXTENSIONS.len()]
    )
}

fn message(index: usize) -> String {
    MESSAGE_TEMPLATES[index % MESSAGE_TEMPLATES.len()]
        .replace("{feature}", FEATURE_WORDS[index % FEATURE_WORDS.len()])
        .replace("{module}", MODULE_WORDS[index % MODULE_WORDS.len()])
        .replace("{component}", COMPONENT_WORDS[index % COMPONENT_WORDS.len()])
        .replace("{n}", &(100 + index % 50).to_string())
        .replace("{m}", &(index % 10).to_string())
}

struct FileIds(u32);

impl FileIds {
    fn take(&mut self, count: usize) -> Vec<FileRef> {
        (0..count)
            .map(|_| {
                let id = self.0;
                self.0 += 1;
                FileRef::new(id, file_name(self.0))
            })
            .collect()
    }

    fn one(&mut self, name: impl FnOnce(u32) -> String) -> FileRef {
        let id = self.0;
        self.0 += 1;
        FileRef::new(id, name(self.0))
    }
}

/// The generated showcase repository. HEAD is on `main`.
pub fn showcase() -> RepoState {
    let mut commits = BTreeMap::new();
    let mut branches = BTreeMap::new();
    let mut files = FileIds(0);
    let mut add = |commit: Commit| {
        commits.insert(commit.id.clone(), commit);
    };

    let mut parent = Parent::Root;
    for i in 0..TRUNK_COMMITS {
        let id = showcase_id(i);
        add(Commit {
            id: id.clone(),
            parent,
            message: message(i),
            files: files.take(1 + i % 4),
        });
        parent = Parent::Single(id);
    }
    insert_branch(&mut branches, "main", &showcase_id(TRUNK_COMMITS - 1), 0);

    let mut counter = TRUNK_COMMITS;
    let mut tips: BTreeMap<&str, CommitId> = BTreeMap::new();
    for (name, fork, count, position) in FEATURES {
        let mut tip = showcase_id(fork);
        for i in 0..count {
            let id = showcase_id(counter);
            counter += 1;
            add(Commit {
                id: id.clone(),
                parent: Parent::Single(tip),
                message: format!("{name}: {}", message(counter)),
                files: files.take(1 + i % 3),
            });
            tip = id;
        }
        insert_branch(&mut branches, name, &tip, position);
        tips.insert(name, tip);
    }

    // Endpoints refer to the tips as they stood before any merge landed.
    let tip_of = |name: &str| tips.get(name).cloned().unwrap_or_else(|| showcase_id(0));
    for (into, from, text, moves) in MERGES {
        let first = match into {
            Side::Trunk(index) => showcase_id(index),
            Side::Tip(name) => tip_of(name),
        };
        let id = showcase_id(counter);
        counter += 1;
        add(Commit {
            id: id.clone(),
            parent: Parent::Merge(first, tip_of(from)),
            message: text.to_string(),
            files: vec![files.one(|n| format!("merge-{n}.md"))],
        });
        if let Some(branch) = branches.get_mut(moves) {
            branch.commit_id = id;
        }
    }

    let working_directory = vec![
        files.one(|_| "pending-feature.ts".to_string()),
        files.one(|_| "draft-component.tsx".to_string()),
    ];
    let staging_area = vec![files.one(|_| "ready-to-commit.js".to_string())];

    RepoState {
        commits,
        branches,
        head: Head::branch(BranchName::main()),
        logs: [
            "Initialized empty Git repository",
            "Created comprehensive development history",
            "Multiple feature branches developed in parallel",
            "Hotfixes applied for critical issues",
            "Performance optimizations implemented",
            "Security patches merged",
            "Ready for production deployment",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        working_directory,
        staging_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FileId;

    #[test]
    fn tutorial_matches_documented_shape() {
        let state = tutorial();
        assert_eq!(state.commits.len(), 6);
        assert_eq!(state.head.name().as_str(), "feature");
        assert_eq!(state.branches["main"].commit_id.as_str(), "a568e1");
        assert_eq!(state.branches["feature"].commit_id.as_str(), "d8e9f0");
        assert_eq!(state.branches["feature"].position, 1);
        assert_eq!(state.max_file_id(), Some(FileId(7)));
    }

    #[test]
    fn showcase_is_deterministic() {
        assert_eq!(showcase(), showcase());
    }

    #[test]
    fn showcase_has_expected_size() {
        let state = showcase();
        let feature_commits: usize = FEATURES.iter().map(|f| f.2).sum();
        assert_eq!(state.commits.len(), TRUNK_COMMITS + feature_commits + MERGES.len());
        assert_eq!(state.branches.len(), 13);
        assert_eq!(state.commits.values().filter(|c| c.is_merge()).count(), 10);
    }

    #[test]
    fn showcase_main_ends_in_performance_merge() {
        let state = showcase();
        let tip = state.head_commit().unwrap();
        assert_eq!(tip.message, "Merge performance fixes into main");
        assert_eq!(tip.parent.first(), Some(&showcase_id(70)));
    }

    #[test]
    fn showcase_file_ids_are_unique() {
        let state = showcase();
        let mut ids: Vec<_> = state
            .commits
            .values()
            .flat_map(|c| c.files.iter().map(|f| f.id))
            .chain(state.working_directory.iter().map(|f| f.id))
            .chain(state.staging_area.iter().map(|f| f.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn sample_enum_dispatches() {
        assert_eq!(Sample::Tutorial.state(), tutorial());
    }
}
