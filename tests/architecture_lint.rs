//! Architecture enforcement tests.
//!
//! The crate is layered:
//!
//! ```text
//! cli -> command -> engine -> core
//!          layout ----------> core
//! ```
//!
//! `core` and `layout` are pure data and geometry. They never reach up into
//! the engine, the interpreter or the CLI. The interpreter never touches the
//! CLI. These tests scan the sources so a stray `use` fails in CI.

use std::fs;
use std::path::{Path, PathBuf};

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(rust_files(&path));
        } else if path.extension().is_some_and(|e| e == "rs") {
            files.push(path);
        }
    }
    files.sort();
    files
}

/// Lines in `dir` that mention any of `forbidden`, outside comments.
fn violations(dir: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(dir);
    let mut found = Vec::new();
    for file in rust_files(&root) {
        let Ok(contents) = fs::read_to_string(&file) else {
            continue;
        };
        for (number, line) in contents.lines().enumerate() {
            let code = line.trim_start();
            if code.starts_with("//") {
                continue;
            }
            for pattern in forbidden {
                if code.contains(pattern) {
                    found.push(format!("{}:{}: {}", file.display(), number + 1, code));
                }
            }
        }
    }
    found
}

#[test]
fn core_stays_pure() {
    let found = violations(
        "src/core",
        &["crate::engine", "crate::command", "crate::cli", "crate::layout", "crate::ui"],
    );
    assert!(found.is_empty(), "core reaches upward:\n{}", found.join("\n"));
}

#[test]
fn layout_only_reads_core() {
    let found = violations(
        "src/layout",
        &["crate::engine", "crate::command", "crate::cli", "crate::ui"],
    );
    assert!(found.is_empty(), "layout reaches upward:\n{}", found.join("\n"));
}

#[test]
fn interpreter_does_not_touch_cli() {
    let found = violations("src/command", &["crate::cli", "crate::ui"]);
    assert!(found.is_empty(), "command reaches into the CLI:\n{}", found.join("\n"));
}

#[test]
fn only_the_repository_writes_snapshots() {
    // Outside the engine, the snapshot is only ever read.
    let mut found = Vec::new();
    for dir in ["src/command", "src/layout", "src/cli"] {
        found.extend(violations(dir, &["load_snapshot(", ".state_mut("]));
    }
    assert!(found.is_empty(), "snapshot written outside the engine:\n{}", found.join("\n"));
}

#[test]
fn scanned_directories_exist() {
    for dir in ["src/core", "src/layout", "src/command", "src/engine"] {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(dir);
        assert!(!rust_files(&root).is_empty(), "{dir} has no sources");
    }
}
