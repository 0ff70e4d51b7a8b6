//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. The
//! `format_*` helpers build plain text and never print, so the shell and
//! one-shot commands share them and tests can inspect them.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::core::state::RepoState;
use crate::core::types::FileRef;
use crate::layout::RenderGraph;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_files(files: &[FileRef]) -> String {
    let items: Vec<String> = files.iter().map(|f| format!("{} (#{})", f.name, f.id)).collect();
    format_list(&items, "  ")
}

/// `git status`-style summary of HEAD and the two file areas.
pub fn format_status(state: &RepoState) -> String {
    let mut out = format!("On branch {}\n", state.head.name());
    match state.head_commit() {
        Some(commit) => out.push_str(&format!("HEAD at {} {}\n", commit.id, commit.message)),
        None => out.push_str("HEAD does not resolve to a commit\n"),
    }

    if state.staging_area.is_empty() && state.working_directory.is_empty() {
        out.push_str("\nnothing to commit, working tree clean");
        return out;
    }
    if !state.staging_area.is_empty() {
        out.push_str("\nChanges to be committed:\n");
        out.push_str(&format_files(&state.staging_area));
        out.push('\n');
    }
    if !state.working_directory.is_empty() {
        out.push_str("\nUntracked files:\n");
        out.push_str(&format_files(&state.working_directory));
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// The operation log, oldest first, numbered from 1.
pub fn format_log(state: &RepoState) -> String {
    let width = state.logs.len().to_string().len();
    state
        .logs
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}  {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text rendering of a layout: one row per commit, one column per lane.
///
/// `o` marks a commit in its lane, `+` a branch-tip marker and `|` a lane
/// that continues past the row. Branch tips are named after the message,
/// HEAD's branch as `HEAD -> name`.
pub fn format_graph(graph: &RenderGraph) -> String {
    let lanes = graph.lane_count().max(1);

    // Depth span occupied by each lane.
    let mut spans: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for node in &graph.nodes {
        let span = spans.entry(node.lane).or_insert((node.depth, node.depth));
        span.0 = span.0.min(node.depth);
        span.1 = span.1.max(node.depth);
    }

    let header: Vec<&str> = graph.labels.iter().map(|l| l.name.as_str()).collect();
    let mut rows = vec![format!("lanes: {}", header.join(", "))];

    for node in graph.nodes.iter().filter(|n| !n.is_marker) {
        let mut cells = String::with_capacity(lanes * 2);
        for lane in 0..lanes {
            let marker_here = graph
                .nodes
                .iter()
                .any(|m| m.is_marker && m.lane == lane && m.commit_id == node.commit_id);
            let cell = if lane == node.lane {
                'o'
            } else if marker_here {
                '+'
            } else {
                match spans.get(&lane) {
                    Some(&(lo, hi)) if lo < node.depth && node.depth < hi => '|',
                    _ => ' ',
                }
            };
            cells.push(cell);
            cells.push(' ');
        }

        let tips: Vec<String> = graph
            .labels
            .iter()
            .filter(|l| l.commit_id == node.commit_id)
            .map(|l| {
                if l.is_head {
                    format!("HEAD -> {}", l.name)
                } else {
                    l.name.to_string()
                }
            })
            .collect();
        let decoration = if tips.is_empty() {
            String::new()
        } else {
            format!(" ({})", tips.join(", "))
        };

        rows.push(format!(
            "{}{} {}{}",
            cells, node.commit_id, node.message, decoration
        ));
    }

    rows.join("\n")
}
