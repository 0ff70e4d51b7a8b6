//! engine::ledger
//!
//! Session history: the command-recall buffer and the terminal transcript.
//!
//! # Architecture
//!
//! Two append-only records sit beside the repository:
//!
//! - [`CommandRecall`] keeps submitted lines newest-first, bounded by the
//!   configured recall limit, with an arrow-key style cursor.
//! - [`Transcript`] keeps every line shown in the terminal, tagged as
//!   input, output or error, with the time it was written.
//!
//! The domain log (`RepoState::logs`) is not here; it belongs to the
//! snapshot and changes only through repository operations.
//!
//! **Important:** Nothing in the ledger feeds back into the model.
//!
//! # Example
//!
//! ```
//! use branchlab::engine::ledger::CommandRecall;
//!
//! let mut recall = CommandRecall::new(10);
//! recall.push("git add .");
//! recall.push("git commit -m \"x\"");
//!
//! assert_eq!(recall.older(), Some("git commit -m \"x\""));
//! assert_eq!(recall.older(), Some("git add ."));
//! assert_eq!(recall.older(), Some("git add ."));
//! assert_eq!(recall.newer(), Some("git commit -m \"x\""));
//! assert_eq!(recall.newer(), None);
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::types::UtcTimestamp;

/// Bounded, newest-first buffer of submitted command lines.
#[derive(Debug, Clone)]
pub struct CommandRecall {
    /// Newest first.
    entries: VecDeque<String>,
    limit: usize,
    /// `None` is the blank prompt; `Some(i)` shows `entries[i]`.
    cursor: Option<usize>,
}

impl CommandRecall {
    /// Create a buffer holding at most `limit` lines (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
            cursor: None,
        }
    }

    /// Record a submitted line. Blank lines are ignored.
    ///
    /// Resets the cursor to the blank prompt.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.cursor = None;
        if line.trim().is_empty() {
            return;
        }
        self.entries.push_front(line);
        self.entries.truncate(self.limit);
    }

    /// Step toward older entries (arrow up). Clamps at the oldest.
    ///
    /// Returns `None` only when the buffer is empty.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        let index = self.cursor.map_or(0, |c| (c + 1).min(last));
        self.cursor = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    /// Step toward newer entries (arrow down).
    ///
    /// Returns `None` once past the newest entry: the prompt is blank again.
    pub fn newer(&mut self) -> Option<&str> {
        match self.cursor {
            None | Some(0) => {
                self.cursor = None;
                None
            }
            Some(c) => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1).map(String::as_str)
            }
        }
    }

    /// Forget the navigation position (the user started typing).
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Kind of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A line the user typed.
    Input,
    /// A success message.
    Output,
    /// A failure message.
    Error,
}

/// One line of terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLine {
    pub kind: LineKind,
    pub content: String,
    pub at: UtcTimestamp,
}

impl TerminalLine {
    /// Create a line stamped with the current time.
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            at: UtcTimestamp::now(),
        }
    }
}

/// Ordered terminal transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<TerminalLine>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, kind: LineKind, content: impl Into<String>) {
        self.lines.push(TerminalLine::new(kind, content));
    }

    /// All lines, oldest first.
    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Recall buffer plus transcript for one session.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    pub recall: CommandRecall,
    pub transcript: Transcript,
}

impl HistoryLedger {
    /// Create an empty ledger with the given recall capacity.
    pub fn new(recall_limit: usize) -> Self {
        Self {
            recall: CommandRecall::new(recall_limit),
            transcript: Transcript::new(),
        }
    }

    /// Record a submitted line and the response it produced.
    pub fn record(&mut self, input: &str, success: bool, message: &str) {
        self.recall.push(input);
        self.transcript.push(LineKind::Input, input);
        let kind = if success {
            LineKind::Output
        } else {
            LineKind::Error
        };
        self.transcript.push(kind, message);
    }
}
