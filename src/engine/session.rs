//! engine::session
//!
//! One interactive session: a repository, the interpreter in front of it,
//! and the history ledger beside it.
//!
//! # Example
//!
//! ```
//! use branchlab::core::samples;
//! use branchlab::engine::repository::Repository;
//! use branchlab::engine::session::Session;
//!
//! let mut session = Session::new(Repository::new(samples::tutorial()), 50);
//! let result = session.submit("git switch main");
//!
//! assert!(result.success);
//! assert_eq!(session.ledger().recall.len(), 1);
//! assert_eq!(session.ledger().transcript.lines().len(), 2);
//! ```

use super::ledger::HistoryLedger;
use super::repository::Repository;
use crate::command::{self, CommandResult};
use crate::core::state::RepoState;

/// A repository driven through the command interpreter.
#[derive(Debug)]
pub struct Session {
    repo: Repository,
    ledger: HistoryLedger,
}

impl Session {
    /// Start a session with an empty ledger.
    pub fn new(repo: Repository, recall_limit: usize) -> Self {
        Self {
            repo,
            ledger: HistoryLedger::new(recall_limit),
        }
    }

    /// Interpret one line and record it with its result.
    pub fn submit(&mut self, line: &str) -> CommandResult {
        let result = command::execute(&mut self.repo, line);
        self.ledger.record(line, result.success, &result.message);
        result
    }

    /// Restore the starting snapshot. The ledger is kept.
    pub fn reset(&mut self) {
        self.repo.reset_app();
    }

    /// Replace the snapshot with a trusted import.
    pub fn load(&mut self, state: RepoState) {
        self.repo.load_snapshot(state);
    }

    /// The current snapshot.
    pub fn state(&self) -> &RepoState {
        self.repo.state()
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut HistoryLedger {
        &mut self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;
    use crate::engine::ids::SequentialIds;
    use crate::engine::ledger::LineKind;

    fn session() -> Session {
        let repo = Repository::with_ids(samples::tutorial(), Box::new(SequentialIds::default()));
        Session::new(repo, 10)
    }

    #[test]
    fn failures_are_recorded_as_errors() {
        let mut session = session();
        let result = session.submit("git push");
        assert!(!result.success);

        let lines = session.ledger().transcript.lines();
        assert_eq!(lines[1].kind, LineKind::Error);
        assert_eq!(lines[1].content, result.message);
    }

    #[test]
    fn reset_keeps_history() {
        let mut session = session();
        session.submit("git add .");
        session.reset();
        assert_eq!(session.state(), &samples::tutorial());
        assert_eq!(session.ledger().recall.len(), 1);
    }

    #[test]
    fn load_replaces_snapshot() {
        let mut session = session();
        session.load(samples::showcase());
        assert_eq!(session.state().head.name().as_str(), "main");
        assert!(session.submit("git switch dashboard").success);
        assert_eq!(
            session.repository().next_file_id(),
            Some(samples::showcase().max_file_id().unwrap().0 + 1)
        );
    }
}
