//! command
//!
//! The command interpreter: one line of text in, at most one repository
//! mutation out.
//!
//! # Architecture
//!
//! ```text
//! line -> lexer::lex -> parser::parse -> resolve -> Repository -> CommandResult
//! ```
//!
//! - [`lexer`] runs the grammar gates and tokenizes.
//! - [`parser`] checks argument shapes, flags and name syntax.
//! - [`execute`] resolves file names against the current snapshot, checks
//!   the rules the model leaves to the interpreter (amending the root), then
//!   drives exactly one repository operation.
//!
//! # Invariants
//!
//! - A failed command leaves the snapshot byte-identical.
//! - A successful command adds exactly one line to the operation log.
//!   Operations that log for themselves are not logged again; staging
//!   commands have their success message appended here.
//!
//! # Example
//!
//! ```
//! use branchlab::command::execute;
//! use branchlab::core::samples;
//! use branchlab::engine::repository::Repository;
//!
//! let mut repo = Repository::new(samples::tutorial());
//!
//! let result = execute(&mut repo, "git add utils.ts");
//! assert!(result.success);
//! assert_eq!(result.message, "Staged 'utils.ts'");
//!
//! let result = execute(&mut repo, "git branch -d main");
//! assert!(!result.success);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{CommandError, ErrorKind};
pub use parser::{AddTarget, GitCommand};

use serde::Serialize;

use crate::core::types::BranchName;
use crate::engine::repository::{Applied, Repository};
use crate::engine::transition::ModelError;

/// Outcome of one interpreted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
}

impl CommandResult {
    /// A successful result.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed result.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<String, CommandError>> for CommandResult {
    fn from(result: Result<String, CommandError>) -> Self {
        match result {
            Ok(message) => CommandResult::ok(message),
            Err(e) => CommandResult::fail(capitalize(&e.to_string())),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Interpret one command line against the repository.
///
/// Never panics; every failure is a `CommandResult` with `success: false`.
pub fn execute(repo: &mut Repository, line: &str) -> CommandResult {
    interpret(repo, line).into()
}

/// Interpret one command line, keeping the structured error.
///
/// # Errors
///
/// Any validation or reference failure. The repository is unchanged.
pub fn interpret(repo: &mut Repository, line: &str) -> Result<String, CommandError> {
    let tokens = lexer::lex(line)?;
    let command = parser::parse(&tokens)?;
    perform(repo, command)
}

/// Run an already-parsed command.
///
/// # Errors
///
/// Reference failures, and model rejections passed through as
/// [`CommandError::Rejected`].
pub fn perform(repo: &mut Repository, command: GitCommand) -> Result<String, CommandError> {
    match command {
        GitCommand::Add(AddTarget::All) => {
            let count = repo.state().working_directory.len();
            changed(repo.stage_all())?;
            let message = format!("Staged {count} file(s)");
            repo.append_log(&message);
            Ok(message)
        }
        GitCommand::Add(AddTarget::Path(name)) => {
            let file = repo
                .state()
                .working_file(&name)
                .map(|f| f.id)
                .ok_or_else(|| CommandError::FileNotFound(name.clone()))?;
            changed(repo.stage(file))?;
            let message = format!("Staged '{name}'");
            repo.append_log(&message);
            Ok(message)
        }
        GitCommand::Unstage(name) => {
            let file = repo
                .state()
                .staged_file(&name)
                .map(|f| f.id)
                .ok_or_else(|| CommandError::FileNotStaged(name.clone()))?;
            changed(repo.unstage(file))?;
            let message = format!("Unstaged '{name}'");
            repo.append_log(&message);
            Ok(message)
        }
        GitCommand::Commit { message } => self_logged(repo, |r| r.commit(&message)),
        GitCommand::Amend { message } => {
            let head = repo.state().head_commit().ok_or(ModelError::HeadUnresolved)?;
            if head.is_root() {
                return Err(CommandError::AmendRoot);
            }
            self_logged(repo, |r| r.amend(message.as_deref()))
        }
        GitCommand::CreateBranch(name) => self_logged(repo, |r| r.create_branch(&name)),
        GitCommand::CreateAndSwitch(name) => self_logged(repo, |r| r.create_and_switch(&name)),
        GitCommand::DeleteBranch(name) => self_logged(repo, |r| r.delete_branch(&name)),
        GitCommand::RenameBranch { from, to } => {
            let from = match from {
                Some(from) => from,
                None => current_branch(repo)?,
            };
            self_logged(repo, |r| r.rename_branch(&from, &to))
        }
        GitCommand::Switch(name) => self_logged(repo, |r| r.switch_branch(&name)),
        GitCommand::Merge(source) => self_logged(repo, |r| r.merge(&source)),
        GitCommand::Rebase(target) => self_logged(repo, |r| r.rebase(&target)),
        GitCommand::Revert(commit) => self_logged(repo, |r| r.revert(&commit)),
        GitCommand::CherryPick(commit) => self_logged(repo, |r| r.cherry_pick(&commit)),
        GitCommand::Reset { commit, mode } => self_logged(repo, |r| r.reset(&commit, mode)),
    }
}

fn changed(applied: Applied) -> Result<(), CommandError> {
    match applied {
        Applied::Changed => Ok(()),
        Applied::Unchanged(reason) => Err(CommandError::Rejected(reason)),
    }
}

/// Drive an operation that writes its own log line and report that line.
fn self_logged(
    repo: &mut Repository,
    op: impl FnOnce(&mut Repository) -> Applied,
) -> Result<String, CommandError> {
    changed(op(repo))?;
    repo.state()
        .logs
        .last()
        .cloned()
        .ok_or_else(|| CommandError::Rejected(ModelError::Invariant("log is empty".into())))
}

fn current_branch(repo: &Repository) -> Result<BranchName, CommandError> {
    let name = repo.state().head.name();
    if repo.state().branches.contains_key(name.as_str()) {
        Ok(name.clone())
    } else {
        Err(CommandError::Rejected(ModelError::HeadUnresolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;
    use crate::engine::ids::SequentialIds;

    fn repo() -> Repository {
        Repository::with_ids(samples::tutorial(), Box::new(SequentialIds::default()))
    }

    #[test]
    fn failure_messages_are_capitalized() {
        let mut repo = repo();
        let result = execute(&mut repo, "");
        assert_eq!(result, CommandResult::fail("Empty command"));
    }

    #[test]
    fn add_unknown_file_is_reference_error() {
        let mut repo = repo();
        let err = interpret(&mut repo, "git add nope.ts").unwrap_err();
        assert_eq!(err, CommandError::FileNotFound("nope.ts".into()));
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn staging_commands_log_once() {
        let mut repo = repo();
        let logs = repo.state().logs.len();
        assert_eq!(interpret(&mut repo, "git add .").unwrap(), "Staged 1 file(s)");
        assert_eq!(
            interpret(&mut repo, "git unstage api.ts").unwrap(),
            "Unstaged 'api.ts'"
        );
        assert_eq!(repo.state().logs.len(), logs + 2);
    }

    #[test]
    fn add_all_on_empty_working_directory_fails() {
        let mut repo = repo();
        interpret(&mut repo, "git add .").unwrap();
        let err = interpret(&mut repo, "git add .").unwrap_err();
        assert_eq!(err, CommandError::Rejected(ModelError::NothingToStage));
    }

    #[test]
    fn self_logging_commands_report_their_log_line() {
        let mut repo = repo();
        let message = interpret(&mut repo, r#"git commit -m "Wire API""#).unwrap();
        assert_eq!(repo.state().logs.last(), Some(&message));
        assert!(message.starts_with("Created commit "));
    }

    #[test]
    fn amend_root_is_blocked() {
        let mut repo = repo();
        interpret(&mut repo, "git reset --hard f9821b").unwrap();
        let before = repo.fingerprint().unwrap();
        assert_eq!(
            interpret(&mut repo, "git commit --amend"),
            Err(CommandError::AmendRoot)
        );
        assert_eq!(repo.fingerprint().unwrap(), before);
    }

    #[test]
    fn rename_without_old_name_renames_current_branch() {
        let mut repo = repo();
        interpret(&mut repo, "git branch -m login").unwrap();
        assert!(repo.state().branches.contains_key("login"));
        assert_eq!(repo.state().head.name().as_str(), "login");
    }

    #[test]
    fn rejected_mutation_keeps_state() {
        let mut repo = repo();
        let before = repo.fingerprint().unwrap();
        let err = interpret(&mut repo, "git merge feature").unwrap_err();
        assert_eq!(
            err,
            CommandError::Rejected(ModelError::MergeIntoSelf("feature".into()))
        );
        assert_eq!(repo.fingerprint().unwrap(), before);
    }
}
