//! command::error
//!
//! Interpreter failures.
//!
//! Every failure is one of two kinds:
//! - **Validation**: the line itself is malformed (blank, unbalanced
//!   quotes, chained commands, missing arguments, bad flags or names)
//! - **Reference**: the line is well formed but names something that does
//!   not exist or may not be touched (unknown branch, commit or file,
//!   protected branch, amending the root)
//!
//! Neither kind is fatal. Both surface as a failed `CommandResult` with the
//! snapshot left exactly as it was.

use thiserror::Error;

use crate::engine::transition::ModelError;

/// Failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Reference,
}

/// Errors from interpreting a command line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unterminated quote")]
    UnbalancedQuotes,

    #[error("only one git command can be run at a time")]
    MultipleGit,

    #[error("commands must start with 'git'")]
    MissingGit,

    #[error("missing subcommand, try 'git commit -m \"message\"'")]
    MissingSubcommand,

    #[error("unsupported command: git {0}")]
    Unsupported(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown option '{option}' for git {command}")]
    UnknownOption {
        command: &'static str,
        option: String,
    },

    #[error("invalid reset mode '{0}', expected --soft, --mixed or --hard")]
    InvalidMode(String),

    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: String },

    #[error("invalid commit id '{0}'")]
    InvalidCommitId(String),

    #[error("file '{0}' not found in working directory")]
    FileNotFound(String),

    #[error("file '{0}' is not staged")]
    FileNotStaged(String),

    #[error("cannot amend the root commit")]
    AmendRoot,

    #[error("{0}")]
    Rejected(#[from] ModelError),
}

impl CommandError {
    /// Classify the failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Empty
            | CommandError::UnbalancedQuotes
            | CommandError::MultipleGit
            | CommandError::MissingGit
            | CommandError::MissingSubcommand
            | CommandError::Unsupported(_)
            | CommandError::Usage(_)
            | CommandError::UnknownOption { .. }
            | CommandError::InvalidMode(_)
            | CommandError::InvalidBranchName { .. }
            | CommandError::InvalidCommitId(_) => ErrorKind::Validation,

            CommandError::FileNotFound(_)
            | CommandError::FileNotStaged(_)
            | CommandError::AmendRoot => ErrorKind::Reference,

            CommandError::Rejected(reason) => match reason {
                ModelError::EmptyMessage => ErrorKind::Validation,
                _ => ErrorKind::Reference,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_are_validation() {
        assert_eq!(CommandError::MultipleGit.kind(), ErrorKind::Validation);
        assert_eq!(
            CommandError::InvalidMode("--medium".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CommandError::Rejected(ModelError::EmptyMessage).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn lookups_are_reference() {
        assert_eq!(CommandError::AmendRoot.kind(), ErrorKind::Reference);
        assert_eq!(
            CommandError::Rejected(ModelError::BranchNotFound("x".into())).kind(),
            ErrorKind::Reference
        );
    }

    #[test]
    fn model_messages_pass_through() {
        let err = CommandError::from(ModelError::ProtectedBranch("main".into()));
        assert_eq!(err.to_string(), "branch 'main' is protected");
    }
}
