//! command::parser
//!
//! Token list to [`GitCommand`].
//!
//! Parsing is purely syntactic: argument counts, flags, reset modes and
//! branch-name / commit-id well-formedness. Whether a named branch, commit
//! or file actually exists is decided later against a snapshot.
//!
//! # Grammar
//!
//! ```text
//! git add <path> | .
//! git remove | unstage <name>
//! git commit -m <message>
//! git commit [-m <message>] --amend [-m <message>]
//! git branch <name>
//! git branch -d | -D <name>
//! git branch -m [<old>] <new>
//! git switch | checkout <name>
//! git switch -c <name> | checkout -c | -b <name>
//! git merge <branch>
//! git rebase <branch>
//! git revert <commit>
//! git cherry-pick <commit>
//! git reset [--soft | --mixed | --hard] <commit>
//! ```

use super::error::CommandError;
use crate::core::types::{BranchName, CommitId};
use crate::engine::transition::ResetMode;

/// What `git add` should stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTarget {
    /// `git add .`
    All,
    /// `git add <name>`
    Path(String),
}

/// A syntactically valid command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    Add(AddTarget),
    Unstage(String),
    Commit { message: String },
    Amend { message: Option<String> },
    CreateBranch(BranchName),
    DeleteBranch(BranchName),
    RenameBranch {
        /// `None` renames the current branch.
        from: Option<BranchName>,
        to: BranchName,
    },
    Switch(BranchName),
    CreateAndSwitch(BranchName),
    Merge(BranchName),
    Rebase(BranchName),
    Revert(CommitId),
    CherryPick(CommitId),
    Reset { commit: CommitId, mode: ResetMode },
}

/// Parse a token list produced by [`lex`](super::lexer::lex).
///
/// # Errors
///
/// Returns a validation error naming the offending token.
///
/// # Example
///
/// ```
/// use branchlab::command::parser::{parse, GitCommand};
/// use branchlab::engine::transition::ResetMode;
///
/// let tokens: Vec<String> = ["git", "reset", "--hard", "7a19bf"].map(String::from).to_vec();
/// match parse(&tokens).unwrap() {
///     GitCommand::Reset { commit, mode } => {
///         assert_eq!(commit.as_str(), "7a19bf");
///         assert_eq!(mode, ResetMode::Hard);
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn parse(tokens: &[String]) -> Result<GitCommand, CommandError> {
    let (subcommand, args) = match tokens {
        [_git, subcommand, args @ ..] => (subcommand.as_str(), args),
        _ => return Err(CommandError::MissingSubcommand),
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match subcommand {
        "add" => parse_add(&args),
        "remove" | "unstage" => match args.as_slice() {
            [name] => Ok(GitCommand::Unstage(name.to_string())),
            _ => Err(CommandError::Usage("git remove <name>")),
        },
        "commit" => parse_commit(&args),
        "branch" => parse_branch(&args),
        "switch" => parse_switch(&args, "switch", &["-c"]),
        "checkout" => parse_switch(&args, "checkout", &["-c", "-b"]),
        "merge" => single_branch(&args, "git merge <branch>").map(GitCommand::Merge),
        "rebase" => single_branch(&args, "git rebase <branch>").map(GitCommand::Rebase),
        "revert" => single_commit(&args, "git revert <commit>").map(GitCommand::Revert),
        "cherry-pick" => {
            single_commit(&args, "git cherry-pick <commit>").map(GitCommand::CherryPick)
        }
        "reset" => parse_reset(&args),
        other => Err(CommandError::Unsupported(other.to_string())),
    }
}

fn branch_name(raw: &str) -> Result<BranchName, CommandError> {
    BranchName::new(raw).map_err(|e| CommandError::InvalidBranchName {
        name: raw.to_string(),
        reason: e.to_string(),
    })
}

fn commit_id(raw: &str) -> Result<CommitId, CommandError> {
    CommitId::new(raw).map_err(|_| CommandError::InvalidCommitId(raw.to_string()))
}

fn single_branch(args: &[&str], usage: &'static str) -> Result<BranchName, CommandError> {
    match args {
        [name] => branch_name(name),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn single_commit(args: &[&str], usage: &'static str) -> Result<CommitId, CommandError> {
    match args {
        [id] => commit_id(id),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_add(args: &[&str]) -> Result<GitCommand, CommandError> {
    match args {
        ["."] => Ok(GitCommand::Add(AddTarget::All)),
        [path] if !path.is_empty() => Ok(GitCommand::Add(AddTarget::Path(path.to_string()))),
        _ => Err(CommandError::Usage("git add <path> | git add .")),
    }
}

fn parse_commit(args: &[&str]) -> Result<GitCommand, CommandError> {
    const USAGE: &str = "git commit -m <message> | git commit --amend [-m <message>]";

    // One `-m` may sit on each side of `--amend`; the later one wins.
    let mut message: Option<&str> = None;
    let mut amend_message: Option<&str> = None;
    let mut amend = false;
    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        match *arg {
            "-m" => {
                let slot = if amend { &mut amend_message } else { &mut message };
                match rest.next() {
                    Some(m) if slot.is_none() => *slot = Some(*m),
                    _ => return Err(CommandError::Usage(USAGE)),
                }
            }
            "--amend" if !amend => amend = true,
            other => {
                return Err(CommandError::UnknownOption {
                    command: "commit",
                    option: other.to_string(),
                })
            }
        }
    }

    if amend {
        let message = amend_message
            .or(message)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        return Ok(GitCommand::Amend { message });
    }

    match message {
        Some(m) if m.trim().is_empty() => Err(CommandError::Rejected(
            crate::engine::transition::ModelError::EmptyMessage,
        )),
        Some(m) => Ok(GitCommand::Commit {
            message: m.to_string(),
        }),
        None => Err(CommandError::Usage(USAGE)),
    }
}

fn parse_branch(args: &[&str]) -> Result<GitCommand, CommandError> {
    match args {
        ["-d" | "-D", name] => Ok(GitCommand::DeleteBranch(branch_name(name)?)),
        ["-d" | "-D"] => Err(CommandError::Usage("git branch -d <name>")),
        ["-m", to] => Ok(GitCommand::RenameBranch {
            from: None,
            to: branch_name(to)?,
        }),
        ["-m", from, to] => Ok(GitCommand::RenameBranch {
            from: Some(branch_name(from)?),
            to: branch_name(to)?,
        }),
        ["-m", ..] => Err(CommandError::Usage("git branch -m [<old>] <new>")),
        [flag, ..] if flag.starts_with('-') => Err(CommandError::UnknownOption {
            command: "branch",
            option: flag.to_string(),
        }),
        [name] => Ok(GitCommand::CreateBranch(branch_name(name)?)),
        _ => Err(CommandError::Usage("git branch <name> | git branch -d <name>")),
    }
}

fn parse_switch(
    args: &[&str],
    command: &'static str,
    create_flags: &[&str],
) -> Result<GitCommand, CommandError> {
    let usage = if command == "switch" {
        "git switch <name> | git switch -c <name>"
    } else {
        "git checkout <name> | git checkout -c <name>"
    };

    match args {
        [flag, name] if create_flags.contains(flag) => {
            Ok(GitCommand::CreateAndSwitch(branch_name(name)?))
        }
        [flag, ..] if flag.starts_with('-') && !create_flags.contains(flag) => {
            Err(CommandError::UnknownOption {
                command,
                option: flag.to_string(),
            })
        }
        [name] => Ok(GitCommand::Switch(branch_name(name)?)),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_reset(args: &[&str]) -> Result<GitCommand, CommandError> {
    const USAGE: &str = "git reset [--soft|--mixed|--hard] <commit>";

    let (mode, target) = match args {
        [flag, target] if flag.starts_with('-') => {
            let mode =
                ResetMode::from_flag(flag).ok_or_else(|| CommandError::InvalidMode(flag.to_string()))?;
            (mode, *target)
        }
        [flag] if flag.starts_with('-') => {
            if ResetMode::from_flag(flag).is_none() {
                return Err(CommandError::InvalidMode(flag.to_string()));
            }
            return Err(CommandError::Usage(USAGE));
        }
        [target] => (ResetMode::Mixed, *target),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    Ok(GitCommand::Reset {
        commit: commit_id(target)?,
        mode,
    })
}
