//! shell command - Interactive session over stdin
//!
//! Lines starting with `git` go to the interpreter. Lines starting with `:`
//! are session commands that only read the snapshot or the ledger, except
//! `:reset`, which restores the starting snapshot.

use std::io::{BufRead, Write};

use super::open_session;
use crate::core::config::{Config, Orientation};
use crate::engine::{Context, Session, SnapshotSource};
use crate::layout::{layout, LayoutParams};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// What the shell should do with a line's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print on stdout.
    Text(String),
    /// Print on stderr.
    Error(String),
    /// Print nothing.
    Silent,
    /// End the session.
    Quit,
}

/// A session plus the shell's own settings.
#[derive(Debug)]
pub struct ShellSession {
    session: Session,
    params: LayoutParams,
}

impl ShellSession {
    pub fn new(session: Session, params: LayoutParams) -> Self {
        Self { session, params }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one input line.
    pub fn handle(&mut self, line: &str) -> Reply {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Reply::Silent;
        }
        if let Some(meta) = trimmed.strip_prefix(':') {
            return self.meta(meta);
        }

        let result = self.session.submit(line);
        if result.success {
            Reply::Text(result.message)
        } else {
            Reply::Error(result.message)
        }
    }

    fn meta(&mut self, meta: &str) -> Reply {
        let mut words = meta.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();

        match (name, arg) {
            ("graph", arg) => {
                let params = match arg.map(str::parse::<Orientation>) {
                    None => self.params.clone(),
                    Some(Ok(orientation)) => self.params.clone().with_orientation(orientation),
                    Some(Err(e)) => return Reply::Error(e.to_string()),
                };
                Reply::Text(output::format_graph(&layout(self.session.state(), &params)))
            }
            ("status", None) => Reply::Text(output::format_status(self.session.state())),
            ("log", None) => Reply::Text(output::format_log(self.session.state())),
            ("history", None) => {
                let entries: Vec<&str> = self.session.ledger().recall.entries().collect();
                if entries.is_empty() {
                    Reply::Text("no commands yet".to_string())
                } else {
                    Reply::Text(output::format_list(&entries, "  "))
                }
            }
            ("clear", None) => {
                self.session.ledger_mut().transcript.clear();
                Reply::Silent
            }
            ("reset", None) => {
                self.session.reset();
                Reply::Text("Restored the starting snapshot".to_string())
            }
            ("quit" | "q" | "exit", None) => Reply::Quit,
            _ => Reply::Error(format!("unknown session command ':{}'", meta.trim())),
        }
    }
}

/// Run an interactive session until `:quit` or end of input.
pub fn shell(ctx: &Context, config: &Config, source: &SnapshotSource) -> Result<()> {
    let verbosity = ctx.verbosity();
    let session = open_session(ctx, config, source)?;
    let mut shell = ShellSession::new(session, LayoutParams::from_config(config));
    let prompt = config.prompt();

    output::print(
        format!(
            "On branch {}. Type git commands, ':status', ':graph' or ':quit'.",
            shell.session().state().head.name()
        ),
        verbosity,
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if verbosity != output::Verbosity::Quiet {
            print!("{prompt}");
            std::io::stdout().flush().context("Failed to write prompt")?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        match shell.handle(&line) {
            Reply::Text(text) => output::print(text, verbosity),
            Reply::Error(message) => output::error(message),
            Reply::Silent => {}
            Reply::Quit => break,
        }
    }

    output::debug(
        format!(
            "session ended after {} command(s)",
            shell.session().ledger().recall.len()
        ),
        verbosity,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;
    use crate::engine::{Repository, SequentialIds};

    fn shell() -> ShellSession {
        let repo = Repository::with_ids(samples::tutorial(), Box::new(SequentialIds::default()));
        ShellSession::new(Session::new(repo, 20), LayoutParams::default())
    }

    #[test]
    fn git_lines_reach_interpreter() {
        let mut shell = shell();
        assert_eq!(
            shell.handle("git switch main"),
            Reply::Text("Switched to branch 'main'".into())
        );
        assert!(matches!(shell.handle("git switch main"), Reply::Error(_)));
    }

    #[test]
    fn blank_lines_are_silent() {
        let mut shell = shell();
        assert_eq!(shell.handle("   "), Reply::Silent);
        assert!(shell.session().ledger().recall.is_empty());
    }

    #[test]
    fn meta_commands() {
        let mut shell = shell();
        shell.handle("git add .");

        match shell.handle(":status") {
            Reply::Text(text) => assert!(text.contains("api.ts") && text.contains("utils.ts")),
            other => panic!("unexpected {other:?}"),
        }
        match shell.handle(":history") {
            Reply::Text(text) => assert_eq!(text, "  git add ."),
            other => panic!("unexpected {other:?}"),
        }
        match shell.handle(":graph horizontal") {
            Reply::Text(text) => assert!(text.starts_with("lanes: main, feature")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(shell.handle(":graph diagonal"), Reply::Error(_)));
        assert!(matches!(shell.handle(":bogus"), Reply::Error(_)));
        assert_eq!(shell.handle(":quit"), Reply::Quit);
    }

    #[test]
    fn reset_and_clear() {
        let mut shell = shell();
        shell.handle("git add .");
        shell.handle(":reset");
        assert_eq!(shell.session().state(), &samples::tutorial());

        shell.handle(":clear");
        assert!(shell.session().ledger().transcript.lines().is_empty());
        assert_eq!(shell.session().ledger().recall.len(), 1);
    }
}
