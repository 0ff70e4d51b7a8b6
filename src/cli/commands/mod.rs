//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and the starting snapshot
//! 2. Drives a session or the layout engine
//! 3. Formats and displays output
//!
//! Handlers do NOT mutate snapshots directly.

mod completion;
mod config_cmd;
mod example;
mod layout_cmd;
mod run;
mod shell;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use example::example;
pub use layout_cmd::layout;
pub use run::{run, RunOptions};
pub use shell::{shell, Reply, ShellSession};

use std::path::{Path, PathBuf};

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::engine::{Context, Repository, Session, SnapshotSource};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context, config: Option<&Path>) -> Result<()> {
    match command {
        Command::Shell { source } => {
            let config = load_config(ctx, config)?;
            shell::shell(ctx, &config, &source.source())
        }
        Command::Run {
            source,
            save,
            strict,
            graph,
            lines,
        } => {
            let config = load_config(ctx, config)?;
            let options = RunOptions {
                save,
                strict,
                graph,
            };
            run::run(ctx, &config, &source.source(), &lines, &options)
        }
        Command::Layout {
            source,
            orientation,
        } => {
            let config = load_config(ctx, config)?;
            layout_cmd::layout(ctx, &config, &source.source(), orientation.map(Into::into))
        }
        Command::Example { name } => example::example(name.into()),
        Command::Config { action } => {
            let config = load_config(ctx, config)?;
            match action {
                ConfigAction::Show => config_cmd::show(&config),
                ConfigAction::Path => config_cmd::path(&config),
            }
        }
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Directory the workspace config is looked up in.
fn workspace_dir(ctx: &Context) -> Result<PathBuf> {
    match &ctx.cwd {
        Some(cwd) => Ok(cwd.clone()),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Load configuration, reporting warnings.
pub(crate) fn load_config(ctx: &Context, explicit: Option<&Path>) -> Result<Config> {
    let dir = workspace_dir(ctx)?;
    let explicit = explicit.map(|p| ctx.resolve(p));
    let loaded = Config::load(explicit.as_deref(), Some(&dir)).context("Failed to load config")?;

    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            ctx.verbosity(),
        );
    }
    if let Some(path) = loaded.config.global_config_loaded_from() {
        output::debug(format!("global config: {}", path.display()), ctx.verbosity());
    }
    if let Some(path) = loaded.config.workspace_config_loaded_from() {
        output::debug(format!("workspace config: {}", path.display()), ctx.verbosity());
    }

    Ok(loaded.config)
}

/// Open a session on the selected snapshot.
pub(crate) fn open_session(ctx: &Context, config: &Config, source: &SnapshotSource) -> Result<Session> {
    let state = source.load(ctx).context("Failed to load snapshot")?;
    let repo = Repository::new(state).with_verbosity(ctx.verbosity());
    Ok(Session::new(repo, config.recall_limit()))
}
