//! cli
//!
//! The `bl` binary's front end.
//!
//! Arguments are parsed with clap in [`args`]; [`commands`] loads config
//! and the starting snapshot, then hands lines to a session. Nothing here
//! edits a snapshot: every change goes through the interpreter and the
//! repository.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine::Context;
use anyhow::Result;

/// Parse the process arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };
    commands::dispatch(cli.command, &ctx, cli.config.as_deref())
}
