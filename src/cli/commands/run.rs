//! run command - Execute command lines non-interactively
//!
//! Each line goes through the interpreter exactly as if typed in a shell.
//! Results print in order: successes on stdout, failures on stderr.

use std::path::PathBuf;

use super::open_session;
use crate::core::config::Config;
use crate::engine::{save_snapshot, Context, SnapshotSource};
use crate::layout::{layout, LayoutParams};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Flags controlling a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the final snapshot here.
    pub save: Option<PathBuf>,
    /// Stop at the first failure with an error.
    pub strict: bool,
    /// Print the graph when done.
    pub graph: bool,
}

/// Run `lines` in order against the selected snapshot.
pub fn run(
    ctx: &Context,
    config: &Config,
    source: &SnapshotSource,
    lines: &[String],
    options: &RunOptions,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let mut session = open_session(ctx, config, source)?;
    let mut failures = 0usize;

    for line in lines {
        output::debug(format!("> {line}"), verbosity);
        let result = session.submit(line);
        if result.success {
            output::success(&result.message, verbosity);
            continue;
        }

        failures += 1;
        if options.strict {
            bail!("'{}' failed: {}", line, result.message);
        }
        output::error(&result.message);
    }

    if options.graph {
        let params = LayoutParams::from_config(config);
        output::print(output::format_graph(&layout(session.state(), &params)), verbosity);
    }

    if let Some(path) = &options.save {
        save_snapshot(ctx, session.state(), path)
            .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;
        output::print(format!("Saved snapshot to {}", path.display()), verbosity);
    }

    output::debug(
        format!("{} of {} line(s) failed", failures, lines.len()),
        verbosity,
    );
    Ok(())
}
