//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Resolve relative paths and the workspace config from here
//! - `--config <path>`: Use this file instead of the global config lookup
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::config::Orientation;
use crate::core::samples::Sample;
use crate::engine::SnapshotSource;

/// branchlab - explore Git semantics on a simulated repository
#[derive(Parser, Debug)]
#[command(name = "bl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if bl was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Configuration file to use instead of the global one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Where the starting snapshot comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Load a snapshot JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "example")]
    pub snapshot: Option<PathBuf>,

    /// Start from a built-in dataset (default: tutorial)
    #[arg(long, value_enum, value_name = "NAME")]
    pub example: Option<ExampleArg>,
}

impl SourceArgs {
    /// The snapshot source these flags select.
    pub fn source(&self) -> SnapshotSource {
        match (&self.snapshot, self.example) {
            (Some(path), _) => SnapshotSource::File(path.clone()),
            (None, Some(example)) => SnapshotSource::Sample(example.into()),
            (None, None) => SnapshotSource::default(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive session
    #[command(
        name = "shell",
        long_about = "Start an interactive session on a simulated repository.\n\n\
            Each line is one git command, interpreted against the current \
            snapshot. Failed commands change nothing. Lines starting with ':' \
            are session commands.",
        after_help = "\
SESSION COMMANDS:
    :graph [vertical|horizontal]   draw the commit graph
    :status                        show HEAD, staged and untracked files
    :log                           show the operation log
    :history                       show submitted commands, newest first
    :clear                         clear the transcript
    :reset                         restore the starting snapshot
    :quit                          leave the session

WORKFLOW EXAMPLES:
    # Start on the tutorial repository
    bl shell

    # Explore a large generated history
    bl shell --example showcase

    # Continue from a saved snapshot
    bl shell --snapshot work.json"
    )]
    Shell {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Run command lines non-interactively
    #[command(
        name = "run",
        long_about = "Run one or more command lines in order and print each result.\n\n\
            By default every line runs even if an earlier one fails. With --strict \
            the run stops at the first failure and exits non-zero.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Stage, commit and merge
    bl run 'git add utils.ts' 'git commit -m \"Add utils\"' 'git switch main' 'git merge feature'

    # Fail fast and keep the result
    bl run --strict --save after.json 'git branch dev' 'git switch dev'

    # Show the graph afterwards
    bl run --graph 'git reset --hard 7a19bf'"
    )]
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the resulting snapshot to this file
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,

        /// Stop at the first failed line and exit non-zero
        #[arg(long)]
        strict: bool,

        /// Print the commit graph after the last line
        #[arg(long)]
        graph: bool,

        /// Command lines, each starting with 'git'
        #[arg(required = true, value_name = "LINE")]
        lines: Vec<String>,
    },

    /// Print the render graph as JSON
    #[command(
        name = "layout",
        long_about = "Lay out a snapshot and print nodes, edges, labels and extent as JSON.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Layout of the tutorial repository
    bl layout

    # Horizontal layout of a saved snapshot
    bl layout --snapshot work.json --orientation horizontal"
    )]
    Layout {
        #[command(flatten)]
        source: SourceArgs,

        /// Override the configured orientation
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,
    },

    /// Print a built-in snapshot as JSON
    #[command(name = "example")]
    Example {
        /// Dataset to print
        #[arg(value_enum)]
        name: ExampleArg,
    },

    /// Inspect configuration
    #[command(
        name = "config",
        long_about = "Inspect configuration.\n\n\
            Configuration is read from the global file ($BRANCHLAB_CONFIG, \
            $XDG_CONFIG_HOME/branchlab/config.toml or ~/.branchlab/config.toml) \
            and from .branchlab.toml in the working directory, which wins.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Show effective values
    bl config show

    # Show which files were read
    bl config path"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    bl completion bash >> ~/.bashrc

    # Zsh
    bl completion zsh > ~/.zfunc/_bl"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration values
    Show,
    /// Show which configuration files were loaded
    Path,
}

/// Built-in datasets
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleArg {
    Tutorial,
    Showcase,
}

impl From<ExampleArg> for Sample {
    fn from(arg: ExampleArg) -> Self {
        match arg {
            ExampleArg::Tutorial => Sample::Tutorial,
            ExampleArg::Showcase => Sample::Showcase,
        }
    }
}

/// Graph orientations
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationArg {
    Vertical,
    Horizontal,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Vertical => Orientation::Vertical,
            OrientationArg::Horizontal => Orientation::Horizontal,
        }
    }
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
