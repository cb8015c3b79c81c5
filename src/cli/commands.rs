//! CLI command definitions using clap.
//!
//! Every command except `serve` starts a simulated VM seeded from
//! `--project`, connects to it, runs one command and prints the result.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vmlink - drive an embedded project VM
#[derive(Parser, Debug)]
#[command(name = "vmlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project JSON file to seed the simulated VM with (default: a demo project)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Make the simulated VM drop every request for this command
    #[arg(long, global = true, value_name = "COMMAND")]
    pub fail: Vec<String>,

    /// Subcommand to execute (default: snapshot)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every file in the project
    Snapshot,

    /// Print installed dependencies and their versions
    Deps,

    /// Create, overwrite or delete files
    Apply {
        /// File to create or overwrite, as PATH=CONTENTS
        #[arg(long = "create", value_name = "PATH=CONTENTS")]
        create: Vec<String>,

        /// File to delete
        #[arg(long = "destroy", value_name = "PATH")]
        destroy: Vec<String>,

        /// JSON file holding a `{create, destroy}` diff
        #[arg(long, conflicts_with_all = ["create", "destroy"])]
        diff: Option<PathBuf>,
    },

    /// Open files in the editor; commas put several files in one pane
    Open {
        /// Pane entries, e.g. `index.js,README.md`
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Focus a file in the editor
    Current {
        path: String,
    },

    /// Set the editor theme (default, light, dark)
    Theme {
        theme: String,
    },

    /// Set the editor layout (default, editor, preview)
    View {
        view: String,
    },

    /// Show or hide the sidebar
    Sidebar {
        /// Hide instead of show
        #[arg(long)]
        hide: bool,
    },

    /// Print the current preview URL
    PreviewUrl,

    /// Navigate the preview to a path
    SetPreview {
        path: String,
    },

    /// Serve the simulated VM over a byte stream
    Serve {
        /// Speak newline-delimited JSON on stdin/stdout
        #[arg(long)]
        stdio: bool,
    },
}
