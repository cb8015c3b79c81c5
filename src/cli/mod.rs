//! CLI module for vmlink - command-line interface and subcommands.
//!
//! One subcommand per VM command, plus `serve` to expose the simulated VM
//! over stdin/stdout.

pub mod commands;

pub use commands::Cli;
