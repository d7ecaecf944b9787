//! CLI module for rollcall - command-line interface and interactive menu.
//!
//! Provides the main entry point with one-shot subcommands, and the
//! menu-driven shell used when no subcommand is given.

pub mod commands;
pub mod shell;

pub use commands::Cli;
pub use shell::Shell;
