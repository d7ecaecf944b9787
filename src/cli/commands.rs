//! CLI command definitions using clap.
//!
//! With no subcommand, rollcall starts the interactive menu. The subcommands
//! run a single operation against the data file and exit:
//! - add / remove: manage students
//! - mark: record attendance for a date
//! - show: print one student's attendance
//! - list: print every student

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rollcall::AttendanceStatus;
use std::path::PathBuf;

/// Rollcall - student attendance tracking
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file to use instead of the configured one
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
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
    /// Add a new student
    Add {
        /// Student ID (must be unique)
        id: String,

        /// Student name
        name: String,

        /// Course the student is enrolled in
        course: String,
    },

    /// Remove a student and their attendance
    Remove {
        /// Student ID to remove
        id: String,
    },

    /// Mark attendance for a student
    Mark {
        /// Student ID
        id: String,

        /// Date in YYYY-MM-DD format
        date: NaiveDate,

        /// present or absent
        status: AttendanceStatus,
    },

    /// Show a student's attendance
    Show {
        /// Student ID
        id: String,
    },

    /// List all students
    List,
}
