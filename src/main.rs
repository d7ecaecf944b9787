use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use rollcall::{JsonFile, StudentRecord, StudentStore};
use std::fs;
use std::io;
use std::path::PathBuf;

mod cli;
mod config;

use cli::commands::Commands;
use cli::{Cli, Shell};
use config::Config;

fn setup_logging(default_level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rollcall")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("rollcall.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_store(cli: &Cli, config: &Config) -> Result<StudentStore> {
    let data_file = config.data_file(cli.file.as_ref());
    let file = JsonFile::new(&data_file).with_backup_corrupt(config.storage.backup_corrupt);
    StudentStore::open_with(file).context(format!("Failed to open data file {}", data_file.display()))
}

fn run_application(cli: &Cli, store: &mut StudentStore) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{} {}", "Data file:".yellow(), store.path().display());
    }

    match &cli.command {
        None => run_shell(store),
        Some(command) => {
            for warning in store.load_report().warnings() {
                eprintln!("{} {}", "Warning:".yellow(), warning);
            }
            handle_command(command, store)
        }
    }
}

fn run_shell(store: &mut StudentStore) -> Result<()> {
    info!("Launching interactive menu");
    let stdin = io::stdin();
    Shell::new(store, stdin.lock(), io::stdout())
        .run()
        .context("Interactive session failed")
}

fn handle_command(command: &Commands, store: &mut StudentStore) -> Result<()> {
    info!("Handling command: {:?}", command);
    match command {
        Commands::Add { id, name, course } => {
            store
                .add(StudentRecord::new(id.as_str(), name.as_str(), course.as_str()))
                .context(format!("Failed to add student {}", id))?;
            println!("{} {}", "Added:".green(), id);
        }
        Commands::Remove { id } => {
            let record = store.remove(id).context(format!("Failed to remove student {}", id))?;
            println!("{} {} ({})", "Removed:".green(), record.id(), record.name());
        }
        Commands::Mark { id, date, status } => {
            store
                .mark_attendance(id, *date, *status)
                .context(format!("Failed to mark attendance for {}", id))?;
            println!("{} {} {} on {}", "Marked:".green(), id, status, date);
        }
        Commands::Show { id } => {
            let attendance = store.get_attendance(id)?;
            if attendance.is_empty() {
                println!("No attendance recorded for {}.", id);
            }
            for (date, status) in attendance {
                println!("{}: {}", date, status);
            }
        }
        Commands::List => {
            let mut students = store.list_all();
            if students.is_empty() {
                println!("No students found.");
            }
            students.sort_by(|a, b| a.id().cmp(b.id()));
            for student in students {
                println!("ID: {}, Name: {}, Course: {}", student.id(), student.name(), student.course());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the configured level is known
    setup_logging(config.log_level.as_deref().unwrap_or("info")).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    let mut store = open_store(&cli, &config)?;

    // Run the main application logic
    run_application(&cli, &mut store).context("Application failed")?;

    Ok(())
}
