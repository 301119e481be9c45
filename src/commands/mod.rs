//! Command-line interface for tid.
//!
//! Every subcommand lives in its own module with an `Args` struct and a
//! `cmd` function. [`Cli::menu`] opens the database, builds the [`Factory`]
//! and dispatches.

pub mod entry;
pub mod migrations;
pub mod report;
pub mod resume;
pub mod start;
pub mod status;
pub mod stop;
pub mod timesheet;
pub mod workspace;

use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::factory::Factory;
use crate::libs::formatter::{parse_date, parse_duration};
use crate::libs::messages::Message;
use anyhow::Result;
use chrono::{Local, NaiveDate, TimeDelta};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Start tracking a new entry")]
    Start(start::StartArgs),
    #[command(about = "Stop the running timer")]
    Stop,
    #[command(about = "Resume a stopped entry")]
    Resume(resume::ResumeArgs),
    #[command(about = "Show the state of the timer or of an entry")]
    Status(status::StatusArgs),
    #[command(about = "Show entries and total time for a date range")]
    Report(report::ReportArgs),
    #[command(about = "Create, update, delete and list entries")]
    Entry(entry::EntryArgs),
    #[command(about = "List and delete timesheets")]
    Timesheet(timesheet::TimesheetArgs),
    #[command(about = "Manage workspaces")]
    Workspace(workspace::WorkspaceArgs),
    #[command(about = "Inspect database migrations")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(name = "tid", author, version, about = "Simple time tracking", long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();

        // Reporting on migrations must not apply them first.
        let command = match cli.command {
            Commands::Migrations(args) => return migrations::cmd(args),
            command => command,
        };

        let config = Config::read()?;
        let db = Db::new()?;
        let factory = Factory::new(db.backend());

        let result = match command {
            Commands::Start(args) => start::cmd(args, &factory),
            Commands::Stop => stop::cmd(&factory, &config),
            Commands::Resume(args) => resume::cmd(args, &factory),
            Commands::Status(args) => status::cmd(args, &factory, &config),
            Commands::Report(args) => report::cmd(args, &factory, &config),
            Commands::Entry(args) => entry::cmd(args, &factory, &config),
            Commands::Timesheet(args) => timesheet::cmd(args, &factory, &config),
            Commands::Workspace(args) => workspace::cmd(args, &factory),
            Commands::Migrations(_) => Ok(()),
        };

        drop(factory);
        db.close()?;
        result
    }
}

pub(crate) fn date_arg(input: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(input).ok_or_else(|| Message::InvalidDate(input.to_string()).to_string())
}

pub(crate) fn duration_arg(input: &str) -> std::result::Result<TimeDelta, String> {
    parse_duration(input).ok_or_else(|| Message::InvalidDuration(input.to_string()).to_string())
}

/// Resolves the usual `--date` / `--start` / `--end` options. A date wins
/// over a range; missing ends default to `default_start` and today.
pub(crate) fn date_range(
    date: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    default_start: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    if let Some(date) = date {
        return (date, date);
    }

    let today = Local::now().date_naive();
    (start.unwrap_or(default_start), end.unwrap_or(today))
}
