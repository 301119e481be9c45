//! Text for every [`Message`].
//!
//! All wording is kept here so the rest of the crate only deals in variants.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TRACKING MESSAGES ===
            Message::TimerStarted(hash, note) if note.is_empty() => format!("Started tracking {}", hash),
            Message::TimerStarted(hash, note) => format!("Started tracking \"{}\" ({})", note, hash),
            Message::TimerStopped(hash, duration) => format!("Stopped tracking {} after {}", hash, duration),
            Message::TimerResumed(hash, note) if note.is_empty() => format!("Resumed tracking {}", hash),
            Message::TimerResumed(hash, note) => format!("Resumed tracking \"{}\" ({})", note, hash),
            Message::StatusRunning { hash, note, duration } => {
                format!("Tracking \"{}\" ({}), {} so far", note, hash, duration)
            }
            Message::StatusStopped => "There is no active timer running".to_string(),
            Message::StatusLastEntry(hash) => format!("Last tracked entry: {} (resume with `tid resume`)", hash),
            Message::ActiveWorkspace(name) => format!("Workspace: {}", name),

            // === ENTRY MESSAGES ===
            Message::EntryCreated(hash, date) => format!("Created entry {} on {}", hash, date),
            Message::EntryUpdated(hash) => format!("Updated entry {}", hash),
            Message::EntryDeleted(hash) => format!("Deleted entry {}", hash),
            Message::NoEntriesInRange(start, end) => format!("No entries between {} and {}", start, end),
            Message::EntryUpdateNothingToDo => "Nothing to update, pass a duration, an offset or a note".to_string(),

            // === TIMESHEET MESSAGES ===
            Message::TimesheetDeleted(date, count) => format!("Deleted timesheet {} with {} entries", date, count),
            Message::NoTimesheetsInRange(start, end) => format!("No timesheets between {} and {}", start, end),

            // === REPORT MESSAGES ===
            Message::ReportHeader(start, end) if start == end => format!("Report for {}", start),
            Message::ReportHeader(start, end) => format!("Report for {} to {}", start, end),
            Message::ReportTotal(duration) => format!("Total: {}", duration),

            // === WORKSPACE MESSAGES ===
            Message::WorkspaceCreated(name) => format!("Created workspace {}", name),
            Message::WorkspaceDeleted(name) => format!("Deleted workspace {}", name),
            Message::WorkspaceSwitched(name) => format!("Switched to workspace {}", name),
            Message::WorkspacesHeader => "Workspaces:".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigParseError(error) => format!("Failed to parse configuration file: {}", error),

            // === INPUT MESSAGES ===
            Message::InvalidDate(input) => format!("Invalid date '{}', expected YYYY-MM-DD", input),
            Message::InvalidDuration(input) => format!("Invalid duration '{}', expected e.g. 1h30m or -15m", input),

            // === MIGRATION MESSAGES ===
            Message::MigrationsUpToDate => "Database layout is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migrations", count),
            Message::RunningMigration(version, description) => format!("Running migration {}: {}", version, description),
            Message::MigrationFailed(version, error) => format!("Migration {} failed: {}", version, error),
            Message::MigrationsCompleted(count) => format!("Applied {} migrations", count),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::LatestAvailableVersion(version) => format!("Latest available version: {}", version),
            Message::MigrationsPending(count) => format!("Pending migrations: {}", count),
        };

        write!(f, "{}", text)
    }
}
