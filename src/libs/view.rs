use super::config::DurationFormat;
use super::entry::Entry;
use super::formatter::format_duration;
use super::timesheet::Timesheet;
use chrono::TimeDelta;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn entries_table(entries: &[Entry], format: DurationFormat) -> Table {
        let mut table = Table::new();

        table.add_row(row!["DATE", "HASH", "CREATED", "UPDATED", "NOTE", "DURATION", ""]);
        for entry in entries {
            table.add_row(row![
                entry.timesheet,
                entry.short_hash(),
                entry.created_local().format("%H:%M"),
                entry.updated_local().format("%H:%M"),
                entry.note,
                format_duration(&entry.duration, format),
                if entry.is_running { "running" } else { "" }
            ]);
        }

        table
    }

    pub fn entries(entries: &[Entry], format: DurationFormat) {
        Self::entries_table(entries, format).printstd();
    }

    /// One row per sheet, with the number of entries and their total time.
    pub fn timesheets_table(sheets: &[(Timesheet, Vec<Entry>)], format: DurationFormat) -> Table {
        let mut table = Table::new();

        table.add_row(row!["DATE", "ENTRIES", "DURATION"]);
        for (sheet, entries) in sheets {
            let total: TimeDelta = entries.iter().map(|e| e.duration).sum();
            table.add_row(row![sheet.key, entries.len(), format_duration(&total, format)]);
        }

        table
    }

    pub fn timesheets(sheets: &[(Timesheet, Vec<Entry>)], format: DurationFormat) {
        Self::timesheets_table(sheets, format).printstd();
    }
}
