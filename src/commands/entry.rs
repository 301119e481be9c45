use super::{date_arg, date_range, duration_arg};
use crate::{
    libs::{
        config::Config, entry::Entry, error::ErrorStack, factory::Factory, messages::Message, timesheet::date_key,
        view::View,
    },
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::{Local, NaiveDate, TimeDelta};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct EntryArgs {
    #[command(subcommand)]
    command: EntryCommand,
}

#[derive(Debug, Subcommand)]
enum EntryCommand {
    /// Log a finished entry
    Create {
        /// How long it took, e.g. 1h30m
        #[arg(short, long, value_parser = duration_arg, allow_hyphen_values = true)]
        duration: TimeDelta,
        /// Timesheet date, defaults to today
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,
        note: Vec<String>,
    },
    /// Change the duration or note of an entry
    Update {
        hash: String,
        #[arg(short, long, value_parser = duration_arg, conflicts_with = "offset")]
        duration: Option<TimeDelta>,
        /// Add to the duration; may be negative
        #[arg(short, long, value_parser = duration_arg, allow_hyphen_values = true)]
        offset: Option<TimeDelta>,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete an entry
    Delete { hash: String },
    /// List entries in a date range
    List {
        #[arg(short = 'd', long, value_parser = date_arg, conflicts_with_all = ["start", "end"])]
        date: Option<NaiveDate>,
        #[arg(short, long, value_parser = date_arg)]
        start: Option<NaiveDate>,
        #[arg(short, long, value_parser = date_arg)]
        end: Option<NaiveDate>,
    },
}

pub fn cmd(args: EntryArgs, factory: &Factory, config: &Config) -> Result<()> {
    match args.command {
        EntryCommand::Create { duration, date, note } => handle_create(factory, date, duration, note.join(" ")),
        EntryCommand::Update {
            hash,
            duration,
            offset,
            note,
        } => handle_update(factory, &hash, duration, offset, note),
        EntryCommand::Delete { hash } => handle_delete(factory, &hash),
        EntryCommand::List { date, start, end } => handle_list(factory, config, date, start, end),
    }
}

fn handle_create(factory: &Factory, date: Option<NaiveDate>, duration: TimeDelta, note: String) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let entry = factory.build_entry_facade()?.create(date, duration, &note)?;

    msg_success!(Message::EntryCreated(entry.short_hash().to_string(), entry.timesheet.clone()));
    Ok(())
}

fn handle_update(
    factory: &Factory,
    hash: &str,
    duration: Option<TimeDelta>,
    offset: Option<TimeDelta>,
    note: Option<String>,
) -> Result<()> {
    if duration.is_none() && offset.is_none() && note.is_none() {
        msg_warning!(Message::EntryUpdateNothingToDo);
        return Ok(());
    }

    let facade = factory.build_entry_facade()?;
    let mut errs = ErrorStack::new();
    let mut updated: Option<Entry> = None;

    if let Some(duration) = duration {
        errs.add(facade.update_duration(hash, duration).map(|e| updated = Some(e)));
    }
    if let Some(offset) = offset {
        errs.add(facade.update_duration_by_offset(hash, offset).map(|e| updated = Some(e)));
    }
    if let Some(note) = note {
        errs.add(facade.update_note(hash, &note).map(|e| updated = Some(e)));
    }

    errs.into_result()?;

    if let Some(entry) = updated {
        msg_success!(Message::EntryUpdated(entry.short_hash().to_string()));
    }
    Ok(())
}

fn handle_delete(factory: &Factory, hash: &str) -> Result<()> {
    let entry = factory.build_entry_facade()?.delete(hash)?;

    msg_success!(Message::EntryDeleted(entry.short_hash().to_string()));
    Ok(())
}

fn handle_list(
    factory: &Factory,
    config: &Config,
    date: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let (start, end) = date_range(date, start, end, Local::now().date_naive());
    let entries = factory.build_tracking_gateway()?.find_entries_in_date_range(start, end)?;

    if entries.is_empty() {
        msg_info!(Message::NoEntriesInRange(date_key(start), date_key(end)));
        return Ok(());
    }

    View::entries(&entries, config.display.time_format);
    Ok(())
}
