use super::{date_arg, date_range};
use crate::{
    libs::{config::Config, factory::Factory, formatter::last_weekday, messages::Message, timesheet::date_key, view::View},
    msg_info, msg_success,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TimesheetArgs {
    #[command(subcommand)]
    command: TimesheetCommand,
}

#[derive(Debug, Subcommand)]
enum TimesheetCommand {
    /// List timesheets, this week's by default
    List {
        #[arg(short, long, value_parser = date_arg)]
        start: Option<NaiveDate>,
        #[arg(short, long, value_parser = date_arg)]
        end: Option<NaiveDate>,
    },
    /// Delete a timesheet and all of its entries
    Delete {
        #[arg(value_parser = date_arg)]
        date: NaiveDate,
    },
}

pub fn cmd(args: TimesheetArgs, factory: &Factory, config: &Config) -> Result<()> {
    match args.command {
        TimesheetCommand::List { start, end } => handle_list(factory, config, start, end),
        TimesheetCommand::Delete { date } => handle_delete(factory, date),
    }
}

fn handle_list(factory: &Factory, config: &Config, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    let (start, end) = date_range(None, start, end, last_weekday(config.display.first_weekday));
    let gateway = factory.build_tracking_gateway()?;

    let mut rows = Vec::new();
    for sheet in gateway.find_timesheets_in_date_range(start, end)? {
        let entries = sheet
            .entries
            .iter()
            .map(|hash| gateway.find_entry(hash))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.push((sheet, entries));
    }

    if rows.is_empty() {
        msg_info!(Message::NoTimesheetsInRange(date_key(start), date_key(end)));
        return Ok(());
    }

    View::timesheets(&rows, config.display.time_format);
    Ok(())
}

fn handle_delete(factory: &Factory, date: NaiveDate) -> Result<()> {
    let sheet = factory.build_timesheet_facade()?.delete(date)?;

    msg_success!(Message::TimesheetDeleted(sheet.key, sheet.entries.len()));
    Ok(())
}
