use super::{date_arg, date_range};
use crate::{
    libs::{
        config::Config,
        factory::Factory,
        formatter::{format_duration, last_weekday},
        messages::Message,
        timesheet::date_key,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::{Local, TimeDelta};
use clap::Args;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report on a single date
    #[arg(short, long, value_parser = date_arg, conflicts_with_all = ["start", "end", "week"])]
    date: Option<chrono::NaiveDate>,
    /// First date of the report, defaults to today
    #[arg(short, long, value_parser = date_arg)]
    start: Option<chrono::NaiveDate>,
    /// Last date of the report, defaults to today
    #[arg(short, long, value_parser = date_arg)]
    end: Option<chrono::NaiveDate>,
    /// Start the report on the configured first day of the week
    #[arg(short, long, conflicts_with = "start")]
    week: bool,
    /// Hide the total line
    #[arg(long)]
    no_summary: bool,
}

pub fn cmd(args: ReportArgs, factory: &Factory, config: &Config) -> Result<()> {
    let default_start = if args.week {
        last_weekday(config.display.first_weekday)
    } else {
        Local::now().date_naive()
    };
    let (start, end) = date_range(args.date, args.start, args.end, default_start);

    let entries = factory.build_tracking_gateway()?.find_entries_in_date_range(start, end)?;
    let (start, end) = (date_key(start), date_key(end));

    if entries.is_empty() {
        msg_info!(Message::NoEntriesInRange(start, end));
        return Ok(());
    }

    let format = config.display.time_format;

    msg_print!(Message::ReportHeader(start, end), true);
    View::entries(&entries, format);

    if !args.no_summary {
        let total: TimeDelta = entries.iter().map(|e| e.duration).sum();
        msg_print!(Message::ReportTotal(format_duration(&total, format)));
    }

    Ok(())
}
