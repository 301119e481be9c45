use crate::{
    libs::{config::Config, factory::Factory, formatter::format_duration, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Show a specific entry instead of the current one
    hash: Option<String>,
    /// Print a single line
    #[arg(short, long)]
    short: bool,
}

pub fn cmd(args: StatusArgs, factory: &Factory, config: &Config) -> Result<()> {
    let status = factory.build_sys_gateway().find_or_create_status()?;
    let format = config.display.time_format;

    let hash = match args.hash {
        Some(hash) => hash,
        None if status.entry.is_empty() => {
            if !args.short {
                msg_info!(Message::StatusStopped);
            }
            return Ok(());
        }
        None => status.entry.clone(),
    };

    let entry = factory.build_tracking_gateway()?.find_entry(&hash)?;

    if args.short {
        if entry.is_running {
            println!("{} {}", entry.short_hash(), format_duration(&entry.duration, format));
        }
        return Ok(());
    }

    if entry.is_running {
        msg_print!(Message::StatusRunning {
            hash: entry.short_hash().to_string(),
            note: entry.note.clone(),
            duration: format_duration(&entry.duration, format),
        });
    } else if entry.hash == status.entry {
        msg_info!(Message::StatusLastEntry(entry.short_hash().to_string()));
    }

    View::entries(std::slice::from_ref(&entry), format);
    msg_print!(Message::ActiveWorkspace(status.workspace));
    Ok(())
}
