use crate::{
    libs::{factory::Factory, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// What you are working on
    note: Vec<String>,
}

pub fn cmd(args: StartArgs, factory: &Factory) -> Result<()> {
    let entry = factory.build_tracking_facade()?.start(&args.note.join(" "))?;

    msg_success!(Message::TimerStarted(entry.short_hash().to_string(), entry.note.clone()));
    Ok(())
}
