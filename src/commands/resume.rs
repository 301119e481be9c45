use crate::{
    libs::{factory::Factory, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ResumeArgs {
    /// Short or full hash of the entry; defaults to the last tracked one
    hash: Option<String>,
}

pub fn cmd(args: ResumeArgs, factory: &Factory) -> Result<()> {
    let entry = factory.build_tracking_facade()?.resume(args.hash.as_deref())?;

    msg_success!(Message::TimerResumed(entry.short_hash().to_string(), entry.note.clone()));
    Ok(())
}
