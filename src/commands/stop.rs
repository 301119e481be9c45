use crate::{
    libs::{config::Config, factory::Factory, formatter::format_duration, messages::Message},
    msg_success,
};
use anyhow::Result;

pub fn cmd(factory: &Factory, config: &Config) -> Result<()> {
    let entry = factory.build_tracking_facade()?.stop()?;

    msg_success!(Message::TimerStopped(
        entry.short_hash().to_string(),
        format_duration(&entry.duration, config.display.time_format)
    ));
    Ok(())
}
