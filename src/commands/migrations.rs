use crate::{
    db::{
        db::Db,
        migrations::{MigrationRegistry, Migrator},
    },
    libs::messages::Message,
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show applied and pending migrations without running them
    Status,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let db = Db::new_without_migrations()?;
    let migrator = Migrator::new(MigrationRegistry::standard()?);

    match args.command {
        MigrationsCommand::Status => {
            let report = migrator.report(db.backend())?;

            msg_print!(Message::DatabaseVersion(report.applied.last().copied().unwrap_or(0)));
            msg_print!(Message::LatestAvailableVersion(report.latest_available));
            if report.pending.is_empty() {
                msg_info!(Message::MigrationsUpToDate);
            } else {
                msg_info!(Message::MigrationsPending(report.pending.len()));
                for migration in migrator.registry().migrations() {
                    if report.pending.contains(&migration.version()) {
                        println!("  {}: {}", migration.version(), migration.description());
                    }
                }
            }
        }
    }

    db.close()?;
    Ok(())
}
