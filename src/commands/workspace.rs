use crate::{
    libs::{factory::Factory, messages::Message},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct WorkspaceArgs {
    #[command(subcommand)]
    command: Option<WorkspaceCommand>,
}

#[derive(Debug, Subcommand)]
enum WorkspaceCommand {
    Create { name: String },
    /// Delete a workspace and everything tracked in it
    Delete { name: String },
    /// Make a workspace active, stopping any running timer
    Switch { name: String },
    List,
}

pub fn cmd(args: WorkspaceArgs, factory: &Factory) -> Result<()> {
    let facade = factory.build_workspace_facade();

    match args.command {
        Some(WorkspaceCommand::Create { name }) => {
            facade.create(&name)?;
            msg_success!(Message::WorkspaceCreated(name));
        }
        Some(WorkspaceCommand::Delete { name }) => {
            facade.delete(&name)?;
            msg_success!(Message::WorkspaceDeleted(name));
        }
        Some(WorkspaceCommand::Switch { name }) => {
            facade.switch(&name)?;
            msg_success!(Message::WorkspaceSwitched(name));
        }
        Some(WorkspaceCommand::List) | None => {
            let list = facade.list()?;
            msg_print!(Message::WorkspacesHeader);
            for name in list.workspaces {
                let marker = if name == list.active { "*" } else { " " };
                println!("{} {}", marker, name);
            }
        }
    }

    Ok(())
}
