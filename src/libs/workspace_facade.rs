//! Creating, deleting and switching between workspaces.
//!
//! Each workspace owns one tracking bucket. The system bucket keeps the index
//! of names and the status records which one is active.

use crate::db::backend::{write_together, Backend};
use crate::db::sys_gateway::{recover_nil, SysGateway};
use crate::db::workspace_bucket;
use crate::libs::error::{Result, TidError};
use crate::libs::status::DEFAULT_WORKSPACE;
use crate::libs::workspace::WorkspaceIndex;
use std::rc::Rc;
use tracing::info;

/// Known workspaces and the active one.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceList {
    pub workspaces: Vec<String>,
    pub active: String,
}

pub struct WorkspaceFacade {
    backend: Rc<dyn Backend>,
    sys_gateway: SysGateway,
}

impl WorkspaceFacade {
    pub fn new(backend: Rc<dyn Backend>, sys_gateway: SysGateway) -> Self {
        Self { backend, sys_gateway }
    }

    pub fn create(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let mut index = self.find_index()?;
        if !index.add(name) {
            return Err(TidError::WorkspaceAlreadyExists(name.to_string()));
        }

        let bucket = workspace_bucket(name);
        write_together(self.backend.as_ref(), |errs| {
            errs.add(self.backend.create_bucket_if_not_exists(&bucket));
            errs.add(self.sys_gateway.persist_workspace_index(&index));
        })?;

        info!(workspace = name, "created workspace");
        Ok(())
    }

    /// Deletes a workspace and everything tracked in it.
    pub fn delete(&self, name: &str) -> Result<()> {
        if name == DEFAULT_WORKSPACE {
            return Err(TidError::WorkspaceProtected(name.to_string()));
        }

        let mut index = self.find_index()?;
        if !index.contains(name) {
            return Err(TidError::WorkspaceNotFound(name.to_string()));
        }

        let status = self.sys_gateway.find_or_create_status()?;
        if status.workspace == name {
            return Err(TidError::WorkspaceActive(name.to_string()));
        }

        index.remove(name);

        let bucket = workspace_bucket(name);
        write_together(self.backend.as_ref(), |errs| {
            errs.add(self.sys_gateway.persist_workspace_index(&index));
            if self.backend.has_bucket(&bucket) {
                errs.add(self.backend.delete_bucket(&bucket));
            }
        })?;

        info!(workspace = name, "deleted workspace");
        Ok(())
    }

    /// Makes `name` the active workspace. Any running timer is stopped and
    /// forgotten.
    pub fn switch(&self, name: &str) -> Result<()> {
        let index = self.find_index()?;
        if !index.contains(name) {
            return Err(TidError::WorkspaceNotFound(name.to_string()));
        }

        let mut status = self.sys_gateway.find_or_create_status()?;
        status.stop_and_clear();
        status.workspace = name.to_string();
        self.sys_gateway.persist_status(&status)?;

        info!(workspace = name, "switched workspace");
        Ok(())
    }

    pub fn list(&self) -> Result<WorkspaceList> {
        let index = self.find_index()?;
        let status = self.sys_gateway.find_or_create_status()?;

        Ok(WorkspaceList {
            workspaces: index.workspaces,
            active: status.workspace,
        })
    }

    fn find_index(&self) -> Result<WorkspaceIndex> {
        recover_nil(self.sys_gateway.find_workspace_index())
    }
}

/// Workspace names end up in bucket names, so they're kept to letters,
/// digits, `-` and `_`.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(TidError::InvalidWorkspaceName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::backend::MemoryBackend;
    use crate::db::migrations::{MigrationRegistry, Migrator};
    use crate::libs::factory::Factory;

    fn factory() -> (Rc<dyn Backend>, Factory) {
        let backend: Rc<dyn Backend> = Rc::new(MemoryBackend::new());
        Migrator::new(MigrationRegistry::standard().unwrap())
            .run(backend.clone())
            .unwrap();
        (backend.clone(), Factory::new(backend))
    }

    #[test]
    fn test_create_adds_bucket_and_index() {
        let (backend, factory) = factory();
        let facade = factory.build_workspace_facade();
        facade.create("work").unwrap();

        assert!(backend.has_bucket("tid_tracking_work"));
        let list = facade.list().unwrap();
        assert_eq!(list.workspaces, vec!["default", "work"]);
        assert_eq!(list.active, DEFAULT_WORKSPACE);
    }

    #[test]
    fn test_create_existing() {
        let (_, factory) = factory();
        let facade = factory.build_workspace_facade();
        assert!(matches!(facade.create("default"), Err(TidError::WorkspaceAlreadyExists(_))));
    }

    #[test]
    fn test_create_invalid_name() {
        let (_, factory) = factory();
        let facade = factory.build_workspace_facade();
        assert!(matches!(facade.create(""), Err(TidError::InvalidWorkspaceName)));
        assert!(matches!(facade.create("a b"), Err(TidError::InvalidWorkspaceName)));

        let err = facade.create("a b").unwrap_err();
        assert!(err.to_string().contains("letters, digits, '-' and '_'"));
    }

    #[test]
    fn test_switch_unknown_leaves_status() {
        let (_, factory) = factory();
        let sys_gateway = factory.build_sys_gateway();
        let before = sys_gateway.find_or_create_status().unwrap();

        let result = factory.build_workspace_facade().switch("nope");
        assert!(matches!(result, Err(TidError::WorkspaceNotFound(_))));
        assert_eq!(sys_gateway.find_or_create_status().unwrap(), before);
    }

    #[test]
    fn test_switch_stops_and_clears() {
        let (_, factory) = factory();
        factory.build_tracking_facade().unwrap().start("a").unwrap();
        let facade = factory.build_workspace_facade();
        facade.create("work").unwrap();
        facade.switch("work").unwrap();

        let status = factory.build_sys_gateway().find_or_create_status().unwrap();
        assert!(!status.is_running);
        assert!(status.entry.is_empty());
        assert_eq!(status.workspace, "work");
    }

    #[test]
    fn test_delete_rules() {
        let (backend, factory) = factory();
        let facade = factory.build_workspace_facade();
        facade.create("work").unwrap();

        assert!(matches!(facade.delete("default"), Err(TidError::WorkspaceProtected(_))));
        assert!(matches!(facade.delete("nope"), Err(TidError::WorkspaceNotFound(_))));

        facade.switch("work").unwrap();
        assert!(matches!(facade.delete("work"), Err(TidError::WorkspaceActive(_))));

        facade.switch("default").unwrap();
        facade.delete("work").unwrap();
        assert!(!backend.has_bucket("tid_tracking_work"));
        assert_eq!(facade.list().unwrap().workspaces, vec!["default"]);
    }
}
