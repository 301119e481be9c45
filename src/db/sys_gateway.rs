//! Access to system records in the `tid_sys` bucket.

use super::store::Store;
use crate::libs::error::{Result, TidError};
use crate::libs::status::Status;
use crate::libs::workspace::{MigrationsStatus, WorkspaceIndex};

/// Key of the applied migration versions.
pub const KEY_MIGRATIONS: &str = "migration_versions";
/// Key of the tracking status.
pub const KEY_STATUS: &str = "status";
/// Key of the workspace index.
pub const KEY_WORKSPACE_INDEX: &str = "workspace_index";

#[derive(Clone)]
pub struct SysGateway {
    store: Store,
}

impl SysGateway {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The stored migration versions, or an empty set if none were recorded.
    pub fn find_or_create_migrations_status(&self) -> Result<MigrationsStatus> {
        recover_nil(self.store.read(KEY_MIGRATIONS))
    }

    /// The stored status, or a stopped status in the default workspace.
    pub fn find_or_create_status(&self) -> Result<Status> {
        recover_nil(self.store.read(KEY_STATUS))
    }

    /// The workspace index. Fails with `NilResult` before it has been seeded.
    pub fn find_workspace_index(&self) -> Result<WorkspaceIndex> {
        self.store.read(KEY_WORKSPACE_INDEX)
    }

    pub fn persist_migrations(&self, migrations: &MigrationsStatus) -> Result<()> {
        self.store.write(KEY_MIGRATIONS, migrations)
    }

    pub fn persist_status(&self, status: &Status) -> Result<()> {
        self.store.write(KEY_STATUS, status)
    }

    pub fn persist_workspace_index(&self, index: &WorkspaceIndex) -> Result<()> {
        self.store.write(KEY_WORKSPACE_INDEX, index)
    }
}

/// Turns a missing record into its default value.
pub(crate) fn recover_nil<T: Default>(result: Result<T>) -> Result<T> {
    match result {
        Err(TidError::NilResult) => Ok(T::default()),
        other => other,
    }
}
