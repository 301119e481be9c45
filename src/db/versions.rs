//! Migrations shipped with tid, oldest first.

use super::backend::Backend;
use super::migrations::Migration;
use super::store::Store;
use super::sys_gateway::{SysGateway, KEY_STATUS};
use super::{workspace_bucket, BUCKET_LEGACY_TRACKING, BUCKET_SYS};
use crate::libs::error::{ErrorStack, Result, TidError};
use crate::libs::status::{Status, DEFAULT_WORKSPACE};
use crate::libs::workspace::WorkspaceIndex;
use std::rc::Rc;
use tracing::debug;

pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(CreateBuckets),
        Box::new(MoveLegacyTracking),
        Box::new(SeedWorkspaceIndex),
        Box::new(BackfillStatusWorkspace),
    ]
}

/// Creates the system bucket, the legacy flat tracking bucket, and the
/// default workspace bucket.
pub struct CreateBuckets;

impl Migration for CreateBuckets {
    fn description(&self) -> &'static str {
        "Set up basic data structure."
    }

    fn version(&self) -> u64 {
        1489449419
    }

    fn migrate(&self, backend: &Rc<dyn Backend>) -> Result<()> {
        let mut errs = ErrorStack::new();
        errs.add(backend.create_bucket_if_not_exists(BUCKET_SYS));
        errs.add(backend.create_bucket_if_not_exists(BUCKET_LEGACY_TRACKING));
        errs.add(backend.create_bucket_if_not_exists(&workspace_bucket(DEFAULT_WORKSPACE)));
        errs.into_result()
    }
}

/// Moves everything out of the legacy flat bucket: the status record goes to
/// the system bucket, the rest to the default workspace.
pub struct MoveLegacyTracking;

impl Migration for MoveLegacyTracking {
    fn description(&self) -> &'static str {
        "Migrate data into new bucket layout for workspaces."
    }

    fn version(&self) -> u64 {
        1489498859
    }

    fn migrate(&self, backend: &Rc<dyn Backend>) -> Result<()> {
        if !backend.has_bucket(BUCKET_LEGACY_TRACKING) {
            return Ok(());
        }

        let workspace = workspace_bucket(DEFAULT_WORKSPACE);
        backend.create_bucket_if_not_exists(&workspace)?;

        let mut errs = ErrorStack::new();
        let mut moved = 0usize;
        backend.for_each(BUCKET_LEGACY_TRACKING, &mut |key, value| {
            let target = if key == KEY_STATUS { BUCKET_SYS } else { workspace.as_str() };
            errs.add(backend.write(target, key, value));
            moved += 1;
            Ok(())
        })?;

        errs.into_result()?;
        debug!(moved, "moved legacy tracking keys");

        backend.delete_bucket(BUCKET_LEGACY_TRACKING)
    }
}

/// Seeds the workspace index with the default workspace.
pub struct SeedWorkspaceIndex;

impl Migration for SeedWorkspaceIndex {
    fn description(&self) -> &'static str {
        "Set up workspace index with default workspace."
    }

    fn version(&self) -> u64 {
        1491132640
    }

    fn migrate(&self, backend: &Rc<dyn Backend>) -> Result<()> {
        let sys_gateway = SysGateway::new(Store::new(backend.clone(), BUCKET_SYS));

        let mut index = match sys_gateway.find_workspace_index() {
            Ok(index) => index,
            Err(TidError::NilResult) => WorkspaceIndex::default(),
            Err(err) => return Err(err),
        };
        index.add(DEFAULT_WORKSPACE);

        sys_gateway.persist_workspace_index(&index)
    }
}

/// Points the status at the default workspace when no workspace is stored.
pub struct BackfillStatusWorkspace;

impl Migration for BackfillStatusWorkspace {
    fn description(&self) -> &'static str {
        "Set up status to point to the default workspace if no workspace is set."
    }

    fn version(&self) -> u64 {
        1496518709
    }

    fn migrate(&self, backend: &Rc<dyn Backend>) -> Result<()> {
        let has_workspace = match backend.read(BUCKET_SYS, KEY_STATUS) {
            Ok(bytes) => {
                let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
                raw.get("workspace").and_then(|w| w.as_str()).is_some_and(|w| !w.is_empty())
            }
            Err(TidError::NilResult) => false,
            Err(err) => return Err(err),
        };

        if has_workspace {
            return Ok(());
        }

        let sys_gateway = SysGateway::new(Store::new(backend.clone(), BUCKET_SYS));
        let mut status: Status = sys_gateway.find_or_create_status()?;
        status.workspace = DEFAULT_WORKSPACE.to_string();

        sys_gateway.persist_status(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::backend::MemoryBackend;
    use crate::db::migrations::{MigrationRegistry, Migrator};

    fn backend() -> Rc<dyn Backend> {
        Rc::new(MemoryBackend::new())
    }

    #[test]
    fn test_versions_are_ascending() {
        let versions: Vec<u64> = all().iter().map(|m| m.version()).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(versions, sorted);
    }

    #[test]
    fn test_fresh_backend_is_fully_set_up() {
        let backend = backend();
        let migrator = Migrator::new(MigrationRegistry::standard().unwrap());
        migrator.run(backend.clone()).unwrap();

        assert!(backend.has_bucket(BUCKET_SYS));
        assert!(backend.has_bucket(&workspace_bucket(DEFAULT_WORKSPACE)));
        assert!(!backend.has_bucket(BUCKET_LEGACY_TRACKING));

        let sys_gateway = SysGateway::new(Store::new(backend.clone(), BUCKET_SYS));
        assert_eq!(sys_gateway.find_workspace_index().unwrap().workspaces, vec![DEFAULT_WORKSPACE]);
        assert_eq!(sys_gateway.find_or_create_status().unwrap().workspace, DEFAULT_WORKSPACE);
    }

    #[test]
    fn test_legacy_bucket_is_split() {
        let backend = backend();
        backend.create_bucket_if_not_exists(BUCKET_LEGACY_TRACKING).unwrap();
        backend.write(BUCKET_LEGACY_TRACKING, KEY_STATUS, br#"{"is_running":true}"#).unwrap();
        backend.write(BUCKET_LEGACY_TRACKING, "sheet:2017-03-14", b"{}").unwrap();
        backend.write(BUCKET_LEGACY_TRACKING, "entry:abcdef0", b"{}").unwrap();

        CreateBuckets.migrate(&backend).unwrap();
        MoveLegacyTracking.migrate(&backend).unwrap();

        let workspace = workspace_bucket(DEFAULT_WORKSPACE);
        assert!(!backend.has_bucket(BUCKET_LEGACY_TRACKING));
        assert_eq!(backend.read(BUCKET_SYS, KEY_STATUS).unwrap(), br#"{"is_running":true}"#.to_vec());
        assert_eq!(backend.read(&workspace, "sheet:2017-03-14").unwrap(), b"{}".to_vec());
        assert_eq!(backend.read(&workspace, "entry:abcdef0").unwrap(), b"{}".to_vec());
        assert!(matches!(backend.read(&workspace, KEY_STATUS), Err(TidError::NilResult)));
    }

    #[test]
    fn test_backfill_keeps_existing_workspace() {
        let backend = backend();
        backend.create_bucket_if_not_exists(BUCKET_SYS).unwrap();
        let sys_gateway = SysGateway::new(Store::new(backend.clone(), BUCKET_SYS));

        let status = Status {
            workspace: "work".to_string(),
            ..Status::default()
        };
        sys_gateway.persist_status(&status).unwrap();
        BackfillStatusWorkspace.migrate(&backend).unwrap();
        assert_eq!(sys_gateway.find_or_create_status().unwrap().workspace, "work");
    }

    #[test]
    fn test_backfill_sets_default_on_empty_workspace() {
        let backend = backend();
        backend.create_bucket_if_not_exists(BUCKET_SYS).unwrap();
        backend
            .write(BUCKET_SYS, KEY_STATUS, br#"{"is_running":false,"entry":"abc","workspace":""}"#)
            .unwrap();

        BackfillStatusWorkspace.migrate(&backend).unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&backend.read(BUCKET_SYS, KEY_STATUS).unwrap()).unwrap();
        assert_eq!(raw["workspace"], DEFAULT_WORKSPACE);
        assert_eq!(raw["entry"], "abc");
    }
}
