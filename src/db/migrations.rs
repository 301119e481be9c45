//! Versioned backend migrations.
//!
//! Migrations are registered in a [`MigrationRegistry`] owned by the caller and
//! applied by a [`Migrator`]. Applied versions are recorded in the system
//! bucket so each migration runs once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use tid::db::backend::SqliteBackend;
//! use tid::db::migrations::{MigrationRegistry, Migrator};
//!
//! let backend = Rc::new(SqliteBackend::open_in_memory()?);
//! let migrator = Migrator::new(MigrationRegistry::standard()?);
//! migrator.run(backend)?;
//! # Ok::<(), tid::libs::error::TidError>(())
//! ```

use super::backend::Backend;
use super::store::Store;
use super::sys_gateway::SysGateway;
use super::BUCKET_SYS;
use crate::libs::error::{Result, TidError};
use crate::libs::messages::Message;
use crate::libs::workspace::MigrationsStatus;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use std::rc::Rc;

/// A single one-time change to the backend layout.
pub trait Migration {
    /// What the migration does.
    fn description(&self) -> &'static str;
    /// Unique, increasing version. By convention the unix time it was written.
    fn version(&self) -> u64;
    /// Applies the change.
    fn migrate(&self, backend: &Rc<dyn Backend>) -> Result<()>;
}

/// The set of migrations known to this build.
#[derive(Default)]
pub struct MigrationRegistry {
    migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every migration shipped with tid.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        for migration in super::versions::all() {
            registry.register(migration)?;
        }
        Ok(registry)
    }

    /// Adds a migration. Versions must be unique.
    pub fn register(&mut self, migration: Box<dyn Migration>) -> Result<()> {
        let version = migration.version();
        if self.migrations.iter().any(|m| m.version() == version) {
            return Err(TidError::DuplicateMigration(version));
        }
        self.migrations.push(migration);
        self.migrations.sort_by_key(|m| m.version());
        Ok(())
    }

    /// Registered migrations in ascending version order.
    pub fn migrations(&self) -> &[Box<dyn Migration>] {
        &self.migrations
    }

    pub fn latest_version(&self) -> u64 {
        self.migrations.last().map(|m| m.version()).unwrap_or(0)
    }
}

/// Summary of the backend's migration state.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    pub applied: Vec<u64>,
    pub pending: Vec<u64>,
    pub latest_available: u64,
}

/// Applies registered migrations to a backend.
pub struct Migrator {
    registry: MigrationRegistry,
}

impl Migrator {
    pub fn new(registry: MigrationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Migrations newer than the latest applied version.
    pub fn pending(&self, status: &MigrationsStatus) -> Vec<&dyn Migration> {
        let latest = status.latest_version();
        self.registry
            .migrations()
            .iter()
            .filter(|m| m.version() > latest)
            .map(|m| m.as_ref())
            .collect()
    }

    /// Brings the backend up to date.
    ///
    /// Stops at the first failing migration. Migrations that already ran in
    /// this call are not rolled back and nothing from this call is recorded,
    /// so a failure needs manual inspection.
    pub fn run(&self, backend: Rc<dyn Backend>) -> Result<Vec<u64>> {
        backend.create_bucket_if_not_exists(BUCKET_SYS)?;

        let sys_gateway = SysGateway::new(Store::new(backend.clone(), BUCKET_SYS));
        let mut status = sys_gateway.find_or_create_migrations_status()?;

        let pending = self.pending(&status);
        if pending.is_empty() {
            msg_debug!(Message::MigrationsUpToDate);
            return Ok(Vec::new());
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        let mut applied = Vec::with_capacity(pending.len());
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version(), migration.description().to_string()));

            if let Err(err) = migration.migrate(&backend) {
                msg_error!(Message::MigrationFailed(migration.version(), err.to_string()));
                return Err(TidError::Migration {
                    version: migration.version(),
                    reason: err.to_string(),
                });
            }
            applied.push(migration.version());
        }

        status.versions.extend(applied.iter().copied());
        sys_gateway.persist_migrations(&status)?;
        msg_success!(Message::MigrationsCompleted(applied.len()));

        Ok(applied)
    }

    /// Reports applied and pending versions without changing anything.
    pub fn report(&self, backend: Rc<dyn Backend>) -> Result<MigrationReport> {
        let status = if backend.has_bucket(BUCKET_SYS) {
            SysGateway::new(Store::new(backend, BUCKET_SYS)).find_or_create_migrations_status()?
        } else {
            MigrationsStatus::default()
        };

        let mut applied = status.versions.clone();
        applied.sort_unstable();

        Ok(MigrationReport {
            pending: self.pending(&status).iter().map(|m| m.version()).collect(),
            applied,
            latest_available: self.registry.latest_version(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::backend::MemoryBackend;
    use std::cell::Cell;

    struct Counting {
        version: u64,
        runs: Rc<Cell<u32>>,
        fail: bool,
    }

    impl Migration for Counting {
        fn description(&self) -> &'static str {
            "Count runs."
        }

        fn version(&self) -> u64 {
            self.version
        }

        fn migrate(&self, _backend: &Rc<dyn Backend>) -> Result<()> {
            self.runs.set(self.runs.get() + 1);
            if self.fail {
                return Err(TidError::NilValue);
            }
            Ok(())
        }
    }

    fn counting(version: u64, runs: &Rc<Cell<u32>>, fail: bool) -> Box<dyn Migration> {
        Box::new(Counting {
            version,
            runs: runs.clone(),
            fail,
        })
    }

    fn applied_versions(backend: &Rc<dyn Backend>) -> Vec<u64> {
        SysGateway::new(Store::new(backend.clone(), BUCKET_SYS))
            .find_or_create_migrations_status()
            .unwrap()
            .versions
    }

    #[test]
    fn test_registry_sorts_and_rejects_duplicates() {
        let runs = Rc::new(Cell::new(0));
        let mut registry = MigrationRegistry::new();
        registry.register(counting(3, &runs, false)).unwrap();
        registry.register(counting(1, &runs, false)).unwrap();

        let versions: Vec<u64> = registry.migrations().iter().map(|m| m.version()).collect();
        assert_eq!(versions, vec![1, 3]);
        assert_eq!(registry.latest_version(), 3);

        assert!(matches!(
            registry.register(counting(3, &runs, false)),
            Err(TidError::DuplicateMigration(3))
        ));
    }

    #[test]
    fn test_run_applies_each_migration_once() {
        let runs = Rc::new(Cell::new(0));
        let mut registry = MigrationRegistry::new();
        registry.register(counting(2, &runs, false)).unwrap();
        registry.register(counting(1, &runs, false)).unwrap();
        let migrator = Migrator::new(registry);
        let backend: Rc<dyn Backend> = Rc::new(MemoryBackend::new());

        assert_eq!(migrator.run(backend.clone()).unwrap(), vec![1, 2]);
        assert_eq!(runs.get(), 2);
        assert_eq!(applied_versions(&backend), vec![1, 2]);

        assert!(migrator.run(backend.clone()).unwrap().is_empty());
        assert_eq!(runs.get(), 2);
        assert_eq!(applied_versions(&backend), vec![1, 2]);
    }

    #[test]
    fn test_only_newer_versions_are_pending() {
        let runs = Rc::new(Cell::new(0));
        let mut registry = MigrationRegistry::new();
        registry.register(counting(1, &runs, false)).unwrap();
        registry.register(counting(5, &runs, false)).unwrap();
        let migrator = Migrator::new(registry);

        let status = MigrationsStatus { versions: vec![3] };
        let pending: Vec<u64> = migrator.pending(&status).iter().map(|m| m.version()).collect();
        assert_eq!(pending, vec![5]);
    }

    #[test]
    fn test_failure_stops_and_records_nothing() {
        let runs = Rc::new(Cell::new(0));
        let mut registry = MigrationRegistry::new();
        registry.register(counting(1, &runs, false)).unwrap();
        registry.register(counting(2, &runs, true)).unwrap();
        registry.register(counting(3, &runs, false)).unwrap();
        let migrator = Migrator::new(registry);
        let backend: Rc<dyn Backend> = Rc::new(MemoryBackend::new());

        let err = migrator.run(backend.clone()).unwrap_err();
        assert!(matches!(err, TidError::Migration { version: 2, .. }));
        assert_eq!(runs.get(), 2);
        assert!(applied_versions(&backend).is_empty());
    }

    #[test]
    fn test_report_lists_pending() {
        let runs = Rc::new(Cell::new(0));
        let mut registry = MigrationRegistry::new();
        registry.register(counting(1, &runs, false)).unwrap();
        let migrator = Migrator::new(registry);
        let backend: Rc<dyn Backend> = Rc::new(MemoryBackend::new());

        let report = migrator.report(backend.clone()).unwrap();
        assert_eq!(report.pending, vec![1]);
        assert!(report.applied.is_empty());

        migrator.run(backend.clone()).unwrap();
        let report = migrator.report(backend).unwrap();
        assert_eq!(report.applied, vec![1]);
        assert!(report.pending.is_empty());
        assert_eq!(report.latest_available, 1);
    }
}
