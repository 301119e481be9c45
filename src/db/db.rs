use super::backend::{Backend, SqliteBackend};
use super::migrations::{MigrationRegistry, Migrator};
use crate::libs::data_storage::DataStorage;
use crate::libs::error::Result;
use std::rc::Rc;

pub const DB_FILE_NAME: &str = "tid.db";

/// An open, migrated database.
pub struct Db {
    backend: Rc<SqliteBackend>,
}

impl Db {
    /// Opens the database in the tid directory and applies pending migrations.
    pub fn new() -> Result<Db> {
        Self::open(&DataStorage::new())
    }

    /// Opens the database without touching its layout.
    pub fn new_without_migrations() -> Result<Db> {
        Self::open_without_migrations(&DataStorage::new())
    }

    /// Opens the database kept in `storage` and applies pending migrations.
    pub fn open(storage: &DataStorage) -> Result<Db> {
        let db = Self::open_without_migrations(storage)?;
        Migrator::new(MigrationRegistry::standard()?).run(db.backend())?;
        Ok(db)
    }

    pub fn open_without_migrations(storage: &DataStorage) -> Result<Db> {
        let path = storage.get_path(DB_FILE_NAME)?;
        let backend = SqliteBackend::open(&path)?;
        storage.restrict_permissions(&path)?;

        Ok(Db {
            backend: Rc::new(backend),
        })
    }

    pub fn backend(&self) -> Rc<dyn Backend> {
        self.backend.clone()
    }

    /// Closes the database. If handles from [`Db::backend`] are still alive
    /// the connection is closed when the last of them drops instead.
    pub fn close(self) -> Result<()> {
        match Rc::try_unwrap(self.backend) {
            Ok(backend) => backend.close(),
            Err(_) => Ok(()),
        }
    }
}
