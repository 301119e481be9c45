//! Bucketed key-value backends.
//!
//! A [`Backend`] exposes an embedded store as named buckets of byte keys and
//! values. Each call is its own transaction; [`Backend::atomically`] groups
//! several calls when the store supports it.
//!
//! Two implementations are provided:
//!
//! - [`SqliteBackend`]: the on-disk store used by the application.
//! - [`MemoryBackend`]: a `BTreeMap` stand-in for tests.

use crate::libs::error::{ErrorStack, Result, TidError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Callback invoked for each key/value pair by [`Backend::for_each`].
pub type ForEachFn<'a> = dyn FnMut(&str, &[u8]) -> Result<()> + 'a;

/// Abstraction over the embedded key/value store.
pub trait Backend {
    /// Creates a bucket with the given name if it doesn't exist yet.
    fn create_bucket_if_not_exists(&self, name: &str) -> Result<()>;
    /// Returns true if a bucket with the given name exists.
    fn has_bucket(&self, name: &str) -> bool;
    /// Removes a bucket and every key in it.
    fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Reads the raw value stored at `key` in `bucket`.
    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    /// Writes a raw value to `key` in `bucket`.
    fn write(&self, bucket: &str, key: &str, value: &[u8]) -> Result<()>;
    /// Deletes `key` from `bucket`. Deleting an absent key is not an error.
    fn delete(&self, bucket: &str, key: &str) -> Result<()>;
    /// Visits every key in `bucket` in ascending byte order.
    ///
    /// The pairs are snapshotted before the first callback runs, so the
    /// callback is free to write to the backend.
    fn for_each(&self, bucket: &str, f: &mut ForEachFn<'_>) -> Result<()>;

    /// Runs `f` as a single transaction where the store supports it.
    fn atomically(&self, f: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        f()
    }
}

/// Runs a group of independent writes as one unit.
///
/// Every write pushed into the stack is attempted; if any failed the combined
/// error is returned and, on stores with transactions, none of them stick.
pub fn write_together(backend: &dyn Backend, mut writes: impl FnMut(&mut ErrorStack)) -> Result<()> {
    backend.atomically(&mut || {
        let mut errs = ErrorStack::new();
        writes(&mut errs);
        errs.into_result()
    })
}

const SCHEMA_BUCKETS: &str = "CREATE TABLE IF NOT EXISTS buckets (
    name TEXT NOT NULL PRIMARY KEY
)";
const SCHEMA_ENTRIES: &str = "CREATE TABLE IF NOT EXISTS kv (
    bucket TEXT NOT NULL,
    key BLOB NOT NULL,
    value BLOB NOT NULL,
    PRIMARY KEY (bucket, key)
)";
const INSERT_BUCKET: &str = "INSERT OR IGNORE INTO buckets (name) VALUES (?1)";
const SELECT_BUCKET: &str = "SELECT 1 FROM buckets WHERE name = ?1";
const DELETE_BUCKET: &str = "DELETE FROM buckets WHERE name = ?1";
const DELETE_BUCKET_KEYS: &str = "DELETE FROM kv WHERE bucket = ?1";
const SELECT_VALUE: &str = "SELECT value FROM kv WHERE bucket = ?1 AND key = ?2";
const UPSERT_VALUE: &str = "INSERT INTO kv (bucket, key, value) VALUES (?1, ?2, ?3)
    ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value";
const DELETE_VALUE: &str = "DELETE FROM kv WHERE bucket = ?1 AND key = ?2";
const SELECT_BUCKET_VALUES: &str = "SELECT key, value FROM kv WHERE bucket = ?1 ORDER BY key";

const SAVEPOINT: &str = "tid_atomic";

/// SQLite-backed [`Backend`].
///
/// Buckets live in a `buckets` table and their pairs in a `kv` table keyed by
/// `(bucket, key)`. Keys are stored as BLOBs so ordering is bytewise.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::init(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA_BUCKETS, [])?;
        conn.execute(SCHEMA_ENTRIES, [])?;
        Ok(Self { conn })
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| TidError::Database(err))
    }

    /// Runs `f` inside a named savepoint. Savepoints nest, so this also works
    /// when called from within [`Backend::atomically`].
    fn savepoint(&self, name: &str, f: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        self.conn.execute_batch(&format!("SAVEPOINT {name}"))?;
        match f() {
            Ok(()) => {
                self.conn.execute_batch(&format!("RELEASE {name}"))?;
                Ok(())
            }
            Err(err) => {
                debug!(savepoint = name, error = %err, "rolling back");
                self.conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))?;
                Err(err)
            }
        }
    }

    fn require_bucket(&self, name: &str) -> Result<()> {
        if self.has_bucket(name) {
            Ok(())
        } else {
            Err(TidError::NilBucket(name.to_string()))
        }
    }
}

impl Backend for SqliteBackend {
    fn create_bucket_if_not_exists(&self, name: &str) -> Result<()> {
        self.conn.execute(INSERT_BUCKET, params![name])?;
        Ok(())
    }

    fn has_bucket(&self, name: &str) -> bool {
        match self.conn.query_row(SELECT_BUCKET, params![name], |_| Ok(())).optional() {
            Ok(found) => found.is_some(),
            Err(err) => {
                warn!(bucket = name, error = %err, "failed to look up bucket");
                false
            }
        }
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.savepoint("tid_delete_bucket", &mut || {
            if self.conn.execute(DELETE_BUCKET, params![name])? == 0 {
                return Err(TidError::NilBucket(name.to_string()));
            }
            self.conn.execute(DELETE_BUCKET_KEYS, params![name])?;
            Ok(())
        })?;
        debug!(bucket = name, "deleted bucket");
        Ok(())
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.require_bucket(bucket)?;
        self.conn
            .query_row(SELECT_VALUE, params![bucket, key.as_bytes()], |row| row.get::<_, Vec<u8>>(0))
            .optional()?
            .ok_or(TidError::NilResult)
    }

    fn write(&self, bucket: &str, key: &str, value: &[u8]) -> Result<()> {
        self.require_bucket(bucket)?;
        trace!(bucket, key, len = value.len(), "write");
        self.conn.execute(UPSERT_VALUE, params![bucket, key.as_bytes(), value])?;
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.require_bucket(bucket)?;
        trace!(bucket, key, "delete");
        self.conn.execute(DELETE_VALUE, params![bucket, key.as_bytes()])?;
        Ok(())
    }

    fn for_each(&self, bucket: &str, f: &mut ForEachFn<'_>) -> Result<()> {
        self.require_bucket(bucket)?;

        let pairs = {
            let mut stmt = self.conn.prepare(SELECT_BUCKET_VALUES)?;
            let rows = stmt.query_map(params![bucket], |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?)))?;
            let pairs = rows.collect::<std::result::Result<Vec<_>, _>>()?;
            pairs
        };

        for (key, value) in pairs {
            f(&String::from_utf8_lossy(&key), &value)?;
        }
        Ok(())
    }

    fn atomically(&self, f: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        self.savepoint(SAVEPOINT, f)
    }
}

/// In-memory [`Backend`] used by tests.
#[derive(Default)]
pub struct MemoryBackend {
    buckets: RefCell<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn create_bucket_if_not_exists(&self, name: &str) -> Result<()> {
        self.buckets.borrow_mut().entry(name.to_string()).or_default();
        Ok(())
    }

    fn has_bucket(&self, name: &str) -> bool {
        self.buckets.borrow().contains_key(name)
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.buckets
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| TidError::NilBucket(name.to_string()))
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let buckets = self.buckets.borrow();
        let bucket = buckets.get(bucket).ok_or_else(|| TidError::NilBucket(bucket.to_string()))?;
        bucket.get(key).cloned().ok_or(TidError::NilResult)
    }

    fn write(&self, bucket: &str, key: &str, value: &[u8]) -> Result<()> {
        let mut buckets = self.buckets.borrow_mut();
        let bucket = buckets.get_mut(bucket).ok_or_else(|| TidError::NilBucket(bucket.to_string()))?;
        bucket.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        let mut buckets = self.buckets.borrow_mut();
        let bucket = buckets.get_mut(bucket).ok_or_else(|| TidError::NilBucket(bucket.to_string()))?;
        bucket.remove(key);
        Ok(())
    }

    fn for_each(&self, bucket: &str, f: &mut ForEachFn<'_>) -> Result<()> {
        let pairs: Vec<(String, Vec<u8>)> = {
            let buckets = self.buckets.borrow();
            let bucket = buckets.get(bucket).ok_or_else(|| TidError::NilBucket(bucket.to_string()))?;
            bucket.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        for (key, value) in pairs {
            f(&key, &value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backends() -> Vec<Box<dyn Backend>> {
        vec![Box::new(MemoryBackend::new()), Box::new(SqliteBackend::open_in_memory().unwrap())]
    }

    #[test]
    fn test_bucket_lifecycle() {
        for backend in backends() {
            assert!(!backend.has_bucket("tid_sys"));
            backend.create_bucket_if_not_exists("tid_sys").unwrap();
            backend.create_bucket_if_not_exists("tid_sys").unwrap();
            assert!(backend.has_bucket("tid_sys"));

            backend.delete_bucket("tid_sys").unwrap();
            assert!(!backend.has_bucket("tid_sys"));
            assert!(matches!(backend.delete_bucket("tid_sys"), Err(TidError::NilBucket(_))));
        }
    }

    #[test]
    fn test_read_write_delete() {
        for backend in backends() {
            assert!(matches!(backend.read("missing", "k"), Err(TidError::NilBucket(_))));
            assert!(matches!(backend.write("missing", "k", b"v"), Err(TidError::NilBucket(_))));

            backend.create_bucket_if_not_exists("b").unwrap();
            assert!(matches!(backend.read("b", "k"), Err(TidError::NilResult)));

            backend.write("b", "k", b"one").unwrap();
            backend.write("b", "k", b"two").unwrap();
            assert_eq!(backend.read("b", "k").unwrap(), b"two".to_vec());

            backend.delete("b", "k").unwrap();
            backend.delete("b", "k").unwrap();
            assert!(matches!(backend.read("b", "k"), Err(TidError::NilResult)));
        }
    }

    #[test]
    fn test_delete_bucket_drops_keys() {
        for backend in backends() {
            backend.create_bucket_if_not_exists("b").unwrap();
            backend.write("b", "k", b"v").unwrap();
            backend.delete_bucket("b").unwrap();
            backend.create_bucket_if_not_exists("b").unwrap();
            assert!(matches!(backend.read("b", "k"), Err(TidError::NilResult)));
        }
    }

    #[test]
    fn test_for_each_visits_in_key_order() {
        for backend in backends() {
            backend.create_bucket_if_not_exists("b").unwrap();
            backend.create_bucket_if_not_exists("other").unwrap();
            backend.write("b", "sheet:2017-03-02", b"2").unwrap();
            backend.write("b", "entry:abc", b"1").unwrap();
            backend.write("b", "status", b"3").unwrap();
            backend.write("other", "entry:zzz", b"x").unwrap();

            let mut seen = Vec::new();
            backend
                .for_each("b", &mut |key, value| {
                    seen.push((key.to_string(), value.to_vec()));
                    Ok(())
                })
                .unwrap();

            let keys: Vec<&str> = seen.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, vec!["entry:abc", "sheet:2017-03-02", "status"]);
        }
    }

    #[test]
    fn test_for_each_aborts_on_error() {
        for backend in backends() {
            backend.create_bucket_if_not_exists("b").unwrap();
            backend.write("b", "a", b"1").unwrap();
            backend.write("b", "b", b"2").unwrap();

            let mut visited = 0;
            let result = backend.for_each("b", &mut |_, _| {
                visited += 1;
                Err(TidError::NilValue)
            });
            assert!(matches!(result, Err(TidError::NilValue)));
            assert_eq!(visited, 1);
        }
    }

    #[test]
    fn test_for_each_callback_can_write() {
        for backend in backends() {
            backend.create_bucket_if_not_exists("from").unwrap();
            backend.create_bucket_if_not_exists("to").unwrap();
            backend.write("from", "a", b"1").unwrap();

            backend.for_each("from", &mut |key, value| backend.write("to", key, value)).unwrap();
            assert_eq!(backend.read("to", "a").unwrap(), b"1".to_vec());
        }
    }

    #[test]
    fn test_sqlite_atomically_rolls_back() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.create_bucket_if_not_exists("b").unwrap();

        let result = backend.atomically(&mut || {
            backend.write("b", "a", b"1")?;
            backend.write("missing", "a", b"1")
        });
        assert!(result.is_err());
        assert!(matches!(backend.read("b", "a"), Err(TidError::NilResult)));

        backend.atomically(&mut || backend.write("b", "a", b"1")).unwrap();
        assert_eq!(backend.read("b", "a").unwrap(), b"1".to_vec());
    }

    #[test]
    fn test_sqlite_has_bucket_reports_missing_on_query_error() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.create_bucket_if_not_exists("b").unwrap();
        backend.conn.execute("DROP TABLE buckets", []).unwrap();

        assert!(!backend.has_bucket("b"));
    }
}
