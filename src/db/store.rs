//! Bucket-scoped typed access to a [`Backend`].
//!
//! Records are serialized as JSON objects: fields are tagged by name, fields
//! a reader doesn't know are skipped and missing ones fall back to defaults,
//! so records written by older or newer releases stay readable.

use super::backend::Backend;
use crate::libs::error::{Result, TidError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// A value that can be persisted through a [`Store`].
pub trait Record: Serialize + DeserializeOwned {
    /// Schema name, used in log output.
    const KIND: &'static str;

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Typed view of one bucket.
#[derive(Clone)]
pub struct Store {
    backend: Rc<dyn Backend>,
    bucket: String,
}

impl Store {
    pub fn new(backend: Rc<dyn Backend>, bucket: impl Into<String>) -> Self {
        Self {
            backend,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn backend(&self) -> &Rc<dyn Backend> {
        &self.backend
    }

    /// Reads and decodes the record at `key`.
    pub fn read<R: Record>(&self, key: &str) -> Result<R> {
        check_key(key)?;
        let bytes = self.backend.read(&self.bucket, key)?;
        tracing::trace!(bucket = %self.bucket, key, kind = R::KIND, "read record");
        R::decode(&bytes)
    }

    /// Encodes and writes `record` at `key`.
    pub fn write<R: Record>(&self, key: &str, record: &R) -> Result<()> {
        check_key(key)?;
        let bytes = record.encode()?;
        tracing::trace!(bucket = %self.bucket, key, kind = R::KIND, "write record");
        self.backend.write(&self.bucket, key, &bytes)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.backend.delete(&self.bucket, key)
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(TidError::NilValue);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::backend::MemoryBackend;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        count: u64,
        tags: Vec<String>,
    }

    impl Record for Sample {
        const KIND: &'static str = "sample";
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct SampleV2 {
        name: String,
        count: u64,
        tags: Vec<String>,
        colour: String,
    }

    impl Record for SampleV2 {
        const KIND: &'static str = "sample";
    }

    fn store() -> Store {
        let backend = Rc::new(MemoryBackend::new());
        backend.create_bucket_if_not_exists("b").unwrap();
        Store::new(backend, "b")
    }

    #[test]
    fn test_write_then_read_reproduces_fields() {
        let store = store();
        let sample = Sample {
            name: "build".to_string(),
            count: 3,
            tags: vec!["a".to_string(), "b".to_string()],
        };

        store.write("k", &sample).unwrap();
        let read: Sample = store.read("k").unwrap();
        assert_eq!(read, sample);
    }

    #[test]
    fn test_read_missing_key_is_nil_result() {
        let store = store();
        assert!(matches!(store.read::<Sample>("k"), Err(TidError::NilResult)));
    }

    #[test]
    fn test_read_missing_bucket_is_nil_bucket() {
        let store = Store::new(Rc::new(MemoryBackend::new()), "missing");
        assert!(matches!(store.read::<Sample>("k"), Err(TidError::NilBucket(_))));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let store = store();
        assert!(matches!(store.write("", &Sample::default()), Err(TidError::NilValue)));
        assert!(matches!(store.read::<Sample>(""), Err(TidError::NilValue)));
        assert!(matches!(store.delete(""), Err(TidError::NilValue)));
    }

    #[test]
    fn test_schemas_are_forward_and_backward_compatible() {
        let store = store();
        let newer = SampleV2 {
            name: "x".to_string(),
            count: 1,
            tags: vec![],
            colour: "red".to_string(),
        };
        store.write("new", &newer).unwrap();
        let older: Sample = store.read("new").unwrap();
        assert_eq!(older.name, "x");
        assert_eq!(older.count, 1);

        store.write("old", &Sample { name: "y".to_string(), ..Sample::default() }).unwrap();
        let upgraded: SampleV2 = store.read("old").unwrap();
        assert_eq!(upgraded.name, "y");
        assert_eq!(upgraded.colour, "");
    }

    #[test]
    fn test_corrupt_value_is_codec_error() {
        let store = store();
        store.backend().write("b", "k", b"not json").unwrap();
        assert!(matches!(store.read::<Sample>("k"), Err(TidError::Codec(_))));
    }
}
