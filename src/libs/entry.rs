//! Timesheet entries and the short-hash index record.

use crate::db::store::Record;
use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of a full entry hash, in hex characters.
pub const HASH_LEN: usize = 40;
/// Length of the abbreviated hash shown to users.
pub const SHORT_HASH_LEN: usize = 7;

/// A single unit of tracked work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    /// The date of the timesheet this entry belongs to.
    pub timesheet: String,
    pub hash: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
    pub note: String,
    #[serde(with = "seconds")]
    pub duration: TimeDelta,
    /// Computed from the status record on read, never stored.
    #[serde(skip)]
    pub is_running: bool,
}

impl Record for Entry {
    const KIND: &'static str = "entry";
}

impl Entry {
    /// Creates an entry with a fresh random hash and both timestamps set to now.
    pub fn new() -> Self {
        let now = now_seconds();
        Self {
            hash: create_hash(),
            created: now,
            updated: now,
            ..Self::default()
        }
    }

    pub fn short_hash(&self) -> &str {
        self.hash.get(..SHORT_HASH_LEN).unwrap_or(&self.hash)
    }

    /// Folds the time elapsed since `updated` into `duration` and moves
    /// `updated` to now.
    pub fn update_duration(&mut self) {
        self.update_duration_at(now_seconds());
    }

    /// Same as [`Entry::update_duration`] with an explicit clock reading.
    /// Readings earlier than `updated` add nothing.
    pub fn update_duration_at(&mut self, now: DateTime<Utc>) {
        let elapsed = (now - self.updated).num_seconds().max(0);
        self.duration += TimeDelta::seconds(elapsed);
        self.updated = now;
    }

    /// Start time in the local timezone.
    pub fn created_local(&self) -> DateTime<Local> {
        self.created.with_timezone(&Local)
    }

    pub fn updated_local(&self) -> DateTime<Local> {
        self.updated.with_timezone(&Local)
    }
}

/// Record stored at an entry's short hash, listing every full hash that
/// shares the prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryRef {
    pub key: String,
    pub entries: Vec<String>,
    /// Single-target form written before collisions were tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

impl Record for EntryRef {
    const KIND: &'static str = "entry_ref";
}

impl EntryRef {
    /// All hashes this record points at, including the legacy single target.
    pub fn hashes(&self) -> Vec<String> {
        let mut hashes = self.entries.clone();
        if let Some(entry) = &self.entry {
            if !hashes.contains(entry) {
                hashes.insert(0, entry.clone());
            }
        }
        hashes
    }

    /// Adds `hash`, returning false if it was already present.
    pub fn insert(&mut self, hash: &str) -> bool {
        self.upgrade();
        if self.entries.iter().any(|h| h == hash) {
            return false;
        }
        self.entries.push(hash.to_string());
        true
    }

    pub fn remove(&mut self, hash: &str) {
        self.upgrade();
        self.entries.retain(|h| h != hash);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.entry.is_none()
    }

    fn upgrade(&mut self) {
        self.entries = self.hashes();
        self.entry = None;
    }
}

/// Creates a new random 40 character hex hash.
pub fn create_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());

    let mut hash = hex::encode(hasher.finalize());
    hash.truncate(HASH_LEN);
    hash
}

/// Current time truncated to whole seconds, which is the stored precision.
pub fn now_seconds() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default()
}

/// Serializes a `TimeDelta` as whole seconds.
mod seconds {
    use chrono::TimeDelta;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(seconds).ok_or_else(|| D::Error::custom(format!("duration of {seconds}s is out of range")))
    }
}
