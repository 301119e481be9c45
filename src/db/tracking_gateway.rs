//! Access to entries and timesheets inside one workspace bucket.

use super::store::Store;
use super::sys_gateway::{recover_nil, SysGateway};
use crate::libs::entry::{now_seconds, Entry, EntryRef, SHORT_HASH_LEN};
use crate::libs::error::{ErrorStack, Result, TidError};
use crate::libs::timesheet::{date_key, today_key, Timesheet};
use chrono::NaiveDate;
use tracing::debug;

/// Prefix of entry and short-hash index keys.
pub const KEY_ENTRY_PREFIX: &str = "entry:";
/// Prefix of timesheet keys.
pub const KEY_TIMESHEET_PREFIX: &str = "sheet:";

pub fn entry_key(hash: &str) -> String {
    format!("{KEY_ENTRY_PREFIX}{hash}")
}

pub fn timesheet_key(date: &str) -> String {
    format!("{KEY_TIMESHEET_PREFIX}{date}")
}

#[derive(Clone)]
pub struct TrackingGateway {
    store: Store,
    sys_gateway: SysGateway,
}

impl TrackingGateway {
    pub fn new(store: Store, sys_gateway: SysGateway) -> Self {
        Self { store, sys_gateway }
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    /// Finds an entry by full or short hash.
    ///
    /// If the entry is the one being timed, the returned value already has
    /// the running time folded into its duration. That change is not
    /// persisted.
    pub fn find_entry(&self, hash: &str) -> Result<Entry> {
        let status = self.sys_gateway.find_or_create_status()?;

        let hash = if hash.len() == SHORT_HASH_LEN {
            self.find_entry_hash_by_short_hash(hash)?
        } else {
            hash.to_string()
        };

        let mut entry: Entry = self.store.read(&entry_key(&hash))?;
        entry.is_running = status.is_tracking(&entry.hash);
        if entry.is_running {
            entry.update_duration();
        }

        Ok(entry)
    }

    /// Resolves a short hash to the single full hash it abbreviates.
    pub fn find_entry_hash_by_short_hash(&self, short_hash: &str) -> Result<String> {
        let entry_ref: EntryRef = self.store.read(&entry_key(short_hash))?;
        let mut hashes = entry_ref.hashes();

        match hashes.len() {
            0 => Err(TidError::NilResult),
            1 => Ok(hashes.remove(0)),
            n => Err(TidError::AmbiguousShortHash(short_hash.to_string(), n)),
        }
    }

    /// All entries on the timesheets between `start` and `end`, inclusive.
    pub fn find_entries_in_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for sheet in self.find_timesheets_in_date_range(start, end)? {
            for hash in &sheet.entries {
                entries.push(self.find_entry(hash)?);
            }
        }

        Ok(entries)
    }

    pub fn find_timesheet(&self, date: &str) -> Result<Timesheet> {
        self.store.read(&timesheet_key(date))
    }

    /// The timesheet for `date`, or a new empty one that is not yet persisted.
    pub fn find_or_create_timesheet(&self, date: &str) -> Result<Timesheet> {
        let mut sheet: Timesheet = recover_nil(self.store.read(&timesheet_key(date)))?;
        if sheet.key.is_empty() {
            sheet.key = date.to_string();
        }
        Ok(sheet)
    }

    pub fn find_or_create_todays_timesheet(&self) -> Result<Timesheet> {
        self.find_or_create_timesheet(&today_key())
    }

    /// Timesheets between `start` and `end`, inclusive, skipping dates that
    /// have none.
    pub fn find_timesheets_in_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Timesheet>> {
        if start > end {
            return Err(TidError::InvalidDateRange);
        }

        let mut sheets = Vec::new();
        let mut current = Some(start);

        while let Some(date) = current.filter(|d| *d <= end) {
            match self.find_timesheet(&date_key(date)) {
                Ok(sheet) => sheets.push(sheet),
                Err(TidError::NilResult) => {}
                Err(err) => return Err(err),
            }
            current = date.succ_opt();
        }

        Ok(sheets)
    }

    /// Writes the short-hash index record and then the entry itself,
    /// stamping `updated` first.
    pub fn persist_entry(&self, entry: &mut Entry) -> Result<()> {
        entry.updated = now_seconds();

        let mut errs = ErrorStack::new();
        errs.add(self.index_short_hash(entry));
        errs.add(self.store.write(&entry_key(&entry.hash), entry));
        errs.into_result()
    }

    pub fn persist_timesheet(&self, sheet: &Timesheet) -> Result<()> {
        self.store.write(&timesheet_key(&sheet.key), sheet)
    }

    /// Removes an entry's records. Timesheet and status references are left
    /// to the caller.
    pub fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let mut errs = ErrorStack::new();
        errs.add(self.unindex_short_hash(entry));
        errs.add(self.store.delete(&entry_key(&entry.hash)));
        errs.into_result()
    }

    pub fn delete_timesheet(&self, sheet: &Timesheet) -> Result<()> {
        self.store.delete(&timesheet_key(&sheet.key))
    }

    fn index_short_hash(&self, entry: &Entry) -> Result<()> {
        let short_hash = entry.short_hash();
        let key = entry_key(short_hash);
        let mut entry_ref: EntryRef = recover_nil(self.store.read(&key))?;
        entry_ref.key = short_hash.to_string();

        let changed = entry_ref.entry.is_some() || entry_ref.entries.is_empty();
        let added = entry_ref.insert(&entry.hash);
        if added && entry_ref.entries.len() > 1 {
            debug!(short_hash, count = entry_ref.entries.len(), "short hash collision");
        }
        if added || changed {
            self.store.write(&key, &entry_ref)?;
        }
        Ok(())
    }

    fn unindex_short_hash(&self, entry: &Entry) -> Result<()> {
        let key = entry_key(entry.short_hash());
        let mut entry_ref: EntryRef = recover_nil(self.store.read(&key))?;
        entry_ref.remove(&entry.hash);

        if entry_ref.is_empty() {
            self.store.delete(&key)
        } else {
            self.store.write(&key, &entry_ref)
        }
    }
}
