//! Manual edits to entries: creating, adjusting, annotating and deleting.

use crate::db::backend::{write_together, Backend};
use crate::db::sys_gateway::SysGateway;
use crate::db::tracking_gateway::TrackingGateway;
use crate::libs::entry::Entry;
use crate::libs::error::{Result, TidError};
use crate::libs::timesheet::date_key;
use chrono::{Local, NaiveDate, TimeDelta, TimeZone, Utc};
use std::rc::Rc;
use tracing::{debug, info};

pub struct EntryFacade {
    backend: Rc<dyn Backend>,
    sys_gateway: SysGateway,
    tracking_gateway: TrackingGateway,
}

impl EntryFacade {
    pub fn new(backend: Rc<dyn Backend>, sys_gateway: SysGateway, tracking_gateway: TrackingGateway) -> Self {
        Self {
            backend,
            sys_gateway,
            tracking_gateway,
        }
    }

    /// Logs a finished entry of `duration` on the timesheet for `date`.
    pub fn create(&self, date: NaiveDate, duration: TimeDelta, note: &str) -> Result<Entry> {
        if duration < TimeDelta::zero() {
            return Err(TidError::NegativeDuration);
        }

        let key = date_key(date);
        let mut sheet = self.tracking_gateway.find_or_create_timesheet(&key)?;

        let mut entry = Entry::new();
        entry.timesheet = key;
        entry.note = note.to_string();
        entry.duration = duration;
        if date != Local::now().date_naive() {
            if let Some(start) = date.and_hms_opt(0, 0, 0).and_then(|dt| Local.from_local_datetime(&dt).earliest()) {
                entry.created = start.with_timezone(&Utc);
            }
        }

        sheet.append_entry(&entry);

        write_together(self.backend.as_ref(), |errs| {
            errs.add(self.tracking_gateway.persist_entry(&mut entry));
            errs.add(self.tracking_gateway.persist_timesheet(&sheet));
        })?;

        info!(hash = %entry.hash, timesheet = %entry.timesheet, "created entry");
        Ok(entry)
    }

    /// Replaces the duration of an entry.
    pub fn update_duration(&self, hash: &str, duration: TimeDelta) -> Result<Entry> {
        if duration < TimeDelta::zero() {
            return Err(TidError::NegativeDuration);
        }

        let mut entry = self.tracking_gateway.find_entry(hash)?;
        entry.duration = duration;
        self.tracking_gateway.persist_entry(&mut entry)?;

        debug!(hash = %entry.hash, duration = duration.num_seconds(), "updated duration");
        Ok(entry)
    }

    /// Adds `offset` to the duration of an entry. Offsets may be negative as
    /// long as the result isn't.
    pub fn update_duration_by_offset(&self, hash: &str, offset: TimeDelta) -> Result<Entry> {
        let entry = self.tracking_gateway.find_entry(hash)?;
        let duration = entry.duration.checked_add(&offset).ok_or(TidError::DurationOutOfRange)?;
        self.update_duration(&entry.hash, duration)
    }

    pub fn update_note(&self, hash: &str, note: &str) -> Result<Entry> {
        let mut entry = self.tracking_gateway.find_entry(hash)?;
        entry.note = note.to_string();
        self.tracking_gateway.persist_entry(&mut entry)?;
        Ok(entry)
    }

    /// Deletes an entry, detaching it from its timesheet and from the status
    /// first.
    pub fn delete(&self, hash: &str) -> Result<Entry> {
        let entry = self.tracking_gateway.find_entry(hash)?;
        let mut status = self.sys_gateway.find_or_create_status()?;

        let sheet = match self.tracking_gateway.find_timesheet(&entry.timesheet) {
            Ok(mut sheet) => {
                sheet.remove_entry(&entry);
                Some(sheet)
            }
            Err(TidError::NilResult) => None,
            Err(err) => return Err(err),
        };

        let clears_status = status.entry == entry.hash;
        if clears_status {
            status.stop_and_clear();
        }

        self.backend.atomically(&mut || {
            write_together(self.backend.as_ref(), |errs| {
                if clears_status {
                    errs.add(self.sys_gateway.persist_status(&status));
                }
                if let Some(sheet) = &sheet {
                    errs.add(self.tracking_gateway.persist_timesheet(sheet));
                }
            })?;
            self.tracking_gateway.delete_entry(&entry)
        })?;

        info!(hash = %entry.hash, "deleted entry");
        Ok(entry)
    }
}
