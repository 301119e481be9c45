//! The start / stop / resume state machine.
//!
//! Tracking is either stopped or running exactly one entry. Which entry runs
//! is decided by the status record alone.

use crate::db::backend::{write_together, Backend};
use crate::db::sys_gateway::SysGateway;
use crate::db::tracking_gateway::TrackingGateway;
use crate::libs::entry::Entry;
use crate::libs::error::{Result, TidError};
use std::rc::Rc;
use tracing::info;

pub struct TrackingFacade {
    backend: Rc<dyn Backend>,
    sys_gateway: SysGateway,
    tracking_gateway: TrackingGateway,
}

impl TrackingFacade {
    pub fn new(backend: Rc<dyn Backend>, sys_gateway: SysGateway, tracking_gateway: TrackingGateway) -> Self {
        Self {
            backend,
            sys_gateway,
            tracking_gateway,
        }
    }

    /// Starts a new entry on today's timesheet.
    pub fn start(&self, note: &str) -> Result<Entry> {
        let mut status = self.sys_gateway.find_or_create_status()?;
        if status.is_running {
            return Err(TidError::TimerAlreadyRunning);
        }

        let mut sheet = self.tracking_gateway.find_or_create_todays_timesheet()?;

        let mut entry = Entry::new();
        entry.note = note.to_string();
        entry.timesheet = sheet.key.clone();

        sheet.append_entry(&entry);
        status.start(&sheet, &entry);

        write_together(self.backend.as_ref(), |errs| {
            errs.add(self.sys_gateway.persist_status(&status));
            errs.add(self.tracking_gateway.persist_entry(&mut entry));
            errs.add(self.tracking_gateway.persist_timesheet(&sheet));
        })?;

        info!(hash = %entry.hash, timesheet = %entry.timesheet, "started entry");
        entry.is_running = true;
        Ok(entry)
    }

    /// Stops the running entry, folding the elapsed time into its duration.
    pub fn stop(&self) -> Result<Entry> {
        let mut status = self.sys_gateway.find_or_create_status()?;
        if !status.is_running {
            return Err(TidError::NoTimerRunning);
        }

        // Running entries come back with the elapsed time already applied.
        let mut entry = self.tracking_gateway.find_entry(&status.entry)?;

        status.stop();

        write_together(self.backend.as_ref(), |errs| {
            errs.add(self.sys_gateway.persist_status(&status));
            errs.add(self.tracking_gateway.persist_entry(&mut entry));
        })?;

        info!(hash = %entry.hash, duration = entry.duration.num_seconds(), "stopped entry");
        entry.is_running = false;
        Ok(entry)
    }

    /// Resumes the entry with the given hash, or the last tracked entry when
    /// no hash is given.
    pub fn resume(&self, hash: Option<&str>) -> Result<Entry> {
        let mut status = self.sys_gateway.find_or_create_status()?;
        if status.is_running {
            return Err(TidError::TimerAlreadyRunning);
        }

        let hash = match hash.filter(|h| !h.is_empty()) {
            Some(hash) => hash.to_string(),
            None if status.entry.is_empty() => return Err(TidError::NoTimerToResume),
            None => status.entry.clone(),
        };

        let mut entry = self.tracking_gateway.find_entry(&hash)?;
        let mut sheet = self.tracking_gateway.find_or_create_timesheet(&entry.timesheet)?;
        sheet.append_entry(&entry);

        status.start(&sheet, &entry);

        // Persisting moves `updated` to now, so the paused time isn't counted.
        write_together(self.backend.as_ref(), |errs| {
            errs.add(self.sys_gateway.persist_status(&status));
            errs.add(self.tracking_gateway.persist_entry(&mut entry));
            errs.add(self.tracking_gateway.persist_timesheet(&sheet));
        })?;

        info!(hash = %entry.hash, "resumed entry");
        entry.is_running = true;
        Ok(entry)
    }
}
