//! The global tracking status.

use super::entry::Entry;
use super::timesheet::Timesheet;
use crate::db::store::Record;
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the workspace that always exists.
pub const DEFAULT_WORKSPACE: &str = "default";

/// Which entry, if any, is being timed, and in which workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub is_running: bool,
    /// The date of the timesheet being tracked.
    pub timesheet: String,
    /// The hash of the entry being tracked.
    pub entry: String,
    #[serde(deserialize_with = "workspace_or_default")]
    pub workspace: String,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            is_running: false,
            timesheet: String::new(),
            entry: String::new(),
            workspace: DEFAULT_WORKSPACE.to_string(),
        }
    }
}

impl Record for Status {
    const KIND: &'static str = "status";
}

impl Status {
    /// Marks the given entry on the given sheet as running.
    pub fn start(&mut self, sheet: &Timesheet, entry: &Entry) {
        self.is_running = true;
        self.timesheet = sheet.key.clone();
        self.entry = entry.hash.clone();
    }

    /// Stops tracking but remembers the entry so it can be resumed.
    pub fn stop(&mut self) {
        self.is_running = false;
    }

    /// Stops tracking and forgets the entry and sheet.
    pub fn stop_and_clear(&mut self) {
        self.stop();
        self.timesheet.clear();
        self.entry.clear();
    }

    /// True if `hash` is the entry currently being timed.
    pub fn is_tracking(&self, hash: &str) -> bool {
        self.is_running && self.entry == hash
    }
}

fn workspace_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let workspace = String::deserialize(deserializer)?;
    if workspace.is_empty() {
        Ok(DEFAULT_WORKSPACE.to_string())
    } else {
        Ok(workspace)
    }
}
