//! Daily timesheets.

use super::entry::Entry;
use crate::db::store::Record;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used for timesheet keys.
pub const TIMESHEET_KEY_DATE_FMT: &str = "%Y-%m-%d";

/// The entries logged against one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timesheet {
    /// The date of the timesheet, `YYYY-MM-DD`.
    pub key: String,
    /// Hashes of the entries on this sheet, in the order they were added.
    pub entries: Vec<String>,
}

impl Record for Timesheet {
    const KIND: &'static str = "timesheet";
}

impl Timesheet {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(&date_key(date))
    }

    pub fn append_entry(&mut self, entry: &Entry) {
        if !self.contains(&entry.hash) {
            self.entries.push(entry.hash.clone());
        }
    }

    pub fn remove_entry(&mut self, entry: &Entry) {
        self.entries.retain(|hash| hash != &entry.hash);
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.entries.iter().any(|h| h == hash)
    }
}

/// Formats a date as a timesheet key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(TIMESHEET_KEY_DATE_FMT).to_string()
}

/// Today's timesheet key in the local timezone.
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_remove_entries() {
        let mut sheet = Timesheet::new("2017-03-14");
        let a = Entry::new();
        let b = Entry::new();

        sheet.append_entry(&a);
        sheet.append_entry(&b);
        sheet.append_entry(&a);
        assert_eq!(sheet.entries, vec![a.hash.clone(), b.hash.clone()]);

        sheet.remove_entry(&a);
        assert_eq!(sheet.entries, vec![b.hash.clone()]);
        assert!(!sheet.contains(&a.hash));
    }

    #[test]
    fn test_date_key_format() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 4).unwrap();
        assert_eq!(date_key(date), "2017-03-04");
        assert_eq!(Timesheet::for_date(date).key, "2017-03-04");
    }
}
