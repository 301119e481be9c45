use crate::db::tracking_gateway::TrackingGateway;
use crate::libs::entry_facade::EntryFacade;
use crate::libs::error::{ErrorStack, Result, TidError};
use crate::libs::timesheet::{date_key, Timesheet};
use chrono::NaiveDate;
use tracing::info;

pub struct TimesheetFacade {
    tracking_gateway: TrackingGateway,
    entry_facade: EntryFacade,
}

impl TimesheetFacade {
    pub fn new(tracking_gateway: TrackingGateway, entry_facade: EntryFacade) -> Self {
        Self {
            tracking_gateway,
            entry_facade,
        }
    }

    /// Deletes the timesheet for `date` together with all of its entries.
    pub fn delete(&self, date: NaiveDate) -> Result<Timesheet> {
        let sheet = self.tracking_gateway.find_timesheet(&date_key(date))?;

        let mut errs = ErrorStack::new();
        for hash in &sheet.entries {
            match self.entry_facade.delete(hash) {
                Ok(_) | Err(TidError::NilResult) => {}
                Err(err) => errs.add::<()>(Err(err)),
            }
        }
        errs.into_result()?;

        self.tracking_gateway.delete_timesheet(&sheet)?;

        info!(timesheet = %sheet.key, entries = sheet.entries.len(), "deleted timesheet");
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::backend::{Backend, MemoryBackend};
    use crate::db::migrations::{MigrationRegistry, Migrator};
    use crate::libs::error::TidError;
    use crate::libs::factory::Factory;
    use chrono::{NaiveDate, TimeDelta};
    use std::rc::Rc;

    fn factory() -> Factory {
        let backend: Rc<dyn Backend> = Rc::new(MemoryBackend::new());
        Migrator::new(MigrationRegistry::standard().unwrap())
            .run(backend.clone())
            .unwrap();
        Factory::new(backend)
    }

    #[test]
    fn test_delete_removes_sheet_and_entries() {
        let factory = factory();
        let day = NaiveDate::from_ymd_opt(2017, 3, 14).unwrap();
        let entries = factory.build_entry_facade().unwrap();
        let a = entries.create(day, TimeDelta::minutes(5), "a").unwrap();
        let b = entries.create(day, TimeDelta::minutes(10), "b").unwrap();

        let sheet = factory.build_timesheet_facade().unwrap().delete(day).unwrap();
        assert_eq!(sheet.entries.len(), 2);

        let gateway = factory.build_tracking_gateway().unwrap();
        assert!(matches!(gateway.find_timesheet("2017-03-14"), Err(TidError::NilResult)));
        assert!(matches!(gateway.find_entry(&a.hash), Err(TidError::NilResult)));
        assert!(matches!(gateway.find_entry(&b.hash), Err(TidError::NilResult)));
    }

    #[test]
    fn test_delete_missing_sheet() {
        let day = NaiveDate::from_ymd_opt(2017, 3, 14).unwrap();
        let result = factory().build_timesheet_facade().unwrap().delete(day);
        assert!(matches!(result, Err(TidError::NilResult)));
    }
}
