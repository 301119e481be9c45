#[cfg(test)]
mod tests {
    use chrono::{Local, TimeDelta};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use tid::db::backend::Backend;
    use tid::db::db::Db;
    use tid::libs::data_storage::DataStorage;
    use tid::libs::error::TidError;
    use tid::libs::factory::Factory;
    use tid::libs::status::DEFAULT_WORKSPACE;

    struct WorkspaceTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for WorkspaceTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(&DataStorage::with_base_path(temp_dir.path())).unwrap();
            WorkspaceTestContext {
                _temp_dir: temp_dir,
                db,
            }
        }
    }

    #[test_context(WorkspaceTestContext)]
    #[test]
    fn test_workspaces_are_isolated(ctx: &mut WorkspaceTestContext) {
        let factory = Factory::new(ctx.db.backend());
        let today = Local::now().date_naive();

        let home = factory.build_entry_facade().unwrap().create(today, TimeDelta::hours(1), "home").unwrap();

        let workspaces = factory.build_workspace_facade();
        workspaces.create("work").unwrap();
        workspaces.switch("work").unwrap();

        // Gateways follow the status, so they are rebuilt after a switch.
        let work_gateway = factory.build_tracking_gateway().unwrap();
        assert_eq!(work_gateway.bucket(), "tid_tracking_work");
        assert!(work_gateway.find_entries_in_date_range(today, today).unwrap().is_empty());
        assert!(matches!(work_gateway.find_entry(&home.hash), Err(TidError::NilResult)));

        let work = factory.build_tracking_facade().unwrap().start("work").unwrap();

        workspaces.switch(DEFAULT_WORKSPACE).unwrap();
        let status = factory.build_sys_gateway().find_or_create_status().unwrap();
        assert!(!status.is_running);
        assert!(status.entry.is_empty());

        let default_gateway = factory.build_tracking_gateway().unwrap();
        let entries = default_gateway.find_entries_in_date_range(today, today).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].hash, home.hash);

        let work_entries = factory.build_tracking_gateway_for("work").find_entries_in_date_range(today, today).unwrap();
        assert_eq!(work_entries.len(), 1);
        assert_eq!(work_entries[0].hash, work.hash);
    }

    #[test_context(WorkspaceTestContext)]
    #[test]
    fn test_switch_to_missing_workspace(ctx: &mut WorkspaceTestContext) {
        let factory = Factory::new(ctx.db.backend());
        let entry = factory.build_tracking_facade().unwrap().start("keep going").unwrap();

        let result = factory.build_workspace_facade().switch("nope");
        assert!(matches!(result, Err(TidError::WorkspaceNotFound(_))));

        let status = factory.build_sys_gateway().find_or_create_status().unwrap();
        assert!(status.is_running);
        assert_eq!(status.entry, entry.hash);
        assert_eq!(status.workspace, DEFAULT_WORKSPACE);
    }

    #[test_context(WorkspaceTestContext)]
    #[test]
    fn test_delete_workspace_drops_its_data(ctx: &mut WorkspaceTestContext) {
        let factory = Factory::new(ctx.db.backend());
        let workspaces = factory.build_workspace_facade();
        workspaces.create("scratch").unwrap();

        let today = Local::now().date_naive();
        let gateway = factory.build_tracking_gateway_for("scratch");
        let mut sheet = gateway.find_or_create_todays_timesheet().unwrap();
        let mut entry = tid::libs::entry::Entry::new();
        entry.timesheet = sheet.key.clone();
        sheet.append_entry(&entry);
        gateway.persist_entry(&mut entry).unwrap();
        gateway.persist_timesheet(&sheet).unwrap();
        assert_eq!(gateway.find_entries_in_date_range(today, today).unwrap().len(), 1);

        workspaces.delete("scratch").unwrap();
        assert!(!ctx.db.backend().has_bucket("tid_tracking_scratch"));
        assert!(!workspaces.list().unwrap().workspaces.contains(&"scratch".to_string()));

        // Recreating starts from an empty bucket.
        workspaces.create("scratch").unwrap();
        let gateway = factory.build_tracking_gateway_for("scratch");
        assert!(gateway.find_entries_in_date_range(today, today).unwrap().is_empty());
    }

    #[test_context(WorkspaceTestContext)]
    #[test]
    fn test_list_reports_active_workspace(ctx: &mut WorkspaceTestContext) {
        let factory = Factory::new(ctx.db.backend());
        factory.build_workspace_facade().create("work").unwrap();
        factory.build_workspace_facade().switch("work").unwrap();

        let list = factory.build_workspace_facade().list().unwrap();
        assert_eq!(list.workspaces, vec![DEFAULT_WORKSPACE, "work"]);
        assert_eq!(list.active, "work");
    }
}
