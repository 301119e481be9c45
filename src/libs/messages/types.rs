/// Every user-facing message tid prints.
///
/// Text lives in `display.rs`; variants carry only the values interpolated
/// into it.
#[derive(Debug, Clone)]
pub enum Message {
    // === TRACKING MESSAGES ===
    TimerStarted(String, String), // short hash, note
    TimerStopped(String, String), // short hash, duration
    TimerResumed(String, String), // short hash, note
    StatusRunning {
        hash: String,
        note: String,
        duration: String,
    },
    StatusStopped,
    StatusLastEntry(String), // short hash
    ActiveWorkspace(String),

    // === ENTRY MESSAGES ===
    EntryCreated(String, String), // short hash, timesheet
    EntryUpdated(String),         // short hash
    EntryDeleted(String),         // short hash
    NoEntriesInRange(String, String),
    EntryUpdateNothingToDo,

    // === TIMESHEET MESSAGES ===
    TimesheetDeleted(String, usize), // date, entry count
    NoTimesheetsInRange(String, String),

    // === REPORT MESSAGES ===
    ReportHeader(String, String), // start, end
    ReportTotal(String),          // duration

    // === WORKSPACE MESSAGES ===
    WorkspaceCreated(String),
    WorkspaceDeleted(String),
    WorkspaceSwitched(String),
    WorkspacesHeader,

    // === CONFIGURATION MESSAGES ===
    ConfigParseError(String),

    // === INPUT MESSAGES ===
    InvalidDate(String),
    InvalidDuration(String),

    // === MIGRATION MESSAGES ===
    MigrationsUpToDate,
    MigrationsFound(usize),        // count
    RunningMigration(u64, String), // version, description
    MigrationFailed(u64, String),  // version, error
    MigrationsCompleted(usize),    // count
    DatabaseVersion(u64),
    LatestAvailableVersion(u64),
    MigrationsPending(usize),
}
