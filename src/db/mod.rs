//! Persistence layer for tid.
//!
//! All records live in one embedded database, split into buckets:
//!
//! - `tid_sys`: the tracking status, workspace index and applied migrations.
//! - `tid_tracking_<workspace>`: entries and timesheets of one workspace.
//! - `tid_tracking`: the pre-workspace layout, only read by a migration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tid::db::db::Db;
//! use tid::libs::factory::Factory;
//!
//! let db = Db::new()?;
//! let factory = Factory::new(db.backend());
//! let entry = factory.build_tracking_facade()?.start("Write docs")?;
//! println!("Started {}", entry.short_hash());
//! # Ok::<(), tid::libs::error::TidError>(())
//! ```

/// Bucket abstraction and its SQLite and in-memory implementations.
pub mod backend;

/// Database file location, opening and migration on startup.
pub mod db;

/// Migration registry and runner.
pub mod migrations;

/// Typed, bucket-scoped record access.
pub mod store;

/// Status, workspace index and migration records.
pub mod sys_gateway;

/// Entries and timesheets within a workspace.
pub mod tracking_gateway;

/// The migrations shipped with tid.
pub mod versions;

/// Bucket holding system records.
pub const BUCKET_SYS: &str = "tid_sys";
/// Flat tracking bucket used before workspaces existed.
pub const BUCKET_LEGACY_TRACKING: &str = "tid_tracking";

/// Name of the bucket holding a workspace's entries and timesheets.
pub fn workspace_bucket(workspace: &str) -> String {
    format!("tid_tracking_{workspace}")
}
