//! Core library modules for tid.
//!
//! - Records: [`entry`], [`timesheet`], [`status`], [`workspace`].
//! - Facades over the gateways in [`crate::db`]: [`tracking_facade`],
//!   [`entry_facade`], [`timesheet_facade`], [`workspace_facade`], all built
//!   by the [`factory`].
//! - Ambient pieces: [`config`], [`data_storage`], [`error`], [`logging`],
//!   [`messages`], [`formatter`], [`view`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tid::db::db::Db;
//! use tid::libs::factory::Factory;
//!
//! let db = Db::new()?;
//! let factory = Factory::new(db.backend());
//! factory.build_workspace_facade().create("client-a")?;
//! factory.build_workspace_facade().switch("client-a")?;
//! let entry = factory.build_tracking_facade()?.start("Kickoff call")?;
//! # Ok::<(), tid::libs::error::TidError>(())
//! ```

pub mod config;
pub mod data_storage;
pub mod entry;
pub mod entry_facade;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod logging;
pub mod messages;
pub mod status;
pub mod timesheet;
pub mod timesheet_facade;
pub mod tracking_facade;
pub mod view;
pub mod workspace;
pub mod workspace_facade;
