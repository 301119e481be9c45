//! # tid - simple time tracking
//!
//! Tracks time against notes on daily timesheets, one running timer at a
//! time, with separate workspaces for separate contexts. Everything is kept
//! in a single embedded database whose layout is versioned by migrations.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tid::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
