//! Index of known workspaces.

use crate::db::store::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceIndex {
    pub workspaces: Vec<String>,
}

impl Record for WorkspaceIndex {
    const KIND: &'static str = "workspace_index";
}

impl WorkspaceIndex {
    pub fn contains(&self, name: &str) -> bool {
        self.workspaces.iter().any(|w| w == name)
    }

    /// Appends `name` if it isn't indexed yet. Returns false when it was.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.workspaces.push(name.to_string());
        true
    }

    /// Removes `name`, returning false if it wasn't indexed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.workspaces.len();
        self.workspaces.retain(|w| w != name);
        before != self.workspaces.len()
    }
}

/// Versions of the migrations applied to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationsStatus {
    pub versions: Vec<u64>,
}

impl Record for MigrationsStatus {
    const KIND: &'static str = "migrations_status";
}

impl MigrationsStatus {
    /// The highest applied version, or 0 when nothing has run.
    pub fn latest_version(&self) -> u64 {
        self.versions.iter().copied().max().unwrap_or(0)
    }

    pub fn is_applied(&self, version: u64) -> bool {
        self.versions.contains(&version)
    }
}
