//! Wires gateways and facades onto a backend.
//!
//! Tracking components are bound to the workspace named in the status at the
//! time they are built. After a switch, build them again.

use crate::db::backend::Backend;
use crate::db::store::Store;
use crate::db::sys_gateway::SysGateway;
use crate::db::tracking_gateway::TrackingGateway;
use crate::db::{workspace_bucket, BUCKET_SYS};
use crate::libs::entry_facade::EntryFacade;
use crate::libs::error::Result;
use crate::libs::timesheet_facade::TimesheetFacade;
use crate::libs::tracking_facade::TrackingFacade;
use crate::libs::workspace_facade::WorkspaceFacade;
use std::rc::Rc;

pub struct Factory {
    backend: Rc<dyn Backend>,
}

impl Factory {
    pub fn new(backend: Rc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Rc<dyn Backend> {
        self.backend.clone()
    }

    pub fn build_sys_gateway(&self) -> SysGateway {
        SysGateway::new(Store::new(self.backend.clone(), BUCKET_SYS))
    }

    /// A gateway for the active workspace.
    pub fn build_tracking_gateway(&self) -> Result<TrackingGateway> {
        let status = self.build_sys_gateway().find_or_create_status()?;
        Ok(self.build_tracking_gateway_for(&status.workspace))
    }

    pub fn build_tracking_gateway_for(&self, workspace: &str) -> TrackingGateway {
        TrackingGateway::new(
            Store::new(self.backend.clone(), workspace_bucket(workspace)),
            self.build_sys_gateway(),
        )
    }

    pub fn build_tracking_facade(&self) -> Result<TrackingFacade> {
        Ok(TrackingFacade::new(
            self.backend.clone(),
            self.build_sys_gateway(),
            self.build_tracking_gateway()?,
        ))
    }

    pub fn build_entry_facade(&self) -> Result<EntryFacade> {
        Ok(EntryFacade::new(
            self.backend.clone(),
            self.build_sys_gateway(),
            self.build_tracking_gateway()?,
        ))
    }

    pub fn build_timesheet_facade(&self) -> Result<TimesheetFacade> {
        Ok(TimesheetFacade::new(self.build_tracking_gateway()?, self.build_entry_facade()?))
    }

    pub fn build_workspace_facade(&self) -> WorkspaceFacade {
        WorkspaceFacade::new(self.backend.clone(), self.build_sys_gateway())
    }
}
