//! Measurement control boundary
//!
//! The control library owns agent connections, command dispatch and result
//! parsing. The prober only needs the narrow surface below: list agents, issue
//! a traceroute, say that no more work is coming, and poll for what comes back.

pub mod bridge;
pub mod event;
pub mod options;
pub mod scripted;

use crate::error::TracerError;
use std::net::IpAddr;
use std::time::Duration;

pub use bridge::{BridgeMessage, BridgeRequest, MuxBridgeControl};
pub use event::{ControlEvent, Instance};
pub use options::{TraceMethod, TraceOptions};
pub use scripted::{ScriptStep, ScriptedControl};

/// Connection manager for a fleet of probing agents.
pub trait MeasurementControl {
    /// Agents currently connected.
    fn instances(&mut self) -> Result<Vec<Instance>, TracerError>;

    /// Queue one traceroute toward `dst` on `instance`.
    fn do_trace(
        &mut self,
        instance: &Instance,
        dst: IpAddr,
        options: &TraceOptions,
    ) -> Result<(), TracerError>;

    /// Tell `instance` it gets no work in this run, so completion does not
    /// wait on it.
    fn finish_instance(&mut self, instance: &Instance) -> Result<(), TracerError>;

    /// Signal that no further commands will be issued.
    fn done(&mut self) -> Result<(), TracerError>;

    /// True once every agent has finished its queued work.
    fn is_done(&self) -> bool;

    /// Block for up to `timeout` waiting for the next event. `Ok(None)` means
    /// nothing arrived in time.
    fn poll(&mut self, timeout: Duration) -> Result<Option<ControlEvent>, TracerError>;
}
