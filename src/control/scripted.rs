//! Scripted control that replays a fixed sequence of poll outcomes.
//!
//! Used to drive the probe loop without any agents attached.

use super::{ControlEvent, Instance, MeasurementControl, TraceOptions};
use crate::error::TracerError;
use std::collections::{HashSet, VecDeque};
use std::net::IpAddr;
use std::time::Duration;

/// One scripted poll outcome
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Event(ControlEvent),
    /// Poll returns `Ok(None)`
    Timeout,
    /// Poll returns an error
    Error(String),
}

/// In-memory `MeasurementControl`.
///
/// `is_done` becomes true once `done()` was called and every instance has
/// delivered its end-of-work event or was finished without work. An exhausted script polls as a timeout.
#[derive(Debug, Default)]
pub struct ScriptedControl {
    instances: Vec<Instance>,
    script: VecDeque<ScriptStep>,
    issued: Vec<(Instance, IpAddr)>,
    failing: HashSet<String>,
    finished: HashSet<u64>,
    released: Vec<Instance>,
    done_called: bool,
    polls: usize,
}

impl ScriptedControl {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            ..Default::default()
        }
    }

    /// Append one poll outcome to the script.
    pub fn push(&mut self, step: ScriptStep) -> &mut Self {
        self.script.push_back(step);
        self
    }

    /// Make every `do_trace` on the named instance fail.
    pub fn fail_commands_for(&mut self, raw_name: &str) -> &mut Self {
        self.failing.insert(raw_name.to_string());
        self
    }

    /// Commands accepted so far, in issue order.
    pub fn issued(&self) -> &[(Instance, IpAddr)] {
        &self.issued
    }

    /// Instances sent away without work.
    pub fn released(&self) -> &[Instance] {
        &self.released
    }

    pub fn done_called(&self) -> bool {
        self.done_called
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl MeasurementControl for ScriptedControl {
    fn instances(&mut self) -> Result<Vec<Instance>, TracerError> {
        Ok(self.instances.clone())
    }

    fn do_trace(
        &mut self,
        instance: &Instance,
        dst: IpAddr,
        _options: &TraceOptions,
    ) -> Result<(), TracerError> {
        if self.failing.contains(&instance.name) {
            return Err(TracerError::Control(format!(
                "instance {} rejected command",
                instance.name
            )));
        }
        self.issued.push((instance.clone(), dst));
        Ok(())
    }

    fn finish_instance(&mut self, instance: &Instance) -> Result<(), TracerError> {
        self.finished.insert(instance.id);
        self.released.push(instance.clone());
        Ok(())
    }

    fn done(&mut self) -> Result<(), TracerError> {
        self.done_called = true;
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done_called
            && self
                .instances
                .iter()
                .all(|inst| self.finished.contains(&inst.id))
    }

    fn poll(&mut self, _timeout: Duration) -> Result<Option<ControlEvent>, TracerError> {
        self.polls += 1;
        match self.script.pop_front() {
            Some(ScriptStep::Event(event)) => {
                if let ControlEvent::EndOfWork { instance } = &event {
                    self.finished.insert(instance.id);
                }
                Ok(Some(event))
            }
            Some(ScriptStep::Error(message)) => Err(TracerError::Control(message)),
            Some(ScriptStep::Timeout) | None => Ok(None),
        }
    }
}
