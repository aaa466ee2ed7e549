//! Per-agent work state for one probing run.

use crate::capture::{CaptureRecord, CaptureWriter};
use crate::control::Instance;
use crate::error::TracerError;
use crate::order::AgentCursor;
use crate::types::{AgentId, TargetIndex};

/// Bookkeeping for one active agent
pub struct AgentWorkState {
    identity: AgentId,
    instance: Instance,
    cursor: AgentCursor,
    sink: Box<dyn CaptureWriter>,
    issued: usize,
    received: usize,
    rounds_completed: usize,
}

impl AgentWorkState {
    pub fn new(instance: Instance, cursor: AgentCursor, sink: Box<dyn CaptureWriter>) -> Self {
        Self {
            identity: instance.agent_id(),
            instance,
            cursor,
            sink,
            issued: 0,
            received: 0,
            rounds_completed: 0,
        }
    }

    pub fn identity(&self) -> &AgentId {
        &self.identity
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Advance the cursor and return the index of the next target to visit.
    pub fn next_target(&mut self) -> TargetIndex {
        self.cursor.next_index()
    }

    pub fn record_issued(&mut self) {
        self.issued += 1;
    }

    /// Append a result to this agent's sink.
    pub fn write(&mut self, record: &CaptureRecord) -> Result<(), TracerError> {
        self.sink.write_record(record)?;
        self.received += 1;
        Ok(())
    }

    pub fn complete_round(&mut self) -> usize {
        self.rounds_completed += 1;
        self.rounds_completed
    }

    pub fn flush(&mut self) -> Result<(), TracerError> {
        self.sink.flush()
    }

    pub fn issued(&self) -> usize {
        self.issued
    }

    pub fn received(&self) -> usize {
        self.received
    }

    pub fn rounds_completed(&self) -> usize {
        self.rounds_completed
    }
}

impl std::fmt::Debug for AgentWorkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentWorkState")
            .field("identity", &self.identity)
            .field("instance", &self.instance)
            .field("cursor", &self.cursor)
            .field("issued", &self.issued)
            .field("received", &self.received)
            .field("rounds_completed", &self.rounds_completed)
            .finish()
    }
}
