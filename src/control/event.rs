//! Agent handles and the events a measurement control yields.

use crate::agent::normalize_agent_name;
use crate::capture::{CaptureRecord, DealiasRecord, TraceRecord};
use crate::types::AgentId;
use serde::{Deserialize, Serialize};

/// Handle to one connected agent as known by the control library
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    /// Handle assigned by the control library
    pub id: u64,
    /// Raw agent name, e.g. `sjj1-ba.ark`
    pub name: String,
}

impl Instance {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Normalized identity used to key all per-agent state.
    pub fn agent_id(&self) -> AgentId {
        normalize_agent_name(&self.name)
    }
}

/// Something received from the control library
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Trace {
        instance: Instance,
        record: TraceRecord,
    },
    Dealias {
        instance: Instance,
        record: DealiasRecord,
    },
    /// The agent has no more commands and can be retired
    EndOfWork { instance: Instance },
}

impl ControlEvent {
    pub fn instance(&self) -> &Instance {
        match self {
            ControlEvent::Trace { instance, .. }
            | ControlEvent::Dealias { instance, .. }
            | ControlEvent::EndOfWork { instance } => instance,
        }
    }

    /// Build a result event from a capture record.
    pub fn from_record(instance: Instance, record: CaptureRecord) -> Self {
        match record {
            CaptureRecord::Trace(record) => ControlEvent::Trace { instance, record },
            CaptureRecord::Dealias(record) => ControlEvent::Dealias { instance, record },
        }
    }

    /// The capture record carried by a result event.
    pub fn into_record(self) -> Option<CaptureRecord> {
        match self {
            ControlEvent::Trace { record, .. } => Some(CaptureRecord::Trace(record)),
            ControlEvent::Dealias { record, .. } => Some(CaptureRecord::Dealias(record)),
            ControlEvent::EndOfWork { .. } => None,
        }
    }
}
