//! Core types shared across bulktracer.

/// AgentId: normalized short code of a probing agent (e.g. `sjj1-ba`)
pub type AgentId = String;

/// TargetIndex: position of an address in the shared target list
pub type TargetIndex = usize;
