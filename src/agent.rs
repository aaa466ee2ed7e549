//! Probing agents
//!
//! Identity normalization and the per-run bookkeeping kept for every agent
//! taking part in a probing run.

pub mod identity;
pub mod registry;
pub mod state;

pub use identity::normalize_agent_name;
pub use registry::{AgentSummary, RunContext};
pub use state::AgentWorkState;
