//! Run context: the owned set of active agents for one probing run.

use super::state::AgentWorkState;
use crate::types::AgentId;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Final counters for one agent, kept after the agent is retired
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    pub agent_id: AgentId,
    pub issued: usize,
    pub received: usize,
    pub rounds_completed: usize,
    /// Whether the agent reported end of work before the run stopped
    pub finished: bool,
}

/// Agent Work State keyed by normalized identity
///
/// Retired agents are flushed and leave an `AgentSummary` behind.
#[derive(Debug, Default)]
pub struct RunContext {
    active: BTreeMap<AgentId, AgentWorkState>,
    retired: Vec<AgentSummary>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. An agent already active under the same identity is
    /// left untouched and the new state is returned as an error.
    pub fn register(&mut self, state: AgentWorkState) -> Result<(), AgentWorkState> {
        if self.active.contains_key(state.identity()) {
            return Err(state);
        }
        self.active.insert(state.identity().clone(), state);
        Ok(())
    }

    pub fn get_mut(&mut self, agent_id: &str) -> Option<&mut AgentWorkState> {
        self.active.get_mut(agent_id)
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.active.contains_key(agent_id)
    }

    /// Active agents in identity order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentWorkState> {
        self.active.values_mut()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Retire an agent: flush its sink and keep its counters.
    pub fn retire(&mut self, agent_id: &str, finished: bool) -> Option<AgentSummary> {
        let mut state = self.active.remove(agent_id)?;
        if let Err(e) = state.flush() {
            warn!(agent = agent_id, error = %e, "Failed to flush capture sink");
        }
        let summary = AgentSummary {
            agent_id: state.identity().clone(),
            issued: state.issued(),
            received: state.received(),
            rounds_completed: state.rounds_completed(),
            finished,
        };
        self.retired.push(summary.clone());
        Some(summary)
    }

    /// Retire every remaining agent and return all summaries in identity order.
    pub fn close(mut self) -> Vec<AgentSummary> {
        let remaining: Vec<AgentId> = self.active.keys().cloned().collect();
        for agent_id in remaining {
            self.retire(&agent_id, false);
        }
        let mut summaries = self.retired;
        summaries.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));
        summaries
    }
}
