//! Bulk Prober
//!
//! Issues one traceroute per agent per target, each agent walking the target
//! list in its own coprime-step order, then drains results into per-agent
//! capture sinks until every agent finishes or nothing arrives for the idle
//! timeout.

pub mod state;

use crate::agent::{AgentSummary, AgentWorkState, RunContext};
use crate::capture::SinkFactory;
use crate::config::ProbeConfig;
use crate::control::{ControlEvent, Instance, MeasurementControl, TraceOptions};
use crate::error::TracerError;
use crate::order::OrderPlan;
use crate::types::AgentId;
use rand::Rng;
use serde::Serialize;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use state::ProbeState;

/// Longest pause after a failed poll before polling again
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Knobs for one probing run
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub trace: TraceOptions,
    /// Run ends when nothing is received for this long
    pub idle_timeout: Duration,
    /// Normalized agent names that get no work
    pub excluded_agents: Vec<AgentId>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings::from(&ProbeConfig::default())
    }
}

impl From<&ProbeConfig> for ProbeSettings {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            trace: config.trace_options(),
            idle_timeout: config.idle_timeout(),
            excluded_agents: config.excluded_agents.clone(),
        }
    }
}

/// Outcome of a probing run
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub state: ProbeState,
    pub targets: usize,
    pub commands_issued: usize,
    pub command_failures: usize,
    pub results: usize,
    /// Results for agents not (or no longer) in the run
    pub dropped: usize,
    pub poll_errors: usize,
    pub agents: Vec<AgentSummary>,
}

/// One probing run over a measurement control.
pub struct ProbeRun<'a> {
    control: &'a mut dyn MeasurementControl,
    sinks: &'a dyn SinkFactory,
    settings: ProbeSettings,
    context: RunContext,
    state: ProbeState,
    targets: usize,
    commands_issued: usize,
    command_failures: usize,
    results: usize,
    dropped: usize,
    poll_errors: usize,
}

impl<'a> ProbeRun<'a> {
    pub fn new(
        control: &'a mut dyn MeasurementControl,
        sinks: &'a dyn SinkFactory,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            control,
            sinks,
            settings,
            context: RunContext::new(),
            state: ProbeState::Active,
            targets: 0,
            commands_issued: 0,
            command_failures: 0,
            results: 0,
            dropped: 0,
            poll_errors: 0,
        }
    }

    /// Run to completion: enroll agents, issue every command, then drain.
    pub fn run<R: Rng + ?Sized>(
        mut self,
        targets: &[IpAddr],
        rng: &mut R,
    ) -> Result<ProbeReport, TracerError> {
        let plan = OrderPlan::new(targets.len())?;
        self.targets = plan.target_count();

        self.enroll(&plan, rng)?;
        info!(
            targets = targets.len(),
            agents = self.context.len(),
            "Scheduling traceroutes"
        );

        self.dispatch(targets);
        self.control.done()?;
        self.state = self.state.on_work_issued();
        info!(agents = self.context.len(), commands = self.commands_issued, "Starting drain");

        self.drain();
        Ok(self.finish())
    }

    /// Create Agent Work State for every connected, non-excluded agent.
    fn enroll<R: Rng + ?Sized>(&mut self, plan: &OrderPlan, rng: &mut R) -> Result<(), TracerError> {
        for instance in self.control.instances()? {
            let agent_id = instance.agent_id();
            if self.settings.excluded_agents.contains(&agent_id) {
                info!(agent = %agent_id, "Skipping excluded agent");
                self.release(&instance);
                continue;
            }
            if self.context.contains(&agent_id) {
                warn!(agent = %agent_id, name = %instance.name, "Duplicate agent identity, ignoring");
                self.release(&instance);
                continue;
            }
            let sink = self.sinks.create(&agent_id)?;
            let cursor = plan.cursor(rng);
            debug!(agent = %agent_id, step = cursor.step(), start = cursor.position(), "Agent order");
            let state = AgentWorkState::new(instance, cursor, sink);
            if self.context.register(state).is_err() {
                warn!(agent = %agent_id, "Agent registered twice");
            }
        }
        Ok(())
    }

    /// Finish an instance that gets no work so completion does not wait on it.
    fn release(&mut self, instance: &Instance) {
        if let Err(e) = self.control.finish_instance(instance) {
            warn!(name = %instance.name, error = %e, "Failed to release instance");
        }
    }

    /// Round `k` gives every agent the k-th target of its own order.
    fn dispatch(&mut self, targets: &[IpAddr]) {
        for round in 0..targets.len() {
            for agent in self.context.iter_mut() {
                let dst = targets[agent.next_target()];
                match self.control.do_trace(agent.instance(), dst, &self.settings.trace) {
                    Ok(()) => {
                        agent.record_issued();
                        self.commands_issued += 1;
                    }
                    Err(e) => {
                        self.command_failures += 1;
                        warn!(agent = %agent.identity(), %dst, error = %e, "Failed to issue traceroute");
                    }
                }
            }
            debug!(round, "Scheduled round");
        }
    }

    fn drain(&mut self) {
        let mut last_event = Instant::now();
        while !self.state.is_terminal() {
            if self.control.is_done() {
                self.state = self.state.on_all_finished();
                break;
            }
            match self.control.poll(self.settings.idle_timeout) {
                Ok(Some(event)) => {
                    last_event = Instant::now();
                    self.handle_event(event);
                }
                Ok(None) => {
                    self.state = self.state.on_idle(self.control.is_done());
                    if self.state == ProbeState::TimedOut {
                        warn!(
                            still_active = self.context.len(),
                            "Nothing received in time, exiting"
                        );
                    }
                }
                Err(e) => {
                    self.poll_errors += 1;
                    warn!(error = %e, "Poll failed");
                    let remaining = self.settings.idle_timeout.saturating_sub(last_event.elapsed());
                    if remaining.is_zero() {
                        self.state = self.state.on_idle_expired();
                        warn!("No results within the idle timeout, exiting");
                    } else {
                        std::thread::sleep(remaining.min(POLL_ERROR_BACKOFF));
                    }
                }
            }
        }
        if self.state == ProbeState::Done {
            info!("All agents finished");
        }
    }

    fn handle_event(&mut self, event: ControlEvent) {
        let agent_id = event.instance().agent_id();
        if let ControlEvent::EndOfWork { .. } = event {
            match self.context.retire(&agent_id, true) {
                Some(_) => {
                    info!(agent = %agent_id, "Agent finished");
                    info!(remaining = self.context.len(), "Agents still working");
                }
                None => debug!(agent = %agent_id, "End of work for an untracked agent"),
            }
            return;
        }

        let is_dealias = matches!(event, ControlEvent::Dealias { .. });
        let Some(agent) = self.context.get_mut(&agent_id) else {
            self.dropped += 1;
            warn!(agent = %agent_id, "Result for an unknown agent, dropping");
            return;
        };
        if let Some(record) = event.into_record() {
            match agent.write(&record) {
                Ok(()) => self.results += 1,
                Err(e) => warn!(agent = %agent_id, error = %e, "Failed to write result"),
            }
        }
        if is_dealias {
            let round = agent.complete_round();
            info!(agent = %agent_id, round, "Agent completed a round");
        }
    }

    fn finish(self) -> ProbeReport {
        ProbeReport {
            state: self.state,
            targets: self.targets,
            commands_issued: self.commands_issued,
            command_failures: self.command_failures,
            results: self.results,
            dropped: self.dropped,
            poll_errors: self.poll_errors,
            agents: self.context.close(),
        }
    }
}
