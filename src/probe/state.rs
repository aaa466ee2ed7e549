//! Probe run state machine.

use serde::Serialize;
use std::fmt;

/// Lifecycle of a probing run
///
/// `Active` while commands are being issued, `Draining` once the control was
/// told no more work is coming. `TimedOut` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    Active,
    Draining,
    TimedOut,
    Done,
}

impl ProbeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProbeState::TimedOut | ProbeState::Done)
    }

    /// All commands issued and the no-more-work signal sent.
    pub fn on_work_issued(self) -> Self {
        match self {
            ProbeState::Active => ProbeState::Draining,
            other => other,
        }
    }

    /// A poll came back empty.
    pub fn on_idle(self, control_done: bool) -> Self {
        match self {
            ProbeState::Draining if control_done => ProbeState::Done,
            ProbeState::Draining => ProbeState::TimedOut,
            other => other,
        }
    }

    /// The control reports every agent finished.
    pub fn on_all_finished(self) -> Self {
        match self {
            ProbeState::Draining => ProbeState::Done,
            other => other,
        }
    }

    /// No event within the idle window, even though polls kept failing.
    pub fn on_idle_expired(self) -> Self {
        match self {
            ProbeState::Draining => ProbeState::TimedOut,
            other => other,
        }
    }
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeState::Active => "active",
            ProbeState::Draining => "draining",
            ProbeState::TimedOut => "timed out",
            ProbeState::Done => "done",
        };
        f.write_str(s)
    }
}
