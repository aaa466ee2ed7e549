//! Per-Agent Order Generator
//!
//! Every agent walks the shared target list in its own order. An agent's order
//! is the arithmetic progression `start, start + step, start + 2*step, ...`
//! taken modulo the list length `n`. Because `step` is coprime with `n`, one
//! full period of `n` steps visits every index exactly once.
//!
//! Steps are drawn from the upper half of `[0, n)` so consecutive visits of one
//! agent land far apart in index space.

use crate::error::TracerError;
use crate::types::TargetIndex;
use rand::Rng;

/// Greatest common divisor (Euclid).
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// All `i` in `[n/2, n)` with `gcd(i, n) == 1`.
///
/// For `n == 1` this is `[0]` (`gcd(0, 1) == 1`); for `n == 0` it is empty.
pub fn step_candidates(n: usize) -> Vec<usize> {
    (n / 2..n).filter(|&i| gcd(i, n) == 1).collect()
}

/// Step candidates precomputed once per run for a target list of length `n`.
#[derive(Debug, Clone)]
pub struct OrderPlan {
    n: usize,
    candidates: Vec<usize>,
}

impl OrderPlan {
    /// Build the plan, failing fast when no valid per-agent order exists.
    pub fn new(n: usize) -> Result<Self, TracerError> {
        if n == 0 {
            return Err(TracerError::EmptyTargets);
        }
        let candidates = step_candidates(n);
        if candidates.is_empty() {
            return Err(TracerError::NoStepCandidates { n });
        }
        Ok(Self { n, candidates })
    }

    /// Length of the target list the plan orders.
    pub fn target_count(&self) -> usize {
        self.n
    }

    /// Draw a fresh cursor: uniform step from the candidates, uniform start in `[0, n)`.
    pub fn cursor<R: Rng + ?Sized>(&self, rng: &mut R) -> AgentCursor {
        let step = self.candidates[rng.gen_range(0..self.candidates.len())];
        let start = rng.gen_range(0..self.n);
        AgentCursor::with_params(self.n, step, start)
    }
}

/// Stateful traversal of `[0, n)` for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentCursor {
    n: usize,
    step: usize,
    position: TargetIndex,
    started: bool,
}

impl AgentCursor {
    /// Build a cursor with explicit parameters. `start` is reduced modulo `n`.
    pub fn with_params(n: usize, step: usize, start: TargetIndex) -> Self {
        debug_assert!(n > 0, "cursor over an empty target list");
        Self {
            n,
            step: step % n,
            position: start % n,
            started: false,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn position(&self) -> TargetIndex {
        self.position
    }

    /// Next index to visit. The first call yields the start offset itself.
    pub fn next_index(&mut self) -> TargetIndex {
        if self.started {
            self.position = (self.position + self.step) % self.n;
        } else {
            self.started = true;
        }
        self.position
    }

    /// One full period of indices from the cursor's current state.
    pub fn cycle(&mut self) -> impl Iterator<Item = TargetIndex> + '_ {
        let n = self.n;
        (0..n).map(move |_| self.next_index())
    }
}
