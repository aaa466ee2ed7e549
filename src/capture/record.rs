//! Measurement records as stored in capture files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Why a traceroute stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Reached the destination
    Completed,
    Unreach,
    Icmp,
    Loop,
    GapLimit,
    HopLimit,
    Error,
    /// Trace was still running or never started
    None,
}

/// One responding hop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHop {
    pub addr: IpAddr,
    /// Reverse DNS name, when one was resolved
    #[serde(default)]
    pub name: Option<String>,
    /// Round-trip time in microseconds
    pub rtt_us: u64,
}

impl TraceHop {
    pub fn rtt_ms(&self) -> f64 {
        self.rtt_us as f64 / 1000.0
    }
}

/// A traceroute result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Raw name of the agent that ran the trace
    pub monitor: String,
    pub src: IpAddr,
    pub dst: IpAddr,
    pub stop_reason: StopReason,
    pub start: DateTime<Utc>,
    /// Indexed by TTL - 1; `None` where no reply was recorded
    #[serde(default)]
    pub hops: Vec<Option<TraceHop>>,
}

impl TraceRecord {
    pub fn is_stop_completed(&self) -> bool {
        self.stop_reason == StopReason::Completed
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn hop(&self, index: usize) -> Option<&TraceHop> {
        self.hops.get(index).and_then(Option::as_ref)
    }
}

/// An alias-resolution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealiasRecord {
    pub monitor: String,
    pub dst: IpAddr,
    pub start: DateTime<Utc>,
}

/// Any record a capture file can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaptureRecord {
    Trace(TraceRecord),
    Dealias(DealiasRecord),
}

impl CaptureRecord {
    pub fn monitor(&self) -> &str {
        match self {
            CaptureRecord::Trace(t) => &t.monitor,
            CaptureRecord::Dealias(d) => &d.monitor,
        }
    }
}
