//! Traceroute command options.

use crate::error::TracerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Probing method for a traceroute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TraceMethod {
    #[default]
    IcmpParis,
    UdpParis,
    Icmp,
    Udp,
    TcpAck,
    Tcp,
}

impl TraceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceMethod::IcmpParis => "icmp-paris",
            TraceMethod::UdpParis => "udp-paris",
            TraceMethod::Icmp => "icmp",
            TraceMethod::Udp => "udp",
            TraceMethod::TcpAck => "tcp-ack",
            TraceMethod::Tcp => "tcp",
        }
    }
}

impl fmt::Display for TraceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceMethod {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "icmp-paris" => Ok(TraceMethod::IcmpParis),
            "udp-paris" => Ok(TraceMethod::UdpParis),
            "icmp" => Ok(TraceMethod::Icmp),
            "udp" => Ok(TraceMethod::Udp),
            "tcp-ack" => Ok(TraceMethod::TcpAck),
            "tcp" => Ok(TraceMethod::Tcp),
            other => Err(TracerError::InvalidArgument(format!(
                "Unknown trace method: {}",
                other
            ))),
        }
    }
}

/// Per-command traceroute options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceOptions {
    pub method: TraceMethod,
    /// How long the agent waits for a reply to each probe
    pub wait_timeout: Duration,
    /// Minimum gap between probes (pacing); `None` leaves it to the agent
    pub wait_probe: Option<Duration>,
    /// Resolve reverse DNS names for hop addresses
    pub ptr: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            method: TraceMethod::IcmpParis,
            wait_timeout: Duration::from_secs(2),
            wait_probe: None,
            ptr: false,
        }
    }
}
