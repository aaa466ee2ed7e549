//! Bulktracer: bulk traceroutes across a probing-agent fleet
//!
//! Schedules one traceroute per agent per target, each agent walking the shared
//! target list in its own pseudo-random order, and converts the resulting
//! capture files into newline-delimited JSON.

pub mod agent;
pub mod capture;
pub mod config;
pub mod control;
pub mod dump;
pub mod error;
pub mod logging;
pub mod order;
pub mod probe;
pub mod targets;
pub mod tooling;
pub mod types;
