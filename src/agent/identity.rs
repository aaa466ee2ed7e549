//! Agent name normalization.
//!
//! Ark monitors report themselves as `<site><digits>-<cc>.ark` (for example
//! `sjj1-ba.ark`). Everywhere an agent is tracked we key it by the short code
//! without the `.ark` suffix.

use crate::types::AgentId;
use regex::Regex;
use std::sync::OnceLock;

fn ark_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([a-z]{3}[0-9]*-[a-z]{2})\.ark$").expect("valid regex"))
}

/// Normalize a raw agent name to its canonical short code.
///
/// Names matching the Ark monitor pattern lose their `.ark` suffix; anything
/// else passes through unchanged.
pub fn normalize_agent_name(raw: &str) -> AgentId {
    match ark_name_pattern().captures(raw) {
        Some(caps) => caps[1].to_string(),
        None => raw.to_string(),
    }
}
