//! Target list loading.
//!
//! The target file holds one address per line. Lines that do not parse as an
//! IP address are dropped without aborting the run.

use crate::error::TracerError;
use std::io::BufRead;
use std::net::IpAddr;
use std::path::Path;
use tracing::debug;

/// Parse targets from any buffered reader.
pub fn parse_targets<R: BufRead>(reader: R) -> Result<Vec<IpAddr>, TracerError> {
    let mut targets = Vec::new();
    for (lineno, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let Ok(line) = std::str::from_utf8(&line) else {
            debug!(line = lineno + 1, "Skipping target line that is not UTF-8");
            continue;
        };
        let trimmed = line.trim();
        match trimmed.parse::<IpAddr>() {
            Ok(addr) => targets.push(addr),
            Err(_) => debug!(line = lineno + 1, value = trimmed, "Skipping target line"),
        }
    }
    Ok(targets)
}

/// Load the target list from a file.
pub fn load_targets(path: &Path) -> Result<Vec<IpAddr>, TracerError> {
    let file = std::fs::File::open(path).map_err(|e| {
        TracerError::InvalidArgument(format!("Cannot open targets file {:?}: {}", path, e))
    })?;
    parse_targets(std::io::BufReader::new(file))
}
