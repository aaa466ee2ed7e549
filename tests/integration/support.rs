use bulktracer::capture::{CaptureRecord, StopReason, TraceHop, TraceRecord};
use bulktracer::config::TracerConfig;
use chrono::Utc;
use flate2::read::GzDecoder;
use std::io::{BufRead, BufReader};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub fn trace_record(monitor: &str, dst: IpAddr, stop_reason: StopReason) -> TraceRecord {
    TraceRecord {
        monitor: monitor.to_string(),
        src: "10.0.0.1".parse().unwrap(),
        dst,
        stop_reason,
        start: Utc::now(),
        hops: vec![
            Some(TraceHop {
                addr: "10.0.0.254".parse().unwrap(),
                name: Some("gw.example.net".to_string()),
                rtt_us: 800,
            }),
            None,
            Some(TraceHop {
                addr: dst,
                name: None,
                rtt_us: 12_000,
            }),
        ],
    }
}

pub fn write_targets(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("targets.txt");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

pub fn write_capture(path: &Path, records: &[CaptureRecord]) {
    let body: Vec<String> = records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    std::fs::write(path, body.join("\n") + "\n").unwrap();
}

/// Config with every output under `dir` and a fixed seed.
pub fn config_in(dir: &Path) -> TracerConfig {
    let mut config = TracerConfig::default();
    config.probe.output_dir = dir.join("output");
    config.probe.seed = Some(11);
    config.probe.idle_timeout_secs = 5;
    config.dump.output = dir.join("dump.json.gz");
    config
}

pub fn read_gz_lines(path: &Path) -> Vec<serde_json::Value> {
    let file = std::fs::File::open(path).unwrap();
    BufReader::new(GzDecoder::new(file))
        .lines()
        .map(|l| serde_json::from_str(&l.unwrap()).unwrap())
        .collect()
}

/// Capture files in `dir`, sorted by name.
pub fn capture_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}
