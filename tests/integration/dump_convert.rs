use super::support::{config_in, read_gz_lines, trace_record, write_capture};
use bulktracer::capture::{CaptureRecord, DealiasRecord, StopReason};
use bulktracer::error::TracerError;
use bulktracer::tooling::cli::CliContext;
use chrono::Utc;
use std::net::IpAddr;

fn addr(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn dump_converts_capture_files_into_gzip_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("sjj1-ba.20240101_000000.bulktracer.jsonl");
    let second = dir.path().join("abc-de.20240101_000000.bulktracer.jsonl");
    let foreign = dir.path().join("notes.txt");

    write_capture(
        &first,
        &[
            CaptureRecord::Trace(trace_record("sjj1-ba.ark", addr("192.0.2.7"), StopReason::Completed)),
            CaptureRecord::Dealias(DealiasRecord {
                monitor: "sjj1-ba.ark".to_string(),
                dst: addr("192.0.2.7"),
                start: Utc::now(),
            }),
            CaptureRecord::Trace(trace_record("sjj1-ba.ark", addr("192.0.2.8"), StopReason::GapLimit)),
        ],
    );
    write_capture(
        &second,
        &[CaptureRecord::Trace(trace_record(
            "abc-de.ark",
            addr("2001:db8::1"),
            StopReason::Completed,
        ))],
    );
    std::fs::write(&foreign, "not a capture file\n").unwrap();

    let config = config_in(dir.path());
    let output = config.dump.output.clone();
    let ctx = CliContext::with_config(config);
    let stats = ctx
        .dump(&[first, foreign, second])
        .unwrap();

    assert_eq!(stats.files, 2);
    assert_eq!(stats.skipped_files, 1);
    assert_eq!(stats.records, 3);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.incomplete, 1);

    let lines = read_gz_lines(&output);
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["ark"], "sjj1-ba");
    assert_eq!(lines[0]["src"], "10.0.0.1");
    assert_eq!(lines[0]["dst"], "192.0.2.7");
    let hops = lines[0]["hops"].as_array().unwrap();
    assert_eq!(hops.len(), 2);
    assert_eq!(hops[0]["addr"], "10.0.0.254");
    assert_eq!(hops[0]["name"], "gw.example.net");
    assert_eq!(hops[0]["rtt_ms"], 0.8);
    assert!(hops[1]["name"].is_null());
    assert_eq!(hops[1]["rtt_ms"], 12.0);

    assert_eq!(lines[1], serde_json::json!({ "ark": "sjj1-ba" }));

    assert_eq!(lines[2]["ark"], "abc-de");
    assert_eq!(lines[2]["dst"], "2001:db8::1");
}

#[test]
fn dump_with_no_files_writes_an_empty_archive() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.dump.output = dir.path().join("nested").join("empty.json.gz");
    let output = config.dump.output.clone();

    let stats = CliContext::with_config(config).dump(&[]).unwrap();

    assert_eq!(stats.records, 0);
    assert!(output.exists());
    assert!(read_gz_lines(&output).is_empty());
}

#[test]
fn malformed_line_reports_its_position() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("bad.jsonl");
    let good = serde_json::to_string(&CaptureRecord::Trace(trace_record(
        "abc-de.ark",
        addr("192.0.2.1"),
        StopReason::Completed,
    )))
    .unwrap();
    std::fs::write(&capture, format!("{good}\n\n{{not json\n")).unwrap();

    let config = config_in(dir.path());
    let output = config.dump.output.clone();
    let err = CliContext::with_config(config).dump(&[capture]).unwrap_err();
    assert!(!output.exists());

    match err {
        TracerError::MalformedRecord { line, .. } => assert_eq!(line, 3),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}
