use super::support::{capture_files, config_in, read_gz_lines, trace_record};
use bulktracer::capture::{CaptureRecord, CaptureSource, JsonLinesCaptureSource, StopReason};
use bulktracer::control::{ControlEvent, Instance, ScriptStep, ScriptedControl};
use bulktracer::probe::ProbeState;
use bulktracer::tooling::cli::CliContext;
use std::net::IpAddr;

fn targets(n: u8) -> Vec<IpAddr> {
    (1..=n).map(|i| IpAddr::from([198, 51, 100, i])).collect()
}

fn fleet() -> (Instance, Instance, Instance) {
    (
        Instance::new(1, "aaa1-us.ark"),
        Instance::new(2, "bbb-de.ark"),
        Instance::new(3, "sjj-ba.ark"),
    )
}

fn trace(instance: &Instance, dst: IpAddr, stop: StopReason) -> ScriptStep {
    ScriptStep::Event(ControlEvent::Trace {
        instance: instance.clone(),
        record: trace_record(&instance.name, dst, stop),
    })
}

fn end(instance: &Instance) -> ScriptStep {
    ScriptStep::Event(ControlEvent::EndOfWork {
        instance: instance.clone(),
    })
}

#[test]
fn probe_writes_one_capture_file_per_agent_and_dumps_them() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let output_dir = config.probe.output_dir.clone();
    let ctx = CliContext::with_config(config);
    let list = targets(5);
    let (a, b, excluded) = fleet();

    let mut control = ScriptedControl::new(vec![a.clone(), b.clone(), excluded.clone()]);
    control
        .push(trace(&a, list[0], StopReason::Completed))
        .push(trace(&b, list[3], StopReason::Completed))
        .push(trace(&a, list[2], StopReason::HopLimit))
        .push(end(&a))
        .push(end(&b));

    let report = ctx.probe(&mut control, &list).unwrap();

    assert_eq!(report.state, ProbeState::Done);
    assert_eq!(report.targets, 5);
    assert_eq!(report.commands_issued, 10);
    assert_eq!(report.results, 3);
    assert_eq!(report.dropped, 0);
    assert!(control
        .issued()
        .iter()
        .all(|(instance, _)| instance != &excluded));
    assert_eq!(control.released(), &[excluded][..]);

    let files = capture_files(&output_dir);
    assert_eq!(files.len(), 2);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names[0].starts_with("aaa1-us."));
    assert!(names[0].ends_with(".bulktracer.jsonl"));
    assert!(names[1].starts_with("bbb-de."));

    let records: Vec<CaptureRecord> = JsonLinesCaptureSource
        .open(&files[0])
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.monitor() == "aaa1-us.ark"));

    let stats = ctx.dump(&files).unwrap();
    assert_eq!(stats.records, 3);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.incomplete, 1);
    let lines = read_gz_lines(&ctx.config().dump.output);
    let arks: Vec<&str> = lines.iter().map(|l| l["ark"].as_str().unwrap()).collect();
    assert_eq!(arks, vec!["aaa1-us", "aaa1-us", "bbb-de"]);
}

#[test]
fn same_seed_gives_same_visiting_order() {
    let list = targets(12);
    let (a, b, _) = fleet();
    let mut issued = Vec::new();

    for _ in 0..2 {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext::with_config(config_in(dir.path()));
        let mut control = ScriptedControl::new(vec![a.clone(), b.clone()]);
        control.push(end(&a)).push(end(&b));
        ctx.probe(&mut control, &list).unwrap();
        issued.push(control.issued().to_vec());
    }

    assert_eq!(issued[0].len(), 24);
    assert_eq!(issued[0], issued[1]);
}

#[test]
fn each_agent_covers_every_target_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CliContext::with_config(config_in(dir.path()));
    let list = targets(31);
    let (a, b, _) = fleet();
    let mut control = ScriptedControl::new(vec![a.clone(), b.clone()]);
    control.push(end(&a)).push(end(&b));

    ctx.probe(&mut control, &list).unwrap();

    for instance in [&a, &b] {
        let mut seen: Vec<IpAddr> = control
            .issued()
            .iter()
            .filter(|(i, _)| i == instance)
            .map(|(_, dst)| *dst)
            .collect();
        seen.sort();
        assert_eq!(seen, list);
    }
}

#[test]
fn silent_fleet_times_out_with_partial_results() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CliContext::with_config(config_in(dir.path()));
    let list = targets(3);
    let (a, b, _) = fleet();
    let mut control = ScriptedControl::new(vec![a.clone(), b.clone()]);
    control
        .push(trace(&b, list[1], StopReason::Completed))
        .push(end(&b))
        .push(ScriptStep::Timeout);

    let report = ctx.probe(&mut control, &list).unwrap();

    assert_eq!(report.state, ProbeState::TimedOut);
    assert_eq!(report.results, 1);
    let a_summary = report.agents.iter().find(|s| s.agent_id == "aaa1-us").unwrap();
    let b_summary = report.agents.iter().find(|s| s.agent_id == "bbb-de").unwrap();
    assert!(!a_summary.finished);
    assert!(b_summary.finished);
    assert_eq!(b_summary.received, 1);
}
