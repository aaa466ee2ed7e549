use bulktracer::config::ConfigLoader;
use bulktracer::control::TraceMethod;
use bulktracer::error::TracerError;
use std::path::PathBuf;
use std::time::Duration;

// Env overrides are process-wide, so only `config_env_overrides_file` touches
// idle_timeout_secs and excluded_agents.

#[test]
fn explicit_file_values_win_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bulktracer.toml");
    std::fs::write(
        &path,
        r#"
[probe]
mux_path = "/tmp/bt-mux.sock"
method = "udp-paris"
ptr = true
wait_probe_ms = 150

[dump]
output = "/tmp/all.json.gz"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.probe.mux_path, PathBuf::from("/tmp/bt-mux.sock"));
    assert_eq!(config.probe.method, TraceMethod::UdpParis);
    let opts = config.probe.trace_options();
    assert!(opts.ptr);
    assert_eq!(opts.wait_probe, Some(Duration::from_millis(150)));
    assert_eq!(opts.wait_timeout, Duration::from_secs(2));
    assert_eq!(config.dump.output, PathBuf::from("/tmp/all.json.gz"));
    assert_eq!(config.dump.capture_extension, "jsonl");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigLoader::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(TracerError::ConfigError(_))));
}

#[test]
fn invalid_values_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[probe]\nwait_timeout_ms = 0\n").unwrap();
    let err = ConfigLoader::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("wait_timeout_ms"));
}

#[test]
fn config_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bulktracer.toml");
    std::fs::write(&path, "[probe]\nidle_timeout_secs = 30\n").unwrap();

    std::env::set_var("BULKTRACER__PROBE__IDLE_TIMEOUT_SECS", "42");
    std::env::set_var("BULKTRACER__PROBE__EXCLUDED_AGENTS", "abc-de,xyz1-us");
    let result = ConfigLoader::load_from_file(&path);
    std::env::remove_var("BULKTRACER__PROBE__IDLE_TIMEOUT_SECS");
    std::env::remove_var("BULKTRACER__PROBE__EXCLUDED_AGENTS");

    let config = result.unwrap();
    assert_eq!(config.probe.idle_timeout(), Duration::from_secs(42));
    assert_eq!(
        config.probe.excluded_agents,
        vec!["abc-de".to_string(), "xyz1-us".to_string()]
    );
}
