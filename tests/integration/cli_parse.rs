use bulktracer::tooling::cli::{Cli, CliContext, Mode};
use bulktracer::config::TracerConfig;
use bulktracer::error::TracerError;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["bulktracer", "--mode", "dump"],
        vec!["bulktracer", "--mode", "dump", "a.jsonl", "b.jsonl"],
        vec!["bulktracer", "--mode", "probe", "--targets", "targets.txt"],
        vec![
            "bulktracer",
            "--mode",
            "probe",
            "--targets",
            "targets.txt",
            "--config",
            "bt.toml",
            "--log-level",
            "debug",
            "--log-output",
            "stdout",
        ],
        vec!["bulktracer", "a.jsonl", "--mode", "dump", "--output", "x.json.gz"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_bad_modes() {
    assert!(Cli::try_parse_from(["bulktracer"]).is_err());
    assert!(Cli::try_parse_from(["bulktracer", "--mode", "ping"]).is_err());
}

#[test]
fn positional_files_are_collected_in_order() {
    let cli = Cli::try_parse_from(["bulktracer", "--mode", "dump", "b.jsonl", "a.jsonl"]).unwrap();
    assert_eq!(cli.mode, Mode::Dump);
    assert_eq!(
        cli.files,
        vec![PathBuf::from("b.jsonl"), PathBuf::from("a.jsonl")]
    );
}

#[test]
fn help_mentions_both_modes() {
    let mut cmd = Cli::command();
    let help = cmd.render_long_help().to_string();
    assert!(help.contains("--mode"));
    assert!(help.contains("dump"));
    assert!(help.contains("probe"));
    assert!(help.contains("--targets"));
    assert!(help.contains("logged to stderr"));
}

#[test]
fn probe_mode_requires_targets() {
    let ctx = CliContext::with_config(TracerConfig::default());
    let cli = Cli::try_parse_from(["bulktracer", "--mode", "probe"]).unwrap();
    assert!(matches!(
        ctx.execute(&cli),
        Err(TracerError::MissingArgument(_))
    ));
}

#[test]
fn probe_mode_rejects_target_file_without_addresses() {
    let dir = tempfile::tempdir().unwrap();
    let targets = super::support::write_targets(dir.path(), &["nope", ""]);
    let ctx = CliContext::with_config(super::support::config_in(dir.path()));
    let cli = Cli::try_parse_from([
        "bulktracer",
        "--mode",
        "probe",
        "--targets",
        targets.to_str().unwrap(),
    ])
    .unwrap();
    assert!(matches!(ctx.execute(&cli), Err(TracerError::EmptyTargets)));
}
