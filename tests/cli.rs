use std::fs;

use clap::Parser;
use overlay::Layout;
use overlay::cli::{Cli, Command};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn merge_subcommand() {
    let cli = parse(&[
        "overlay",
        "merge",
        "--base",
        "/etc/prometheus/base.yml",
        "--override",
        "/etc/prometheus/override.yml",
        "--output",
        "/tmp/prometheus.yml",
        "--",
        "/bin/prometheus",
        "--storage.tsdb.path=/prometheus",
        "--web.enable-lifecycle",
    ]);

    assert!(matches!(cli.command, Command::Merge { .. }));
    assert_eq!(
        cli.target_args(),
        ["--storage.tsdb.path=/prometheus", "--web.enable-lifecycle"]
    );
    assert_eq!(cli.common().config_flag, "config.file");
    assert!(!cli.common().dry_run);

    let resolver = cli.resolver(|_| None);
    assert_eq!(resolver.program(), "/bin/prometheus");
    assert_eq!(resolver.strategy_name(), "deep-merge");
}

#[test]
fn splice_subcommand_defaults() {
    let cli = parse(&[
        "overlay",
        "splice",
        "--base",
        "b.yml",
        "--output",
        "o.yml",
        "--",
        "/usr/bin/promtail",
    ]);

    let Command::Splice {
        layout,
        default_endpoint,
        marker,
        endpoints_key,
        extra_key,
        endpoints,
        extra,
        ..
    } = &cli.command
    else {
        panic!("expected splice");
    };
    assert_eq!(*layout, Layout::Marker);
    assert_eq!(default_endpoint, "http://loki:3100/loki/api/v1/push");
    assert_eq!(marker, "# EXTRA_SCRAPE_CONFIGS");
    assert_eq!(endpoints_key, "clients");
    assert_eq!(extra_key, "scrape_configs");
    assert!(endpoints.is_none());
    assert!(extra.is_none());
    assert!(cli.target_args().is_empty());
    assert_eq!(cli.resolver(|_| None).strategy_name(), "splice");
}

#[test]
fn splice_structured_layout() {
    let cli = parse(&[
        "overlay",
        "splice",
        "--base",
        "b.yml",
        "--output",
        "o.yml",
        "--layout",
        "structured",
        "--",
        "/usr/bin/promtail",
    ]);

    assert!(matches!(
        cli.command,
        Command::Splice {
            layout: Layout::Structured,
            ..
        }
    ));
}

#[test]
fn target_is_required() {
    let result = Cli::try_parse_from(["overlay", "merge", "--base", "b", "--output", "o"]);

    assert!(result.is_err());
}

#[test]
fn placeholder_needs_token_and_var() {
    for bad in ["NOEQUALS", "=VAR", "TOKEN="] {
        let result = Cli::try_parse_from([
            "overlay",
            "merge",
            "--base",
            "b",
            "--output",
            "o",
            "--placeholder",
            bad,
            "--",
            "/bin/true",
        ]);
        assert!(result.is_err(), "accepted {bad}");
    }
}

#[test]
fn target_flags_are_not_parsed_as_ours() {
    let cli = parse(&[
        "overlay",
        "merge",
        "--base",
        "b",
        "--output",
        "o",
        "--",
        "/bin/prometheus",
        "--dry-run",
        "--config.file=/custom.yml",
    ]);

    assert!(!cli.common().dry_run);
    assert_eq!(
        cli.target_args(),
        ["--dry-run", "--config.file=/custom.yml"]
    );
    assert!(cli.resolver(|_| None).is_bypass(cli.target_args()));
}

#[test]
fn placeholders_resolved_through_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.yml");
    let out = dir.path().join("out.yml");
    fs::write(&base, "labels:\n  server: __LABEL__\n  zone: __ZONE__\n").unwrap();

    let cli = parse(&[
        "overlay",
        "merge",
        "--base",
        base.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--placeholder",
        "__LABEL__=SERVER_LABEL",
        "--placeholder",
        "__ZONE__=ZONE",
        "--",
        "/bin/prometheus",
    ]);

    let launch = cli
        .resolver(|var| (var == "SERVER_LABEL").then(|| "edge-7".to_string()))
        .resolve(cli.target_args())
        .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "labels:\n  server: edge-7\n  zone: __ZONE__\n"
    );
    assert_eq!(
        launch.args,
        vec![format!("--config.file={}", out.display())]
    );
}
