#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tickwatch_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
exporter:
  listen: "0.0.0.0:9184"
  cadence_ticks: 60 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("invalid yaml"));
}

#[test]
fn ok_minimal_config_applies_defaults() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exporter.listen, "0.0.0.0:9184");
    assert_eq!(cfg.exporter.sample_cadence_ticks, 60);
    assert!(cfg.exporter.process_stats);
}

#[test]
fn zero_cadence_rejected() {
    let bad = r#"
version: 1
exporter:
  sample_cadence_ticks: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("sample_cadence_ticks"));
}

#[test]
fn oversized_cadence_rejected() {
    let bad = r#"
version: 1
exporter:
  sample_cadence_ticks: 100000
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn bad_listen_rejected() {
    let bad = r#"
version: 1
exporter:
  listen: "not-an-addr"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("listen"));
}

#[test]
fn wrong_version_rejected() {
    let bad = r#"
version: 2
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("version"));
}
