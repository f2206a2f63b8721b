//! Metric registry registration and exposition contract.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tickwatch_core::metrics::{MetricRegistry, SampleValue};
use tickwatch_core::TickwatchError;

#[test]
fn reregistration_same_schema_is_idempotent() {
    let registry = MetricRegistry::new();
    let a = registry.counter("sim_ticks_total").unwrap();
    let b = registry.counter("sim_ticks_total").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    a.inc();
    b.inc();
    assert_eq!(a.value(), 2);
}

#[test]
fn reregistration_kind_mismatch_fails() {
    let registry = MetricRegistry::new();
    registry.counter("sim_ticks_total").unwrap();
    let err = registry.gauge("sim_ticks_total").expect_err("must fail");
    assert!(matches!(err, TickwatchError::DuplicateMetric(_)));
    assert!(!err.recoverable());
}

#[test]
fn reregistration_label_mismatch_fails() {
    let registry = MetricRegistry::new();
    registry.summary("sim_tick_duration_micros").unwrap();
    let err = registry
        .summary_with_label("sim_tick_duration_micros", "shard")
        .expect_err("must fail");
    assert!(matches!(err, TickwatchError::DuplicateMetric(_)));
}

#[test]
fn counter_counts_exactly() {
    let registry = MetricRegistry::new();
    let ticks = registry.counter("sim_ticks_total").unwrap();
    for _ in 0..1000 {
        ticks.inc();
    }
    assert_eq!(ticks.value(), 1000);
    assert!(registry.render().contains("sim_ticks_total 1000"));
}

#[test]
fn gauge_set_overwrite_remove() {
    let registry = MetricRegistry::new();
    let gauge = registry.gauge_with_label("sim_entities_present", "entity").unwrap();
    gauge.set("alice", 1);
    gauge.set("alice", 1);
    gauge.set("bob", 1);
    assert_eq!(gauge.label_values(), vec!["alice", "bob"]);

    gauge.remove("alice");
    gauge.remove("alice"); // no-op when absent
    assert_eq!(gauge.label_values(), vec!["bob"]);
}

#[test]
fn summary_accumulates_count_and_sum() {
    let registry = MetricRegistry::new();
    let summary = registry.summary("sim_tick_duration_micros").unwrap();
    summary.observe(Duration::from_micros(250));
    summary.observe(Duration::from_micros(750));

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "sim_tick_duration_micros");
    assert_eq!(
        snapshot[0].value,
        SampleValue::Summary {
            count: 2,
            sum_micros: 1000
        }
    );
}

#[test]
fn summary_timer_records_one_observation() {
    let registry = MetricRegistry::new();
    let summary = registry.summary_with_label("sim_shard_tick_duration_micros", "shard").unwrap();
    let timer = summary.start_timer_with("overworld");
    timer.observe_duration();
    assert_eq!(summary.count_with("overworld"), 1);
    assert_eq!(summary.count_with("caverns"), 0);
}

#[test]
fn render_is_name_ordered() {
    let registry = MetricRegistry::new();
    registry.counter("zzz_total").unwrap().inc();
    registry.counter("aaa_total").unwrap().inc();

    let body = registry.render();
    let zzz = body.find("zzz_total").unwrap();
    let aaa = body.find("aaa_total").unwrap();
    assert!(aaa < zzz);
}

#[test]
fn render_escapes_label_values() {
    let registry = MetricRegistry::new();
    let gauge = registry.gauge_with_label("sim_entities_present", "entity").unwrap();
    gauge.set("he\"llo\\world\n", 1);

    let body = registry.render();
    assert!(body.contains("sim_entities_present{entity=\"he\\\"llo\\\\world\\n\"} 1"));
}

#[test]
fn render_exposition_shapes() {
    let registry = MetricRegistry::new();
    registry.counter("sim_ticks_total").unwrap().inc();
    let gauge = registry.gauge_with_label("sim_entities_present", "entity").unwrap();
    gauge.set("alice", 1);
    let summary = registry.summary("sim_tick_duration_micros").unwrap();
    summary.observe(Duration::from_micros(5));

    let body = registry.render();
    assert!(body.contains("# TYPE sim_ticks_total counter\nsim_ticks_total 1\n"));
    assert!(body.contains("# TYPE sim_entities_present gauge\nsim_entities_present{entity=\"alice\"} 1\n"));
    assert!(body.contains("# TYPE sim_tick_duration_micros summary\n"));
    assert!(body.contains("sim_tick_duration_micros_sum 5\n"));
    assert!(body.contains("sim_tick_duration_micros_count 1\n"));
}
