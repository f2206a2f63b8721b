//! Presence tracker diff semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;
use std::sync::Arc;

use tickwatch_core::metrics::{GaugeFamily, MetricRegistry};
use tickwatch_core::presence::PresenceTracker;

fn tracker() -> (Arc<GaugeFamily>, PresenceTracker) {
    let registry = MetricRegistry::new();
    let gauge = registry.gauge_with_label("sim_entities_present", "entity").unwrap();
    (gauge.clone(), PresenceTracker::new(gauge))
}

fn ids(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn first_sample_diffs_against_empty() {
    let (gauge, tracker) = tracker();
    let delta = tracker.sample(ids(&["alice", "bob"])).unwrap();
    assert_eq!(delta.appeared, vec!["alice", "bob"]);
    assert!(delta.departed.is_empty());
    assert_eq!(gauge.label_values(), vec!["alice", "bob"]);
    assert_eq!(gauge.get("alice"), Some(1));
}

#[test]
fn repeated_sample_is_quiet() {
    let (_, tracker) = tracker();
    tracker.sample(ids(&["alice", "bob"])).unwrap();
    let delta = tracker.sample(ids(&["alice", "bob"])).unwrap();
    assert!(delta.is_empty());
}

#[test]
fn diff_matches_set_algebra() {
    let (gauge, tracker) = tracker();
    tracker.sample(ids(&["a", "b", "c"])).unwrap();
    let delta = tracker.sample(ids(&["b", "c", "d"])).unwrap();
    assert_eq!(delta.appeared, vec!["d"]);
    assert_eq!(delta.departed, vec!["a"]);
    // Gauge label set equals the current snapshot exactly.
    assert_eq!(gauge.label_values(), vec!["b", "c", "d"]);
    assert_eq!(gauge.get("a"), None);
}

#[test]
fn reappearance_replays_appearance() {
    let (gauge, tracker) = tracker();
    let d1 = tracker.sample(ids(&["x"])).unwrap();
    let d2 = tracker.sample(ids(&[])).unwrap();
    let d3 = tracker.sample(ids(&["x"])).unwrap();

    assert_eq!(d1.appeared, vec!["x"]);
    assert_eq!(d2.departed, vec!["x"]);
    assert_eq!(d3.appeared, vec!["x"]);
    assert_eq!(gauge.label_values(), vec!["x"]);
}

#[test]
fn departure_removes_series_entirely() {
    let (gauge, tracker) = tracker();
    tracker.sample(ids(&["alice"])).unwrap();
    tracker.sample(ids(&[])).unwrap();
    assert!(gauge.label_values().is_empty());
    assert_eq!(gauge.get("alice"), None);
}
