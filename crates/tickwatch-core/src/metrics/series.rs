//! Typed series families.
//!
//! A family is one metric name, either a single unlabeled series or a set of
//! series partitioned by one label dimension (e.g. `shard`, `entity`). Each
//! series is an atomic cell inside a `DashMap`, so concurrent writers to
//! different series never contend beyond a map shard lock and a snapshot
//! never observes a torn value.

use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::{Sample, SampleValue};

/// Series key used by unlabeled families.
const UNLABELED: &str = "";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// `name{dim="value"}` for labeled series, bare `name` otherwise.
fn series_ref(name: &str, label: Option<&str>, key: &str) -> String {
    match label {
        Some(dim) => format!("{}{{{}=\"{}\"}}", name, dim, escape_label(key)),
        None => name.to_string(),
    }
}

fn sorted_keys<V>(map: &DashMap<String, V>) -> Vec<String> {
    let mut keys: Vec<String> = map.iter().map(|r| r.key().clone()).collect();
    keys.sort();
    keys
}

fn sample_label(label: Option<&str>, key: &str) -> Option<(String, String)> {
    label.map(|dim| (dim.to_string(), key.to_string()))
}

/// Monotonic counter family. Increment-only; resets only on process restart.
pub struct CounterFamily {
    label: Option<String>,
    series: DashMap<String, AtomicU64>,
}

impl CounterFamily {
    pub(crate) fn new(label: Option<String>) -> Self {
        Self {
            label,
            series: DashMap::new(),
        }
    }

    /// Increment the unlabeled series by 1.
    pub fn inc(&self) {
        self.add(UNLABELED, 1);
    }

    /// Increment the unlabeled series by an arbitrary value.
    pub fn inc_by(&self, v: u64) {
        self.add(UNLABELED, v);
    }

    /// Increment the series for one label value by 1.
    pub fn inc_with(&self, label_value: &str) {
        self.add(label_value, 1);
    }

    fn add(&self, key: &str, v: u64) {
        let cell = self
            .series
            .entry(key.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        cell.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of the unlabeled series.
    pub fn value(&self) -> u64 {
        self.value_with(UNLABELED)
    }

    /// Current value of the series for one label value (0 if never written).
    pub fn value_with(&self, label_value: &str) -> u64 {
        self.series
            .get(label_value)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for key in sorted_keys(&self.series) {
            let val = self.value_with(&key);
            let _ = writeln!(out, "{} {}", series_ref(name, self.label.as_deref(), &key), val);
        }
    }

    pub(crate) fn samples(&self, name: &str, out: &mut Vec<Sample>) {
        for key in sorted_keys(&self.series) {
            out.push(Sample {
                name: name.to_string(),
                label: sample_label(self.label.as_deref(), &key),
                value: SampleValue::Counter(self.value_with(&key)),
            });
        }
    }
}

/// Gauge family: settable and removable per label value.
#[derive(Debug)]
pub struct GaugeFamily {
    label: Option<String>,
    series: DashMap<String, AtomicI64>,
}

impl GaugeFamily {
    pub(crate) fn new(label: Option<String>) -> Self {
        Self {
            label,
            series: DashMap::new(),
        }
    }

    /// Set the series for one label value, creating it if absent.
    pub fn set(&self, label_value: &str, v: i64) {
        let cell = self
            .series
            .entry(label_value.to_string())
            .or_insert_with(|| AtomicI64::new(0));
        cell.store(v, Ordering::Relaxed);
    }

    /// Set the unlabeled series.
    pub fn set_value(&self, v: i64) {
        self.set(UNLABELED, v);
    }

    /// Delete the series for one label value. No-op if absent.
    pub fn remove(&self, label_value: &str) {
        self.series.remove(label_value);
    }

    /// Current value of the series for one label value, if it exists.
    pub fn get(&self, label_value: &str) -> Option<i64> {
        self.series.get(label_value).map(|c| c.load(Ordering::Relaxed))
    }

    /// Sorted label values of all live series.
    pub fn label_values(&self) -> Vec<String> {
        sorted_keys(&self.series)
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for key in sorted_keys(&self.series) {
            if let Some(val) = self.get(&key) {
                let _ = writeln!(out, "{} {}", series_ref(name, self.label.as_deref(), &key), val);
            }
        }
    }

    pub(crate) fn samples(&self, name: &str, out: &mut Vec<Sample>) {
        for key in sorted_keys(&self.series) {
            if let Some(val) = self.get(&key) {
                out.push(Sample {
                    name: name.to_string(),
                    label: sample_label(self.label.as_deref(), &key),
                    value: SampleValue::Gauge(val),
                });
            }
        }
    }
}

#[derive(Debug, Default)]
struct SummaryCell {
    count: AtomicU64,
    sum_micros: AtomicU64,
}

/// Duration accumulator exposing count and sum (microsecond scale).
#[derive(Debug)]
pub struct SummaryFamily {
    label: Option<String>,
    series: DashMap<String, SummaryCell>,
}

impl SummaryFamily {
    pub(crate) fn new(label: Option<String>) -> Self {
        Self {
            label,
            series: DashMap::new(),
        }
    }

    /// Record one observation into the unlabeled series.
    pub fn observe(&self, d: Duration) {
        self.observe_key(UNLABELED, d);
    }

    /// Record one observation into the series for one label value.
    pub fn observe_with(&self, label_value: &str, d: Duration) {
        self.observe_key(label_value, d);
    }

    fn observe_key(&self, key: &str, d: Duration) {
        let cell = self.series.entry(key.to_string()).or_default();
        cell.count.fetch_add(1, Ordering::Relaxed);
        cell.sum_micros.fetch_add(d.as_micros() as u64, Ordering::Relaxed);
    }

    /// Start a wall-clock timer that records into the unlabeled series.
    pub fn start_timer(self: &Arc<Self>) -> SummaryTimer {
        SummaryTimer {
            family: Arc::clone(self),
            label_value: None,
            started: Instant::now(),
        }
    }

    /// Start a wall-clock timer scoped to one label value.
    pub fn start_timer_with(self: &Arc<Self>, label_value: &str) -> SummaryTimer {
        SummaryTimer {
            family: Arc::clone(self),
            label_value: Some(label_value.to_string()),
            started: Instant::now(),
        }
    }

    /// Observation count of the unlabeled series.
    pub fn count(&self) -> u64 {
        self.count_with(UNLABELED)
    }

    /// Observation count of the series for one label value.
    pub fn count_with(&self, label_value: &str) -> u64 {
        self.series
            .get(label_value)
            .map(|c| c.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn read(&self, key: &str) -> (u64, u64) {
        self.series
            .get(key)
            .map(|c| {
                (
                    c.count.load(Ordering::Relaxed),
                    c.sum_micros.load(Ordering::Relaxed),
                )
            })
            .unwrap_or((0, 0))
    }

    /// Render in Prometheus text exposition format (`_sum`/`_count`).
    pub(crate) fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} summary", name);
        for key in sorted_keys(&self.series) {
            let (count, sum) = self.read(&key);
            let label = self.label.as_deref();
            let _ = writeln!(out, "{} {}", series_ref(&format!("{name}_sum"), label, &key), sum);
            let _ = writeln!(out, "{} {}", series_ref(&format!("{name}_count"), label, &key), count);
        }
    }

    pub(crate) fn samples(&self, name: &str, out: &mut Vec<Sample>) {
        for key in sorted_keys(&self.series) {
            let (count, sum_micros) = self.read(&key);
            out.push(Sample {
                name: name.to_string(),
                label: sample_label(self.label.as_deref(), &key),
                value: SampleValue::Summary { count, sum_micros },
            });
        }
    }
}

/// In-flight timing context. Created at phase start, consumed exactly once
/// at phase end; dropping it without [`observe_duration`] records nothing,
/// which is how a malformed timing is discarded.
///
/// [`observe_duration`]: SummaryTimer::observe_duration
pub struct SummaryTimer {
    family: Arc<SummaryFamily>,
    label_value: Option<String>,
    started: Instant,
}

impl SummaryTimer {
    /// Stop the timer and record the elapsed wall time.
    pub fn observe_duration(self) -> Duration {
        let elapsed = self.started.elapsed();
        match self.label_value.as_deref() {
            Some(v) => self.family.observe_with(v, elapsed),
            None => self.family.observe(elapsed),
        }
        elapsed
    }
}
