//! Metric registry and series storage.
//!
//! No external metrics crates are used; counter/gauge/summary families are
//! backed by `DashMap` and atomics and rendered on demand in Prometheus text
//! exposition format. Durations are stored as integer microseconds to keep
//! floating point off the tick path.

pub mod registry;
pub mod series;

pub use registry::MetricRegistry;
pub use series::{CounterFamily, GaugeFamily, SummaryFamily, SummaryTimer};

/// Metric kinds supported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Summary,
}

/// Current value of one series, as read by [`MetricRegistry::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleValue {
    Counter(u64),
    Gauge(i64),
    Summary { count: u64, sum_micros: u64 },
}

/// One series in a snapshot: metric name plus the optional `(dimension,
/// value)` label pair that selects the series within its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    pub label: Option<(String, String)>,
    pub value: SampleValue,
}
