//! Named registration over the series families.
//!
//! A metric name maps to exactly one family. Re-registering with the same
//! kind and label schema returns the existing handle; any mismatch is a
//! `DuplicateMetric` error, never a silent second family.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{Result, TickwatchError};

use super::series::{CounterFamily, GaugeFamily, SummaryFamily};
use super::{MetricKind, Sample};

#[derive(Clone)]
enum Family {
    Counter(Arc<CounterFamily>),
    Gauge(Arc<GaugeFamily>),
    Summary(Arc<SummaryFamily>),
}

impl Family {
    fn kind(&self) -> MetricKind {
        match self {
            Family::Counter(_) => MetricKind::Counter,
            Family::Gauge(_) => MetricKind::Gauge,
            Family::Summary(_) => MetricKind::Summary,
        }
    }
}

struct FamilyEntry {
    label: Option<String>,
    family: Family,
}

/// Process-wide collection of typed metrics.
#[derive(Default)]
pub struct MetricRegistry {
    families: DashMap<String, FamilyEntry>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self {
            families: DashMap::new(),
        }
    }

    /// Register an unlabeled counter.
    pub fn counter(&self, name: &str) -> Result<Arc<CounterFamily>> {
        self.counter_family(name, None)
    }

    /// Register a counter partitioned by one label dimension.
    pub fn counter_with_label(&self, name: &str, label: &str) -> Result<Arc<CounterFamily>> {
        self.counter_family(name, Some(label))
    }

    /// Register an unlabeled gauge.
    pub fn gauge(&self, name: &str) -> Result<Arc<GaugeFamily>> {
        self.gauge_family(name, None)
    }

    /// Register a gauge partitioned by one label dimension.
    pub fn gauge_with_label(&self, name: &str, label: &str) -> Result<Arc<GaugeFamily>> {
        self.gauge_family(name, Some(label))
    }

    /// Register an unlabeled summary.
    pub fn summary(&self, name: &str) -> Result<Arc<SummaryFamily>> {
        self.summary_family(name, None)
    }

    /// Register a summary partitioned by one label dimension.
    pub fn summary_with_label(&self, name: &str, label: &str) -> Result<Arc<SummaryFamily>> {
        self.summary_family(name, Some(label))
    }

    fn counter_family(&self, name: &str, label: Option<&str>) -> Result<Arc<CounterFamily>> {
        let entry = self.families.entry(name.to_string()).or_insert_with(|| FamilyEntry {
            label: label.map(str::to_string),
            family: Family::Counter(Arc::new(CounterFamily::new(label.map(str::to_string)))),
        });
        Self::check_schema(name, &entry, MetricKind::Counter, label)?;
        match &entry.family {
            Family::Counter(f) => Ok(Arc::clone(f)),
            _ => Err(Self::kind_mismatch(name, &entry.family)),
        }
    }

    fn gauge_family(&self, name: &str, label: Option<&str>) -> Result<Arc<GaugeFamily>> {
        let entry = self.families.entry(name.to_string()).or_insert_with(|| FamilyEntry {
            label: label.map(str::to_string),
            family: Family::Gauge(Arc::new(GaugeFamily::new(label.map(str::to_string)))),
        });
        Self::check_schema(name, &entry, MetricKind::Gauge, label)?;
        match &entry.family {
            Family::Gauge(f) => Ok(Arc::clone(f)),
            _ => Err(Self::kind_mismatch(name, &entry.family)),
        }
    }

    fn summary_family(&self, name: &str, label: Option<&str>) -> Result<Arc<SummaryFamily>> {
        let entry = self.families.entry(name.to_string()).or_insert_with(|| FamilyEntry {
            label: label.map(str::to_string),
            family: Family::Summary(Arc::new(SummaryFamily::new(label.map(str::to_string)))),
        });
        Self::check_schema(name, &entry, MetricKind::Summary, label)?;
        match &entry.family {
            Family::Summary(f) => Ok(Arc::clone(f)),
            _ => Err(Self::kind_mismatch(name, &entry.family)),
        }
    }

    fn check_schema(
        name: &str,
        entry: &FamilyEntry,
        kind: MetricKind,
        label: Option<&str>,
    ) -> Result<()> {
        if entry.family.kind() != kind {
            return Err(Self::kind_mismatch(name, &entry.family));
        }
        if entry.label.as_deref() != label {
            return Err(TickwatchError::DuplicateMetric(format!(
                "{name}: label schema mismatch (registered {:?}, requested {:?})",
                entry.label, label
            )));
        }
        Ok(())
    }

    fn kind_mismatch(name: &str, existing: &Family) -> TickwatchError {
        TickwatchError::DuplicateMetric(format!(
            "{name}: already registered as {:?}",
            existing.kind()
        ))
    }

    /// Render every family in Prometheus text exposition format, ordered by
    /// metric name so scrapes are deterministic.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for name in self.sorted_names() {
            if let Some(entry) = self.families.get(&name) {
                match &entry.family {
                    Family::Counter(f) => f.render(&name, &mut out),
                    Family::Gauge(f) => f.render(&name, &mut out),
                    Family::Summary(f) => f.render(&name, &mut out),
                }
            }
        }
        out
    }

    /// Structured read of every live series, ordered by metric name then
    /// label value. Never blocks writers beyond a map shard lock.
    pub fn snapshot(&self) -> Vec<Sample> {
        let mut out = Vec::new();
        for name in self.sorted_names() {
            if let Some(entry) = self.families.get(&name) {
                match &entry.family {
                    Family::Counter(f) => f.samples(&name, &mut out),
                    Family::Gauge(f) => f.samples(&name, &mut out),
                    Family::Summary(f) => f.samples(&name, &mut out),
                }
            }
        }
        out
    }

    fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.families.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }
}
