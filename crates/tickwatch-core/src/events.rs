//! Occurrence counters for discrete host events (e.g. worldgen).
//!
//! Every event kind the host will ever emit is registered once at startup;
//! recording an unregistered name is `UnknownEvent`, logged and dropped by
//! callers rather than creating series on the fly.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{Result, TickwatchError};
use crate::metrics::{CounterFamily, MetricRegistry};

/// Registry of increment-on-event counters keyed by event name.
#[derive(Default)]
pub struct OccurrenceCounters {
    counters: DashMap<String, Arc<CounterFamily>>,
}

impl OccurrenceCounters {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Register an event kind, creating its counter in the registry. The
    /// event name doubles as the metric name. Idempotent.
    pub fn register(&self, registry: &MetricRegistry, event: &str) -> Result<()> {
        let counter = registry.counter(event)?;
        self.counters.insert(event.to_string(), counter);
        Ok(())
    }

    /// Increment the counter for one event by 1.
    pub fn record(&self, event: &str) -> Result<()> {
        let counter = self
            .counters
            .get(event)
            .ok_or_else(|| TickwatchError::UnknownEvent(event.to_string()))?;
        counter.inc();
        Ok(())
    }

    /// Sorted names of all registered events.
    pub fn registered(&self) -> Vec<String> {
        let mut names: Vec<String> = self.counters.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }
}
