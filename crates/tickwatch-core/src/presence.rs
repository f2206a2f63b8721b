//! Presence tracking: entity set diffing against the previous sample.
//!
//! Edge-triggered on purpose: an entity that stays present across samples
//! costs zero gauge writes, which matters when the active set is large.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::error::{Result, TickwatchError};
use crate::metrics::GaugeFamily;

/// Gauge transitions applied by one sampling pass, sorted for determinism.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PresenceDelta {
    pub appeared: Vec<String>,
    pub departed: Vec<String>,
}

impl PresenceDelta {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.departed.is_empty()
    }
}

/// Holds the previously sampled entity set and mutates the presence gauge
/// on transitions only.
pub struct PresenceTracker {
    gauge: Arc<GaugeFamily>,
    // Single writer in practice (the outer tick); the lock keeps the diff
    // invariant intact if a host ever samples concurrently.
    previous: Mutex<HashSet<String>>,
}

impl PresenceTracker {
    pub fn new(gauge: Arc<GaugeFamily>) -> Self {
        Self {
            gauge,
            previous: Mutex::new(HashSet::new()),
        }
    }

    /// Diff `current` against the previous sample: set the gauge to 1 for
    /// every new entity, remove the series for every departed one, then
    /// replace the stored set wholesale. The first call diffs against the
    /// empty set.
    pub fn sample(&self, current: HashSet<String>) -> Result<PresenceDelta> {
        let mut previous = self
            .previous
            .lock()
            .map_err(|_| TickwatchError::Internal("presence set lock poisoned".into()))?;

        let mut delta = PresenceDelta::default();
        for id in &current {
            if !previous.contains(id) {
                self.gauge.set(id, 1);
                delta.appeared.push(id.clone());
            }
        }
        for id in previous.iter() {
            if !current.contains(id) {
                self.gauge.remove(id);
                delta.departed.push(id.clone());
            }
        }
        delta.appeared.sort();
        delta.departed.sort();

        *previous = current;
        Ok(delta)
    }
}
