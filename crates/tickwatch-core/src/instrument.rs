//! Tick instrumentation: phase timing, the tick counter, and the cadence
//! gate that drives presence sampling.
//!
//! The host integration layer calls [`SimulationHooks`] directly — there is
//! no event bus and no internal scheduler. The outer tick is driven
//! single-threaded; shard ticks may arrive concurrently from workers, so
//! their in-flight timers live in a `DashMap` keyed by shard id.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::{Result, TickwatchError};
use crate::events::OccurrenceCounters;
use crate::metrics::{CounterFamily, MetricRegistry, SummaryFamily, SummaryTimer};
use crate::presence::PresenceTracker;

pub const TICKS_TOTAL: &str = "sim_ticks_total";
pub const TICK_DURATION: &str = "sim_tick_duration_micros";
pub const SHARD_TICK_DURATION: &str = "sim_shard_tick_duration_micros";
pub const ENTITIES_PRESENT: &str = "sim_entities_present";

/// Lifecycle callbacks the host drives on its tick path.
///
/// `start`/`end` must pair up per phase (per shard id for shard phases); an
/// unmatched call is a `ProtocolViolation` and the malformed timing is
/// discarded rather than recorded.
pub trait SimulationHooks: Send + Sync {
    fn on_tick_start(&self) -> Result<()>;
    fn on_tick_end(&self) -> Result<()>;
    fn on_shard_tick_start(&self, shard: &str) -> Result<()>;
    fn on_shard_tick_end(&self, shard: &str) -> Result<()>;
    fn on_occurrence(&self, event: &str) -> Result<()>;
}

/// Pull side of the host contract: the current active entity set, fetched
/// by the core only when the sampling cadence fires.
pub trait EntitySource: Send + Sync {
    fn active_entities(&self) -> HashSet<String>;
}

/// Wraps the host's execution loop with timing and presence sampling.
pub struct TickInstrumentation {
    registry: Arc<MetricRegistry>,
    ticks: Arc<CounterFamily>,
    tick_time: Arc<SummaryFamily>,
    shard_tick_time: Arc<SummaryFamily>,
    occurrences: OccurrenceCounters,
    presence: PresenceTracker,
    source: Arc<dyn EntitySource>,
    cadence: u64,
    tick_count: AtomicU64,
    outer_timer: Mutex<Option<SummaryTimer>>,
    shard_timers: DashMap<String, SummaryTimer>,
}

impl TickInstrumentation {
    /// Register the tick/shard/presence metrics and wire the entity source.
    /// The cadence is fixed for the life of the process.
    pub fn new(
        registry: Arc<MetricRegistry>,
        source: Arc<dyn EntitySource>,
        cadence: u64,
    ) -> Result<Self> {
        if cadence == 0 {
            return Err(TickwatchError::Config(
                "sample cadence must be at least 1 tick".into(),
            ));
        }
        let ticks = registry.counter(TICKS_TOTAL)?;
        let tick_time = registry.summary(TICK_DURATION)?;
        let shard_tick_time = registry.summary_with_label(SHARD_TICK_DURATION, "shard")?;
        let presence = PresenceTracker::new(registry.gauge_with_label(ENTITIES_PRESENT, "entity")?);
        Ok(Self {
            registry,
            ticks,
            tick_time,
            shard_tick_time,
            occurrences: OccurrenceCounters::new(),
            presence,
            source,
            cadence,
            tick_count: AtomicU64::new(0),
            outer_timer: Mutex::new(None),
            shard_timers: DashMap::new(),
        })
    }

    /// Register an occurrence event kind. Call once at startup per kind.
    pub fn register_occurrence(&self, event: &str) -> Result<()> {
        self.occurrences.register(&self.registry, event)
    }

    /// Ticks completed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    fn lock_outer(&self) -> Result<std::sync::MutexGuard<'_, Option<SummaryTimer>>> {
        self.outer_timer
            .lock()
            .map_err(|_| TickwatchError::Internal("outer timer lock poisoned".into()))
    }
}

impl SimulationHooks for TickInstrumentation {
    fn on_tick_start(&self) -> Result<()> {
        let fresh = self.tick_time.start_timer();
        let stale = self.lock_outer()?.replace(fresh);
        if stale.is_some() {
            // The stale timer is dropped unobserved; the new start stands.
            warn!("tick start while the previous tick is still timing");
            return Err(TickwatchError::ProtocolViolation(
                "tick start while the previous tick is still timing".into(),
            ));
        }
        Ok(())
    }

    fn on_tick_end(&self) -> Result<()> {
        let Some(timer) = self.lock_outer()?.take() else {
            warn!("tick end without a matching start");
            return Err(TickwatchError::ProtocolViolation(
                "tick end without a matching start".into(),
            ));
        };
        timer.observe_duration();
        self.ticks.inc();

        let count = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % self.cadence == 0 {
            // Sampling runs after the timer observation so its cost never
            // leaks into the tick duration summary.
            let delta = self.presence.sample(self.source.active_entities())?;
            if !delta.is_empty() {
                debug!(
                    tick = count,
                    appeared = delta.appeared.len(),
                    departed = delta.departed.len(),
                    "presence sample applied"
                );
            }
        }
        Ok(())
    }

    fn on_shard_tick_start(&self, shard: &str) -> Result<()> {
        let fresh = self.shard_tick_time.start_timer_with(shard);
        if self.shard_timers.insert(shard.to_string(), fresh).is_some() {
            warn!(%shard, "shard tick start while already timing");
            return Err(TickwatchError::ProtocolViolation(format!(
                "shard {shard}: tick start while already timing"
            )));
        }
        Ok(())
    }

    fn on_shard_tick_end(&self, shard: &str) -> Result<()> {
        let Some((_, timer)) = self.shard_timers.remove(shard) else {
            warn!(%shard, "shard tick end without a matching start");
            return Err(TickwatchError::ProtocolViolation(format!(
                "shard {shard}: tick end without a matching start"
            )));
        };
        timer.observe_duration();
        Ok(())
    }

    fn on_occurrence(&self, event: &str) -> Result<()> {
        self.occurrences.record(event)
    }
}
