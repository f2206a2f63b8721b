//! Synthetic demo host.
//!
//! Drives the callback surface the way a real simulation server would:
//! fixed-interval outer ticks, a few shards ticked inside each one,
//! entities joining and leaving on a deterministic schedule, and periodic
//! worldgen occurrences. Only the demo binary uses this; embedding hosts
//! wire their own loop to [`SimulationHooks`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickwatch_core::instrument::{EntitySource, SimulationHooks};
use tracing::warn;

use crate::app_state::AppState;

pub const WORLDGEN_EVENT: &str = "sim_worldgen_total";

const SHARDS: [&str; 3] = ["overworld", "caverns", "rift"];
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// A fake entity population churned on a tick schedule.
#[derive(Default)]
pub struct SyntheticWorld {
    entities: Mutex<HashSet<String>>,
}

impl SyntheticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn churn(&self, tick: u64) {
        let Ok(mut entities) = self.entities.lock() else {
            return;
        };
        // One join every 40 ticks from a rotating pool, one leave every 100.
        if tick % 40 == 0 {
            entities.insert(format!("wanderer-{}", (tick / 40) % 8));
        }
        if tick % 100 == 0 {
            if let Some(id) = entities.iter().min().cloned() {
                entities.remove(&id);
            }
        }
    }
}

impl EntitySource for SyntheticWorld {
    fn active_entities(&self) -> HashSet<String> {
        self.entities.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

/// Run the demo tick loop forever.
pub async fn run(state: AppState, world: Arc<SyntheticWorld>) {
    let hooks = state.hooks();
    if let Err(e) = hooks.register_occurrence(WORLDGEN_EVENT) {
        warn!(error = %e, "worldgen counter registration failed");
        return;
    }

    let mut interval = tokio::time::interval(TICK_INTERVAL);
    let mut tick: u64 = 0;
    loop {
        interval.tick().await;
        tick += 1;
        world.churn(tick);

        if let Err(e) = hooks.on_tick_start() {
            warn!(error = %e, "tick start rejected");
        }
        for shard in SHARDS {
            if let Err(e) = hooks.on_shard_tick_start(shard) {
                warn!(error = %e, %shard, "shard tick start rejected");
                continue;
            }
            if let Err(e) = hooks.on_shard_tick_end(shard) {
                warn!(error = %e, %shard, "shard tick end rejected");
            }
        }
        if tick % 97 == 0 {
            if let Err(e) = hooks.on_occurrence(WORLDGEN_EVENT) {
                warn!(error = %e, "occurrence dropped");
            }
        }
        if let Err(e) = hooks.on_tick_end() {
            warn!(error = %e, "tick end rejected");
        }
    }
}
