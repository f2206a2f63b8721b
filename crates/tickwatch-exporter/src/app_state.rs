//! Shared application state for the tickwatch exporter.
//!
//! Holds the config, the metric registry, and the instrumentation the host
//! drives. Cheap to clone; handed to axum via `with_state`.

use std::sync::Arc;

use tickwatch_core::error::Result;
use tickwatch_core::instrument::{EntitySource, TickInstrumentation};
use tickwatch_core::metrics::MetricRegistry;

use crate::config::ExporterConfig;
use crate::procstats::ProcStats;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    registry: Arc<MetricRegistry>,
    instrumentation: Arc<TickInstrumentation>,
    procstats: Option<ProcStats>,
}

impl AppState {
    /// Build application state: registry, instrumentation wired to the
    /// host's entity source, and optional process stats.
    pub fn new(cfg: ExporterConfig, source: Arc<dyn EntitySource>) -> Result<Self> {
        let registry = Arc::new(MetricRegistry::new());
        let instrumentation = Arc::new(TickInstrumentation::new(
            Arc::clone(&registry),
            source,
            cfg.exporter.sample_cadence_ticks,
        )?);
        let procstats = if cfg.exporter.process_stats {
            ProcStats::new()
        } else {
            None
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                instrumentation,
                procstats,
            }),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        Arc::clone(&self.inner.registry)
    }

    /// The callback surface the host drives on its tick path.
    pub fn hooks(&self) -> Arc<TickInstrumentation> {
        Arc::clone(&self.inner.instrumentation)
    }

    /// Full scrape body: registry render plus process stats when enabled.
    pub fn render_metrics(&self) -> String {
        let mut body = self.inner.registry.render();
        if let Some(ps) = &self.inner.procstats {
            ps.render(&mut body);
        }
        body
    }
}
