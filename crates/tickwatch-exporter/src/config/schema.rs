use std::net::SocketAddr;

use serde::Deserialize;
use tickwatch_core::error::{Result, TickwatchError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TickwatchError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.exporter.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// How often presence is re-sampled, in completed outer ticks.
    #[serde(default = "default_sample_cadence_ticks")]
    pub sample_cadence_ticks: u64,

    /// Append process memory/CPU stats to the scrape body.
    #[serde(default = "default_process_stats")]
    pub process_stats: bool,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            sample_cadence_ticks: default_sample_cadence_ticks(),
            process_stats: default_process_stats(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<SocketAddr>().is_err() {
            return Err(TickwatchError::Config(
                "exporter.listen must be a valid socket address".into(),
            ));
        }
        // Upper bound: one sample per hour at 20 TPS.
        if !(1..=72000).contains(&self.sample_cadence_ticks) {
            return Err(TickwatchError::Config(
                "exporter.sample_cadence_ticks must be between 1 and 72000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:9184".into()
}
fn default_sample_cadence_ticks() -> u64 {
    60
}
fn default_process_stats() -> bool {
    true
}
