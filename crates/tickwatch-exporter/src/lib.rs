//! tickwatch exporter library entry.
//!
//! This crate wires config, the HTTP exposition endpoint, process runtime
//! stats, and a synthetic demo driver around the instrumentation core. It is
//! consumed by the binary (`main.rs`) and by integration tests; an embedding
//! host builds an [`app_state::AppState`] and drives the core hook trait
//! from its own loop instead of the demo driver.

pub mod app_state;
pub mod config;
pub mod driver;
pub mod ops;
pub mod procstats;
pub mod router;
