//! tickwatch core: tick instrumentation, presence tracking, and the metric
//! registry for a simulation server.
//!
//! This crate holds all metric state and invariants. It owns no threads and
//! no I/O: the host calls in through [`instrument::SimulationHooks`] on its
//! tick path, and the exposition layer reads the registry on scrape. It
//! intentionally carries no runtime dependencies so it can be embedded in
//! any host loop.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `TickwatchError`/`Result` so a broken
//! host-callback contract degrades into a logged error, never a crash in
//! the middle of a tick.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod events;
pub mod instrument;
pub mod metrics;
pub mod presence;

/// Shared result type.
pub use error::{Result, TickwatchError};
