//! Top-level facade crate for tickwatch.
//!
//! Re-exports the instrumentation core and the exporter glue so hosts can
//! depend on a single crate.

pub mod core {
    pub use tickwatch_core::*;
}

pub mod exporter {
    pub use tickwatch_exporter::*;
}
