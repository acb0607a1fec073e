//! CLI command implementations.

pub mod service_gc_safepoint;
