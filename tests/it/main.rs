//! Single test binary entry point.
//!
//! All integration tests compile into one binary to keep link time down.
//!
//! Structure:
//! - unit: Single-component tests (geometry, model, config, stores, snapshots)
//! - integration: Multi-component flows (pointer gestures, export)

mod helpers;
mod integration;
mod unit;
