// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the latest indicator readings into human-readable signals and a
// coarse trend label.

pub mod classifier;

pub use classifier::{classify, Classification, LatestReadings, Signal, SignalThresholds};
