//! honeylens core - signal taxonomy and scoring for cognitive honeypot detection
//!
//! This crate provides the pure primitives of the detection engine:
//! - The fixed taxonomy of 16 named signals
//! - Versioned, swappable weight tables
//! - The weighted aggregator and the threshold classifier
//! - The message protocol spoken with the display surface

pub mod signals;
pub mod weights;
pub mod scoring;
pub mod protocol;

pub use signals::*;
pub use weights::*;
pub use scoring::*;
pub use protocol::*;

/// Classification threshold used when no sensitivity is stored
pub const DEFAULT_SENSITIVITY: f64 = 65.0;

/// Uniform per-signal cap assumed by the normalization denominator
pub const SIGNAL_CEILING: f64 = 4.0;

/// Default cool-down between interaction-triggered evaluations (milliseconds)
pub const DEFAULT_COOLDOWN_MS: u64 = 5000;
