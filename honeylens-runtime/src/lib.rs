//! honeylens runtime
//!
//! Hosts the evaluation engine for one attached document:
//! - [`Engine`]: triggers, cached result, explicit context
//! - [`Throttle`]: leading-edge rate limiting of interaction events
//! - [`SensitivityStore`]: where the user's threshold is read from
//! - [`NotificationSink`]: where badge updates go

pub mod engine;
pub mod sink;
pub mod store;
pub mod throttle;

pub use engine::*;
pub use sink::*;
pub use store::*;
pub use throttle::*;
