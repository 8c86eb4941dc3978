//! ofcurve-engine
//!
//! Model evaluation for the formula catalog: turns caller-supplied factor
//! values into an adjusted intercept, a probability curve over the primary
//! factor, and the highlighted prediction for the current entry.
//!
//! Every function here is pure and synchronous. Degraded conditions are
//! logged through `tracing` and never abort a calculation; only a missing
//! formula or an unusable primary factor is an error.

pub mod curve;
pub mod defaults;
pub mod error;
pub mod factor;
pub mod intercept;
pub mod prediction;
pub mod primary;
pub mod range;
pub mod scope;
