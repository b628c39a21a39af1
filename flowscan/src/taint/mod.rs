//! Property Taint Tracking Module
//!
//! Tracks whether values originating from designated sources reach
//! property-read sinks, through direct field writes/reads and through
//! accessor-style methods. State is instance-scoped: two instances of
//! the same class never share a taint slot.

/// Structural recognition of setter/getter method bodies.
pub mod accessors;
/// Abstract values, environment, arena, and expression propagation.
pub mod propagation;
/// The statement-walk tracker.
pub mod tracker;
/// Common types used throughout taint tracking.
pub mod types;

pub use accessors::{recognize, AccessorKind, ClassRegistry};
pub use tracker::TaintTracker;
pub use types::{InstanceId, SinkSite, SinkVerdict, Taint, TrackerOptions};
