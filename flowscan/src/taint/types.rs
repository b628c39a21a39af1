//! Core types for property taint tracking.

use serde::{Deserialize, Serialize};

/// The taint tag attached to an abstract value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taint {
    /// Conservatively assumed to originate from a designated source.
    Tainted,
    /// No designated source reaches this value.
    Clean,
}

impl Taint {
    /// Whether the tag is `Tainted`.
    #[must_use]
    pub fn is_tainted(self) -> bool {
        matches!(self, Taint::Tainted)
    }

    /// Tainted if either side is tainted.
    #[must_use]
    pub fn or(self, other: Taint) -> Taint {
        if self.is_tainted() || other.is_tainted() {
            Taint::Tainted
        } else {
            Taint::Clean
        }
    }
}

impl std::fmt::Display for Taint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Taint::Tainted => write!(f, "tainted"),
            Taint::Clean => write!(f, "clean"),
        }
    }
}

/// Identity of one allocated instance: its allocation ordinal.
///
/// Two `new` expressions always produce distinct ids, so taint written
/// through one instance can never show through another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub usize);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A program point where a property value was read and its taint
/// queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSite {
    /// Index of the enclosing statement, in source order.
    pub stmt_index: usize,
    /// The `let` binding the read flows into, when the enclosing
    /// statement is a binding.
    pub binding: Option<String>,
    /// Source-like rendering of the read expression (`a1.x`,
    /// `a1.getX()`, `sink(..)`).
    pub expr: String,
}

/// The verdict for one sink site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkVerdict {
    /// Where the value was queried.
    pub site: SinkSite,
    /// The taint observed there.
    pub taint: Taint,
}

/// Source/sink designation patterns for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// A `let` with one of these names is seeded tainted at its
    /// declaration; a call to a function with one of these names yields
    /// a tainted value.
    pub sources: Vec<String>,
    /// A call to a function with one of these names reports the taint of
    /// its arguments at the call site.
    pub sinks: Vec<String>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            sources: crate::constants::DEFAULT_SOURCE_PATTERNS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            sinks: crate::constants::DEFAULT_SINK_PATTERNS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
        }
    }
}

impl TrackerOptions {
    /// Whether `name` is a designated source pattern.
    #[must_use]
    pub fn is_source(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s == name)
    }

    /// Whether `name` is a designated sink-call pattern.
    #[must_use]
    pub fn is_sink(&self, name: &str) -> bool {
        self.sinks.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taint_or_is_sticky() {
        assert_eq!(Taint::Tainted.or(Taint::Clean), Taint::Tainted);
        assert_eq!(Taint::Clean.or(Taint::Tainted), Taint::Tainted);
        assert_eq!(Taint::Clean.or(Taint::Clean), Taint::Clean);
    }

    #[test]
    fn test_default_options_use_fixture_conventions() {
        let options = TrackerOptions::default();
        assert!(options.is_source("source"));
        assert!(options.is_sink("sink"));
        assert!(!options.is_source("sink"));
    }
}
