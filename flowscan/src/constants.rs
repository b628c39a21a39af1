//! Shared constants, default patterns, and compiled regexes.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the configuration file looked up in the analysis root.
pub const CONFIG_FILENAME: &str = ".flowscan.toml";

/// Minimum length of a bare dependency spec (one with no separator)
/// before the resolver attempts suffix matching. Anything shorter is
/// reported as too short for positive identification.
pub const DEFAULT_MIN_SPEC_LEN: usize = 4;

/// Extension appended to extension-less specs when matching tree paths.
pub const DEFAULT_EXTENSION: &str = "js";

/// Loader-provided pseudo-dependencies. These never resolve to a file;
/// the loader injects them into the factory directly.
pub const PSEUDO_DEPENDENCIES: &[&str] = &["require", "exports", "module"];

/// Default source patterns: a `let` with this name is seeded tainted at
/// its declaration, and a call to a function with this name yields a
/// tainted value.
pub const DEFAULT_SOURCE_PATTERNS: &[&str] = &["source"];

/// Default sink-call patterns: a call to a function with this name
/// reports the taint of its argument.
pub const DEFAULT_SINK_PATTERNS: &[&str] = &["sink"];

/// Extension of fixture files discovered when scanning directories.
pub const FIXTURE_EXTENSION: &str = "json";

/// Folders skipped when walking a project tree or collecting fixtures.
#[allow(non_snake_case)]
pub fn DEFAULT_EXCLUDE_FOLDERS() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("node_modules");
        s.insert(".git");
        s.insert("dist");
        s.insert("build");
        s.insert("coverage");
        s.insert("vendor");
        s
    })
}

/// Regex for the `resolved(<path>)` expectation tag.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_resolved_expect_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^resolved\(\s*(?P<path>[^)]+?)\s*\)$")
            .expect("Invalid resolved-expectation regex pattern")
    })
}
