//! Dependency spec resolution against a project tree.
//!
//! Resolution is heuristic: a spec as written in a loader call rarely
//! names a tree path verbatim, so candidates are matched by
//! path-component suffix, optionally with the default extension
//! appended. Every spec gets a verdict; there is no fatal path.

use super::tree::{normalize_path, ProjectTree};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Why a dependency spec could not be mapped to a unique file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum UnresolvedReason {
    /// The spec matches more than one known path.
    Ambiguous {
        /// The distinct matching paths, in tree order.
        candidates: Vec<String>,
    },
    /// The spec is too short for positive identification.
    TooShort,
    /// Nothing in the tree matches the spec.
    NoMatch,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::Ambiguous { candidates } => {
                write!(f, "ambiguous ({} candidates)", candidates.len())
            }
            UnresolvedReason::TooShort => {
                write!(f, "too short for positive identification")
            }
            UnresolvedReason::NoMatch => write!(f, "no match"),
        }
    }
}

/// The verdict for one dependency spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Resolution {
    /// The spec maps to exactly one known path.
    Resolved {
        /// The matched tree path.
        path: String,
    },
    /// The spec could not be mapped; the tag says why.
    Unresolved {
        /// Reason the spec stays unresolved.
        #[serde(flatten)]
        reason: UnresolvedReason,
    },
}

impl Resolution {
    /// Convenience constructor for a resolved verdict.
    #[must_use]
    pub fn resolved(path: impl Into<String>) -> Self {
        Resolution::Resolved { path: path.into() }
    }

    /// Convenience constructor for an unresolved verdict.
    #[must_use]
    pub fn unresolved(reason: UnresolvedReason) -> Self {
        Resolution::Unresolved { reason }
    }

    /// Whether this verdict is `Resolved`.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Tunable resolution thresholds.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Minimum length of a bare spec (no separator) before suffix
    /// matching is attempted.
    pub min_spec_len: usize,
    /// Extension (without the dot) appended to extension-less specs.
    pub default_extension: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            min_spec_len: crate::constants::DEFAULT_MIN_SPEC_LEN,
            default_extension: crate::constants::DEFAULT_EXTENSION.to_owned(),
        }
    }
}

/// Resolves dependency specs against a fixed project tree.
///
/// Verdicts are memoized per spec. The cache is interior mutability
/// only: it never changes a verdict, so resolution stays a pure function
/// of `(spec, tree)` and is independent of call order.
#[derive(Debug)]
pub struct ModuleResolver {
    tree: ProjectTree,
    options: ResolverOptions,
    /// Cache: normalized spec -> verdict. Negative results are cached
    /// too, the same as positive ones.
    cache: DashMap<String, Resolution>,
}

impl ModuleResolver {
    /// Creates a resolver with default thresholds.
    #[must_use]
    pub fn new(tree: ProjectTree) -> Self {
        Self::with_options(tree, ResolverOptions::default())
    }

    /// Creates a resolver with explicit thresholds.
    #[must_use]
    pub fn with_options(tree: ProjectTree, options: ResolverOptions) -> Self {
        Self {
            tree,
            options,
            cache: DashMap::new(),
        }
    }

    /// The tree this resolver matches against.
    #[must_use]
    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    /// Resolves one dependency spec to a verdict.
    #[must_use]
    pub fn resolve(&self, spec: &str) -> Resolution {
        let key = normalize_path(spec);
        if let Some(cached) = self.cache.get(&key) {
            return cached.value().clone();
        }
        let verdict = self.resolve_uncached(&key);
        self.cache.insert(key, verdict.clone());
        verdict
    }

    fn resolve_uncached(&self, spec: &str) -> Resolution {
        // Verbatim match wins outright.
        if self.tree.contains(spec) {
            return Resolution::resolved(spec);
        }

        // Bare names below the confidence threshold are never matched.
        if !spec.contains('/') && spec.chars().count() < self.options.min_spec_len {
            return Resolution::unresolved(UnresolvedReason::TooShort);
        }
        let has_ext = has_extension(spec);

        // Match the spec as a full path-component suffix, trying the
        // default extension when the spec has none. Component-boundary
        // matching keeps `a.js` from matching `data.js`.
        let mut wanted = vec![spec.to_owned()];
        if !has_ext {
            wanted.push(format!("{spec}.{}", self.options.default_extension));
        }

        let candidates: Vec<String> = self
            .tree
            .paths()
            .iter()
            .filter(|path| {
                wanted
                    .iter()
                    .any(|w| *path == w || path.ends_with(&format!("/{w}")))
            })
            .cloned()
            .collect();

        match candidates.len() {
            0 => Resolution::unresolved(UnresolvedReason::NoMatch),
            1 => Resolution::resolved(candidates.into_iter().next().unwrap_or_default()),
            _ => Resolution::unresolved(UnresolvedReason::Ambiguous { candidates }),
        }
    }
}

/// Whether the final path component carries an extension.
fn has_extension(spec: &str) -> bool {
    let last = spec.rsplit('/').next().unwrap_or(spec);
    // A leading dot (hidden-file style) is not an extension.
    last.char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < last.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_tree() -> ProjectTree {
        ProjectTree::new(["lib/nested/a.js", "lib/foo.js", "src/a.js"])
    }

    #[test]
    fn test_exact_path_resolves_to_itself() {
        let resolver = ModuleResolver::new(fixture_tree());
        assert_eq!(
            resolver.resolve("lib/foo.js"),
            Resolution::resolved("lib/foo.js")
        );
    }

    #[test]
    fn test_bare_short_name_is_too_short() {
        let resolver = ModuleResolver::new(fixture_tree());
        assert_eq!(
            resolver.resolve("foo"),
            Resolution::unresolved(UnresolvedReason::TooShort)
        );
    }

    #[test]
    fn test_multi_candidate_name_is_ambiguous() {
        let resolver = ModuleResolver::new(fixture_tree());
        match resolver.resolve("a.js") {
            Resolution::Unresolved {
                reason: UnresolvedReason::Ambiguous { candidates },
            } => {
                assert_eq!(candidates, ["lib/nested/a.js", "src/a.js"]);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_unique_suffix_resolves_with_default_extension() {
        let resolver = ModuleResolver::new(fixture_tree());
        assert_eq!(
            resolver.resolve("nested/a"),
            Resolution::resolved("lib/nested/a.js")
        );
    }

    #[test]
    fn test_unknown_name_is_no_match() {
        let resolver = ModuleResolver::new(fixture_tree());
        assert_eq!(
            resolver.resolve("widgets/button"),
            Resolution::unresolved(UnresolvedReason::NoMatch)
        );
    }

    #[test]
    fn test_component_boundary_prevents_substring_match() {
        let tree = ProjectTree::new(["lib/data.js"]);
        let resolver = ModuleResolver::new(tree);
        assert_eq!(
            resolver.resolve("a.js"),
            Resolution::unresolved(UnresolvedReason::NoMatch)
        );
    }

    #[test]
    fn test_cache_returns_identical_verdicts() {
        let resolver = ModuleResolver::new(fixture_tree());
        let first = resolver.resolve("nested/a");
        let second = resolver.resolve("nested/a");
        assert_eq!(first, second);
        assert!(resolver.cache.contains_key("nested/a"));
    }

    #[test]
    fn test_hidden_file_style_name_has_no_extension() {
        assert!(!has_extension(".babelrc"));
        assert!(has_extension("a.js"));
        assert!(!has_extension("foo"));
        assert!(has_extension("nested/a.js"));
    }
}
