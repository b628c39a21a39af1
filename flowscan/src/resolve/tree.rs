//! Project tree construction and path normalization.

use crate::constants::DEFAULT_EXCLUDE_FOLDERS;
use rustc_hash::FxHashSet;
use std::path::Path;

/// An ordered set of known file paths reachable from the analysis root.
///
/// Paths are stored normalized: forward slashes, no leading `./`,
/// duplicates removed with first occurrence winning. Resolution is a
/// pure function of a spec and this set.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    paths: Vec<String>,
}

impl ProjectTree {
    /// Builds a tree from an explicit path listing.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = FxHashSet::default();
        let mut normalized = Vec::new();
        for p in paths {
            let n = normalize_path(p.as_ref());
            if n.is_empty() {
                continue;
            }
            if seen.insert(n.clone()) {
                normalized.push(n);
            }
        }
        Self { paths: normalized }
    }

    /// Builds a tree by walking `root` on disk, gitignore-aware.
    ///
    /// `exclude` folder names are skipped at traversal time (on top of
    /// the defaults), so the walk never descends into `node_modules` and
    /// friends. Paths are stored relative to `root`.
    #[must_use]
    pub fn from_dir(root: &Path, exclude: &[String]) -> Self {
        use ignore::WalkBuilder;

        let default_excludes: Vec<String> = DEFAULT_EXCLUDE_FOLDERS()
            .iter()
            .map(|&s| s.to_owned())
            .collect();
        let all_excludes: Vec<String> =
            exclude.iter().cloned().chain(default_excludes).collect();

        let root_for_filter = root.to_path_buf();
        let walker = WalkBuilder::new(root)
            .hidden(false) // Don't skip hidden files (we handle that with defaults)
            .git_ignore(true) // Respect .gitignore files
            .git_global(true) // Respect global gitignore
            .git_exclude(true) // Respect .git/info/exclude
            .sort_by_file_path(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.path() == root_for_filter {
                    return true;
                }
                // Only filter directories - files are filtered later
                if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    return true;
                }
                if let Some(name) = entry.file_name().to_str() {
                    if all_excludes.iter().any(|ex| ex == name) {
                        return false;
                    }
                }
                true
            })
            .build();

        let mut paths = Vec::new();
        for entry in walker.flatten() {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            paths.push(rel.to_string_lossy().into_owned());
        }

        Self::new(paths)
    }

    /// The normalized paths, in order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether the tree contains `path` verbatim (after normalization).
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        let n = normalize_path(path);
        self.paths.iter().any(|p| *p == n)
    }

    /// Number of known paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Normalizes a path to the tree's canonical form: forward slashes,
/// no leading `./`, no trailing slash, empty components collapsed.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let components: Vec<&str> = replaced
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();
    components.join("/")
}
