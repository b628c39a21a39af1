//! Async module-definition call sites.
//!
//! A `ModuleDef` is the upstream parser's record of one loader call: the
//! ordered dependency list and the factory's parameter names. The i-th
//! dependency binds to the i-th parameter; the loader-provided
//! pseudo-dependencies (`require`, `exports`, `module`) are classified
//! but never resolved against the tree.

use super::resolver::{ModuleResolver, Resolution};
use crate::constants::PSEUDO_DEPENDENCIES;
use serde::{Deserialize, Serialize};

/// One async module-definition call site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Dependency specs, in the order they appear in the loader call.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Factory parameter names, in order.
    #[serde(default)]
    pub params: Vec<String>,
}

/// How a dependency spec is classified before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// A loader-provided identifier; injected, never resolved.
    Pseudo,
    /// An ordinary path-like spec, resolved against the tree.
    Path,
}

/// Classifies a dependency spec.
#[must_use]
pub fn classify(spec: &str) -> DependencyKind {
    if PSEUDO_DEPENDENCIES.contains(&spec) {
        DependencyKind::Pseudo
    } else {
        DependencyKind::Path
    }
}

/// The per-dependency report for one module definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    /// The spec as written in the loader call.
    pub spec: String,
    /// Pseudo or path classification.
    pub kind: DependencyKind,
    /// The factory parameter the dependency binds to, when one exists.
    pub bound_param: Option<String>,
    /// Resolution verdict. `None` for pseudo-dependencies.
    pub resolution: Option<Resolution>,
}

/// Resolves every dependency of a module definition.
///
/// Each spec is processed independently: an unresolvable spec yields a
/// tagged verdict and the remaining specs still get theirs.
#[must_use]
pub fn resolve_module_def(def: &ModuleDef, resolver: &ModuleResolver) -> Vec<DependencyReport> {
    def.dependencies
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let kind = classify(spec);
            let resolution = match kind {
                DependencyKind::Pseudo => None,
                DependencyKind::Path => Some(resolver.resolve(spec)),
            };
            DependencyReport {
                spec: spec.clone(),
                kind,
                bound_param: def.params.get(i).cloned(),
                resolution,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::tree::ProjectTree;

    #[test]
    fn test_classify_pseudo_dependencies() {
        assert_eq!(classify("require"), DependencyKind::Pseudo);
        assert_eq!(classify("exports"), DependencyKind::Pseudo);
        assert_eq!(classify("module"), DependencyKind::Pseudo);
        assert_eq!(classify("lib/foo.js"), DependencyKind::Path);
    }

    #[test]
    fn test_params_bind_positionally() {
        let def = ModuleDef {
            dependencies: vec![
                "lib/foo.js".to_owned(),
                "nested/a".to_owned(),
                "exports".to_owned(),
                "lib/bar.js".to_owned(),
            ],
            params: vec!["a".to_owned(), "b".to_owned(), "exports".to_owned()],
        };
        let tree = ProjectTree::new(["lib/foo.js", "lib/nested/a.js", "lib/bar.js"]);
        let resolver = ModuleResolver::new(tree);
        let reports = resolve_module_def(&def, &resolver);

        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].bound_param.as_deref(), Some("a"));
        assert_eq!(reports[1].bound_param.as_deref(), Some("b"));
        assert_eq!(reports[2].bound_param.as_deref(), Some("exports"));
        // Surplus dependency binds to nothing.
        assert_eq!(reports[3].bound_param, None);
    }

    #[test]
    fn test_pseudo_dependencies_skip_resolution() {
        let def = ModuleDef {
            dependencies: vec!["require".to_owned(), "lib/foo.js".to_owned()],
            params: vec![],
        };
        let resolver = ModuleResolver::new(ProjectTree::new(["lib/foo.js"]));
        let reports = resolve_module_def(&def, &resolver);

        assert_eq!(reports[0].kind, DependencyKind::Pseudo);
        assert!(reports[0].resolution.is_none());
        assert_eq!(
            reports[1].resolution,
            Some(Resolution::resolved("lib/foo.js"))
        );
    }
}
