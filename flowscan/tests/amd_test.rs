//! Tests for module-definition resolution end to end.
#![allow(clippy::unwrap_used)]

use flowscan::resolve::{
    resolve_module_def, DependencyKind, ModuleDef, ModuleResolver, ProjectTree, Resolution,
};

/// The reference loader call: four dependencies, three factory params.
fn reference_module() -> ModuleDef {
    ModuleDef {
        dependencies: vec![
            "a.js".to_owned(),
            "foo".to_owned(),
            "nested/a".to_owned(),
            "lib/foo.js".to_owned(),
        ],
        params: vec!["a".to_owned(), "b".to_owned(), "exports".to_owned()],
    }
}

fn reference_resolver() -> ModuleResolver {
    ModuleResolver::new(ProjectTree::new([
        "lib/nested/a.js",
        "lib/foo.js",
        "src/a.js",
    ]))
}

#[test]
fn test_every_dependency_gets_a_report() {
    let reports = resolve_module_def(&reference_module(), &reference_resolver());
    assert_eq!(reports.len(), 4);
    let specs: Vec<&str> = reports.iter().map(|r| r.spec.as_str()).collect();
    assert_eq!(specs, ["a.js", "foo", "nested/a", "lib/foo.js"]);
}

#[test]
fn test_unresolved_specs_do_not_stop_the_rest() {
    let reports = resolve_module_def(&reference_module(), &reference_resolver());
    // The first two are unresolved; the last two still resolve.
    assert!(!reports[0].resolution.as_ref().unwrap().is_resolved());
    assert!(!reports[1].resolution.as_ref().unwrap().is_resolved());
    assert_eq!(
        reports[2].resolution,
        Some(Resolution::resolved("lib/nested/a.js"))
    );
    assert_eq!(
        reports[3].resolution,
        Some(Resolution::resolved("lib/foo.js"))
    );
}

#[test]
fn test_factory_params_bind_in_order() {
    let reports = resolve_module_def(&reference_module(), &reference_resolver());
    let bound: Vec<Option<&str>> = reports
        .iter()
        .map(|r| r.bound_param.as_deref())
        .collect();
    assert_eq!(bound, [Some("a"), Some("b"), Some("exports"), None]);
}

#[test]
fn test_pseudo_dependencies_are_never_resolved() {
    let def = ModuleDef {
        dependencies: vec![
            "require".to_owned(),
            "exports".to_owned(),
            "module".to_owned(),
            "lib/foo.js".to_owned(),
        ],
        params: vec![],
    };
    let reports = resolve_module_def(&def, &reference_resolver());
    for report in &reports[..3] {
        assert_eq!(report.kind, DependencyKind::Pseudo);
        assert!(report.resolution.is_none());
    }
    assert_eq!(reports[3].kind, DependencyKind::Path);
    assert!(reports[3].resolution.is_some());
}

#[test]
fn test_module_def_deserializes_from_parser_json() {
    let json = r#"{
      "dependencies": ["a.js", "foo", "nested/a", "lib/foo.js"],
      "params": ["a", "b", "exports"]
    }"#;
    let def: ModuleDef = serde_json::from_str(json).unwrap();
    assert_eq!(def.dependencies.len(), 4);
    assert_eq!(def.params.len(), 3);
}
