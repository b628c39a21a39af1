//! Tests for the taint tracker over programs arriving as JSON, the way
//! the upstream parser hands them over.
#![allow(clippy::unwrap_used)]

use flowscan::ir::Program;
use flowscan::taint::{SinkVerdict, TaintTracker, TrackerOptions};

/// The accessor-flow fixture: class A with setX/getX, two instances,
/// one fed from the source, one from a harmless literal.
const SETTER_FIXTURE: &str = r#"{
  "statements": [
    {
      "kind": "class",
      "name": "A",
      "methods": [
        {
          "name": "setX",
          "params": ["v"],
          "body": [
            {"kind": "field_write", "property": "x", "value": {"kind": "param", "name": "v"}}
          ]
        },
        {
          "name": "getX",
          "params": [],
          "body": [
            {"kind": "return", "value": {"kind": "field_read", "property": "x"}}
          ]
        }
      ]
    },
    {"kind": "let", "name": "source", "value": {"kind": "literal", "text": "tainted"}},
    {"kind": "let", "name": "a1", "value": {"kind": "new", "class": "A"}},
    {"kind": "let", "name": "a2", "value": {"kind": "new", "class": "A"}},
    {"kind": "expr", "value": {"kind": "method_call", "object": {"kind": "var", "name": "a1"}, "method": "setX", "args": [{"kind": "var", "name": "source"}]}},
    {"kind": "let", "name": "sink1", "value": {"kind": "field_read", "object": {"kind": "var", "name": "a1"}, "property": "x"}},
    {"kind": "let", "name": "sink2", "value": {"kind": "method_call", "object": {"kind": "var", "name": "a1"}, "method": "getX"}},
    {"kind": "expr", "value": {"kind": "method_call", "object": {"kind": "var", "name": "a2"}, "method": "setX", "args": [{"kind": "literal", "text": "not tainted"}]}},
    {"kind": "let", "name": "sink3", "value": {"kind": "field_read", "object": {"kind": "var", "name": "a2"}, "property": "x"}},
    {"kind": "let", "name": "sink4", "value": {"kind": "method_call", "object": {"kind": "var", "name": "a2"}, "method": "getX"}}
  ]
}"#;

fn analyze(json: &str) -> Vec<SinkVerdict> {
    let program: Program = serde_json::from_str(json).unwrap();
    TaintTracker::new().analyze(&program)
}

fn taint_of<'a>(verdicts: &'a [SinkVerdict], binding: &str) -> &'a SinkVerdict {
    verdicts
        .iter()
        .find(|v| v.site.binding.as_deref() == Some(binding))
        .unwrap_or_else(|| panic!("no verdict for binding {binding}"))
}

// ============================================================================
// Instance separation
// ============================================================================

#[test]
fn test_tainted_instance_reports_tainted_at_both_sink_forms() {
    let verdicts = analyze(SETTER_FIXTURE);
    assert!(taint_of(&verdicts, "sink1").taint.is_tainted());
    assert!(taint_of(&verdicts, "sink2").taint.is_tainted());
}

#[test]
fn test_sibling_instance_stays_clean() {
    let verdicts = analyze(SETTER_FIXTURE);
    assert!(!taint_of(&verdicts, "sink3").taint.is_tainted());
    assert!(!taint_of(&verdicts, "sink4").taint.is_tainted());
}

#[test]
fn test_direct_read_and_getter_agree_per_instance() {
    let verdicts = analyze(SETTER_FIXTURE);
    assert_eq!(
        taint_of(&verdicts, "sink1").taint,
        taint_of(&verdicts, "sink2").taint
    );
    assert_eq!(
        taint_of(&verdicts, "sink3").taint,
        taint_of(&verdicts, "sink4").taint
    );
}

#[test]
fn test_exactly_four_sink_sites_are_reported() {
    let verdicts = analyze(SETTER_FIXTURE);
    assert_eq!(verdicts.len(), 4);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_reanalysis_produces_identical_verdicts() {
    let program: Program = serde_json::from_str(SETTER_FIXTURE).unwrap();
    let tracker = TaintTracker::new();
    let first = tracker.analyze(&program);
    let second = tracker.analyze(&program);
    assert_eq!(first, second);
}

#[test]
fn test_fresh_tracker_produces_identical_verdicts() {
    let program: Program = serde_json::from_str(SETTER_FIXTURE).unwrap();
    let first = TaintTracker::new().analyze(&program);
    let second = TaintTracker::new().analyze(&program);
    assert_eq!(first, second);
}

// ============================================================================
// Accessor recognition fallbacks
// ============================================================================

#[test]
fn test_malformed_accessor_body_is_treated_as_opaque_call() {
    let json = r#"{
      "statements": [
        {
          "kind": "class",
          "name": "B",
          "methods": [
            {
              "name": "setX",
              "params": ["v"],
              "body": [
                {"kind": "field_write", "property": "x", "value": {"kind": "param", "name": "v"}},
                {"kind": "other"}
              ]
            },
            {
              "name": "getX",
              "params": [],
              "body": [{"kind": "return", "value": {"kind": "field_read", "property": "x"}}]
            }
          ]
        },
        {"kind": "let", "name": "source", "value": {"kind": "literal", "text": "tainted"}},
        {"kind": "let", "name": "b", "value": {"kind": "new", "class": "B"}},
        {"kind": "expr", "value": {"kind": "method_call", "object": {"kind": "var", "name": "b"}, "method": "setX", "args": [{"kind": "var", "name": "source"}]}},
        {"kind": "let", "name": "out", "value": {"kind": "method_call", "object": {"kind": "var", "name": "b"}, "method": "getX"}}
      ]
    }"#;
    let verdicts = analyze(json);
    // The two-statement setX is not an accessor, so nothing propagated.
    assert!(!taint_of(&verdicts, "out").taint.is_tainted());
}

#[test]
fn test_direct_field_write_works_without_any_accessors() {
    let json = r#"{
      "statements": [
        {"kind": "class", "name": "C", "methods": []},
        {"kind": "let", "name": "source", "value": {"kind": "literal", "text": "tainted"}},
        {"kind": "let", "name": "c", "value": {"kind": "new", "class": "C"}},
        {"kind": "field_write", "object": {"kind": "var", "name": "c"}, "property": "x", "value": {"kind": "var", "name": "source"}},
        {"kind": "let", "name": "out", "value": {"kind": "field_read", "object": {"kind": "var", "name": "c"}, "property": "x"}}
      ]
    }"#;
    let verdicts = analyze(json);
    assert!(taint_of(&verdicts, "out").taint.is_tainted());
}

#[test]
fn test_method_call_on_unknown_variable_is_opaque() {
    let json = r#"{
      "statements": [
        {"kind": "let", "name": "out", "value": {"kind": "method_call", "object": {"kind": "var", "name": "ghost"}, "method": "getX"}}
      ]
    }"#;
    // No class, no instance: the call is opaque and nothing is reported
    // as a property read.
    let verdicts = analyze(json);
    assert!(verdicts.is_empty());
}

// ============================================================================
// Source designation
// ============================================================================

#[test]
fn test_source_call_pattern_taints_binding() {
    let json = r#"{
      "statements": [
        {"kind": "let", "name": "payload", "value": {"kind": "call", "callee": "source"}},
        {"kind": "expr", "value": {"kind": "call", "callee": "sink", "args": [{"kind": "var", "name": "payload"}]}}
      ]
    }"#;
    let verdicts = analyze(json);
    assert_eq!(verdicts.len(), 1);
    assert!(verdicts[0].taint.is_tainted());
}

#[test]
fn test_custom_patterns_override_defaults() {
    let json = r#"{
      "statements": [
        {"kind": "let", "name": "input", "value": {"kind": "call", "callee": "readLine"}},
        {"kind": "expr", "value": {"kind": "call", "callee": "render", "args": [{"kind": "var", "name": "input"}]}}
      ]
    }"#;
    let program: Program = serde_json::from_str(json).unwrap();
    let tracker = TaintTracker::with_options(TrackerOptions {
        sources: vec!["readLine".to_owned()],
        sinks: vec!["render".to_owned()],
    });
    let verdicts = tracker.analyze(&program);
    assert_eq!(verdicts.len(), 1);
    assert!(verdicts[0].taint.is_tainted());
    assert_eq!(verdicts[0].site.expr, "render(..)");
}
