//! Fixture files and embedded expectations.
//!
//! A fixture is a JSON file carrying any of: a module definition, a
//! project-tree listing, a program, and the verdicts the author expects
//! (`resolved(lib/foo.js)`, `ambiguous`, `too-short`, `no-match`,
//! `pseudo` for dependencies; `tainted`/`clean` for sinks). The check
//! harness runs the analyses and compares.

use crate::ir::Program;
use crate::resolve::{
    classify, resolve_module_def, DependencyKind, DependencyReport, ModuleDef, ModuleResolver,
    ProjectTree, Resolution, ResolverOptions, UnresolvedReason,
};
use crate::taint::{TaintTracker, TrackerOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors loading or interpreting fixture files.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid fixture JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// An expectation tag is not one of the known forms.
    #[error("unknown expectation tag: {tag:?}")]
    Expectation {
        /// The offending tag.
        tag: String,
    },
}

/// One expected resolution verdict, keyed by dependency spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionExpectation {
    /// The dependency spec the expectation refers to.
    pub spec: String,
    /// Expected verdict tag.
    pub verdict: String,
}

/// One expected taint verdict, keyed by the `let` binding of the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintExpectation {
    /// The binding name the sink flows into.
    pub binding: String,
    /// Expected verdict tag (`tainted` or `clean`).
    pub verdict: String,
}

/// A fixture file: inputs plus the verdicts its author expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    /// Module-definition call site, when the fixture exercises
    /// resolution.
    #[serde(default)]
    pub module: Option<ModuleDef>,
    /// Project-tree listing the dependencies resolve against.
    #[serde(default)]
    pub tree: Option<Vec<String>>,
    /// Program, when the fixture exercises taint tracking.
    #[serde(default)]
    pub program: Option<Program>,
    /// Expected per-dependency verdicts.
    #[serde(default)]
    pub expect_resolutions: Vec<ResolutionExpectation>,
    /// Expected per-sink verdicts.
    #[serde(default)]
    pub expect_taint: Vec<TaintExpectation>,
}

/// Loads a fixture file.
pub fn load_fixture(path: &Path) -> Result<Fixture, FixtureError> {
    parse_json(path)
}

/// Loads a bare program file.
pub fn load_program(path: &Path) -> Result<Program, FixtureError> {
    parse_json(path)
}

/// Loads a bare module-definition file.
pub fn load_module_def(path: &Path) -> Result<ModuleDef, FixtureError> {
    parse_json(path)
}

/// Loads a project-tree listing (a JSON array of paths).
pub fn load_tree_listing(path: &Path) -> Result<Vec<String>, FixtureError> {
    parse_json(path)
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let text = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// The canonical forms an expected resolution verdict can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedResolution {
    /// `resolved(<path>)`
    Resolved(String),
    /// `ambiguous`
    Ambiguous,
    /// `too-short`
    TooShort,
    /// `no-match`
    NoMatch,
    /// `pseudo`
    Pseudo,
}

impl FromStr for ExpectedResolution {
    type Err = FixtureError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if let Some(caps) = crate::constants::get_resolved_expect_re().captures(tag) {
            return Ok(ExpectedResolution::Resolved(caps["path"].to_owned()));
        }
        match tag {
            "ambiguous" => Ok(ExpectedResolution::Ambiguous),
            "too-short" => Ok(ExpectedResolution::TooShort),
            "no-match" => Ok(ExpectedResolution::NoMatch),
            "pseudo" => Ok(ExpectedResolution::Pseudo),
            _ => Err(FixtureError::Expectation {
                tag: tag.to_owned(),
            }),
        }
    }
}

impl ExpectedResolution {
    /// The canonical form of a produced report, for comparison and
    /// display.
    #[must_use]
    pub fn of_report(report: &DependencyReport) -> Self {
        match &report.resolution {
            // Pseudo-dependencies carry no resolution.
            None => ExpectedResolution::Pseudo,
            Some(Resolution::Resolved { path }) => ExpectedResolution::Resolved(path.clone()),
            Some(Resolution::Unresolved { reason }) => match reason {
                UnresolvedReason::Ambiguous { .. } => ExpectedResolution::Ambiguous,
                UnresolvedReason::TooShort => ExpectedResolution::TooShort,
                UnresolvedReason::NoMatch => ExpectedResolution::NoMatch,
            },
        }
    }
}

impl std::fmt::Display for ExpectedResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedResolution::Resolved(path) => write!(f, "resolved({path})"),
            ExpectedResolution::Ambiguous => write!(f, "ambiguous"),
            ExpectedResolution::TooShort => write!(f, "too-short"),
            ExpectedResolution::NoMatch => write!(f, "no-match"),
            ExpectedResolution::Pseudo => write!(f, "pseudo"),
        }
    }
}

/// One expectation that did not hold.
#[derive(Debug, Clone, Serialize)]
pub struct CheckFailure {
    /// The spec or binding the expectation named.
    pub subject: String,
    /// The expected verdict tag.
    pub expected: String,
    /// The verdict actually produced.
    pub actual: String,
}

/// Outcome of checking one fixture.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixtureReport {
    /// Number of expectations checked.
    pub checked: usize,
    /// Expectations that did not hold.
    pub failures: Vec<CheckFailure>,
}

impl FixtureReport {
    /// Whether every expectation held.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs a fixture's analyses and compares against its expectations.
pub fn check_fixture(
    fixture: &Fixture,
    resolver_options: &ResolverOptions,
    tracker_options: &TrackerOptions,
) -> Result<FixtureReport, FixtureError> {
    let mut report = FixtureReport::default();

    if !fixture.expect_resolutions.is_empty() {
        let tree = ProjectTree::new(fixture.tree.clone().unwrap_or_default());
        let resolver = ModuleResolver::with_options(tree, resolver_options.clone());
        for expectation in &fixture.expect_resolutions {
            let expected: ExpectedResolution = expectation.verdict.parse()?;
            let actual = actual_resolution(&expectation.spec, &resolver);
            report.checked += 1;
            if actual != expected {
                report.failures.push(CheckFailure {
                    subject: expectation.spec.clone(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
    }

    if !fixture.expect_taint.is_empty() {
        let program = fixture.program.clone().unwrap_or_default();
        let tracker = TaintTracker::with_options(tracker_options.clone());
        let verdicts = tracker.analyze(&program);
        for expectation in &fixture.expect_taint {
            let expected_tainted = match expectation.verdict.trim() {
                "tainted" => true,
                "clean" => false,
                other => {
                    return Err(FixtureError::Expectation {
                        tag: other.to_owned(),
                    })
                }
            };
            report.checked += 1;
            let actual = verdicts
                .iter()
                .find(|v| v.site.binding.as_deref() == Some(expectation.binding.as_str()));
            match actual {
                Some(verdict) if verdict.taint.is_tainted() == expected_tainted => {}
                Some(verdict) => report.failures.push(CheckFailure {
                    subject: expectation.binding.clone(),
                    expected: expectation.verdict.clone(),
                    actual: verdict.taint.to_string(),
                }),
                None => report.failures.push(CheckFailure {
                    subject: expectation.binding.clone(),
                    expected: expectation.verdict.clone(),
                    actual: "no verdict".to_owned(),
                }),
            }
        }
    }

    Ok(report)
}

fn actual_resolution(spec: &str, resolver: &ModuleResolver) -> ExpectedResolution {
    let report = DependencyReport {
        spec: spec.to_owned(),
        kind: classify(spec),
        bound_param: None,
        resolution: match classify(spec) {
            DependencyKind::Pseudo => None,
            DependencyKind::Path => Some(resolver.resolve(spec)),
        },
    };
    ExpectedResolution::of_report(&report)
}

/// Resolves a whole fixture module against its own tree. Convenience
/// for callers that want reports rather than a pass/fail check.
#[must_use]
pub fn resolve_fixture_module(
    fixture: &Fixture,
    resolver_options: &ResolverOptions,
) -> Vec<DependencyReport> {
    let Some(module) = &fixture.module else {
        return Vec::new();
    };
    let tree = ProjectTree::new(fixture.tree.clone().unwrap_or_default());
    let resolver = ModuleResolver::with_options(tree, resolver_options.clone());
    resolve_module_def(module, &resolver)
}
