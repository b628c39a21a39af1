//! The property taint tracker.
//!
//! Single forward pass over a straight-line program: class declarations
//! are registered first, then each statement updates the variable
//! environment and the instance arena, and every property-value read
//! yields a verdict. The pass never mutates its input and never fails;
//! re-running it on the same program produces identical verdicts.

use super::accessors::ClassRegistry;
use super::propagation::{eval_expr, Environment, EvalCtx, InstanceArena, ObservedSink};
use super::types::{SinkSite, SinkVerdict, Taint, TrackerOptions};
use crate::ir::{Program, Stmt};

/// Field-sensitive, instance-scoped taint tracking over a program.
#[derive(Debug, Default)]
pub struct TaintTracker {
    options: TrackerOptions,
}

impl TaintTracker {
    /// Creates a tracker with the default source/sink patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with explicit source/sink patterns.
    #[must_use]
    pub fn with_options(options: TrackerOptions) -> Self {
        Self { options }
    }

    /// Analyzes a program, producing one verdict per sink site in
    /// source order.
    #[must_use]
    pub fn analyze(&self, program: &Program) -> Vec<SinkVerdict> {
        let registry = ClassRegistry::from_program(program);
        let ctx = EvalCtx {
            registry: &registry,
            options: &self.options,
        };

        let mut env = Environment::new();
        let mut arena = InstanceArena::new();
        let mut verdicts = Vec::new();

        for (stmt_index, stmt) in program.statements.iter().enumerate() {
            let mut observed: Vec<ObservedSink> = Vec::new();
            let mut binding = None;

            match stmt {
                // Declarations were registered up front.
                Stmt::Class(_) => {}

                Stmt::Let { name, value } => {
                    let mut bound = eval_expr(value, &env, &mut arena, &ctx, &mut observed);
                    // A designated source variable is seeded tainted at
                    // its declaration, whatever its initializer.
                    if self.options.is_source(name) {
                        bound.taint = Taint::Tainted;
                    }
                    env.bind(name, bound);
                    binding = Some(name.clone());
                }

                Stmt::FieldWrite {
                    object,
                    property,
                    value,
                } => {
                    let receiver = eval_expr(object, &env, &mut arena, &ctx, &mut observed);
                    let incoming = eval_expr(value, &env, &mut arena, &ctx, &mut observed);
                    if let Some(id) = receiver.instance {
                        arena.write_prop(id, property, incoming.taint);
                    }
                }

                Stmt::Expr { value } => {
                    eval_expr(value, &env, &mut arena, &ctx, &mut observed);
                }
            }

            verdicts.extend(observed.into_iter().map(|sink| SinkVerdict {
                site: SinkSite {
                    stmt_index,
                    binding: binding.clone(),
                    expr: sink.expr,
                },
                taint: sink.taint,
            }));
        }

        verdicts
    }
}
