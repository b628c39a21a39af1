//! Taint propagation through expressions.
//!
//! Defines the abstract values the tracker computes, the variable
//! environment, the instance arena, and how taint flows through each
//! expression shape. Calls the recognizer did not classify as accessors
//! are opaque: they neither propagate nor taint.

use super::accessors::{AccessorKind, ClassRegistry};
use super::types::{InstanceId, Taint, TrackerOptions};
use crate::ir::Expr;
use rustc_hash::FxHashMap;

/// The abstract value of an expression: a taint tag, plus the instance
/// the value denotes when it is an allocated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbstractValue {
    /// Taint carried by the value itself.
    pub taint: Taint,
    /// The instance this value refers to, if any.
    pub instance: Option<InstanceId>,
}

impl AbstractValue {
    /// A clean, non-instance value.
    #[must_use]
    pub fn clean() -> Self {
        Self {
            taint: Taint::Clean,
            instance: None,
        }
    }

    /// A tainted, non-instance value.
    #[must_use]
    pub fn tainted() -> Self {
        Self {
            taint: Taint::Tainted,
            instance: None,
        }
    }

    /// A clean reference to an allocated instance.
    #[must_use]
    pub fn instance(id: InstanceId) -> Self {
        Self {
            taint: Taint::Clean,
            instance: Some(id),
        }
    }
}

/// Variable environment for the single forward pass.
#[derive(Debug, Default)]
pub struct Environment {
    vars: FxHashMap<String, AbstractValue>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable, replacing any earlier binding.
    pub fn bind(&mut self, name: &str, value: AbstractValue) {
        self.vars.insert(name.to_owned(), value);
    }

    /// Looks a variable up. Unknown variables read as clean opaque
    /// values; the analysis never fails on them.
    #[must_use]
    pub fn get(&self, name: &str) -> AbstractValue {
        self.vars.get(name).copied().unwrap_or_else(AbstractValue::clean)
    }
}

/// One allocated instance: its class and per-property taint slots.
#[derive(Debug)]
pub struct InstanceRecord {
    /// The class named at the allocation site.
    pub class: String,
    props: FxHashMap<String, Taint>,
}

/// Arena of instance records, indexed by allocation ordinal.
///
/// Variables hold `InstanceId`s into this arena, never pointers, so two
/// instances of the same class can never alias each other's slots.
#[derive(Debug, Default)]
pub struct InstanceArena {
    records: Vec<InstanceRecord>,
}

impl InstanceArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a record for a `new` expression. `known_props` are
    /// pre-seeded clean so every accessor-reachable slot exists from
    /// birth.
    pub fn alloc(&mut self, class: &str, known_props: &[String]) -> InstanceId {
        let props = known_props
            .iter()
            .map(|p| (p.clone(), Taint::Clean))
            .collect();
        self.records.push(InstanceRecord {
            class: class.to_owned(),
            props,
        });
        InstanceId(self.records.len() - 1)
    }

    /// The class of an instance, when the id is live.
    #[must_use]
    pub fn class_of(&self, id: InstanceId) -> Option<&str> {
        self.records.get(id.0).map(|r| r.class.as_str())
    }

    /// Writes a property slot.
    pub fn write_prop(&mut self, id: InstanceId, property: &str, taint: Taint) {
        if let Some(record) = self.records.get_mut(id.0) {
            record.props.insert(property.to_owned(), taint);
        }
    }

    /// Reads a property slot. Never-written slots read clean.
    #[must_use]
    pub fn read_prop(&self, id: InstanceId, property: &str) -> Taint {
        self.records
            .get(id.0)
            .and_then(|r| r.props.get(property).copied())
            .unwrap_or(Taint::Clean)
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no instance has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A property-value read observed during evaluation, before the tracker
/// attaches its statement context.
#[derive(Debug, Clone)]
pub struct ObservedSink {
    /// Rendered read expression.
    pub expr: String,
    /// Taint observed at the read.
    pub taint: Taint,
}

/// Shared context for one evaluation.
pub(crate) struct EvalCtx<'a> {
    /// Accessor registry built from the program's class declarations.
    pub registry: &'a ClassRegistry,
    /// Source/sink designation patterns.
    pub options: &'a TrackerOptions,
}

/// Evaluates an expression, recording every property-value read into
/// `sinks` in evaluation order.
pub(crate) fn eval_expr(
    expr: &Expr,
    env: &Environment,
    arena: &mut InstanceArena,
    ctx: &EvalCtx<'_>,
    sinks: &mut Vec<ObservedSink>,
) -> AbstractValue {
    match expr {
        Expr::Literal { .. } => AbstractValue::clean(),

        Expr::Var { name } => env.get(name),

        Expr::New { class, args } => {
            for arg in args {
                eval_expr(arg, env, arena, ctx, sinks);
            }
            let known = ctx.registry.accessor_properties(class);
            let id = arena.alloc(class, &known);
            AbstractValue::instance(id)
        }

        Expr::FieldRead { object, property } => {
            let receiver = eval_expr(object, env, arena, ctx, sinks);
            let taint = receiver
                .instance
                .map_or(Taint::Clean, |id| arena.read_prop(id, property));
            sinks.push(ObservedSink {
                expr: expr.render(),
                taint,
            });
            AbstractValue {
                taint,
                instance: None,
            }
        }

        Expr::MethodCall {
            object,
            method,
            args,
        } => {
            let receiver = eval_expr(object, env, arena, ctx, sinks);
            let arg_values: Vec<AbstractValue> = args
                .iter()
                .map(|a| eval_expr(a, env, arena, ctx, sinks))
                .collect();

            let Some(id) = receiver.instance else {
                // Call on a non-instance value: opaque.
                return AbstractValue::clean();
            };
            let kind = arena
                .class_of(id)
                .and_then(|class| ctx.registry.accessor(class, method));
            match kind {
                Some(AccessorKind::Setter(property)) => {
                    let incoming = arg_values
                        .first()
                        .map_or(Taint::Clean, |v| v.taint);
                    arena.write_prop(id, property, incoming);
                    AbstractValue::clean()
                }
                Some(AccessorKind::Getter(property)) => {
                    let taint = arena.read_prop(id, property);
                    sinks.push(ObservedSink {
                        expr: expr.render(),
                        taint,
                    });
                    AbstractValue {
                        taint,
                        instance: None,
                    }
                }
                // Unknown method or unrecognized body shape: opaque.
                Some(AccessorKind::NotAccessor) | None => AbstractValue::clean(),
            }
        }

        Expr::Call { callee, args } => {
            let arg_values: Vec<AbstractValue> = args
                .iter()
                .map(|a| eval_expr(a, env, arena, ctx, sinks))
                .collect();
            if ctx.options.is_source(callee) {
                return AbstractValue::tainted();
            }
            if ctx.options.is_sink(callee) {
                let taint = arg_values
                    .iter()
                    .fold(Taint::Clean, |acc, v| acc.or(v.taint));
                sinks.push(ObservedSink {
                    expr: expr.render(),
                    taint,
                });
            }
            AbstractValue::clean()
        }
    }
}
