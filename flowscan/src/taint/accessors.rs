//! Structural accessor recognition.
//!
//! A method is a setter or getter by body shape alone, not by any
//! declared type: `this.<prop> = <param>` is a setter for `<prop>`,
//! `return this.<prop>` is a getter. The match is exact — one statement,
//! the right shape — and total: every other body is `NotAccessor` and
//! the call stays opaque.

use crate::ir::{ClassDecl, MethodDef, MethodExpr, MethodStmt, Program, Stmt};
use rustc_hash::FxHashMap;

/// What a class method was recognized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKind {
    /// Writes exactly one property of the receiver from a parameter.
    Setter(String),
    /// Returns exactly one property of the receiver.
    Getter(String),
    /// Anything else; calls are treated as opaque.
    NotAccessor,
}

/// Recognizes a method definition as a setter, a getter, or neither.
#[must_use]
pub fn recognize(method: &MethodDef) -> AccessorKind {
    // Exactly one statement of the right shape; anything longer (or
    // shorter) is opaque.
    let [stmt] = method.body.as_slice() else {
        return AccessorKind::NotAccessor;
    };
    match stmt {
        MethodStmt::FieldWrite {
            property,
            value: MethodExpr::Param { name },
        } if method.params.iter().any(|p| p == name) => AccessorKind::Setter(property.clone()),
        MethodStmt::Return {
            value: MethodExpr::FieldRead { property },
        } => AccessorKind::Getter(property.clone()),
        _ => AccessorKind::NotAccessor,
    }
}

/// Accessor registry for every class declared in a program.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// class name -> method name -> recognized kind
    classes: FxHashMap<String, FxHashMap<String, AccessorKind>>,
}

impl ClassRegistry {
    /// Builds the registry from all class declarations in a program.
    #[must_use]
    pub fn from_program(program: &Program) -> Self {
        let mut registry = Self::default();
        for stmt in &program.statements {
            if let Stmt::Class(decl) = stmt {
                registry.register(decl);
            }
        }
        registry
    }

    /// Registers one class declaration. A redeclaration replaces the
    /// earlier one, matching source order.
    pub fn register(&mut self, decl: &ClassDecl) {
        let methods = decl
            .methods
            .iter()
            .map(|m| (m.name.clone(), recognize(m)))
            .collect();
        self.classes.insert(decl.name.clone(), methods);
    }

    /// Whether `class` was declared.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Looks up the recognized kind of `class.method`. `None` when the
    /// class or method is unknown.
    #[must_use]
    pub fn accessor(&self, class: &str, method: &str) -> Option<&AccessorKind> {
        self.classes.get(class).and_then(|m| m.get(method))
    }

    /// Property names touched by any recognized accessor of `class`.
    /// Used to pre-seed instance records with clean slots.
    #[must_use]
    pub fn accessor_properties(&self, class: &str) -> Vec<String> {
        let mut props: Vec<String> = self
            .classes
            .get(class)
            .into_iter()
            .flat_map(|methods| methods.values())
            .filter_map(|kind| match kind {
                AccessorKind::Setter(p) | AccessorKind::Getter(p) => Some(p.clone()),
                AccessorKind::NotAccessor => None,
            })
            .collect();
        props.sort_unstable();
        props.dedup();
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setter_method() -> MethodDef {
        MethodDef {
            name: "setX".to_owned(),
            params: vec!["v".to_owned()],
            body: vec![MethodStmt::FieldWrite {
                property: "x".to_owned(),
                value: MethodExpr::Param {
                    name: "v".to_owned(),
                },
            }],
        }
    }

    fn getter_method() -> MethodDef {
        MethodDef {
            name: "getX".to_owned(),
            params: vec![],
            body: vec![MethodStmt::Return {
                value: MethodExpr::FieldRead {
                    property: "x".to_owned(),
                },
            }],
        }
    }

    #[test]
    fn test_recognize_setter() {
        assert_eq!(
            recognize(&setter_method()),
            AccessorKind::Setter("x".to_owned())
        );
    }

    #[test]
    fn test_recognize_getter() {
        assert_eq!(
            recognize(&getter_method()),
            AccessorKind::Getter("x".to_owned())
        );
    }

    #[test]
    fn test_setter_must_assign_a_declared_param() {
        let mut method = setter_method();
        method.params.clear();
        assert_eq!(recognize(&method), AccessorKind::NotAccessor);
    }

    #[test]
    fn test_multi_statement_body_is_opaque() {
        let mut method = setter_method();
        method.body.push(MethodStmt::Other);
        assert_eq!(recognize(&method), AccessorKind::NotAccessor);
    }

    #[test]
    fn test_empty_body_is_opaque() {
        let method = MethodDef {
            name: "noop".to_owned(),
            params: vec![],
            body: vec![],
        };
        assert_eq!(recognize(&method), AccessorKind::NotAccessor);
    }

    #[test]
    fn test_unclassified_shape_is_opaque() {
        let method = MethodDef {
            name: "work".to_owned(),
            params: vec![],
            body: vec![MethodStmt::Other],
        };
        assert_eq!(recognize(&method), AccessorKind::NotAccessor);
    }

    #[test]
    fn test_registry_collects_accessor_properties() {
        let decl = ClassDecl {
            name: "A".to_owned(),
            methods: vec![setter_method(), getter_method()],
        };
        let mut registry = ClassRegistry::default();
        registry.register(&decl);

        assert!(registry.has_class("A"));
        assert_eq!(
            registry.accessor("A", "setX"),
            Some(&AccessorKind::Setter("x".to_owned()))
        );
        assert_eq!(
            registry.accessor("A", "getX"),
            Some(&AccessorKind::Getter("x".to_owned()))
        );
        assert_eq!(registry.accessor("A", "missing"), None);
        assert_eq!(registry.accessor_properties("A"), ["x".to_owned()]);
    }
}
