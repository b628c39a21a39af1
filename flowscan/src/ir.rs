//! Statement IR consumed by the analyses.
//!
//! The upstream parser is an external collaborator: it hands over a
//! pre-parsed, straight-line representation of a module's statements as
//! JSON. Every shape the analyses distinguish is an explicit tagged
//! variant, so the recognizers stay total — anything the parser cannot
//! classify arrives as an `Other`/opaque shape instead of failing.

use serde::{Deserialize, Serialize};

/// A parsed module body: statements in source order.
///
/// The analyses walk this exactly once, front to back. There are no
/// backward jumps in the supported input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    /// Statements in source order.
    #[serde(default)]
    pub statements: Vec<Stmt>,
}

/// A top-level statement shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// A class declaration with its methods.
    Class(ClassDecl),
    /// A variable binding: `var name = value;`
    Let {
        /// Bound variable name.
        name: String,
        /// Initializer expression.
        value: Expr,
    },
    /// A direct property write: `object.property = value;`
    FieldWrite {
        /// Receiver expression (a variable in the supported fixtures).
        object: Expr,
        /// Property name being written.
        property: String,
        /// Value being stored.
        value: Expr,
    },
    /// A bare expression statement: `value;`
    Expr {
        /// The evaluated expression.
        value: Expr,
    },
}

/// A class declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Declared methods, in source order.
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

/// A method definition inside a class body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    /// Method name.
    pub name: String,
    /// Parameter names, in order.
    #[serde(default)]
    pub params: Vec<String>,
    /// Body statements. Accessor recognition only ever looks at bodies
    /// of exactly one statement; longer bodies are opaque.
    #[serde(default)]
    pub body: Vec<MethodStmt>,
}

/// A statement shape inside a method body.
///
/// Only the two shapes accessor recognition cares about are modeled;
/// everything else is `Other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodStmt {
    /// `this.<property> = <value>;`
    FieldWrite {
        /// Property written on the receiver.
        property: String,
        /// Right-hand side.
        value: MethodExpr,
    },
    /// `return <value>;`
    Return {
        /// Returned expression.
        value: MethodExpr,
    },
    /// Any statement the parser did not classify.
    Other,
}

/// An expression shape inside a method body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodExpr {
    /// A reference to one of the method's parameters.
    Param {
        /// Parameter name.
        name: String,
    },
    /// `this.<property>`
    FieldRead {
        /// Property read from the receiver.
        property: String,
    },
    /// Any expression the parser did not classify.
    Other,
}

/// A top-level expression shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// A literal value. Literals are never tainted by themselves.
    Literal {
        /// Source text of the literal, without quotes.
        #[serde(default)]
        text: String,
    },
    /// A read of a local variable.
    Var {
        /// Variable name.
        name: String,
    },
    /// An allocation: `new Class(args)`.
    New {
        /// Class name.
        class: String,
        /// Constructor arguments.
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// A property read: `object.property`.
    FieldRead {
        /// Receiver expression.
        object: Box<Expr>,
        /// Property name.
        property: String,
    },
    /// A method call: `object.method(args)`.
    MethodCall {
        /// Receiver expression.
        object: Box<Expr>,
        /// Method name.
        method: String,
        /// Call arguments.
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// A free-function call: `callee(args)`.
    Call {
        /// Called function name.
        callee: String,
        /// Call arguments.
        #[serde(default)]
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Renders the expression back into compact source-like text for
    /// reports. Lossy on purpose: arguments collapse to `..` beyond what
    /// a reader needs to locate the site.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Expr::Literal { text } => format!("\"{text}\""),
            Expr::Var { name } => name.clone(),
            Expr::New { class, args } => {
                if args.is_empty() {
                    format!("new {class}()")
                } else {
                    format!("new {class}(..)")
                }
            }
            Expr::FieldRead { object, property } => {
                format!("{}.{property}", object.render())
            }
            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                if args.is_empty() {
                    format!("{}.{method}()", object.render())
                } else {
                    format!("{}.{method}(..)", object.render())
                }
            }
            Expr::Call { callee, args } => {
                if args.is_empty() {
                    format!("{callee}()")
                } else {
                    format!("{callee}(..)")
                }
            }
        }
    }
}
