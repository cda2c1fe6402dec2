use serde::{Deserialize, Serialize};

/// GROQ Abstract Syntax Tree types.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    // Literals
    StringLiteral(String),
    IntLiteral(i64),
    BoolLiteral(bool),
    Null,
    Array(Vec<Expr>),
    /// Object literal: `{"posts": *[...], "news": *[...]}`.
    Object(Vec<(String, Expr)>),

    // Identifiers & access
    Ident(String),
    DotAccess(Box<Expr>, String),
    Deref(Box<Expr>, String),
    /// The value in scope; a spread projects it.
    This,

    // Equality and membership
    Eq(Box<Expr>, Box<Expr>),
    Neq(Box<Expr>, Box<Expr>),
    In(Box<Expr>, Box<Expr>),

    // Logical operators
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),

    // Query constructs
    Everything,
    /// A base expression followed by stages applied left to right.
    Pipeline(Vec<Expr>),
    Filter(Box<Expr>),
    Projection(Vec<(String, Expr)>),
    /// Sort keys, each with `true` for ascending.
    Order(Vec<(Expr, bool)>),
    Index(i64),

    // Function call
    FuncCall(String, Vec<Expr>),

    // Parameter reference ($param)
    Param(String),
}

/// Projection key used for the `...` spread.
pub const SPREAD: &str = "...";
