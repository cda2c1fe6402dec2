//! GROQ support for the site's offline content store.
//!
//! Only the subset of the language the site's queries use is implemented:
//! filters, projections with spreads, ordering, indexing, dereferencing and
//! the `count`, `defined` and `coalesce` functions.

pub mod ast;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;

pub use ast::Expr;
pub use eval::{evaluate, EvalError};
pub use parser::{parse, ParseError};
