//! autotag Compiler
//!
//! Turn constraint source text into an executable expression tree.
//!
//! Responsibilities:
//! - Track quoted regions and resolve parenthesised groups
//! - Tell function argument lists from sub-expressions
//! - Parse `||`, `&&`, `^`, `!` and `true` by fixed precedence
//! - Validate function names, arity and string-literal arguments
//!
//! The grammar is deliberately textual. Whether `(` opens an argument list
//! or a sub-expression depends only on the character right before it, so
//! inputs such as `1.5(x)` read as a call to a function named `1.5`. That
//! is inherited grammar and stored constraints depend on it.

mod ast;
mod compiler;
mod error;
mod functions;
mod grammar;
mod scanner;

pub use ast::{Comparison, Expr, FnCall, Function, Metric, Operand, Param};
pub use compiler::{compile, MAX_NESTING};
pub use error::{CompileError, CompileResult};
