//! Compiler entry points.

use crate::grammar::parse;
use crate::scanner::Scanner;
use crate::{CompileError, CompileResult, Expr};

/// Compile constraint source text into an expression tree.
///
/// Surrounding whitespace is ignored and `true` matches in any case.
/// Compilation is pure: the same source always yields an equivalent tree,
/// and each call returns fresh parameter slots.
pub fn compile(source: &str) -> CompileResult<Expr> {
    let source = source.trim();
    if source.eq_ignore_ascii_case("true") {
        return Ok(Expr::True);
    }
    compile_expr(source, 0)
}

/// Deepest allowed nesting of groups and `!` prefixes.
pub const MAX_NESTING: usize = 64;

/// Compile one (possibly nested) expression at nesting `level`.
pub(crate) fn compile_expr(text: &str, level: usize) -> CompileResult<Expr> {
    check_nesting(level)?;
    let pieces = Scanner::nested(text, level).scan()?;
    parse(pieces, level)
}

pub(crate) fn check_nesting(level: usize) -> CompileResult<()> {
    if level > MAX_NESTING {
        return Err(CompileError::syntax("Expression nested too deeply"));
    }
    Ok(())
}
