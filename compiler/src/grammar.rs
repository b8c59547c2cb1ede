//! Operator grammar over scanned pieces.
//!
//! Precedence, lowest to highest:
//! - `||` (Or)
//! - `&&` (And)
//! - `^` (Xor, two or more operands)
//! - `!` (Not, prefix)
//! - `true`
//! - function call

use crate::compiler::check_nesting;
use crate::functions::bind_call;
use crate::scanner::Piece;
use crate::{CompileError, CompileResult, Expr};

/// Parse a scanned piece list at nesting `level` into an expression.
pub(crate) fn parse(mut pieces: Vec<Piece>, level: usize) -> CompileResult<Expr> {
    if pieces.len() == 1 && matches!(pieces[0], Piece::Group(_)) {
        if let Some(Piece::Group(expr)) = pieces.pop() {
            return Ok(expr);
        }
    }

    let pieces = match split_on(pieces, "||") {
        Ok(parts) => return Ok(Expr::Or(parse_operands(parts, "||", level)?)),
        Err(pieces) => pieces,
    };

    let pieces = match split_on(pieces, "&&") {
        Ok(parts) => return Ok(Expr::And(parse_operands(parts, "&&", level)?)),
        Err(pieces) => pieces,
    };

    let mut pieces = match split_on(pieces, "^") {
        Ok(parts) => {
            if parts.len() < 2 {
                return Err(CompileError::arity("^", parts.len()));
            }
            return Ok(Expr::Xor(parse_operands(parts, "^", level)?));
        }
        Err(pieces) => pieces,
    };

    if matches!(pieces.first(), Some(Piece::Char('!'))) {
        pieces.remove(0);
        if pieces.is_empty() {
            return Err(CompileError::syntax("Missing operand for '!'"));
        }
        check_nesting(level + 1)?;
        return Ok(Expr::Not(Box::new(parse(pieces, level + 1)?)));
    }

    if is_true(&pieces) {
        return Ok(Expr::True);
    }

    parse_call(pieces)
}

fn parse_operands(parts: Vec<Vec<Piece>>, op: &str, level: usize) -> CompileResult<Vec<Expr>> {
    if parts.is_empty() {
        return Err(CompileError::syntax(format!("No operands for '{}'", op)));
    }
    parts
        .into_iter()
        .map(|part| {
            if part.is_empty() {
                Err(CompileError::syntax(format!("Empty operand for '{}'", op)))
            } else {
                parse(part, level)
            }
        })
        .collect()
}

/// Split on every non-overlapping occurrence of `op`, left to right.
///
/// Returns the pieces untouched when `op` does not occur. Trailing empty
/// operands are dropped, so `a ||` splits into `[a]`.
fn split_on(pieces: Vec<Piece>, op: &str) -> Result<Vec<Vec<Piece>>, Vec<Piece>> {
    let op: Vec<char> = op.chars().collect();

    let mut cuts = Vec::new();
    let mut i = 0;
    while i + op.len() <= pieces.len() {
        let hit = op
            .iter()
            .enumerate()
            .all(|(k, c)| pieces[i + k].as_char() == Some(*c));
        if hit {
            cuts.push(i);
            i += op.len();
        } else {
            i += 1;
        }
    }

    if cuts.is_empty() {
        return Err(pieces);
    }

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut current = Vec::new();
    let mut cuts = cuts.into_iter().peekable();
    let mut skip = 0;

    for (idx, piece) in pieces.into_iter().enumerate() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        if cuts.peek() == Some(&idx) {
            cuts.next();
            parts.push(std::mem::take(&mut current));
            skip = op.len() - 1;
            continue;
        }
        current.push(piece);
    }
    parts.push(current);

    while parts.last().is_some_and(Vec::is_empty) {
        parts.pop();
    }

    Ok(parts)
}

fn is_true(pieces: &[Piece]) -> bool {
    let text: Option<String> = pieces.iter().map(Piece::as_char).collect();
    text.is_some_and(|t| t.eq_ignore_ascii_case("true"))
}

/// `name` followed by exactly one argument list.
fn parse_call(mut pieces: Vec<Piece>) -> CompileResult<Expr> {
    if pieces.is_empty() {
        return Err(CompileError::syntax("Empty expression"));
    }

    let args = match pieces.last() {
        Some(Piece::Args(_)) => match pieces.pop() {
            Some(Piece::Args(args)) => args,
            _ => unreachable!("last piece checked above"),
        },
        _ => return Err(unsupported(&pieces)),
    };

    let name: Option<String> = pieces.iter().map(Piece::as_char).collect();
    match name {
        Some(name) if !name.is_empty() => Ok(Expr::Call(bind_call(&name, &args)?)),
        _ => {
            pieces.push(Piece::Args(args));
            Err(unsupported(&pieces))
        }
    }
}

fn unsupported(pieces: &[Piece]) -> CompileError {
    let mut text = String::new();
    for piece in pieces {
        match piece {
            Piece::Char(c) | Piece::Quoted(c) => text.push(*c),
            Piece::Group(expr) => text.push_str(&expr.to_string()),
            Piece::Args(args) => {
                text.push('(');
                text.push_str(args);
                text.push(')');
            }
        }
    }
    CompileError::syntax(format!("Unsupported construct: {}", text))
}
