//! Group scanner for constraint source text.
//!
//! Walks the source once, tracking quoted regions and parenthesis depth.
//! Every top-level `( .. )` group is replaced by a single piece: either the
//! verbatim argument text of a function call, or the compiled
//! sub-expression. What remains is a flat piece list for the grammar.

use crate::compiler::compile_expr;
use crate::{CompileError, CompileResult, Expr};

/// One element of a scanned expression.
#[derive(Debug)]
pub(crate) enum Piece {
    /// A significant character outside quotes.
    Char(char),
    /// A character inside a quoted region.
    Quoted(char),
    /// A parenthesised sub-expression, already compiled.
    Group(Expr),
    /// The argument text of a function call, without the parentheses.
    Args(String),
}

impl Piece {
    pub(crate) fn as_char(&self) -> Option<char> {
        match self {
            Piece::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// Scanner state.
pub(crate) struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    prev: Option<char>,
    in_quote: bool,
    depth: usize,
    /// Nesting level of the text being scanned.
    level: usize,
    group: String,
    pieces: Vec<Piece>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self::nested(input, 0)
    }

    pub(crate) fn nested(input: &'a str, level: usize) -> Self {
        Self {
            chars: input.chars().peekable(),
            prev: None,
            in_quote: false,
            depth: 0,
            level,
            group: String::new(),
            pieces: Vec::new(),
        }
    }

    /// Scan all input into pieces.
    pub(crate) fn scan(mut self) -> CompileResult<Vec<Piece>> {
        while let Some(c) = self.chars.next() {
            if c == '"' && self.prev != Some('\\') {
                self.in_quote = !self.in_quote;
            }
            self.prev = Some(c);

            if self.in_quote {
                if self.depth == 0 {
                    self.pieces.push(Piece::Quoted(c));
                } else {
                    self.group.push(c);
                }
                continue;
            }

            match c {
                '(' => {
                    self.depth += 1;
                    if self.depth > 1 {
                        self.group.push(c);
                    }
                }
                ')' => {
                    if self.depth == 0 {
                        return Err(CompileError::syntax("Unmatched ')'"));
                    }
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.close_group()?;
                    } else {
                        self.group.push(c);
                    }
                }
                _ if self.depth > 0 => self.group.push(c),
                _ if c.is_whitespace() => {}
                _ => self.pieces.push(Piece::Char(c)),
            }
        }

        if self.depth != 0 {
            return Err(CompileError::syntax("Unmatched '('"));
        }
        if self.in_quote {
            return Err(CompileError::syntax("Unmatched '\"'"));
        }

        Ok(self.pieces)
    }

    /// Replace a just-closed top-level group with a single piece.
    fn close_group(&mut self) -> CompileResult<()> {
        let text = std::mem::take(&mut self.group);
        let text = text.trim();

        // An alphanumeric character right before '(' makes this a call.
        let is_call = matches!(
            self.pieces.last().and_then(Piece::as_char),
            Some(c) if c.is_alphanumeric()
        );

        let piece = if is_call {
            Piece::Args(text.to_string())
        } else {
            Piece::Group(compile_expr(text, self.level + 1)?)
        };
        self.pieces.push(piece);
        Ok(())
    }
}

/// Split function argument text into parameter strings.
///
/// Commas inside quotes do not split. Whitespace outside quotes is dropped
/// when there is more than one parameter; a single parameter is kept as
/// written.
pub(crate) fn split_params(args: &str) -> Vec<String> {
    let args = args.trim();
    if args.is_empty() {
        return Vec::new();
    }
    if !args.contains(',') {
        return vec![args.to_string()];
    }

    let mut params = Vec::new();
    let mut current = String::with_capacity(args.len());
    let mut in_quote = false;
    let mut prev = None;

    for c in args.chars() {
        if c == '"' && prev != Some('\\') {
            in_quote = !in_quote;
        }
        prev = Some(c);

        if c == ',' && !in_quote {
            params.push(std::mem::take(&mut current));
        } else if in_quote || !c.is_whitespace() {
            current.push(c);
        }
    }
    params.push(current);

    params
}
