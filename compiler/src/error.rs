//! Compiler error types.

use thiserror::Error;

/// Errors that can occur while compiling a constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Unbalanced quotes or parentheses, or text that is not an expression.
    #[error("Syntax error: {message}")]
    Syntax { message: String },

    /// An operator was given too few operands.
    #[error("Two or more arguments required for {operator} (found {found})")]
    Arity { operator: &'static str, found: usize },

    /// The function name is not in the registry.
    #[error("Unsupported function '{name}'")]
    UnknownFunction { name: String },

    /// A known function was called with unacceptable parameters.
    #[error("Invalid parameters for function '{name}': {params} ({reason})")]
    BadFunction {
        name: String,
        params: String,
        reason: String,
    },
}

impl CompileError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    pub fn arity(operator: &'static str, found: usize) -> Self {
        Self::Arity { operator, found }
    }

    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    pub fn bad_function(
        name: impl Into<String>,
        params: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::BadFunction {
            name: name.into(),
            params: params.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Syntax { .. } => "syntax",
            CompileError::Arity { .. } => "arity",
            CompileError::UnknownFunction { .. } => "unknown_function",
            CompileError::BadFunction { .. } => "bad_function",
        }
    }
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
