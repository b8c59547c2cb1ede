//! autotag Evaluator
//!
//! Evaluate compiled constraints against a live download.
//!
//! Responsibilities:
//! - Walk an expression tree with short-circuit `&&` / `||` and parity `^`
//! - Resolve parameter slots on first use and memoize them in place
//! - Read live metrics fresh on every evaluation
//! - Contain scripting-collaborator failures
//!
//! Evaluation never fails. Bad operands degrade to `0`, `false` or the
//! empty string and are reported once through `tracing`.

mod evaluator;
mod operand;

pub use evaluator::Evaluator;
