//! Expression tree for constraints.

use std::fmt;
use std::sync::OnceLock;

use autotag_core::Network;
use regex_lite::Regex;

/// A compiled constraint expression.
///
/// Each compilation produces fresh parameter slots, so resolved-literal
/// caches are never shared between two trees, even for identical source.
#[derive(Debug)]
pub enum Expr {
    True,
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    /// Parity of all operands. Always holds at least two.
    Xor(Vec<Expr>),
    Call(FnCall),
}

fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[Expr], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(op)?;
        }
        write!(f, "{}", e)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::True => write!(f, "true"),
            Expr::Not(inner) => write!(f, "!({})", inner),
            Expr::And(exprs) => write_joined(f, exprs, "&&"),
            Expr::Or(exprs) => write_joined(f, exprs, "||"),
            Expr::Xor(exprs) => write_joined(f, exprs, "^"),
            Expr::Call(call) => write!(f, "{}", call),
        }
    }
}

/// A call to one of the built-in functions.
#[derive(Debug)]
pub struct FnCall {
    pub function: Function,
    pub params: Vec<Param>,
    /// Argument text as written, used for display.
    pub args: String,
}

impl fmt::Display for FnCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function.name(), self.args)
    }
}

/// The fixed function registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    HasTag,
    HasNet,
    IsPrivate,
    IsForceStart,
    IsComplete,
    CanArchive,
    Compare(Comparison),
    Contains,
    Matches,
    Javascript,
}

impl Function {
    /// Look up a function by its exact (case-sensitive) name.
    pub fn lookup(name: &str) -> Option<Function> {
        Some(match name {
            "hasTag" => Function::HasTag,
            "hasNet" => Function::HasNet,
            "isPrivate" => Function::IsPrivate,
            "isForceStart" => Function::IsForceStart,
            "isComplete" => Function::IsComplete,
            "canArchive" => Function::CanArchive,
            "isGE" => Function::Compare(Comparison::Ge),
            "isGT" => Function::Compare(Comparison::Gt),
            "isLE" => Function::Compare(Comparison::Le),
            "isLT" => Function::Compare(Comparison::Lt),
            "isEQ" => Function::Compare(Comparison::Eq),
            "isNEQ" => Function::Compare(Comparison::Neq),
            "contains" => Function::Contains,
            "matches" => Function::Matches,
            "javascript" => Function::Javascript,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::HasTag => "hasTag",
            Function::HasNet => "hasNet",
            Function::IsPrivate => "isPrivate",
            Function::IsForceStart => "isForceStart",
            Function::IsComplete => "isComplete",
            Function::CanArchive => "canArchive",
            Function::Compare(Comparison::Ge) => "isGE",
            Function::Compare(Comparison::Gt) => "isGT",
            Function::Compare(Comparison::Le) => "isLE",
            Function::Compare(Comparison::Lt) => "isLT",
            Function::Compare(Comparison::Eq) => "isEQ",
            Function::Compare(Comparison::Neq) => "isNEQ",
            Function::Contains => "contains",
            Function::Matches => "matches",
            Function::Javascript => "javascript",
        }
    }
}

/// Numeric comparison performed by the `isXX` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Neq,
}

impl Comparison {
    pub fn apply(&self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Ge => left >= right,
            Comparison::Gt => left > right,
            Comparison::Le => left <= right,
            Comparison::Lt => left < right,
            Comparison::Eq => left == right,
            Comparison::Neq => left != right,
        }
    }
}

/// Live download metrics usable as numeric operands.
///
/// Their values change between evaluations and are read fresh every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ShareRatio,
    Age,
    Percent,
    DownloadingFor,
    SeedingFor,
    SwarmMergeBytes,
}

impl Metric {
    /// Look up a keyword, ignoring case.
    pub fn lookup(keyword: &str) -> Option<Metric> {
        Some(match keyword.to_ascii_lowercase().as_str() {
            "shareratio" | "share_ratio" => Metric::ShareRatio,
            "age" => Metric::Age,
            "percent" => Metric::Percent,
            "downloadingfor" | "downloading_for" => Metric::DownloadingFor,
            "seedingfor" | "seeding_for" => Metric::SeedingFor,
            "swarmmergebytes" | "swarm_merge_bytes" => Metric::SwarmMergeBytes,
            _ => return None,
        })
    }
}

/// What a parameter resolved to.
#[derive(Debug)]
pub enum Operand {
    Number(f64),
    /// A live metric. Only the choice of metric is cached, never its value.
    Metric(Metric),
    Text(String),
    /// The bare identifier `name`: the download's display name.
    DisplayName,
    /// A compiled `matches` pattern, or `None` when the pattern was invalid.
    Pattern(Option<Regex>),
    Network(Network),
}

/// One argument slot of a function call.
///
/// Holds the argument text and, once resolved, its operand. Resolution
/// happens at most once per slot; later evaluations reuse the cached
/// operand, including fallbacks recorded after an error.
#[derive(Debug)]
pub struct Param {
    text: String,
    slot: OnceLock<Operand>,
}

impl Param {
    /// An unresolved slot.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            slot: OnceLock::new(),
        }
    }

    /// A slot resolved at compile time.
    pub fn resolved(text: impl Into<String>, operand: Operand) -> Self {
        let slot = OnceLock::new();
        let _ = slot.set(operand);
        Self {
            text: text.into(),
            slot,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The cached operand, if this slot has been resolved.
    pub fn operand(&self) -> Option<&Operand> {
        self.slot.get()
    }

    /// Resolve this slot, running `resolve` only on first use.
    pub fn resolve_with(&self, resolve: impl FnOnce(&str) -> Operand) -> &Operand {
        self.slot.get_or_init(|| resolve(&self.text))
    }
}
