//! Expression evaluation.

use std::panic::{self, AssertUnwindSafe};

use autotag_compiler::{Expr, FnCall, Function, Operand, Param};
use autotag_core::{Clock, Download, ScriptHost, TagRef};
use tracing::{debug, warn};

use crate::operand::{compile_pattern, metric_value, resolve_numeric, resolve_text};

/// Expression evaluator.
///
/// The evaluator holds no per-download state. The download, its current
/// tags and the invoking tag are passed to each `evaluate` call, so one
/// evaluator can serve a whole reconciliation pass.
pub struct Evaluator<'a> {
    clock: &'a dyn Clock,
    scripts: Option<&'a dyn ScriptHost>,
}

/// What an expression is being evaluated against.
struct Subject<'s> {
    download: &'s dyn Download,
    tags: &'s [TagRef],
    tag: &'s TagRef,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator without a scripting collaborator.
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            scripts: None,
        }
    }

    /// Route `javascript(..)` calls to `scripts`.
    pub fn with_scripts(mut self, scripts: &'a dyn ScriptHost) -> Self {
        self.scripts = Some(scripts);
        self
    }

    /// Evaluate `expr` for `download`.
    ///
    /// `tags` are the tags currently applied to the download and `tag` is
    /// the tag owning the constraint.
    pub fn evaluate(
        &self,
        expr: &Expr,
        download: &dyn Download,
        tags: &[TagRef],
        tag: &TagRef,
    ) -> bool {
        let subject = Subject {
            download,
            tags,
            tag,
        };
        self.eval(expr, &subject)
    }

    fn eval(&self, expr: &Expr, subject: &Subject<'_>) -> bool {
        match expr {
            Expr::True => true,
            Expr::Not(inner) => !self.eval(inner, subject),
            Expr::And(exprs) => exprs.iter().all(|e| self.eval(e, subject)),
            Expr::Or(exprs) => exprs.iter().any(|e| self.eval(e, subject)),
            Expr::Xor(exprs) => exprs
                .iter()
                .fold(false, |parity, e| parity ^ self.eval(e, subject)),
            Expr::Call(call) => self.eval_call(call, subject),
        }
    }

    fn eval_call(&self, call: &FnCall, subject: &Subject<'_>) -> bool {
        let download = subject.download;

        match call.function {
            Function::HasTag => match first_operand(call) {
                Some(Operand::Text(name)) => subject.tags.iter().any(|t| &t.name == name),
                _ => false,
            },
            Function::HasNet => match first_operand(call) {
                Some(Operand::Network(net)) => download.networks().contains(net),
                _ => false,
            },
            Function::IsPrivate => download.is_private(),
            Function::IsForceStart => download.is_force_start(),
            Function::IsComplete => download.is_download_complete(),
            Function::CanArchive => download.can_archive(),
            Function::Compare(cmp) => match call.params.as_slice() {
                [left, right] => cmp.apply(
                    self.numeric(left, subject),
                    self.numeric(right, subject),
                ),
                _ => false,
            },
            Function::Contains => match call.params.as_slice() {
                [haystack, needle] => {
                    let haystack = self.text(haystack, subject);
                    haystack.contains(self.text(needle, subject).as_str())
                }
                _ => false,
            },
            Function::Matches => match call.params.as_slice() {
                [subject_text, pattern] => {
                    let text = self.text(subject_text, subject);
                    match pattern.resolve_with(|p| compile_pattern(p, subject.tag)) {
                        Operand::Pattern(Some(regex)) => regex.is_match(&text),
                        _ => false,
                    }
                }
                _ => false,
            },
            Function::Javascript => match first_operand(call) {
                Some(Operand::Text(script)) => self.eval_script(script, subject),
                _ => false,
            },
        }
    }

    fn numeric(&self, param: &Param, subject: &Subject<'_>) -> f64 {
        match param.resolve_with(|text| resolve_numeric(text, subject.tag)) {
            Operand::Number(n) => *n,
            Operand::Metric(metric) => metric_value(*metric, subject.download, self.clock),
            _ => 0.0,
        }
    }

    fn text(&self, param: &Param, subject: &Subject<'_>) -> String {
        match param.resolve_with(|text| resolve_text(text, subject.tag)) {
            Operand::Text(text) => text.clone(),
            Operand::DisplayName => subject.download.display_name(),
            _ => String::new(),
        }
    }

    /// Run a script through the host. Anything but `Ok(Bool)` is false.
    fn eval_script(&self, script: &str, subject: &Subject<'_>) -> bool {
        let Some(host) = self.scripts else {
            debug!(tag = %subject.tag.name, "No script host, javascript() is false");
            return false;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            host.evaluate(script, subject.download, subject.tag)
        }));

        match outcome {
            Ok(Ok(value)) => value.as_bool().unwrap_or_else(|| {
                debug!(tag = %subject.tag.name, kind = value.kind(), result = %value, "Script returned a non-boolean");
                false
            }),
            Ok(Err(e)) => {
                warn!(tag = %subject.tag.name, error = %e, "Script evaluation failed");
                false
            }
            Err(_) => {
                warn!(tag = %subject.tag.name, "Script host panicked");
                false
            }
        }
    }
}

fn first_operand(call: &FnCall) -> Option<&Operand> {
    call.params.first().and_then(Param::operand)
}
