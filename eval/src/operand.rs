//! Operand resolution and live metric reads.

use autotag_compiler::{Metric, Operand};
use autotag_core::{Clock, Download, TagRef};
use regex_lite::RegexBuilder;
use tracing::warn;

/// Resolve numeric argument text.
///
/// A leading digit makes a literal; anything else is a metric keyword.
/// Bad literals and unknown keywords fall back to `0`.
pub(crate) fn resolve_numeric(text: &str, tag: &TagRef) -> Operand {
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        let parsed = if text.contains('.') {
            text.parse::<f64>().ok()
        } else {
            text.parse::<i64>().ok().map(|n| n as f64)
        };
        return match parsed {
            Some(n) => Operand::Number(n),
            None => {
                warn!(tag = %tag.name, param = text, "Invalid constraint numeric, using 0");
                Operand::Number(0.0)
            }
        };
    }

    match Metric::lookup(text) {
        Some(metric) => Operand::Metric(metric),
        None => {
            warn!(tag = %tag.name, param = text, "Invalid constraint keyword, using 0");
            Operand::Number(0.0)
        }
    }
}

/// Resolve string argument text: a quoted literal or the identifier `name`.
pub(crate) fn resolve_text(text: &str, tag: &TagRef) -> Operand {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        Operand::Text(text[1..text.len() - 1].to_string())
    } else if text == "name" {
        Operand::DisplayName
    } else {
        warn!(tag = %tag.name, param = text, "Invalid constraint string, using \"\"");
        Operand::Text(String::new())
    }
}

/// Compile a `matches` pattern, case-insensitively.
pub(crate) fn compile_pattern(text: &str, tag: &TagRef) -> Operand {
    match RegexBuilder::new(text).case_insensitive(true).build() {
        Ok(regex) => Operand::Pattern(Some(regex)),
        Err(e) => {
            warn!(tag = %tag.name, pattern = text, error = %e, "Invalid constraint pattern");
            Operand::Pattern(None)
        }
    }
}

/// Current value of a live metric.
pub(crate) fn metric_value(metric: Metric, download: &dyn Download, clock: &dyn Clock) -> f64 {
    match metric {
        Metric::ShareRatio => download.share_ratio().as_f64(),
        Metric::Percent => f64::from(download.percent_complete()) / 10.0,
        Metric::Age => match download.added_time_millis() {
            Some(added) if added > 0 => ((clock.now_millis() - added) / 1000) as f64,
            _ => 0.0,
        },
        Metric::DownloadingFor => download.seconds_downloading() as f64,
        Metric::SeedingFor => download.seconds_seeding() as f64,
        Metric::SwarmMergeBytes => download.merged_data_bytes() as f64,
    }
}
