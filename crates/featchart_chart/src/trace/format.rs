//! Trace output formatters.
//!
//! Edge events are drawn in the usual chart-trace layout: one column per
//! token boundary, the edge span drawn as a bracket, and the edge itself to
//! the right.
//!
//! ```text
//! Predictor |>   .   .   .   | NP -> * Det N
//! Completer |[-------]   .   | NP[num=sg] -> Det N *
//! ```

use std::fmt::Write;

use super::record::{TraceEvent, TraceRecord};

/// Renders trace records as text.
pub trait TraceFormatter {
    /// Renders one record as a single line.
    fn format(&self, record: &TraceRecord) -> String;

    /// Renders `records` one per line.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let lines: Vec<String> = records.iter().map(|r| self.format(r)).collect();
        lines.join("\n")
    }
}

// =============================================================================
// Chart Layout
// =============================================================================

/// The chart-trace layout shown above.
#[derive(Clone, Debug)]
pub struct HumanFormatter {
    /// Prefix lines with the time since the tracer was built.
    pub show_timestamps: bool,
    /// Prefix lines with the record id.
    pub show_ids: bool,
    /// Columns shared by the token cells of a span drawing.
    pub chart_width: usize,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self {
            show_timestamps: false,
            show_ids: false,
            chart_width: 50,
        }
    }
}

impl HumanFormatter {
    /// Edges drawn 50 columns wide, no prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds elapsed time to each line.
    #[must_use]
    pub fn with_timestamps(self) -> Self {
        Self {
            show_timestamps: true,
            ..self
        }
    }

    /// Adds the record id to each line.
    #[must_use]
    pub fn with_ids(self) -> Self {
        Self {
            show_ids: true,
            ..self
        }
    }

    /// Draws spans `width` columns wide.
    #[must_use]
    pub fn with_chart_width(self, width: usize) -> Self {
        Self {
            chart_width: width,
            ..self
        }
    }

    /// Draws the span of an edge over a chart of `tokens` tokens.
    #[must_use]
    pub fn span_bar(&self, start: usize, end: usize, complete: bool, tokens: usize) -> String {
        let cell = (self.chart_width / (tokens + 1)).max(1);
        let mut bar = String::from("|");
        for _ in 0..start {
            bar.push('.');
            bar.push_str(&" ".repeat(cell - 1));
        }
        if start == end {
            bar.push(if complete { '#' } else { '>' });
        } else {
            let fill = if complete && start == 0 && end == tokens {
                "="
            } else {
                "-"
            };
            bar.push('[');
            bar.push_str(&fill.repeat(cell * (end - start - 1) + cell - 1));
            bar.push(if complete { ']' } else { '>' });
        }
        for _ in end..tokens {
            bar.push_str(&" ".repeat(cell - 1));
            bar.push('.');
        }
        bar.push_str(&" ".repeat(cell - 1));
        bar.push('|');
        bar
    }

    #[allow(clippy::cast_precision_loss)]
    fn elapsed(ns: u64) -> String {
        let micros = ns / 1000;
        match micros {
            0..1000 => format!("{micros}us"),
            1000..1_000_000 => format!("{:.3}ms", micros as f64 / 1e3),
            _ => format!("{:.3}s", micros as f64 / 1e6),
        }
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut line = String::new();
        if self.show_ids {
            let _ = write!(line, "[{:06}] ", record.id);
        }
        if self.show_timestamps {
            let _ = write!(line, "{:>10} ", Self::elapsed(record.timestamp_ns));
        }

        let body = match &record.event {
            TraceEvent::ParseStart { tokens, strategy } => {
                format!("=== PARSE {tokens} tokens ({strategy}) ===")
            }
            TraceEvent::EdgeAdded {
                rule,
                start,
                end,
                complete,
                width,
                text,
                ..
            } => {
                let bar = self.span_bar(*start, *end, *complete, *width);
                format!("{:<9} {bar} {text}", rule.name())
            }
            TraceEvent::UnifyFailed {
                rule,
                expected,
                found,
                failure,
            } => {
                format!("{:<9} FAIL {expected} with {found}: {failure}", rule.name())
            }
            TraceEvent::Pruned { start, end, text } => {
                format!("Pruned    [{start}:{end}] {text}")
            }
            TraceEvent::LimitReached { limit, edges } => {
                format!("=== LIMIT {limit} at {edges} edges ===")
            }
            TraceEvent::ParseEnd {
                edges,
                parses,
                complete,
            } => {
                let status = if *complete { "COMPLETE" } else { "ABORTED" };
                format!("=== PARSE END ({status}): {edges} edges, {parses} parses ===")
            }
        };

        line.push_str(&body);
        line
    }
}
