//! Parse traces.
//!
//! A [`Tracer`] watches one parse at a time. The parser reports each edge it
//! adds (with the rule responsible), each candidate discarded by a failed
//! unification or by subsumption, and any budget that ran out. Records land
//! in a bounded [`TraceBuffer`] and can also be echoed to stderr as they
//! arrive.
//!
//! # Example
//!
//! ```text
//! let mut tracer = Tracer::new(TracerConfig::new().enabled().to_stderr());
//! let outcome = parser.parse_with_tracer(&tokens, &mut tracer);
//! for record in tracer.buffer().by_event_type("unify-failed") { ... }
//! ```

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::{TraceBuffer, TraceBufferStats};
pub use format::{HumanFormatter, TraceFormatter};
pub use record::{Rule, TraceEvent, TraceRecord};

use std::io::{self, Write};
use std::time::Instant;

use featchart_foundation::ParseLimit;

use crate::config::Strategy;

// =============================================================================
// Configuration
// =============================================================================

/// Whether records are echoed as they arrive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// Keep records in the buffer only.
    #[default]
    None,
    /// Also print each record to stderr.
    Stderr,
}

/// Tracer settings.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Records are kept only when this is set.
    pub enabled: bool,
    /// Buffer capacity; older records are evicted past it.
    pub buffer_size: usize,
    /// Echo target.
    pub output: TraceOutput,
    /// Event types to keep, by [`TraceEvent::event_type`]. Empty keeps all.
    pub event_filter: Vec<String>,
    /// Columns used to draw an edge's span.
    pub chart_width: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: 10_000,
            output: TraceOutput::None,
            event_filter: Vec::new(),
            chart_width: 50,
        }
    }
}

impl TracerConfig {
    /// Same as [`TracerConfig::default`]: tracing off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns recording on.
    #[must_use]
    pub fn enabled(self) -> Self {
        Self {
            enabled: true,
            ..self
        }
    }

    /// Keeps at most `size` records.
    #[must_use]
    pub fn with_buffer_size(self, size: usize) -> Self {
        Self {
            buffer_size: size,
            ..self
        }
    }

    /// Echoes records to stderr.
    #[must_use]
    pub fn to_stderr(self) -> Self {
        Self {
            output: TraceOutput::Stderr,
            ..self
        }
    }

    /// Keeps only the named event types.
    #[must_use]
    pub fn filter_events(self, types: Vec<String>) -> Self {
        Self {
            event_filter: types,
            ..self
        }
    }

    /// Draws edge spans `width` columns wide.
    #[must_use]
    pub fn with_chart_width(self, width: usize) -> Self {
        Self {
            chart_width: width,
            ..self
        }
    }

    fn keeps(&self, event: &TraceEvent) -> bool {
        self.event_filter.is_empty()
            || self
                .event_filter
                .iter()
                .any(|name| name == event.event_type())
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Collects the events of a parse.
///
/// A disabled tracer drops events on the first branch of
/// [`record`](Self::record); the parser also checks
/// [`is_enabled`](Self::is_enabled) before rendering categories for an event.
pub struct Tracer {
    config: TracerConfig,
    records: TraceBuffer,
    formatter: HumanFormatter,
    /// Agenda pops since the parse started.
    step: u64,
    clock: Instant,
}

impl Tracer {
    /// Builds a tracer from `config`.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            records: TraceBuffer::new(config.buffer_size),
            formatter: HumanFormatter::new().with_chart_width(config.chart_width),
            config,
            step: 0,
            clock: Instant::now(),
        }
    }

    /// A tracer that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::default())
    }

    /// A recording tracer that also prints every event.
    #[must_use]
    pub fn to_stderr() -> Self {
        Self::new(TracerConfig::new().enabled().to_stderr())
    }

    /// Returns true if events are being recorded.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Sets the agenda step stamped on later records.
    pub fn set_step(&mut self, step: u64) {
        self.step = step;
    }

    /// Returns the agenda step stamped on new records.
    #[must_use]
    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// Records `event`, unless tracing is off or the filter drops it.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if self.config.enabled && self.config.keeps(&event) {
            self.store(event);
        }
    }

    fn store(&mut self, event: TraceEvent) {
        let elapsed = u64::try_from(self.clock.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.records.push(self.step, elapsed, event);
        if self.config.output == TraceOutput::Stderr {
            if let Some(latest) = self.records.recent(1).first() {
                let line = self.formatter.format(latest);
                let _ = writeln!(io::stderr(), "{line}");
            }
        }
    }

    /// Renders one record the way the stderr echo does.
    #[must_use]
    pub fn format_record(&self, record: &TraceRecord) -> String {
        self.formatter.format(record)
    }

    /// Renders every buffered record, oldest first, one per line.
    #[must_use]
    pub fn format_all(&self) -> String {
        let records: Vec<_> = self.records.iter().collect();
        self.formatter.format_many(&records)
    }

    /// The buffered records.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.records
    }

    /// Drops every buffered record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Counts of buffered and evicted records.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        self.records.stats()
    }

    // -------------------------------------------------------------------------
    // Parse lifecycle
    // -------------------------------------------------------------------------

    /// Marks the start of a parse over `tokens` tokens and resets the step.
    #[inline]
    pub fn parse_start(&mut self, tokens: usize, strategy: Strategy) {
        self.step = 0;
        self.record(TraceEvent::ParseStart { tokens, strategy });
    }

    /// Marks the end of a parse.
    #[inline]
    pub fn parse_end(&mut self, edges: usize, parses: usize, complete: bool) {
        self.record(TraceEvent::ParseEnd {
            edges,
            parses,
            complete,
        });
    }

    /// Notes that `limit` stopped the parse with `edges` edges in the chart.
    #[inline]
    pub fn limit_reached(&mut self, limit: ParseLimit, edges: usize) {
        self.record(TraceEvent::LimitReached { limit, edges });
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}
