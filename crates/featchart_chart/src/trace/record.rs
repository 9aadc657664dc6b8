//! Trace event and record types.
//!
//! This module defines the events that can be traced while a chart is filled.

use featchart_featstruct::UnifyFailure;
use featchart_foundation::ParseLimit;

use crate::config::Strategy;

// =============================================================================
// Rule
// =============================================================================

/// The chart rule that produced an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Top-down initialization with the start productions.
    Init,
    /// Leaf initialization with the input tokens.
    Leaf,
    /// Top-down prediction.
    Predictor,
    /// Token scanning.
    Scanner,
    /// The fundamental rule.
    Completer,
    /// Bottom-up prediction from a complete edge.
    BottomUp,
    /// Bottom-up prediction combined with the fundamental rule.
    LeftCorner,
    /// Empty-production prediction.
    Empty,
}

impl Rule {
    /// Returns the rule name used in traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Leaf => "Leaf",
            Self::Predictor => "Predictor",
            Self::Scanner => "Scanner",
            Self::Completer => "Completer",
            Self::BottomUp => "BU Predict",
            Self::LeftCorner => "LC Predict",
            Self::Empty => "Empty",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Trace Event
// =============================================================================

/// Events that can be traced while parsing.
#[derive(Clone, Debug)]
pub enum TraceEvent {
    /// A parse has started.
    ParseStart {
        /// Number of input tokens.
        tokens: usize,
        /// The strategy in use.
        strategy: Strategy,
    },

    /// An edge was added to the chart.
    EdgeAdded {
        /// The rule that produced the edge.
        rule: Rule,
        /// Index of the edge in the chart.
        edge: usize,
        /// Span start.
        start: usize,
        /// Span end.
        end: usize,
        /// Whether the edge is complete.
        complete: bool,
        /// Number of input tokens, for drawing the span.
        width: usize,
        /// The edge, rendered.
        text: String,
    },

    /// A rule discarded a candidate because two categories did not unify.
    UnifyFailed {
        /// The rule that attempted the unification.
        rule: Rule,
        /// The expected category, rendered.
        expected: String,
        /// The found category, rendered.
        found: String,
        /// Where and why unification failed.
        failure: UnifyFailure,
    },

    /// A new prediction was discarded because an existing one subsumes it.
    Pruned {
        /// Span start.
        start: usize,
        /// Span end.
        end: usize,
        /// The discarded edge, rendered.
        text: String,
    },

    /// A parse budget was exhausted.
    LimitReached {
        /// The limit that was hit.
        limit: ParseLimit,
        /// Edges in the chart at that point.
        edges: usize,
    },

    /// A parse has ended.
    ParseEnd {
        /// Edges in the chart.
        edges: usize,
        /// Complete edges spanning the input with the start category.
        parses: usize,
        /// Whether the chart reached its fixpoint.
        complete: bool,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ParseStart { .. } => "parse-start",
            Self::EdgeAdded { .. } => "edge-added",
            Self::UnifyFailed { .. } => "unify-failed",
            Self::Pruned { .. } => "pruned",
            Self::LimitReached { .. } => "limit-reached",
            Self::ParseEnd { .. } => "parse-end",
        }
    }

    /// Returns true if this is a parse boundary event.
    #[must_use]
    pub fn is_parse_boundary(&self) -> bool {
        matches!(self, Self::ParseStart { .. } | Self::ParseEnd { .. })
    }

    /// Returns true if this event reports a discarded candidate.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UnifyFailed { .. } | Self::Pruned { .. })
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A timestamped trace record.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    /// Unique record ID within the session.
    pub id: u64,
    /// Agenda step when this event occurred.
    pub step: u64,
    /// Timestamp in nanoseconds since the tracer was created.
    pub timestamp_ns: u64,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, step: u64, timestamp_ns: u64, event: TraceEvent) -> Self {
        Self {
            id,
            step,
            timestamp_ns,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

// =============================================================================
// Tests
// =============================================================================
