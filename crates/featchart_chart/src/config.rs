//! Configuration for the chart parser.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the chart is seeded and which prediction rule drives it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Strategy {
    /// Earley-style: predict from the start category downwards, scan tokens
    /// as the predictions reach them.
    #[default]
    TopDown,
    /// Start from the tokens and predict a production whenever a complete
    /// edge can be its first symbol.
    BottomUp,
    /// Bottom-up prediction that consumes the triggering edge immediately.
    LeftCorner,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopDown => write!(f, "top-down"),
            Self::BottomUp => write!(f, "bottom-up"),
            Self::LeftCorner => write!(f, "left-corner"),
        }
    }
}

/// Resource budgets for a single parse.
///
/// Exhausting a budget stops the parse with a partial chart; it is not an
/// error by itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseLimits {
    /// Maximum number of edges in the chart.
    pub max_edges: Option<usize>,
    /// Maximum wall-clock time spent filling the chart.
    pub time_budget: Option<Duration>,
}

impl ParseLimits {
    /// No limits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Builder method to cap the number of edges.
    #[must_use]
    pub fn with_max_edges(mut self, max: usize) -> Self {
        self.max_edges = Some(max);
        self
    }

    /// Builder method to cap wall-clock time.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Returns true if no limit is set.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.max_edges.is_none() && self.time_budget.is_none()
    }
}

/// Configuration for a [`ChartParser`](crate::ChartParser).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Chart strategy.
    pub strategy: Strategy,
    /// Resource budgets.
    pub limits: ParseLimits,
    /// Discard new predicted edges (dot at zero) subsumed by an existing
    /// prediction with the same span and production. Edges past the dot are
    /// always kept, since a more general edge does not carry their
    /// derivations.
    pub prune_subsumed: bool,
}

impl ParserConfig {
    /// Creates a top-down configuration with no limits.
    #[must_use]
    pub fn top_down() -> Self {
        Self::default()
    }

    /// Creates a bottom-up configuration with no limits.
    #[must_use]
    pub fn bottom_up() -> Self {
        Self::default().with_strategy(Strategy::BottomUp)
    }

    /// Creates a left-corner configuration with no limits.
    #[must_use]
    pub fn left_corner() -> Self {
        Self::default().with_strategy(Strategy::LeftCorner)
    }

    /// Builder method to set the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder method to set all limits at once.
    #[must_use]
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builder method to cap the number of edges.
    #[must_use]
    pub fn with_max_edges(mut self, max: usize) -> Self {
        self.limits.max_edges = Some(max);
        self
    }

    /// Builder method to cap wall-clock time.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.limits.time_budget = Some(budget);
        self
    }

    /// Builder method to enable or disable subsumption pruning.
    #[must_use]
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune_subsumed = prune;
        self
    }
}
