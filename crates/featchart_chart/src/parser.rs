//! The chart parser.
//!
//! A parse seeds the chart according to the strategy and then drains an
//! agenda of new edges. Taking an edge off the agenda activates it and runs
//! every rule of the strategy on it; new edges go back on the agenda. The
//! parse reaches its fixpoint when the agenda is empty, or stops early when a
//! budget runs out.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use featchart_foundation::{Error, ParseLimit, Result};
use featchart_grammar::{Category, Grammar};

use crate::chart::{Chart, Derivation};
use crate::config::ParserConfig;
use crate::edge::{Edge, EdgeId};
use crate::token::Token;
use crate::trace::{Rule, TraceEvent, Tracer};
use crate::tree::{ParseTree, Trees};

// =============================================================================
// Outcome
// =============================================================================

/// How a parse ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseStatus {
    /// The chart reached its fixpoint.
    Complete,
    /// A budget ran out; the chart is partial.
    Aborted(ParseLimit),
}

/// The filled chart of one parse.
#[derive(Clone, Debug)]
pub struct ParseOutcome {
    chart: Chart,
    start: Category,
    status: ParseStatus,
}

impl ParseOutcome {
    /// Returns the chart.
    #[must_use]
    pub const fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Consumes the outcome and returns the chart.
    #[must_use]
    pub fn into_chart(self) -> Chart {
        self.chart
    }

    /// Returns how the parse ended.
    #[must_use]
    pub const fn status(&self) -> &ParseStatus {
        &self.status
    }

    /// Returns true if the chart reached its fixpoint.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.status, ParseStatus::Complete)
    }

    /// Returns the complete edges spanning the input with the start category.
    #[must_use]
    pub fn parse_edges(&self) -> Vec<EdgeId> {
        self.chart.parse_edges(&self.start)
    }

    /// Returns a lazy iterator over the parse trees.
    ///
    /// On an aborted parse this yields the trees found before the budget ran
    /// out.
    #[must_use]
    pub fn trees(&self) -> Trees<'_> {
        self.chart.trees(&self.start)
    }

    /// Collects every parse tree.
    #[must_use]
    pub fn parses(&self) -> Vec<ParseTree> {
        self.trees().collect()
    }
}

// =============================================================================
// Chart Parser
// =============================================================================

/// A chart parser for one grammar.
///
/// The parser holds no per-parse state; `parse` may be called from several
/// threads at once.
#[derive(Clone, Debug)]
pub struct ChartParser {
    grammar: Arc<Grammar>,
    config: ParserConfig,
}

impl ChartParser {
    /// Creates a parser with the default configuration.
    #[must_use]
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self::with_config(grammar, ParserConfig::default())
    }

    /// Creates a parser with the given configuration.
    #[must_use]
    pub fn with_config(grammar: Arc<Grammar>, config: ParserConfig) -> Self {
        Self { grammar, config }
    }

    /// Returns the grammar.
    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Fills a chart for `tokens`.
    #[must_use]
    pub fn parse(&self, tokens: &[Token]) -> ParseOutcome {
        self.parse_with_tracer(tokens, &mut Tracer::disabled())
    }

    /// Fills a chart for `tokens`, recording what happens in `tracer`.
    #[must_use]
    pub fn parse_with_tracer(&self, tokens: &[Token], tracer: &mut Tracer) -> ParseOutcome {
        let mut run = Run::new(&self.grammar, &self.config, tokens, tracer);
        run.run();
        let status = match run.aborted.take() {
            Some(limit) => ParseStatus::Aborted(limit),
            None => ParseStatus::Complete,
        };
        let start = self.grammar.start().clone();
        let parses = run.chart.parse_edges(&start).len();
        run.tracer
            .parse_end(run.chart.len(), parses, status == ParseStatus::Complete);
        ParseOutcome {
            chart: run.chart,
            start,
            status,
        }
    }

    /// Parses `tokens` and collects every tree.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LimitExceeded`](featchart_foundation::ErrorKind::LimitExceeded)
    /// if a budget ran out before the chart was complete.
    pub fn parse_trees(&self, tokens: &[Token]) -> Result<Vec<ParseTree>> {
        let outcome = self.parse(tokens);
        match outcome.status() {
            ParseStatus::Complete => Ok(outcome.parses()),
            ParseStatus::Aborted(limit) => Err(Error::limit_exceeded(limit.clone())),
        }
    }
}

// =============================================================================
// Run
// =============================================================================

/// State of one parse.
pub(crate) struct Run<'p> {
    pub(crate) grammar: &'p Grammar,
    pub(crate) config: &'p ParserConfig,
    pub(crate) chart: Chart,
    pub(crate) tracer: &'p mut Tracer,
    agenda: VecDeque<EdgeId>,
    /// (category, position) pairs already expanded by the predictor.
    pub(crate) predicted: HashSet<(Category, usize)>,
    pub(crate) aborted: Option<ParseLimit>,
    started: Instant,
    step: u64,
}

impl<'p> Run<'p> {
    fn new(
        grammar: &'p Grammar,
        config: &'p ParserConfig,
        tokens: &[Token],
        tracer: &'p mut Tracer,
    ) -> Self {
        Self {
            grammar,
            config,
            chart: Chart::new(tokens.to_vec()),
            tracer,
            agenda: VecDeque::new(),
            predicted: HashSet::new(),
            aborted: None,
            started: Instant::now(),
            step: 0,
        }
    }

    fn run(&mut self) {
        self.tracer
            .parse_start(self.chart.num_tokens(), self.config.strategy);
        self.seed();

        while self.aborted.is_none() {
            let Some(id) = self.agenda.pop_front() else {
                break;
            };
            if let Some(budget) = self.config.limits.time_budget {
                if self.started.elapsed() >= budget {
                    self.abort(ParseLimit::TimeBudget { limit: budget });
                    break;
                }
            }
            self.step += 1;
            self.tracer.set_step(self.step);
            self.chart.activate(id);
            self.process(id);
        }
    }

    pub(crate) fn abort(&mut self, limit: ParseLimit) {
        self.tracer.limit_reached(limit.clone(), self.chart.len());
        self.aborted = Some(limit);
    }

    /// Adds an edge produced by `rule`. Returns its id if the edge is new.
    pub(crate) fn add(
        &mut self,
        edge: Edge,
        rule: Rule,
        derivation: Option<Derivation>,
    ) -> Option<EdgeId> {
        if self.aborted.is_some() {
            return None;
        }
        if self.config.prune_subsumed && self.chart.find(&edge).is_none() && self.is_subsumed(&edge)
        {
            if self.tracer.is_enabled() {
                let (start, end) = edge.span();
                self.tracer.record(TraceEvent::Pruned {
                    start,
                    end,
                    text: edge.to_string(),
                });
            }
            return None;
        }

        let (id, new) = self.chart.insert(edge, derivation);
        if !new {
            return None;
        }
        if self.tracer.is_enabled() {
            let edge = self.chart.edge(id);
            self.tracer.record(TraceEvent::EdgeAdded {
                rule,
                edge: id.index(),
                start: edge.start(),
                end: edge.end(),
                complete: edge.is_complete(),
                width: self.chart.num_tokens(),
                text: edge.to_string(),
            });
        }
        self.agenda.push_back(id);

        if let Some(max) = self.config.limits.max_edges {
            if self.chart.len() > max {
                self.abort(ParseLimit::MaxEdges { limit: max });
            }
        }
        Some(id)
    }

    /// Returns true if `edge` is a fresh prediction (dot at zero, nothing
    /// derived yet) and an existing prediction covers every instance of it.
    fn is_subsumed(&self, edge: &Edge) -> bool {
        let Some(tree) = edge.as_tree().filter(|tree| tree.dot() == 0) else {
            return false;
        };
        self.chart
            .span(tree.start(), tree.end())
            .iter()
            .filter_map(|&id| self.chart.edge(id).as_tree())
            .any(|existing| existing.subsumes(tree))
    }
}
