//! Parse budgets.

use std::time::Duration;

use featchart_chart::{
    ChartParser, ParseLimits, ParseStatus, ParserConfig, Token, TraceEvent, Tracer, TracerConfig,
};
use featchart_foundation::{ErrorKind, ParseLimit};

use crate::grammars::{ATTACHMENT, grammar};

const SENTENCE: &str = "saw the man with the telescope in the park";

#[test]
fn edge_budget_aborts_with_a_partial_chart() {
    let parser =
        ChartParser::with_config(grammar(ATTACHMENT), ParserConfig::default().with_max_edges(5));
    let outcome = parser.parse(&Token::words(SENTENCE));

    assert_eq!(
        outcome.status(),
        &ParseStatus::Aborted(ParseLimit::MaxEdges { limit: 5 })
    );
    assert!(!outcome.is_complete());
    assert_eq!(outcome.chart().len(), 6);
    assert!(outcome.parses().is_empty());
}

#[test]
fn parse_trees_reports_the_exceeded_limit() {
    let parser =
        ChartParser::with_config(grammar(ATTACHMENT), ParserConfig::default().with_max_edges(5));
    let err = parser.parse_trees(&Token::words(SENTENCE)).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(ParseLimit::MaxEdges { limit: 5 })
    ));
}

#[test]
fn exhausted_time_budget_aborts() {
    let config = ParserConfig::default().with_limits(ParseLimits::unlimited().with_time_budget(Duration::ZERO));
    let parser = ChartParser::with_config(grammar(ATTACHMENT), config);
    let mut tracer = Tracer::new(TracerConfig::new().enabled());
    let outcome = parser.parse_with_tracer(&Token::words(SENTENCE), &mut tracer);

    assert_eq!(
        outcome.status(),
        &ParseStatus::Aborted(ParseLimit::TimeBudget { limit: Duration::ZERO })
    );
    let reached = tracer.buffer().by_event_type("limit-reached");
    assert_eq!(reached.len(), 1);
    assert!(matches!(
        reached[0].event,
        TraceEvent::LimitReached { limit: ParseLimit::TimeBudget { .. }, .. }
    ));
}

#[test]
fn generous_budgets_do_not_interfere() {
    let limits = ParseLimits::unlimited()
        .with_max_edges(10_000)
        .with_time_budget(Duration::from_secs(60));
    let parser = ChartParser::with_config(grammar(ATTACHMENT), ParserConfig::default().with_limits(limits));
    let outcome = parser.parse(&Token::words(SENTENCE));
    assert!(outcome.is_complete());
    assert_eq!(outcome.parses().len(), 4);
}
