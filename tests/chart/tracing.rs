//! Parse traces.

use featchart_chart::{Rule, Strategy, Token, TraceEvent, Tracer, TracerConfig};

use crate::grammars::{AGREEMENT, DISAGREEMENT, parser};

#[test]
fn every_new_edge_is_traced() {
    let tokens = Token::words("Kim sees children");
    let mut tracer = Tracer::new(TracerConfig::new().enabled());
    let outcome = parser(AGREEMENT, Strategy::TopDown).parse_with_tracer(&tokens, &mut tracer);

    let buffer = tracer.buffer();
    assert_eq!(buffer.by_event_type("edge-added").len(), outcome.chart().len());
    assert_eq!(buffer.by_event_type("parse-start").len(), 1);

    let records: Vec<_> = buffer.iter().collect();
    assert!(matches!(
        records[0].event,
        TraceEvent::ParseStart { tokens: 3, strategy: Strategy::TopDown }
    ));
    match &records[records.len() - 1].event {
        TraceEvent::ParseEnd { edges, parses, complete } => {
            assert_eq!(*edges, outcome.chart().len());
            assert_eq!(*parses, 1);
            assert!(*complete);
        }
        other => panic!("unexpected last event {other:?}"),
    }
    assert!(records.windows(2).all(|pair| pair[0].step <= pair[1].step));
}

#[test]
fn edges_are_traced_with_their_rule() {
    let tokens = Token::words("Kim sees children");
    let mut tracer = Tracer::new(TracerConfig::new().enabled());
    let _ = parser(AGREEMENT, Strategy::TopDown).parse_with_tracer(&tokens, &mut tracer);

    let rules: Vec<Rule> = tracer
        .buffer()
        .iter()
        .filter_map(|record| match record.event {
            TraceEvent::EdgeAdded { rule, .. } => Some(rule),
            _ => None,
        })
        .collect();
    assert_eq!(rules[0], Rule::Init);
    for rule in [Rule::Predictor, Rule::Scanner, Rule::Completer] {
        assert!(rules.contains(&rule), "{rule}");
    }
    assert!(!rules.contains(&Rule::BottomUp));

    let text = tracer.format_all();
    assert!(text.starts_with("=== PARSE 3 tokens (top-down) ==="));
    let root = text
        .lines()
        .find(|line| line.ends_with("S -> NP[num=sg] VP[num=sg] *"))
        .unwrap();
    assert!(root.starts_with("Completer |[="));
}

#[test]
fn failed_parse_explains_the_last_attempts() {
    let tokens = Token::words("Kim sees");
    let config = TracerConfig::new()
        .enabled()
        .filter_events(vec!["unify-failed".to_string(), "parse-end".to_string()]);
    let mut tracer = Tracer::new(config);
    let outcome = parser(DISAGREEMENT, Strategy::TopDown).parse_with_tracer(&tokens, &mut tracer);
    assert!(outcome.parses().is_empty());

    let text = tracer.format_all();
    let end = format!(
        "=== PARSE END (COMPLETE): {} edges, 0 parses ===",
        outcome.chart().len()
    );
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        [
            "Predictor FAIL VP[num=pl] with VP[num=sg]: cannot unify at num: pl vs sg",
            end.as_str(),
        ]
    );
}

#[test]
fn disabled_tracer_records_nothing() {
    let mut tracer = Tracer::disabled();
    let tokens = Token::words("Kim sees children");
    let outcome = parser(AGREEMENT, Strategy::BottomUp).parse_with_tracer(&tokens, &mut tracer);
    assert_eq!(outcome.parses().len(), 1);
    assert!(tracer.buffer().is_empty());
}

#[test]
fn ring_buffer_keeps_the_latest_records() {
    let mut tracer = Tracer::new(TracerConfig::new().enabled().with_buffer_size(4));
    let tokens = Token::words("Kim sees children");
    let _ = parser(AGREEMENT, Strategy::LeftCorner).parse_with_tracer(&tokens, &mut tracer);
    let stats = tracer.stats();
    assert_eq!(stats.record_count, 4);
    assert!(stats.evicted > 0);
    assert_eq!(tracer.buffer().recent(1)[0].event_type(), "parse-end");
}
