//! One parser shared between threads.

use std::sync::Arc;
use std::thread;

use featchart_chart::{ChartParser, ParserConfig, Strategy, Token};

use crate::grammars::{ATTACHMENT, grammar};

#[test]
fn parsers_share_a_grammar_across_threads() {
    let sentences = [
        "saw the man",
        "saw the man with the telescope",
        "saw the man with the telescope in the park",
        "saw the park in the telescope with the man",
    ];
    let grammar = grammar(ATTACHMENT);
    let parser = ChartParser::new(Arc::clone(&grammar));
    let expected: Vec<usize> = sentences
        .iter()
        .map(|s| parser.parse(&Token::words(s)).parses().len())
        .collect();
    assert_eq!(expected, [1, 2, 4, 4]);

    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = sentences
            .iter()
            .map(|sentence| {
                let parser = &parser;
                scope.spawn(move || parser.parse(&Token::words(sentence)).parses().len())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, expected);
}

#[test]
fn strategies_run_side_by_side() {
    let grammar = grammar(ATTACHMENT);
    let tokens = Token::words("saw the man with the telescope in the park");
    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = [Strategy::TopDown, Strategy::BottomUp, Strategy::LeftCorner]
            .into_iter()
            .map(|strategy| {
                let parser = ChartParser::with_config(
                    Arc::clone(&grammar),
                    ParserConfig::default().with_strategy(strategy),
                );
                let tokens = &tokens;
                scope.spawn(move || parser.parse(tokens).parses().len())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, [4, 4, 4]);
}
