//! The three strategies build different charts with the same parses.

use std::collections::HashSet;

use featchart_chart::{ChartParser, ParseOutcome, ParserConfig, Strategy, Token, TreeEdge};

use crate::grammars::{
    AGREEMENT, ATTACHMENT, NESTED_READINGS, OPTIONAL, STRATEGIES, UNARY_CYCLE, grammar, parser,
    trees,
};

#[test]
fn strategies_agree_on_parses() {
    let cases = [
        (AGREEMENT, "Kim sees children"),
        (AGREEMENT, "children see Kim"),
        (ATTACHMENT, "saw the man with the telescope in the park"),
        (OPTIONAL, "dogs bark"),
        (UNARY_CYCLE, "x"),
    ];
    for (source, sentence) in cases {
        let expected = trees(source, Strategy::TopDown, sentence);
        assert!(!expected.is_empty(), "{sentence}");
        for strategy in [Strategy::BottomUp, Strategy::LeftCorner] {
            assert_eq!(trees(source, strategy, sentence), expected, "{strategy}: {sentence}");
        }
    }
}

#[test]
fn every_strategy_finds_the_same_parse_edges() {
    let tokens = Token::words("saw the man with the telescope");
    let mut found: Vec<Vec<String>> = STRATEGIES
        .iter()
        .map(|&strategy| {
            let outcome = parser(ATTACHMENT, strategy).parse(&tokens);
            let mut edges: Vec<String> = outcome
                .parse_edges()
                .into_iter()
                .map(|id| outcome.chart().edge(id).to_string())
                .collect();
            edges.sort();
            edges
        })
        .collect();
    let first = found.remove(0);
    assert_eq!(first, ["VP -> V NP *", "VP -> V NP PP *"]);
    assert!(found.iter().all(|edges| *edges == first));
}

#[test]
fn top_down_only_predicts_what_fits_the_input() {
    let tokens = Token::words("saw the man");
    let top_down = parser(ATTACHMENT, Strategy::TopDown).parse(&tokens);
    let bottom_up = parser(ATTACHMENT, Strategy::BottomUp).parse(&tokens);

    let predicted_at = |outcome: &ParseOutcome, label: &str| {
        outcome
            .chart()
            .edges()
            .filter_map(|(_, edge)| edge.as_tree())
            .filter(|edge| edge.dot() == 0 && edge.lhs().label() == Some(label))
            .map(TreeEdge::start)
            .collect::<Vec<_>>()
    };
    // Top-down never predicts a determiner where a verb must start.
    assert!(!predicted_at(&top_down, "Det").contains(&0));
    // Bottom-up never predicts a verb phrase over the noun phrase.
    assert!(!predicted_at(&bottom_up, "VP").contains(&1));
}

#[test]
fn every_edge_is_reachable_through_derivations() {
    for strategy in STRATEGIES {
        let tokens = Token::words("saw the man with the telescope");
        let outcome = parser(ATTACHMENT, strategy).parse(&tokens);
        let chart = outcome.chart();
        for (id, edge) in chart.edges() {
            let Some(tree) = edge.as_tree() else {
                continue;
            };
            for derivation in chart.derivations(id) {
                let child = chart.edge(derivation.child);
                assert!(child.is_complete(), "{strategy}: {edge}");
                assert_eq!(child.end(), tree.end(), "{strategy}: {edge}");
                if let Some(previous) = derivation.previous {
                    assert_eq!(chart.edge(previous).end(), child.start());
                    assert_eq!(chart.edge(previous).start(), tree.start());
                }
            }
            if tree.dot() > 0 {
                assert!(!chart.derivations(id).is_empty(), "{strategy}: {edge}");
            }
        }
    }
}

fn parse_with_pruning(
    source: &str,
    strategy: Strategy,
    sentence: &str,
    prune: bool,
) -> ParseOutcome {
    ChartParser::with_config(
        grammar(source),
        ParserConfig::default().with_strategy(strategy).with_pruning(prune),
    )
    .parse(&Token::words(sentence))
}

#[test]
fn pruning_keeps_the_parses() {
    for strategy in STRATEGIES {
        let plain = parse_with_pruning(AGREEMENT, strategy, "Kim sees children", false);
        let pruned = parse_with_pruning(AGREEMENT, strategy, "Kim sees children", true);
        assert!(pruned.chart().len() <= plain.chart().len(), "{strategy}");
        assert_eq!(pruned.parses(), plain.parses(), "{strategy}");
    }
}

#[test]
fn pruning_keeps_specific_readings_with_their_own_derivations() {
    for strategy in STRATEGIES {
        let plain: HashSet<_> = parse_with_pruning(NESTED_READINGS, strategy, "fish swim", false)
            .parses()
            .into_iter()
            .collect();
        let pruned: HashSet<_> = parse_with_pruning(NESTED_READINGS, strategy, "fish swim", true)
            .parses()
            .into_iter()
            .collect();
        assert_eq!(plain.len(), 2, "{strategy}");
        assert_eq!(pruned, plain, "{strategy}");
    }
}
