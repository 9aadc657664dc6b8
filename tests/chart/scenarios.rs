//! End-to-end parses.

use featchart_chart::{ParseStatus, Rule, Strategy, Token, TraceEvent, Tracer, TracerConfig};
use featchart_featstruct::FeatureValue;

use crate::grammars::{
    AGREEMENT, ATTACHMENT, DISAGREEMENT, LATE_BINDING, OPEN_DETERMINER, OPTIONAL, STRATEGIES,
    UNARY_CYCLE, bracketed, grammar, parser, trees,
};

#[test]
fn subject_agreement_resolves_number() {
    let parses = trees(AGREEMENT, Strategy::TopDown, "Kim sees children");
    assert_eq!(
        bracketed(&parses),
        ["(S (NP[num=sg] Kim) (VP[num=sg] (V[num=sg] sees) (NP[num=pl] children)))"]
    );

    let tree = parses.iter().next().unwrap();
    let sg = Some(FeatureValue::from("sg"));
    assert_eq!(tree.children()[0].category().and_then(|c| c.get("num")), sg);
    assert_eq!(tree.children()[1].category().and_then(|c| c.get("num")), sg);
}

#[test]
fn values_bound_above_reach_the_lower_nodes() {
    for strategy in STRATEGIES {
        assert_eq!(
            bracketed(&trees(LATE_BINDING, strategy, "Kim sleeps")),
            ["(S (NP[num=sg] (PN[num=sg] Kim)) (VP[num=sg] sleeps))"],
            "{strategy}"
        );
    }
}

#[test]
fn unbound_left_hand_side_takes_its_value_from_context() {
    for strategy in STRATEGIES {
        assert_eq!(
            bracketed(&trees(OPEN_DETERMINER, strategy, "the dogs bark")),
            ["(S (NP[num=pl] (Det[num=pl] the) (N[num=pl] dogs)) (VP[num=pl] bark))"],
            "{strategy}"
        );
        assert!(trees(OPEN_DETERMINER, strategy, "the dog bark").is_empty(), "{strategy}");
    }
}

#[test]
fn agreement_failure_yields_no_parse() {
    assert!(trees(AGREEMENT, Strategy::TopDown, "children sees Kim").is_empty());
    assert_eq!(trees(AGREEMENT, Strategy::TopDown, "children see Kim").len(), 1);
}

#[test]
fn clash_is_reported_by_the_completer() {
    let tokens = Token::words("Kim sees");
    let mut tracer = Tracer::new(TracerConfig::new().enabled());
    let outcome = parser(DISAGREEMENT, Strategy::BottomUp).parse_with_tracer(&tokens, &mut tracer);

    assert_eq!(outcome.status(), &ParseStatus::Complete);
    assert!(outcome.parses().is_empty());
    let failures: Vec<_> = tracer
        .buffer()
        .iter()
        .filter_map(|record| match &record.event {
            TraceEvent::UnifyFailed { rule, expected, found, failure } => {
                Some((*rule, expected.clone(), found.clone(), failure.to_string()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        failures,
        [(
            Rule::Completer,
            "VP[num=pl]".to_string(),
            "VP[num=sg]".to_string(),
            "cannot unify at num: pl vs sg".to_string(),
        )]
    );
}

#[test]
fn disagreement_fails_under_every_strategy() {
    for strategy in STRATEGIES {
        assert!(trees(DISAGREEMENT, strategy, "Kim sees").is_empty(), "{strategy}");
    }
}

#[test]
fn prepositional_phrase_attaches_two_ways() {
    let parses = trees(ATTACHMENT, Strategy::TopDown, "saw the man with the telescope");
    assert_eq!(
        bracketed(&parses),
        [
            "(VP (V saw) (NP (Det the) (N man)) (PP (P with) (NP (Det the) (N telescope))))",
            "(VP (V saw) (NP (NP (Det the) (N man)) (PP (P with) (NP (Det the) (N telescope)))))",
        ]
    );
}

#[test]
fn two_prepositional_phrases_attach_four_ways() {
    let sentence = "saw the man with the telescope in the park";
    for strategy in STRATEGIES {
        assert_eq!(trees(ATTACHMENT, strategy, sentence).len(), 4, "{strategy}");
    }
}

#[test]
fn empty_productions_fill_gaps() {
    for strategy in STRATEGIES {
        assert_eq!(
            bracketed(&trees(OPTIONAL, strategy, "dogs bark")),
            ["(S (NP (Det) (N dogs)) (VP bark))"],
            "{strategy}"
        );
        assert_eq!(
            bracketed(&trees(OPTIONAL, strategy, "the dogs bark")),
            ["(S (NP (Det the) (N dogs)) (VP bark))"],
            "{strategy}"
        );
    }
}

#[test]
fn unary_cycles_terminate() {
    for strategy in STRATEGIES {
        assert_eq!(
            bracketed(&trees(UNARY_CYCLE, strategy, "x")),
            ["(S (A (B (A x))))", "(S (A x))"],
            "{strategy}"
        );
    }
}

#[test]
fn unknown_words_and_empty_input() {
    assert!(trees(ATTACHMENT, Strategy::TopDown, "saw the dog").is_empty());
    assert!(trees(ATTACHMENT, Strategy::TopDown, "").is_empty());
    assert_eq!(
        bracketed(&trees(OPTIONAL, Strategy::BottomUp, "")),
        Vec::<String>::new()
    );
}

#[test]
fn start_category_may_carry_features() {
    let source = "% start S[mood=decl]\nS[mood=decl] -> 'go'\nS[mood=imp] -> 'go'";
    let parses = trees(source, Strategy::TopDown, "go");
    assert_eq!(bracketed(&parses), ["(S[mood=decl] go)"]);
    assert_eq!(grammar(source).expansions("S").len(), 2);
}
