//! Input tokens carrying categories from a tagger.

use featchart_chart::{ParseTree, Token};
use featchart_grammar::parse_category;

use crate::grammars::{STRATEGIES, grammar, parser};

const TAGGED: &str = "
% lexical N V
S -> N[num=?n] V[num=?n]
";

fn tagged(word: &str, category: &str) -> Token {
    Token::tagged(word, parse_category(category).unwrap())
}

#[test]
fn tags_stand_in_for_lexical_productions() {
    let tokens = [tagged("dogs", "N[num=pl]"), tagged("bark", "V[num=pl]")];
    for strategy in STRATEGIES {
        let parses = parser(TAGGED, strategy).parse_trees(&tokens).unwrap();
        let strings: Vec<String> = parses.iter().map(ToString::to_string).collect();
        assert_eq!(strings, ["(S (N[num=pl] dogs) (V[num=pl] bark))"], "{strategy}");
        assert!(parses.iter().all(|tree| tree.is_licensed_by(&grammar(TAGGED))));
    }
}

#[test]
fn tags_must_unify_with_the_expected_category() {
    let tokens = [tagged("dog", "N[num=sg]"), tagged("bark", "V[num=pl]")];
    for strategy in STRATEGIES {
        assert!(parser(TAGGED, strategy).parse_trees(&tokens).unwrap().is_empty(), "{strategy}");
    }
}

#[test]
fn untagged_words_do_not_match_categories() {
    let tokens = Token::words("dogs bark");
    for strategy in STRATEGIES {
        assert!(parser(TAGGED, strategy).parse_trees(&tokens).unwrap().is_empty(), "{strategy}");
    }
}

#[test]
fn tagged_words_still_match_terminals() {
    let source = "% lexical N\nS -> N 'bark'";
    let tokens = [tagged("dogs", "N"), tagged("bark", "V")];
    let parses = parser(source, STRATEGIES[0]).parse_trees(&tokens).unwrap();
    assert_eq!(parses.len(), 1);
    let ParseTree::Node { children, .. } = &parses[0] else {
        panic!("expected a node");
    };
    assert_eq!(children[1], ParseTree::Leaf("bark".into()));
    assert_eq!(parses[0].leaves(), ["dogs", "bark"]);
}
