//! Grammar notation tests.

use featchart_featstruct::{FeatureValue, Variable};
use featchart_grammar::{Category, Grammar, Symbol, parse_category, parse_grammar};

const TOY: &str = "
# agreement grammar
% start S
% lexical N V

S -> NP[num=?n] VP[num=?n]
NP[num=?n] -> Det N[num=?n]
    | 'Kim' N[num=?n]
NP[num=sg] -> 'Kim'
VP[num=?n] -> V[num=?n] NP
Det -> 'the' | 'a'
E ->
";

#[test]
fn reads_a_toy_grammar() {
    let grammar = parse_grammar(TOY).unwrap();
    assert_eq!(grammar.start(), &Category::new("S"));
    assert_eq!(grammar.lexical().collect::<Vec<_>>(), ["N", "V"]);
    assert_eq!(grammar.productions().len(), 8);
    assert_eq!(grammar.expansions("NP").len(), 3);
    assert_eq!(grammar.expansions("Det").len(), 2);
    assert_eq!(grammar.empty_productions().len(), 1);
    assert!(grammar.defines("VP"));
    assert!(!grammar.defines("N"));
}

#[test]
fn left_corner_indexes() {
    let grammar = parse_grammar(TOY).unwrap();
    assert_eq!(grammar.left_corner_word("Kim").len(), 2);
    assert_eq!(grammar.left_corner_word("the").len(), 1);
    assert_eq!(grammar.left_corner_label("NP").len(), 1);
    assert_eq!(grammar.left_corner_label("Det").len(), 1);
    assert!(grammar.left_corner_label("S").is_empty());
}

#[test]
fn productions_keep_their_symbols() {
    let grammar = parse_grammar(TOY).unwrap();
    let np = grammar.production(grammar.expansions("NP")[1]);
    assert_eq!(np.rhs()[0], Symbol::terminal("Kim"));
    assert_eq!(np.to_string(), "NP[num=?n] -> 'Kim' N[num=?n]");
    assert_eq!(np.variables(), [Variable::new("n")]);
    assert!(grammar.production(grammar.expansions("Det")[0]).is_lexical());
}

#[test]
fn categories_carry_nested_values() {
    let category = parse_category("VP[subcat=NP[case=acc], num=?n, +fin]").unwrap();
    assert_eq!(category.label(), Some("VP"));
    assert_eq!(category.get("fin"), Some(FeatureValue::from(true)));
    assert_eq!(category.get("num"), Some(FeatureValue::Var(Variable::new("n"))));
    let subcat = category.get("subcat").and_then(|v| v.as_struct().cloned()).unwrap();
    assert_eq!(Category::from_featstruct(subcat), parse_category("NP[case=acc]").unwrap());
}

#[test]
fn grammar_display_reads_back() {
    let grammar = parse_grammar(TOY).unwrap();
    let again = parse_grammar(&grammar.to_string()).unwrap();
    let text = |g: &Grammar| -> Vec<String> {
        g.productions().iter().map(ToString::to_string).collect()
    };
    assert_eq!(text(&again), text(&grammar));
    assert_eq!(again.lexical().collect::<Vec<_>>(), ["N", "V"]);
    assert_eq!(again.start(), grammar.start());
}
