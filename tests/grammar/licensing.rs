//! Replaying local trees against a grammar.

use featchart_grammar::{Symbol, parse_category, parse_grammar};

fn cat(text: &str) -> Symbol {
    Symbol::Category(parse_category(text).unwrap())
}

const AGREEMENT: &str = "
S -> NP[num=?n] VP[num=?n]
NP[num=sg] -> 'Kim'
NP[num=pl] -> 'children'
VP[num=?n] -> V[num=?n] NP
V[num=sg] -> 'sees'
";

#[test]
fn agreeing_local_tree_is_licensed() {
    let grammar = parse_grammar(AGREEMENT).unwrap();
    let parent = parse_category("S").unwrap();
    assert!(grammar.licenses(&parent, &[cat("NP[num=sg]"), cat("VP[num=sg]")]));
    assert!(!grammar.licenses(&parent, &[cat("NP[num=sg]"), cat("VP[num=pl]")]));
}

#[test]
fn terminals_must_match_exactly() {
    let grammar = parse_grammar(AGREEMENT).unwrap();
    let np = parse_category("NP[num=sg]").unwrap();
    assert!(grammar.licenses(&np, &[Symbol::terminal("Kim")]));
    assert!(!grammar.licenses(&np, &[Symbol::terminal("children")]));
    assert!(!grammar.licenses(&np, &[]));
}

#[test]
fn variables_in_the_tree_do_not_leak_between_categories() {
    let grammar = parse_grammar(AGREEMENT).unwrap();
    let vp = parse_category("VP[num=?n]").unwrap();
    assert!(grammar.licenses(&vp, &[cat("V[num=sg]"), cat("NP[num=?n]")]));
}
