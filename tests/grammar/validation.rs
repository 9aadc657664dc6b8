//! Grammar validation tests.

use featchart_foundation::{ErrorKind, Variable};
use featchart_grammar::{Category, Grammar, Production, Symbol, parse_grammar};

#[test]
fn undefined_category_names_the_production() {
    let err = parse_grammar("S -> NP VP\nNP -> 'Kim'\nVP -> V\n").unwrap_err();
    assert!(err.is_grammar_error());
    match err.kind {
        ErrorKind::UndefinedCategory {
            category,
            production,
            line,
        } => {
            assert_eq!(category, "V");
            assert_eq!(production, 2);
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn lexical_categories_need_no_productions() {
    assert!(parse_grammar("S -> N V").is_err());
    assert!(parse_grammar("% lexical N V\nS -> N V").is_ok());
}

#[test]
fn left_hand_side_variables_may_stay_open() {
    let grammar = parse_grammar("S -> NP\nNP[num=?n] -> 'Kim'").unwrap();
    assert_eq!(grammar.productions().len(), 2);
    assert_eq!(grammar.productions()[1].to_string(), "NP[num=?n] -> 'Kim'");
}

#[test]
fn variables_must_belong_to_their_production() {
    let np = Category::new("NP").with("num", Variable::scoped("n", 1));
    let productions = vec![
        Production::new(Category::new("S"), [Symbol::Category(np)]).at_line(4),
        Production::new(Category::new("NP"), [Symbol::terminal("Kim")]),
    ];
    let err = Grammar::new(Category::new("S"), productions).unwrap_err();
    assert!(err.is_grammar_error());
    assert!(matches!(
        err.kind,
        ErrorKind::UnscopedVariable { production: 0, line: 4, .. }
    ));
}

#[test]
fn start_must_be_defined() {
    let err = parse_grammar("% start S\nNP -> 'Kim'").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UndefinedStart(ref label) if label == "S"));
}

#[test]
fn empty_and_unlabeled_grammars_are_rejected() {
    let err = Grammar::new(Category::new("S"), Vec::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EmptyGrammar));

    let unlabeled = Production::new(
        Category::new("S"),
        [Symbol::Category(Category::default())],
    );
    let err = Grammar::new(Category::new("S"), vec![unlabeled]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnlabeledCategory { production: 0, .. }));
}

#[test]
fn syntax_errors_report_line_and_column() {
    let err = parse_grammar("S -> NP\nNP -> 'Kim' =\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { line: 2, .. }));
    assert!(!err.is_grammar_error());
}
