//! Subsumption tests.

use featchart_featstruct::{FeatStruct, subsumes};
use featchart_grammar::parse_featstruct;

fn fs(text: &str) -> FeatStruct {
    parse_featstruct(text).unwrap()
}

#[test]
fn fewer_features_subsume_more() {
    assert!(subsumes(&fs("[num=sg]"), &fs("[num=sg, per=3]")));
    assert!(!subsumes(&fs("[num=sg, per=3]"), &fs("[num=sg]")));
    assert!(subsumes(&fs("[]"), &fs("[a=[b=c]]")));
}

#[test]
fn variables_subsume_values() {
    assert!(subsumes(&fs("[num=?n]"), &fs("[num=pl]")));
    assert!(!subsumes(&fs("[num=pl]"), &fs("[num=?n]")));
}

#[test]
fn shared_variables_require_equal_values() {
    assert!(subsumes(&fs("[a=?x, b=?x]"), &fs("[a=1, b=1]")));
    assert!(!subsumes(&fs("[a=?x, b=?x]"), &fs("[a=1, b=2]")));
}

#[test]
fn sharing_is_more_specific_than_equal_copies() {
    let copies = fs("[a=[n=1], b=[n=1]]");
    let shared = fs("[a=(1)[n=1], b->(1)]");
    assert!(subsumes(&copies, &shared));
    assert!(!subsumes(&shared, &copies));
}

#[test]
fn subsumption_is_reflexive() {
    for text in ["[]", "[a=?x]", "[a=(1)[b=c], d->(1)]", "(1)[next->(1)]"] {
        assert!(subsumes(&fs(text), &fs(text)), "{text}");
    }
}
