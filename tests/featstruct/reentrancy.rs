//! Reentrancy tests.

use featchart_featstruct::{FeatStruct, FeatureValue};
use featchart_grammar::parse_featstruct;

fn fs(text: &str) -> FeatStruct {
    parse_featstruct(text).unwrap()
}

#[test]
fn shared_address_is_updated_through_both_paths() {
    let a = fs("[addr=(1)[num=sg], spouse=[addr->(1)]]");
    let b = fs("[spouse=[addr=[city=Paris]]]");

    let result = a.unify(&b).unwrap();
    let paris = Some(FeatureValue::from("Paris"));
    assert_eq!(result.get_path(&["addr", "city"]), paris);
    assert_eq!(result.get_path(&["spouse", "addr", "city"]), paris);
    assert_eq!(result.get_path(&["addr", "num"]), Some(FeatureValue::from("sg")));
    assert!(result.shares(&["addr"], &["spouse", "addr"]));
}

#[test]
fn sharing_introduced_by_the_other_side() {
    let a = fs("[a=[x=1], b=[y=2]]");
    let b = fs("[a=(1)[], b->(1)]");
    let result = a.unify(&b).unwrap();
    assert!(result.shares(&["a"], &["b"]));
    assert_eq!(result.get_path(&["b", "x"]), Some(FeatureValue::from(1i64)));
    assert_eq!(result.get_path(&["a", "y"]), Some(FeatureValue::from(2i64)));
}

#[test]
fn sharing_makes_conflicts_visible() {
    let a = fs("[a=(1)[num=sg], b->(1)]");
    assert!(a.unify(&fs("[b=[num=pl]]")).is_err());
    assert!(fs("[a=[num=sg], b=[num=pl]]").unify(&fs("[a=(1)[], b->(1)]")).is_err());
}

#[test]
fn cyclic_structures_unify() {
    let cycle = fs("(1)[next->(1), val=a]");
    let open = fs("[next=[next=[val=a]]]");
    let result = cycle.unify(&open).unwrap();
    assert!(result.shares(&[], &["next"]));
    assert!(cycle.unify(&fs("[next=[val=b]]")).is_err());
}

#[test]
fn notation_round_trips_sharing() {
    let text = "[addr=(1)[num=sg], spouse=[addr->(1)]]";
    assert_eq!(fs(text).to_string(), text);
}
