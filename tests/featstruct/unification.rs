//! Unification tests.

use featchart_featstruct::{Bindings, Clash, FeatStruct, FeatureValue, Variable, unify};
use featchart_grammar::parse_featstruct;

fn fs(text: &str) -> FeatStruct {
    parse_featstruct(text).unwrap()
}

#[test]
fn compatible_structures_merge() {
    let result = fs("[num=sg]").unify(&fs("[per=3]")).unwrap();
    assert_eq!(result, fs("[num=sg, per=3]"));
}

#[test]
fn atom_clash_names_the_feature_path() {
    let failure = fs("[agr=[num=sg]]").unify(&fs("[agr=[num=pl]]")).unwrap_err();
    let path: Vec<&str> = failure.path.iter().map(|n| &**n).collect();
    assert_eq!(path, ["agr", "num"]);
    assert_eq!(
        failure.clash,
        Clash::Atoms("sg".into(), "pl".into())
    );
    assert_eq!(failure.to_string(), "cannot unify at agr.num: sg vs pl");
}

#[test]
fn atoms_of_different_kinds_do_not_unify() {
    assert!(fs("[f=1]").unify(&fs("[f='1']")).is_err());
    assert!(fs("[+f]").unify(&fs("[-f]")).is_err());
    assert!(fs("[f=a]").unify(&fs("[f=[g=a]]")).is_err());
}

#[test]
fn variables_bind_and_thread_through_bindings() {
    let pattern = fs("[subj=[num=?n], verb=[num=?n]]");
    let (result, bindings) = unify(&pattern, &fs("[subj=[num=sg]]"), &Bindings::new()).unwrap();
    assert_eq!(bindings.resolve(&Variable::new("n")), Some(FeatureValue::from("sg")));
    assert_eq!(result.get_path(&["verb", "num"]), Some(FeatureValue::from("sg")));

    let clash = unify(&pattern, &fs("[verb=[num=pl]]"), &bindings);
    assert!(clash.is_err());
}

#[test]
fn failed_unification_leaves_inputs_untouched() {
    let a = fs("[num=?n, per=3]");
    let b = fs("[num=sg, per=1]");
    let bindings = Bindings::new();
    assert!(unify(&a, &b, &bindings).is_err());
    assert_eq!(a, fs("[num=?n, per=3]"));
    assert!(bindings.is_empty());
}

#[test]
fn unbound_variables_survive() {
    let (result, bindings) = unify(&fs("[a=?x]"), &fs("[b=1]"), &Bindings::new()).unwrap();
    assert_eq!(result.get("a"), Some(FeatureValue::Var(Variable::new("x"))));
    assert!(!bindings.contains(&Variable::new("x")));
}

#[test]
fn variable_bound_to_a_structure() {
    let (result, bindings) = unify(
        &fs("[head=?h, agr=?h]"),
        &fs("[head=[num=sg]]"),
        &Bindings::new(),
    )
    .unwrap();
    assert!(bindings.resolve(&Variable::new("h")).is_some());
    assert_eq!(result.get_path(&["agr", "num"]), Some(FeatureValue::from("sg")));
}

#[test]
fn substitution_applies_bindings() {
    let bindings = Bindings::new().with(Variable::new("n"), "pl");
    let result = fs("[num=?n, per=?p]").substitute(&bindings);
    assert_eq!(result, fs("[num=pl, per=?p]"));
}
