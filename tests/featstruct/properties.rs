//! Property tests over structures with variables and sharing.

use proptest::prelude::*;

use featchart_featstruct::{Bindings, FeatStruct, FeatureValue, Variable, subsumes, unify};

fn value() -> impl Strategy<Value = FeatureValue> {
    prop_oneof![
        prop::sample::select(vec!["sg", "pl", "nom", "acc"]).prop_map(FeatureValue::from),
        (1i64..4).prop_map(FeatureValue::from),
        prop::sample::select(vec!["x", "y"]).prop_map(|v| FeatureValue::Var(Variable::new(v))),
    ]
}

fn featstruct() -> impl Strategy<Value = FeatStruct> {
    let leaf = prop::collection::btree_map(
        prop::sample::select(vec!["num", "per", "case"]),
        value(),
        0..3,
    )
    .prop_map(|pairs| FeatStruct::from_pairs(pairs));
    leaf.prop_recursive(3, 12, 2, |inner| {
        (inner.clone(), inner, any::<bool>()).prop_map(|(a, b, shared)| {
            let top = FeatStruct::new().with("agr", a.clone());
            if shared {
                top.with("head", top.get("agr").unwrap_or_else(|| FeatureValue::from(a)))
            } else {
                top.with("head", b)
            }
        })
    })
}

proptest! {
    #[test]
    fn unification_is_symmetric(a in featstruct(), b in featstruct()) {
        let ab = unify(&a, &b, &Bindings::new());
        let ba = unify(&b, &a, &Bindings::new());
        prop_assert_eq!(ab.is_ok(), ba.is_ok());
        if let (Ok((ab, _)), Ok((ba, _))) = (ab, ba) {
            prop_assert_eq!(ab, ba);
        }
    }

    #[test]
    fn unification_is_idempotent(a in featstruct()) {
        let (result, _) = unify(&a, &a, &Bindings::new()).unwrap();
        prop_assert_eq!(result, a);
    }

    #[test]
    fn general_unified_with_specific_is_specific(a in featstruct(), b in featstruct()) {
        if subsumes(&a, &b) {
            let result = a.unify(&b).unwrap();
            // Equal up to the names of unbound variables.
            prop_assert!(subsumes(&result, &b));
            prop_assert!(subsumes(&b, &result));
        }
    }

    #[test]
    fn result_is_stable_under_its_bindings(a in featstruct(), b in featstruct()) {
        if let Ok((result, bindings)) = unify(&a, &b, &Bindings::new()) {
            prop_assert_eq!(result.substitute(&bindings), result);
        }
    }
}
