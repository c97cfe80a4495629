//! Property tests for the value model.
//!
//! Ordering must be a total order over mixed types, collections must be
//! copy-on-write, and positive and negative indexes must agree.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::cmp::Ordering;

use proptest::prelude::*;
use setl_patterns::{term_to_value, value_to_term, Value};

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::int),
        (-1.0e6f64..1.0e6).prop_map(Value::float),
        "[a-z]{0,6}".prop_map(Value::string),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::set),
            prop::collection::vec(inner, 0..3).prop_map(|args| Value::term("F", args)),
        ]
    })
}

fn list_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec((-1000i64..1000).prop_map(Value::int), 1..8)
}

proptest! {
    #[test]
    fn ordering_is_antisymmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a == b, a.cmp(&b) == Ordering::Equal);
    }

    #[test]
    fn ordering_is_transitive(
        a in value_strategy(),
        b in value_strategy(),
        c in value_strategy(),
    ) {
        let mut sorted = [a, b, c];
        sorted.sort();
        prop_assert!(sorted[0] <= sorted[2]);
        prop_assert!(sorted[0] <= sorted[1] && sorted[1] <= sorted[2]);
    }

    #[test]
    fn mixed_numbers_compare_exactly(n in -1000i32..1000, f in -1000.0f64..1000.0) {
        let exact = Value::int(i64::from(n));
        let double = Value::float(f);
        let expected = f64::from(n).partial_cmp(&f).unwrap();
        prop_assert_eq!(exact.cmp(&double), expected);
    }

    #[test]
    fn assignment_never_changes_a_copy(items in list_strategy(), index in 1i64..8) {
        let original = Value::list(items);
        let before = original.clone();
        let mut copy = original.clone();
        copy.set_member(&Value::int(index), Value::string("changed")).unwrap();
        prop_assert_eq!(&original, &before);
        prop_assert!(!copy.shares_storage(&original));
        prop_assert_eq!(copy.get_member(&Value::int(index)).unwrap(), Value::string("changed"));
    }

    #[test]
    fn removal_never_changes_a_copy(value in value_strategy()) {
        prop_assume!(value.is_collection());
        let before = value.clone();
        let mut front = value.clone();
        let mut back = value.clone();
        let first = front.remove_first_member().unwrap();
        let last = back.remove_last_member().unwrap();
        prop_assert_eq!(&value, &before);
        prop_assert_eq!(first, value.first_member().unwrap());
        prop_assert_eq!(last, value.last_member().unwrap());
        if value.size().unwrap() > 0 {
            prop_assert_eq!(front.size().unwrap() + 1, value.size().unwrap());
            prop_assert!(!front.shares_storage(&value));
        }
    }

    #[test]
    fn negative_indexes_count_from_the_end(items in list_strategy()) {
        let list = Value::list(items.clone());
        let len = i64::try_from(items.len()).unwrap();
        for i in 1..=len {
            let forward = list.get_member(&Value::int(i)).unwrap();
            let backward = list.get_member(&Value::int(i - len - 1)).unwrap();
            prop_assert_eq!(forward, backward);
        }
        prop_assert!(list.get_member(&Value::int(0)).is_err());
        prop_assert!(list.get_member(&Value::int(len + 1)).is_err());
    }

    #[test]
    fn members_visit_every_element(value in value_strategy()) {
        if value.is_collection() {
            let size = value.size().unwrap();
            prop_assert_eq!(value.members().unwrap().count(), size);
            let reversed: Vec<Value> = value.members().unwrap().rev().collect();
            let mut forward: Vec<Value> = value.members().unwrap().collect();
            forward.reverse();
            prop_assert_eq!(reversed, forward);
        }
    }

    #[test]
    fn data_survives_term_conversion(value in value_strategy()) {
        prop_assert_eq!(term_to_value(&value_to_term(&value)), value);
    }
}
