use super::*;
use crate::errors::EvalErrorKind;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().copied().map(Value::int).collect()
}

fn rational(n: i64, d: i64) -> Value {
    Value::Rational(Rational::new(BigInt::from(n), BigInt::from(d)).unwrap())
}

// Rationals

#[test]
fn rationals_normalise() {
    assert_eq!(rational(2, 4).to_string(), "1/2");
    assert_eq!(rational(3, -6).to_string(), "-1/2");
    assert_eq!(rational(4, 2).to_string(), "2");
    assert!(rational(4, 2).is_integer());
    assert!(Rational::new(BigInt::from(1), BigInt::from(0)).is_none());
}

#[test]
fn rational_floor_division_and_modulo() {
    let a = Rational::from(-7);
    let b = Rational::from(2);
    assert_eq!(a.int_div(&b).unwrap(), Rational::from(-4));
    assert_eq!(a.modulo(&b).unwrap(), Rational::from(1));
    assert_eq!(Rational::from(7).modulo(&Rational::from(-2)).unwrap(), Rational::from(-1));
    assert!(a.int_div(&Rational::zero()).is_none());
}

#[test]
fn rational_powers_stay_exact() {
    let half = Rational::new(BigInt::from(1), BigInt::from(2)).unwrap();
    assert_eq!(half.pow(3).unwrap().to_string(), "1/8");
    assert_eq!(half.pow(-2).unwrap(), Rational::from(4));
    assert!(Rational::zero().pow(-1).is_none());
}

#[test]
fn power_size_estimate() {
    assert!(Rational::from(2).power_too_large(1 << 25));
    assert!(!Rational::from(2).power_too_large(1 << 20));
    assert!(Rational::new(BigInt::from(1), BigInt::from(3)).unwrap().power_too_large(-(1 << 25)));
    assert!(!Rational::one().power_too_large(i64::MAX));
    assert!(!Rational::from(-1).power_too_large(i64::MIN));
}

#[test]
fn doubles_convert_exactly() {
    assert_eq!(Rational::from_f64(0.5).unwrap().to_string(), "1/2");
    assert_eq!(Rational::from_f64(-3.0).unwrap(), Rational::from(-3));
    assert!(Rational::from_f64(f64::NAN).is_none());
    assert_eq!(Rational::from_f64(0.1).unwrap().to_f64(), 0.1);
}

// Display

#[test]
fn canonical_display() {
    assert_eq!(Value::Undefined.to_string(), "om");
    assert_eq!(Value::float(2.0).to_string(), "2.0");
    assert_eq!(Value::string("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(Value::string("a\"b").to_unquoted_string(), "a\"b");
    assert_eq!(
        Value::list(vec![Value::int(1), Value::string("x")]).to_string(),
        "[1, \"x\"]"
    );
    assert_eq!(Value::set(ints(&[3, 1, 2, 1])).to_string(), "{1, 2, 3}");
    assert_eq!(Value::term("F", ints(&[1])).to_string(), "F(1)");
    assert_eq!(Value::term("f", vec![]).to_string(), "@f()");
    assert_eq!(Value::error("bad").to_string(), "bad");
    assert_eq!(
        Value::builtin("print").to_string(),
        "procedure () { /* predefined procedure `print` */ }"
    );
}

#[test]
fn matrix_display() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(Value::Matrix(m).to_string(), "<< <<1.0 2.0>> <<3.0 4.0>> >>");
}

// Ordering

#[test]
fn numbers_compare_across_representations() {
    assert_eq!(Value::int(1), Value::float(1.0));
    assert!(rational(1, 3) < Value::float(0.34));
    assert!(rational(1, 3) != Value::float(1.0 / 3.0));
    assert!(Value::float(f64::INFINITY) > Value::int(1_000_000));
    assert!(Value::float(f64::NAN) > Value::float(f64::INFINITY));
}

#[test]
fn kinds_order_by_rank() {
    let mut values = [
        Value::list(vec![]),
        Value::string("s"),
        Value::int(1),
        Value::Undefined,
        Value::empty_set(),
        Value::Bool(false),
    ];
    values.sort();
    assert_eq!(
        values.iter().map(Value::type_name).collect::<Vec<_>>(),
        ["om", "boolean", "integer", "string", "set", "list"]
    );
}

#[test]
fn sets_deduplicate_equal_numbers() {
    let s = Value::set(vec![Value::int(1), Value::float(1.0), Value::int(2)]);
    assert_eq!(s.size().unwrap(), 2);
}

// Copy-on-write

#[test]
fn clones_are_independent() {
    let original = Value::list(ints(&[1, 2, 3]));
    let mut copy = original.clone();
    assert!(copy.shares_storage(&original));
    copy.set_member(&Value::int(1), Value::int(9)).unwrap();
    assert!(!copy.shares_storage(&original));
    assert_eq!(original, Value::list(ints(&[1, 2, 3])));
    assert_eq!(copy, Value::list(ints(&[9, 2, 3])));

    let s = Value::string("abc");
    let mut t = s.clone();
    t.remove_last_member().unwrap();
    assert_eq!(s, Value::string("abc"));
    assert_eq!(t, Value::string("ab"));
}

/// Strings, lists and sets with zero, one and several members.
fn collections_by_size() -> [(&'static str, fn() -> Value); 9] {
    [
        ("empty string", || Value::string("")),
        ("one-char string", || Value::string("a")),
        ("string", || Value::string("abcd")),
        ("empty list", || Value::list(vec![])),
        ("one-element list", || Value::list(ints(&[1]))),
        ("list", || Value::list(ints(&[1, 2, 3, 4]))),
        ("empty set", Value::empty_set),
        ("one-element set", || Value::set(ints(&[1]))),
        ("set", || Value::set(ints(&[1, 2, 3, 4]))),
    ]
}

fn mutations() -> [(&'static str, fn(&mut Value)); 3] {
    [
        ("set_member", |v| v.set_member(&Value::int(1), Value::string("z")).unwrap()),
        ("remove_first_member", |v| {
            v.remove_first_member().unwrap();
        }),
        ("remove_last_member", |v| {
            v.remove_last_member().unwrap();
        }),
    ]
}

#[test]
fn mutating_either_clone_leaves_the_other_alone() {
    for (what, build) in collections_by_size() {
        for (op, mutate) in mutations() {
            let original = build();
            let mut copy = original.clone();
            mutate(&mut copy);
            assert_eq!(original, build(), "{op} on a clone of the {what} changed it");
            if copy != original {
                assert!(!copy.shares_storage(&original), "{op} on the {what} kept sharing");
            }

            let mut original = build();
            let copy = original.clone();
            mutate(&mut original);
            assert_eq!(copy, build(), "{op} on the {what} changed its clone");
        }
    }
}

#[test]
fn removing_from_empty_collections_yields_om() {
    for empty in [Value::string(""), Value::list(vec![]), Value::empty_set()] {
        let mut first = empty.clone();
        assert_eq!(first.remove_first_member().unwrap(), Value::Undefined);
        let mut last = empty.clone();
        assert_eq!(last.remove_last_member().unwrap(), Value::Undefined);
        assert_eq!(first, empty);
        assert_eq!(last, empty);
    }
}

// Indexing

#[test]
fn one_based_and_negative_indexes() {
    let l = Value::list(ints(&[10, 20, 30]));
    assert_eq!(l.get_member(&Value::int(1)).unwrap(), Value::int(10));
    assert_eq!(l.get_member(&Value::int(-1)).unwrap(), Value::int(30));
    assert_eq!(l.get_member(&Value::int(-3)).unwrap(), Value::int(10));

    for bad in [0, 4, -4] {
        let err = l.get_member(&Value::int(bad)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IndexOutOfRange, "index {bad}");
    }
    let err = l.get_member(&Value::float(1.0)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IncompatibleType);
    let huge = Value::integer(BigInt::from(1) << 40);
    assert_eq!(l.get_member(&huge).unwrap_err().kind, EvalErrorKind::NumberTooLarge);
}

#[test]
fn string_indexing_is_by_character() {
    let s = Value::string("héllo");
    assert_eq!(s.size().unwrap(), 5);
    assert_eq!(s.get_member(&Value::int(2)).unwrap(), Value::string("é"));
    assert_eq!(s.get_member(&Value::int(-1)).unwrap(), Value::string("o"));
}

#[test]
fn list_assignment_pads_and_trims() {
    let mut l = Value::list(ints(&[1]));
    l.set_member(&Value::int(3), Value::int(3)).unwrap();
    assert_eq!(l.to_string(), "[1, om, 3]");
    l.set_member(&Value::int(3), Value::Undefined).unwrap();
    assert_eq!(l.to_string(), "[1]");
    l.set_member(&Value::int(5), Value::Undefined).unwrap();
    assert_eq!(l.to_string(), "[1]");
    let err = l.set_member(&Value::int(0), Value::int(1)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IndexOutOfRange);
}

#[test]
fn string_assignment_replaces_and_appends() {
    let mut s = Value::string("abc");
    s.set_member(&Value::int(2), Value::string("XY")).unwrap();
    assert_eq!(s, Value::string("aXYc"));
    s.set_member(&Value::int(5), Value::string("!")).unwrap();
    assert_eq!(s, Value::string("aXYc!"));
    let err = s.set_member(&Value::int(1), Value::int(1)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IncompatibleType);
}

#[test]
fn slices() {
    let l = Value::list(ints(&[1, 2, 3, 4]));
    assert_eq!(
        l.slice(Some(&Value::int(2)), Some(&Value::int(3))).unwrap(),
        Value::list(ints(&[2, 3]))
    );
    assert_eq!(l.slice(Some(&Value::int(3)), None).unwrap(), Value::list(ints(&[3, 4])));
    assert_eq!(l.slice(None, Some(&Value::int(-3))).unwrap(), Value::list(ints(&[1, 2])));
    assert_eq!(l.slice(Some(&Value::int(5)), None).unwrap(), Value::list(vec![]));
    let s = Value::string("hello");
    assert_eq!(s.slice(Some(&Value::int(2)), Some(&Value::int(4))).unwrap(), Value::string("ell"));
    assert!(l.slice(Some(&Value::int(0)), None).is_err());
}

// Maps

#[test]
fn map_access_on_sets_of_pairs() {
    let mut m = Value::set(vec![
        Value::pair(Value::int(1), Value::string("a")),
        Value::pair(Value::int(2), Value::string("b")),
        Value::pair(Value::int(2), Value::string("c")),
    ]);
    assert!(m.is_map());
    assert_eq!(m.get_member(&Value::int(1)).unwrap(), Value::string("a"));
    assert_eq!(m.get_member(&Value::int(2)).unwrap(), Value::Undefined);
    assert_eq!(m.get_member(&Value::int(3)).unwrap(), Value::Undefined);
    assert_eq!(
        m.collect_map(&Value::int(2)).unwrap(),
        Value::set(vec![Value::string("b"), Value::string("c")])
    );

    m.set_member(&Value::int(2), Value::string("z")).unwrap();
    assert_eq!(m.get_member(&Value::int(2)).unwrap(), Value::string("z"));
    m.set_member(&Value::int(1), Value::Undefined).unwrap();
    assert_eq!(m.size().unwrap(), 1);
}

// Members

#[test]
fn members_in_both_directions() {
    let s = Value::set(ints(&[3, 1, 2]));
    let forward: Vec<Value> = s.members().unwrap().collect();
    assert_eq!(forward, ints(&[1, 2, 3]));
    let backward: Vec<Value> = s.members().unwrap().rev().collect();
    assert_eq!(backward, ints(&[3, 2, 1]));

    let mut it = Value::list(ints(&[1, 2, 3])).members().unwrap();
    assert_eq!(it.next(), Some(Value::int(1)));
    assert_eq!(it.next_back(), Some(Value::int(3)));
    assert_eq!(it.next(), Some(Value::int(2)));
    assert_eq!(it.next_back(), None);

    let chars: Vec<Value> = Value::string("ab").members().unwrap().rev().collect();
    assert_eq!(chars, vec![Value::string("b"), Value::string("a")]);
}

#[test]
fn set_members_meet_in_the_middle() {
    let mut it = Value::set(ints(&[1, 2, 3, 4])).members().unwrap();
    assert_eq!(it.next(), Some(Value::int(1)));
    assert_eq!(it.next_back(), Some(Value::int(4)));
    assert_eq!(it.next_back(), Some(Value::int(3)));
    assert_eq!(it.next(), Some(Value::int(2)));
    assert_eq!(it.next(), None);
}

#[test]
fn first_last_and_removal() {
    let mut s = Value::set(ints(&[5, 1, 3]));
    assert_eq!(s.first_member().unwrap(), Value::int(1));
    assert_eq!(s.last_member().unwrap(), Value::int(5));
    assert_eq!(s.remove_first_member().unwrap(), Value::int(1));
    assert_eq!(s.remove_last_member().unwrap(), Value::int(5));
    assert_eq!(s, Value::set(ints(&[3])));

    let mut empty = Value::list(vec![]);
    assert_eq!(empty.remove_first_member().unwrap(), Value::Undefined);
    assert_eq!(empty.first_member().unwrap(), Value::Undefined);
    assert!(Value::int(1).first_member().is_err());
}

#[test]
fn membership() {
    assert!(Value::set(ints(&[1, 2])).contains(&Value::float(2.0)).unwrap());
    assert!(Value::string("hello").contains(&Value::string("ell")).unwrap());
    assert!(!Value::list(ints(&[1])).contains(&Value::int(2)).unwrap());
    assert!(Value::string("x").contains(&Value::int(1)).is_err());
}
