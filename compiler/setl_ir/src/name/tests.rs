use super::*;
use rustc_hash::FxHashMap;

#[test]
fn equal_by_content() {
    assert_eq!(Name::new("x"), Name::from("x".to_string()));
    assert_ne!(Name::new("x"), Name::new("y"));
    assert_eq!(Name::new("abc"), "abc");
}

#[test]
fn usable_as_map_key_with_str_lookup() {
    let mut map = FxHashMap::default();
    map.insert(Name::new("count"), 3);
    assert_eq!(map.get("count"), Some(&3));
    assert_eq!(map.get("other"), None);
}

#[test]
fn ordered_by_content() {
    let mut names = vec![Name::new("b"), Name::new("a"), Name::new("c")];
    names.sort();
    let strs: Vec<&str> = names.iter().map(Name::as_str).collect();
    assert_eq!(strs, ["a", "b", "c"]);
}

#[test]
fn sentinel_is_recognised() {
    assert!(Name::prevent_optimization().is_prevent_optimization());
    assert!(!Name::new("x").is_prevent_optimization());
}

#[test]
fn display_and_debug() {
    let n = Name::new("foo");
    assert_eq!(n.to_string(), "foo");
    assert_eq!(format!("{n:?}"), "Name(\"foo\")");
}
