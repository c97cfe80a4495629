use super::*;

/// Nested list depth, the shape a deeply nested term produces.
enum Nested {
    Leaf,
    Node(Box<Nested>),
}

fn depth(n: &Nested) -> usize {
    ensure_sufficient_stack(|| match n {
        Nested::Leaf => 0,
        Nested::Node(inner) => depth(inner) + 1,
    })
}

#[test]
fn passes_value_through() {
    assert_eq!(ensure_sufficient_stack(|| "om"), "om");
}

#[test]
fn passes_result_through() {
    let r: Result<u32, String> = ensure_sufficient_stack(|| Err("backtrack".to_string()));
    assert_eq!(r, Err("backtrack".to_string()));
}

#[test]
fn walks_deeply_nested_tree() {
    let mut tree = Nested::Leaf;
    for _ in 0..50_000 {
        tree = Nested::Node(Box::new(tree));
    }
    assert_eq!(depth(&tree), 50_000);

    // Iterative drop, the recursive one would overflow.
    let mut cur = tree;
    while let Nested::Node(inner) = cur {
        cur = *inner;
    }
}

#[test]
fn deep_mutual_recursion() {
    fn even(n: u64) -> bool {
        ensure_sufficient_stack(|| if n == 0 { true } else { odd(n - 1) })
    }
    fn odd(n: u64) -> bool {
        ensure_sufficient_stack(|| if n == 0 { false } else { even(n - 1) })
    }
    assert!(even(100_000));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn reports_remaining_stack() {
    assert!(remaining_stack().is_some_and(|n| n > 0));
}
