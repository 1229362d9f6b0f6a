use super::*;
use crate::node::Ptr;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Checks structural invariants: sibling bytes form a BST with no duplicates,
/// every arena node is reachable exactly once, and the stored values match
/// `live`.
fn validate_tree<V>(t: &Tst<V>, live: usize) {
    if t.root.is_null() {
        assert_eq!(t.nodes.len(), 0, "nodes allocated without a root");
        return;
    }

    // (node, exclusive lower bound, exclusive upper bound) among siblings.
    let mut stack: Vec<(Ptr, Option<u8>, Option<u8>)> = vec![(t.root, None, None)];
    let mut reachable = 0usize;
    let mut with_value = 0usize;
    while let Some((ptr, lo, hi)) = stack.pop() {
        let node = t.nodes.get(ptr);
        reachable += 1;
        if let Some(lo) = lo {
            assert!(node.c > lo, "byte {} not above sibling bound {}", node.c, lo);
        }
        if let Some(hi) = hi {
            assert!(node.c < hi, "byte {} not below sibling bound {}", node.c, hi);
        }
        if node.value.is_some() {
            with_value += 1;
        }
        if !node.left.is_null() {
            stack.push((node.left, lo, Some(node.c)));
        }
        if !node.right.is_null() {
            stack.push((node.right, Some(node.c), hi));
        }
        if !node.mid.is_null() {
            stack.push((node.mid, None, None));
        }
    }

    assert_eq!(reachable, t.nodes.len(), "every allocated node must be reachable");
    assert_eq!(with_value, live, "stored values must match distinct keys");
}

/// Spells `key` in forward order as the trie sees it.
fn normalize(dir: Direction, key: &[u8]) -> Vec<u8> {
    match dir {
        Direction::Forward => key.to_vec(),
        Direction::Reversed => key.iter().rev().copied().collect(),
    }
}

fn model_shortest_prefix(m: &BTreeMap<Vec<u8>, u64>, key: &[u8]) -> Option<u64> {
    (1..=key.len()).find_map(|i| m.get(&key[..i]).copied())
}

#[derive(Clone, Debug)]
enum Op {
    Put(Direction, Vec<u8>, u64),
    Get(Direction, Vec<u8>),
    ShortestPrefix(Direction, Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A small alphabet so keys collide and share prefixes often.
    prop::collection::vec(prop::sample::select(b"abc.\xC3".to_vec()), 0..=8)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (any::<Direction>(), key.clone(), any::<u64>())
            .prop_map(|(d, k, v)| Op::Put(d, k, v)),
        25 => (any::<Direction>(), key.clone()).prop_map(|(d, k)| Op::Get(d, k)),
        25 => (any::<Direction>(), key.clone()).prop_map(|(d, k)| Op::ShortestPrefix(d, k)),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: Tst<u64> = Tst::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        let mut puts = 0usize;

        for op in ops {
            match op {
                Op::Put(dir, key, value) => {
                    t.put_in(dir, &key, value);
                    if !key.is_empty() {
                        m.insert(normalize(dir, &key), value);
                        puts += 1;
                    }
                }
                Op::Get(dir, key) => {
                    let got_t = t.get_in(dir, &key).copied();
                    let got_m = m.get(&normalize(dir, &key)).copied();
                    prop_assert_eq!(got_t, got_m);
                    prop_assert_eq!(t.contains_key_in(dir, &key), got_m.is_some());
                }
                Op::ShortestPrefix(dir, key) => {
                    let got_t = t.get_shortest_prefix_in(dir, &key).copied();
                    let got_m = model_shortest_prefix(&m, &normalize(dir, &key));
                    prop_assert_eq!(got_t, got_m);
                }
            }

            prop_assert_eq!(t.size(), puts);
            prop_assert_eq!(t.is_empty(), m.is_empty());
        }

        validate_tree(&t, m.len());
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_direction_symmetry(keys in prop::collection::vec(key_strategy(), 0..=64), dir in any::<Direction>()) {
        let mut t: Tst<usize> = Tst::new();
        for (i, key) in keys.iter().enumerate() {
            t.put_in(dir, key, i);
        }
        for key in &keys {
            let flipped: Vec<u8> = key.iter().rev().copied().collect();
            prop_assert_eq!(t.get_in(dir, key), t.get_in(dir.reverse(), &flipped));
            prop_assert_eq!(
                t.get_shortest_prefix_in(dir, key),
                t.get_shortest_prefix_in(dir.reverse(), &flipped)
            );
        }
    }

    #[test]
    fn prop_shortest_prefix_never_longer_than_exact(keys in prop::collection::vec(key_strategy(), 1..=32), probe in key_strategy()) {
        let mut t: Tst<usize> = Tst::new();
        for key in &keys {
            t.put(key, key.len());
        }
        // The value is the key length, so a hit tells how long the prefix was.
        if let Some(&exact) = t.get(&probe) {
            let shortest = t.get_shortest_prefix(&probe).copied();
            prop_assert!(matches!(shortest, Some(len) if len <= exact));
        }
        if let Some(&len) = t.get_shortest_prefix(&probe) {
            prop_assert!(len >= 1 && len <= probe.len());
            prop_assert!(t.contains_key(&probe[..len]));
        }
    }
}

/// Calls `f` once with every ordering of `items`.
fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn permute<T: Clone>(buf: &mut Vec<T>, fixed: usize, f: &mut impl FnMut(Vec<T>)) {
        if fixed == buf.len() {
            f(buf.clone());
            return;
        }
        for i in fixed..buf.len() {
            buf.swap(fixed, i);
            permute(buf, fixed + 1, f);
            buf.swap(fixed, i);
        }
    }

    permute(&mut items.to_vec(), 0, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<Vec<u8>> = vec![
        b"a".to_vec(),
        b"b".to_vec(),
        b"c".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"ba".to_vec(),
    ];

    let mut orderings = 0usize;
    for_each_permutation(&keys, |perm| {
        orderings += 1;
        let mut t: Tst<u64> = Tst::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            t.put(&k, v);
            m.insert(k, v);
        }

        validate_tree(&t, m.len());
        assert_eq!(t.node_count(), 6);
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(got, expected);
        for k in m.keys() {
            assert_eq!(t.get_shortest_prefix(k), m.get(&k[..1]));
        }
    });
    assert_eq!(orderings, 720);
}
