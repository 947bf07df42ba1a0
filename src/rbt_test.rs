use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;

use std::{cmp, collections::BTreeSet};

#[test]
fn test_rbt() {
    let seed: u64 = random();
    // let seed: u64 = 10860877171078772923;
    println!("test_rbt {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Rbt<u8> = Rbt::new();
    let mut btset: BTreeSet<u8> = BTreeSet::new();

    let mut counts = [0_usize; 3];

    for _i in 0..100_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Insert(key) => {
                counts[0] += 1;
                match (index.insert(key), btset.insert(key)) {
                    (true, true) | (false, false) => (),
                    (a, b) => panic!("insert key {} index:{} btset:{}", key, a, b),
                }
            }
            Op::Search(key) => {
                counts[1] += 1;
                let (a, b) = (index.search(&key), btset.contains(&key));
                assert_eq!(a, b, "for key {}", key);
            }
            Op::Validate => {
                counts[2] += 1;
                index.validate().unwrap();
            }
        }
    }

    index.validate().unwrap();
    for key in btset.iter() {
        assert!(index.search(key), "missing key {}", key);
    }

    println!("counts {:?} len:{}", counts, btset.len());
}

#[test]
fn test_rbt_empty() {
    let index: Rbt<u64> = Rbt::new();
    assert_eq!(index.search(&10), false);
    index.validate().unwrap();
}

#[test]
fn test_rbt_fixup() {
    let mut index: Rbt<i64> = Rbt::new();
    for key in [10, 20, 30].iter() {
        assert!(index.insert(*key), "for key {}", key);
    }

    let root = index.root.unwrap() as usize;
    assert_eq!(index.nodes[root].key, 20);
    assert!(index.nodes[root].black);

    let left = index.nodes[root].left.unwrap() as usize;
    let right = index.nodes[root].right.unwrap() as usize;
    assert_eq!(index.nodes[left].key, 10);
    assert_eq!(index.nodes[right].key, 30);
    assert!(!index.nodes[left].black);
    assert!(!index.nodes[right].black);

    index.validate().unwrap();
}

#[test]
fn test_rbt_fixup_inner() {
    let mut index: Rbt<i64> = Rbt::new();
    for key in [30, 10, 20].iter() {
        assert!(index.insert(*key), "for key {}", key);
    }

    // zig-zag insert order, same shape as the outer fixup case.
    let root = index.root.unwrap() as usize;
    assert_eq!(index.nodes[root].key, 20);
    assert!(index.nodes[root].black);

    let left = index.nodes[root].left.unwrap() as usize;
    let right = index.nodes[root].right.unwrap() as usize;
    assert_eq!(index.nodes[left].key, 10);
    assert_eq!(index.nodes[right].key, 30);
    assert!(!index.nodes[left].black);
    assert!(!index.nodes[right].black);

    index.validate().unwrap();
}

#[test]
fn test_rbt_recolor() {
    let mut index: Rbt<i64> = Rbt::new();
    for key in [10, 5, 15, 12].iter() {
        assert!(index.insert(*key), "for key {}", key);
    }

    // red uncle, the fixup recolors instead of rotating.
    let root = index.root.unwrap() as usize;
    assert_eq!(index.nodes[root].key, 10);
    assert!(index.nodes[root].black);

    let left = index.nodes[root].left.unwrap() as usize;
    let right = index.nodes[root].right.unwrap() as usize;
    assert_eq!(index.nodes[left].key, 5);
    assert_eq!(index.nodes[right].key, 15);
    assert!(index.nodes[left].black);
    assert!(index.nodes[right].black);

    let inner = index.nodes[right].left.unwrap() as usize;
    assert_eq!(index.nodes[inner].key, 12);
    assert!(!index.nodes[inner].black);

    index.validate().unwrap();
}

#[test]
fn test_rbt_duplicate() {
    let mut index: Rbt<i64> = Rbt::new();
    for key in [10, 20, 30].iter() {
        assert!(index.insert(*key), "for key {}", key);
    }

    assert_eq!(index.insert(20), false);
    assert_eq!(index.insert(10), false);
    assert_eq!(index.insert(30), false);

    // no new node got allocated, structure and colors unchanged.
    assert_eq!(index.nodes.len(), 3);
    let root = index.root.unwrap() as usize;
    assert_eq!(index.nodes[root].key, 20);
    assert!(index.nodes[root].black);

    index.validate().unwrap();
}

#[test]
fn test_rbt_ascending() {
    let n = 1000_u32;

    let mut index: Rbt<u32> = Rbt::new();
    for key in 0..n {
        assert!(index.insert(key), "for key {}", key);
    }
    index.validate().unwrap();

    // worst case red-black height is 2 * log2(n+1)
    let bound = (2.0 * f64::from(n + 1).log2()) as usize;
    let height = depth(&index, index.root);
    assert!(height <= bound, "height {} bound {}", height, bound);

    for key in 0..n {
        assert!(index.search(&key), "missing key {}", key);
    }
    assert_eq!(index.search(&n), false);
    assert_eq!(index.search(&10_000), false);
}

fn depth<K>(index: &Rbt<K>, node: Option<u32>) -> usize {
    match node {
        Some(off) => {
            let nref = &index.nodes[off as usize];
            1 + cmp::max(depth(index, nref.left), depth(index, nref.right))
        }
        None => 0,
    }
}

#[derive(Debug, Arbitrary)]
enum Op<K> {
    Insert(K),
    Search(K),
    Validate,
}
