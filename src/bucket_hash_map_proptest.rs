#![cfg(test)]

// Property tests for BucketedHashMap kept inside the crate so they can
// inspect the bucket table directly.

use crate::bucket_hash_map::BucketedHashMap;
use crate::error::Error;
use crate::load_factor::MIN_CAPACITY;
use crate::table::bucket_index;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Assign(usize, i32),
    Subscript(usize, i32),
    Erase(usize),
    At(usize),
    Contains(String),
    BucketSize(usize),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Assign(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Subscript(i, v)),
            5 => idx.clone().prop_map(Op::Erase),
            2 => idx.clone().prop_map(Op::At),
            1 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(Op::Contains),
            1 => idx.clone().prop_map(Op::BucketSize),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..160).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_load_factors() -> impl Strategy<Value = (f64, f64)> {
    prop_oneof![Just((0.25, 0.75)), Just((0.25, 0.5)), Just((0.2, 0.45))]
}

// Structural invariants checked after every operation:
// - capacity is a power of two and at least MIN_CAPACITY;
// - every entry sits in the bucket its cached hash maps to;
// - the bucket lengths sum to `len`;
// - the load factor stays inside the configured bounds, except that a
//   table at MIN_CAPACITY may be under-full. `clear` keeps capacity, so the
//   lower bound is only checked while `full_history` holds.
fn check_structure<K, V, S>(
    m: &BucketedHashMap<K, V, S>,
    lower: f64,
    upper: f64,
    full_history: bool,
) -> Result<(), TestCaseError> {
    let cap = m.capacity();
    prop_assert!(cap.is_power_of_two());
    prop_assert!(cap >= MIN_CAPACITY);
    let mut total = 0;
    for (b, bucket) in m.buckets().iter().enumerate() {
        for e in bucket {
            prop_assert_eq!(bucket_index(e.hash, cap), b);
        }
        total += bucket.len();
    }
    prop_assert_eq!(total, m.len());
    let lf = m.load_factor();
    prop_assert!(lf <= upper, "load factor {} above {}", lf, upper);
    if full_history && cap > MIN_CAPACITY {
        prop_assert!(lf >= lower, "load factor {} below {}", lf, lower);
    }
    Ok(())
}

fn run_scenario<S: BuildHasher>(
    mut sut: BucketedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
    (lower, upper): (f64, f64),
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut cleared = false;

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                prop_assert_eq!(sut.insert(k.clone(), v), !already);
                model.entry(k).or_insert(v);
            }
            Op::Assign(i, v) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.insert_or_replace(k.clone(), v), model.insert(k, v));
            }
            Op::Subscript(i, v) => {
                let k = key_from(&pool, i);
                let slot = sut.get_or_insert_default(k.clone());
                prop_assert_eq!(*slot, model.get(&k).copied().unwrap_or_default());
                *slot = v;
                model.insert(k, v);
            }
            Op::Erase(i) => {
                let k = key_from(&pool, i);
                let len_before = sut.len();
                let removed = sut.erase(&k);
                prop_assert_eq!(removed, model.remove(&k).is_some());
                if !removed {
                    prop_assert_eq!(sut.len(), len_before);
                }
            }
            Op::At(i) => {
                let k = key_from(&pool, i);
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(sut.at(&k), Ok(v)),
                    None => prop_assert_eq!(sut.at(&k), Err(Error::KeyNotFound)),
                }
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::BucketSize(i) => {
                let k = key_from(&pool, i);
                let index = sut.bucket_index(&k);
                let expected = model
                    .keys()
                    .filter(|other| sut.bucket_index(*other) == index)
                    .count();
                match sut.bucket_size(&k) {
                    Ok(n) => prop_assert_eq!(n, expected),
                    Err(Error::EmptyBucket { index: got }) => {
                        prop_assert_eq!(expected, 0);
                        prop_assert_eq!(got, index);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
            Op::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                cleared = true;
                prop_assert_eq!(sut.capacity(), cap);
            }
            Op::Iterate => {
                let s: BTreeMap<_, _> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
                // Two walks over an unmutated table agree on order.
                let first: Vec<&Key> = sut.keys().collect();
                let second: Vec<&Key> = sut.keys().collect();
                prop_assert_eq!(first, second);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut, lower, upper, !cleared)?;
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap,
// with the resize and placement invariants checked after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), lf in arb_load_factors()) {
        let sut = BucketedHashMap::with_load_factors(lf.0, lf.1).unwrap();
        run_scenario(sut, pool, ops, lf)?;
    }
}

// Collision variant using a constant hasher: every key shares bucket 0,
// which stresses equality resolution and bucket bookkeeping across resizes.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), lf in arb_load_factors()) {
        let load_factors = crate::LoadFactors::new(lf.0, lf.1).unwrap();
        let sut = BucketedHashMap::with_load_factors_and_hasher(load_factors, ConstBuildHasher);
        run_scenario(sut, pool, ops, lf)?;
    }
}

// Property: a cursor walks exactly the entries `iter` yields, in the same
// order, and goes stale after a growing insert or a shrinking erase.
proptest! {
    #[test]
    fn prop_cursor_matches_iter(n in 0usize..200) {
        let mut m: BucketedHashMap<usize, usize> = (0..n).map(|i| (i, i)).collect();
        let mut cursor = m.cursor();
        let mut walked = Vec::new();
        while let Some((k, _)) = cursor.advance(&m).unwrap() {
            walked.push(*k);
        }
        let iterated: Vec<usize> = m.keys().copied().collect();
        prop_assert_eq!(walked, iterated);

        let cap = m.capacity();
        let mut stale = m.cursor();
        let mut extra = n;
        while m.capacity() == cap {
            m.insert(extra, extra);
            extra += 1;
        }
        prop_assert_eq!(stale.advance(&m), Err(Error::StaleCursor));

        // Growth left the table above the floor, so erasing enough entries
        // halves it again.
        let grown = m.capacity();
        prop_assert!(grown > MIN_CAPACITY);
        let mut stale = m.cursor();
        for k in 0..extra {
            prop_assert!(stale.is_valid_for(&m));
            m.erase(&k);
            if m.capacity() != grown {
                break;
            }
        }
        prop_assert_eq!(m.capacity(), grown / 2);
        prop_assert_eq!(stale.advance(&m), Err(Error::StaleCursor));
    }
}
