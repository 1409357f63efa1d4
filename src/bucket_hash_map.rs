//! BucketedHashMap: separately-chained map with load-factor driven resizing.

use crate::error::{Error, Result};
use crate::iter::{Cursor, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::load_factor::{self, LoadFactors};
use crate::reentrancy::OpTracker;
use crate::table::{Bucket, Entry, Pos, Table};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// A map from unique keys to values, stored as a power-of-two array of
/// buckets.
///
/// The table starts with [`MIN_CAPACITY`](crate::MIN_CAPACITY) buckets and
/// doubles when an insert pushes `len / capacity` strictly above the upper
/// load factor; it halves when a removal drops the ratio strictly below the
/// lower load factor, but never below the initial capacity.
///
/// Iteration order is bucket-major. It is unspecified, differs from
/// insertion order, and changes after every resize, but repeated walks of an
/// unmutated map agree.
pub struct BucketedHashMap<K, V, S = DefaultHashBuilder> {
    table: Table<K, V>,
    hasher: S,
    ops: OpTracker,
}

impl<K, V> BucketedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map with the default `0.25..0.75` load factors.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Empty map with explicit load factors.
    pub fn with_load_factors(lower: f64, upper: f64) -> Result<Self> {
        let load_factors = LoadFactors::new(lower, upper)?;
        Ok(Self::with_load_factors_and_hasher(
            load_factors,
            Default::default(),
        ))
    }

    /// Build from parallel key and value sequences, pairing them by
    /// position. A key that appears more than once keeps its last value.
    pub fn from_keys_and_values(keys: Vec<K>, values: Vec<V>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        Ok(keys.into_iter().zip(values).collect())
    }
}

impl<K, V, S> BucketedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_load_factors_and_hasher(LoadFactors::default(), hasher)
    }

    pub fn with_load_factors_and_hasher(load_factors: LoadFactors, hasher: S) -> Self {
        Self {
            table: Table::new(load_factors),
            hasher,
            ops: OpTracker::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        load_factor::ratio(self.len(), self.capacity())
    }

    pub fn load_factors(&self) -> LoadFactors {
        self.table.load_factors()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Remove every entry. Capacity is unchanged; outstanding cursors are
    /// invalidated.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.table.buckets(), self.len())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let len = self.len();
        IterMut::new(self.table.buckets_mut(), len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// A detached cursor positioned before the first entry. See [`Cursor`]
    /// for its invalidation rules.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.table.epoch())
    }

    pub(crate) fn buckets(&self) -> &[Bucket<K, V>] {
        self.table.buckets()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.table.epoch()
    }
}

impl<K, V, S> BucketedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn position<Q>(&self, q: &Q) -> Option<Pos>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.table.find(hash, |k| k.borrow() == q)
    }

    /// Add `key -> value` if `key` is absent. Returns `false`, leaving the
    /// existing value in place, when the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let _op = self.ops.begin("insert");
        let hash = self.make_hash(&key);
        if self.table.find(hash, |k| *k == key).is_some() {
            return false;
        }
        self.table.push(Entry { key, value, hash });
        true
    }

    /// Assignment semantics: store `value` under `key`, returning the value
    /// it replaced. The originally inserted key is kept.
    pub fn insert_or_replace(&mut self, key: K, value: V) -> Option<V> {
        let _op = self.ops.begin("insert_or_replace");
        let hash = self.make_hash(&key);
        match self.table.find(hash, |k| *k == key) {
            Some(pos) => Some(core::mem::replace(
                &mut self.table.entry_mut(pos).value,
                value,
            )),
            None => {
                self.table.push(Entry { key, value, hash });
                None
            }
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin("contains_key");
        self.position(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin("get");
        let pos = self.position(q)?;
        Some(&self.table.entry(pos).value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin("get_key_value");
        let pos = self.position(q)?;
        let e = self.table.entry(pos);
        Some((&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin("get_mut");
        let pos = self.position(q)?;
        Some(&mut self.table.entry_mut(pos).value)
    }

    /// Checked read: [`Error::KeyNotFound`] when `q` is absent.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    /// Checked write-through access: [`Error::KeyNotFound`] when `q` is
    /// absent.
    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(Error::KeyNotFound)
    }

    /// Value for `key`, inserting `default()` first if the key is absent.
    /// `default` only runs when an insert actually happens.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _op = self.ops.begin("get_or_insert_with");
        let hash = self.make_hash(&key);
        let pos = match self.table.find(hash, |k| *k == key) {
            Some(pos) => pos,
            None => {
                let value = default();
                self.table.push(Entry { key, value, hash })
            }
        };
        &mut self.table.entry_mut(pos).value
    }

    /// Subscript semantics: never fails, inserting `V::default()` for an
    /// absent key.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin("remove_entry");
        let pos = self.position(q)?;
        let Entry { key, value, .. } = self.table.take(pos);
        Some((key, value))
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Remove `q` if present. Returns `false` and leaves the map untouched
    /// when it is absent.
    pub fn erase<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }

    /// Bucket `q` maps to under the current capacity, whether or not `q`
    /// is present.
    pub fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin("bucket_index");
        self.table.bucket_of(self.make_hash(q))
    }

    /// Number of entries sharing `q`'s bucket, counting entries with other
    /// keys. Fails with [`Error::EmptyBucket`] when that bucket holds
    /// nothing.
    pub fn bucket_size<Q>(&self, q: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.bucket_index(q);
        match self.table.buckets()[index].len() {
            0 => Err(Error::EmptyBucket { index }),
            n => Ok(n),
        }
    }
}

impl<K, V, S> Default for BucketedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// Deep copy: same hasher, same capacity, same bucket layout.
impl<K, V, S> Clone for BucketedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hasher: self.hasher.clone(),
            ops: OpTracker::new(),
        }
    }
}

/// Content equality: same length, same capacity, and every entry of `self`
/// present in `other` with an equal value. Insertion order is irrelevant.
impl<K, V, S> PartialEq for BucketedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.capacity() == other.capacity()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |w| v == w))
    }
}

impl<K, V, S> Eq for BucketedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for BucketedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Last value wins for repeated keys.
impl<K, V, S> Extend<(K, V)> for BucketedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert_or_replace(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for BucketedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a BucketedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut BucketedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for BucketedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let len = self.len();
        IntoIter::new(self.table.into_buckets(), len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIN_CAPACITY;
    use std::cell::Cell;
    use std::collections::BTreeSet;
    use std::hash::Hasher;

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
        } // every key lands in bucket 0
    }

    /// Invariant: a duplicate insert returns false and keeps the first value.
    #[test]
    fn insert_does_not_overwrite() {
        let mut m: BucketedHashMap<String, i32> = BucketedHashMap::new();
        assert!(m.insert("dup".to_string(), 1));
        assert!(!m.insert("dup".to_string(), 2));
        assert_eq!(m.at("dup"), Ok(&1));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn borrowed_lookup_with_str() {
        let mut m: BucketedHashMap<String, i32> = BucketedHashMap::new();
        m.insert("hello".to_string(), 1);
        assert!(m.contains_key("hello"));
        assert!(!m.contains_key("world"));
        assert_eq!(m.get("hello"), Some(&1));
        assert_eq!(
            m.get_key_value("hello"),
            Some((&"hello".to_string(), &1))
        );
    }

    #[test]
    fn at_reports_missing_keys() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        assert_eq!(m.at(&"nope"), Err(Error::KeyNotFound));
        assert_eq!(m.at_mut(&"nope"), Err(Error::KeyNotFound));
        assert!(m.is_empty());
    }

    #[test]
    fn at_mut_writes_through() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        m.insert("k", 10);
        *m.at_mut(&"k").unwrap() += 5;
        assert_eq!(m.at(&"k"), Ok(&15));
    }

    /// Invariant: subscript access inserts a default for absent keys and
    /// reuses the existing slot otherwise.
    #[test]
    fn get_or_insert_default_assigns() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        *m.get_or_insert_default("k") = 1;
        *m.get_or_insert_default("k") = 2;
        assert_eq!(m.at(&"k"), Ok(&2));
        assert_eq!(*m.get_or_insert_default("fresh"), 0);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn get_or_insert_with_is_lazy() {
        let mut m: BucketedHashMap<String, String> = BucketedHashMap::new();
        let calls = Cell::new(0);
        let make = || {
            calls.set(calls.get() + 1);
            "v".to_string()
        };
        m.get_or_insert_with("k".to_string(), make);
        assert_eq!(calls.get(), 1);
        m.get_or_insert_with("k".to_string(), || {
            calls.set(calls.get() + 1);
            "other".to_string()
        });
        assert_eq!(calls.get(), 1, "constructor must not run for a present key");
        assert_eq!(m.get("k").map(String::as_str), Some("v"));
    }

    /// Invariant: the reference returned across a growth step points at the
    /// newly inserted value in the rebuilt table.
    #[test]
    fn get_or_insert_survives_growth() {
        let mut m: BucketedHashMap<u32, u32> = BucketedHashMap::with_load_factors(0.25, 0.5).unwrap();
        for i in 0..8 {
            m.insert(i, i);
        }
        assert_eq!(m.capacity(), 16);
        *m.get_or_insert_default(99) = 7;
        assert_eq!(m.capacity(), 32);
        assert_eq!(m.at(&99), Ok(&7));
    }

    #[test]
    fn insert_or_replace_returns_previous() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        assert_eq!(m.insert_or_replace("a", 1), None);
        assert_eq!(m.insert_or_replace("a", 2), Some(1));
        assert_eq!(m.at(&"a"), Ok(&2));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn erase_absent_is_noop() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        m.insert("a", 1);
        assert!(!m.erase(&"b"));
        assert_eq!(m.len(), 1);
        assert!(m.erase(&"a"));
        assert!(!m.erase(&"a"));
        assert!(m.is_empty());
    }

    #[test]
    fn remove_returns_owned_pair() {
        let mut m: BucketedHashMap<String, i32> = BucketedHashMap::new();
        m.insert("k".to_string(), 3);
        assert_eq!(m.remove_entry("k"), Some(("k".to_string(), 3)));
        assert_eq!(m.remove("k"), None);
    }

    /// Invariant: `bucket_size` counts every entry colocated in the bucket,
    /// not only the queried key.
    #[test]
    fn bucket_size_counts_colliding_entries() {
        let mut m: BucketedHashMap<&'static str, i32, ConstBuildHasher> =
            BucketedHashMap::with_hasher(ConstBuildHasher);
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        assert_eq!(m.bucket_index(&"zzz"), 0);
        assert_eq!(m.bucket_size(&"a"), Ok(3));
        // Absent keys still address a (non-empty) bucket.
        assert_eq!(m.bucket_size(&"zzz"), Ok(3));
    }

    #[test]
    fn bucket_size_errors_on_empty_bucket() {
        let m: BucketedHashMap<&'static str, i32, ConstBuildHasher> =
            BucketedHashMap::with_hasher(ConstBuildHasher);
        assert_eq!(m.bucket_size(&"a"), Err(Error::EmptyBucket { index: 0 }));
    }

    #[test]
    fn collisions_resolve_by_equality() {
        let mut m: BucketedHashMap<String, i32, ConstBuildHasher> =
            BucketedHashMap::with_hasher(ConstBuildHasher);
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            assert!(m.insert((*k).to_string(), i as i32));
        }
        assert!(m.erase("b"));
        assert_eq!(m.get("a"), Some(&0));
        assert_eq!(m.get("c"), Some(&2));
        assert_eq!(m.get("d"), Some(&3));
        assert_eq!(m.get("b"), None);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut m: BucketedHashMap<u32, u32> = BucketedHashMap::new();
        for i in 0..100 {
            m.insert(i, i);
        }
        let cap = m.capacity();
        assert!(cap > MIN_CAPACITY);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.capacity(), cap);
        assert_eq!(m.iter().count(), 0);
        assert!(!m.contains_key(&5));
    }

    #[test]
    fn iteration_visits_each_entry_once() {
        let mut m: BucketedHashMap<String, i32> = BucketedHashMap::new();
        let keys = ["k1", "k2", "k3"];
        for (i, k) in keys.iter().enumerate() {
            m.insert((*k).to_string(), i as i32);
        }
        let seen: BTreeSet<String> = m.keys().cloned().collect();
        let expected: BTreeSet<String> = keys.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(seen, expected);
        assert_eq!(m.iter().len(), 3);

        for v in m.values_mut() {
            *v += 10;
        }
        let mut values: Vec<i32> = m.values().copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![10, 11, 12]);
    }

    /// Invariant: iteration is bucket-major, matching `bucket_index`.
    #[test]
    fn iteration_is_bucket_major() {
        let mut m: BucketedHashMap<u32, ()> = BucketedHashMap::new();
        for i in 0..10 {
            m.insert(i, ());
        }
        let buckets: Vec<usize> = m.keys().map(|k| m.bucket_index(k)).collect();
        let mut sorted = buckets.clone();
        sorted.sort_unstable();
        assert_eq!(buckets, sorted);
    }

    #[test]
    fn owned_iteration_drains_everything() {
        let m: BucketedHashMap<u32, u32> = (0..40).map(|i| (i, i * 2)).collect();
        let it = m.into_iter();
        assert_eq!(it.len(), 40);
        let mut pairs: Vec<(u32, u32)> = it.collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..40).map(|i| (i, i * 2)).collect::<Vec<_>>());
    }

    #[test]
    fn debug_renders_as_map() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        m.insert("only", 1);
        assert_eq!(format!("{:?}", m), r#"{"only": 1}"#);
    }

    /// Invariant (debug-only): calling back into the map from `K: Eq` while a
    /// lookup is scanning its bucket panics; in release builds this test is skipped.
    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_panics_from_eq_during_lookup() {
        struct ReentryKey {
            id: &'static str,
            map: *const BucketedHashMap<ReentryKey, i32, ConstBuildHasher>,
            trigger: bool,
        }
        impl PartialEq for ReentryKey {
            fn eq(&self, other: &Self) -> bool {
                if self.id == other.id {
                    return true;
                }
                if other.trigger {
                    unsafe {
                        let m = &*other.map;
                        let _ = m.contains_key(self.id);
                    }
                }
                false
            }
        }
        impl Eq for ReentryKey {}
        impl Hash for ReentryKey {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
        impl Borrow<str> for ReentryKey {
            fn borrow(&self) -> &str {
                self.id
            }
        }

        let mut m: BucketedHashMap<ReentryKey, i32, ConstBuildHasher> =
            BucketedHashMap::with_hasher(ConstBuildHasher);
        let map_ptr = &m as *const _;
        m.insert(
            ReentryKey {
                id: "a",
                map: map_ptr,
                trigger: false,
            },
            1,
        );

        let query = ReentryKey {
            id: "b",
            map: &m as *const _,
            trigger: true,
        };
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = m.contains_key(&query);
        }));
        let payload = res.expect_err("expected reentrancy to panic in debug builds");
        let msg = payload.downcast_ref::<String>().expect("formatted panic message");
        assert!(msg.contains("while `contains_key` was running"), "{msg}");
        // The outer operation still ends cleanly.
        assert!(m.contains_key("a"));
    }

    /// Invariant: the map can be used again after a panic escaped from user
    /// code mid-operation.
    #[test]
    fn usable_after_panicking_constructor() {
        let mut m: BucketedHashMap<&'static str, i32> = BucketedHashMap::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.get_or_insert_with("k", || panic!("constructor failed"));
        }));
        assert!(res.is_err());
        assert!(!m.contains_key(&"k"));
        assert!(m.insert("k", 1));
        assert_eq!(m.len(), 1);
    }

    fn const_map(keys: &[&'static str]) -> BucketedHashMap<&'static str, i32, ConstBuildHasher> {
        let mut m = BucketedHashMap::with_hasher(ConstBuildHasher);
        for (i, k) in keys.iter().enumerate() {
            m.insert(*k, i as i32);
        }
        m
    }

    fn drain_cursor(
        cursor: &mut Cursor,
        m: &BucketedHashMap<&'static str, i32, ConstBuildHasher>,
    ) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some((k, _)) = cursor.advance(m).unwrap() {
            out.push(*k);
        }
        out
    }

    /// All keys share bucket 0, so slot order is insertion order. Erasing an
    /// entry the cursor has not reached yet loses nothing that is still live.
    #[test]
    fn cursor_after_erase_ahead_skips_nothing() {
        let mut m = const_map(&["a", "b", "c", "d"]);
        let mut cursor = m.cursor();
        assert_eq!(cursor.advance(&m).unwrap().map(|(k, _)| *k), Some("a"));

        assert!(m.erase(&"c"));
        assert_eq!(m.capacity(), MIN_CAPACITY);
        assert!(cursor.is_valid_for(&m));
        assert_eq!(drain_cursor(&mut cursor, &m), ["b", "d"]);
    }

    /// Erasing an entry the cursor already passed shifts the rest of the
    /// bucket down by one slot, so exactly one live entry is skipped.
    #[test]
    fn cursor_after_erase_behind_skips_one() {
        let mut m = const_map(&["a", "b", "c", "d"]);
        let mut cursor = m.cursor();
        let mut walked = drain_n(&mut cursor, &m, 2);
        assert_eq!(walked, ["a", "b"]);

        assert!(m.erase(&"a"));
        assert!(cursor.is_valid_for(&m));
        walked.extend(drain_cursor(&mut cursor, &m));
        assert_eq!(walked, ["a", "b", "d"]);
        assert!(m.contains_key(&"c"));
    }

    /// A non-resizing insert appends to the bucket and is seen once.
    #[test]
    fn cursor_after_insert_sees_new_entry_once() {
        let mut m = const_map(&["a", "b"]);
        let mut cursor = m.cursor();
        let mut walked = drain_n(&mut cursor, &m, 1);

        assert!(m.insert("e", 9));
        assert!(cursor.is_valid_for(&m));
        walked.extend(drain_cursor(&mut cursor, &m));
        assert_eq!(walked, ["a", "b", "e"]);
    }

    fn drain_n(
        cursor: &mut Cursor,
        m: &BucketedHashMap<&'static str, i32, ConstBuildHasher>,
        n: usize,
    ) -> Vec<&'static str> {
        (0..n)
            .map(|_| *cursor.advance(m).unwrap().expect("entry").0)
            .collect()
    }
}
