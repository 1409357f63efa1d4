//! Table: bucket storage plus the grow/shrink policy.
//!
//! The table never hashes or compares keys itself. Callers hand it a
//! precomputed hash and an equality predicate, and every entry keeps the
//! hash it was inserted with so rebuilding never calls back into `K: Hash`.

use crate::load_factor::{LoadFactors, MIN_CAPACITY};

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

pub(crate) type Bucket<K, V> = Vec<Entry<K, V>>;

/// `(bucket, slot)` coordinates of a live entry.
pub(crate) type Pos = (usize, usize);

/// Map a hash onto one of `capacity` buckets.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    if capacity.is_power_of_two() {
        (hash as usize) & (capacity - 1)
    } else {
        (hash % capacity as u64) as usize
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    core::iter::repeat_with(Vec::new).take(capacity).collect()
}

#[derive(Clone, Debug)]
pub(crate) struct Table<K, V> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    load_factors: LoadFactors,
    // Bumped whenever bucket coordinates stop meaning what they meant.
    epoch: u64,
}

impl<K, V> Table<K, V> {
    pub(crate) fn new(load_factors: LoadFactors) -> Self {
        Self {
            buckets: empty_buckets(MIN_CAPACITY),
            len: 0,
            load_factors,
            epoch: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn load_factors(&self) -> LoadFactors {
        self.load_factors
    }

    #[inline]
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub(crate) fn buckets(&self) -> &[Bucket<K, V>] {
        &self.buckets
    }

    #[inline]
    pub(crate) fn buckets_mut(&mut self) -> &mut [Bucket<K, V>] {
        &mut self.buckets
    }

    #[inline]
    pub(crate) fn bucket_of(&self, hash: u64) -> usize {
        bucket_index(hash, self.capacity())
    }

    /// Locate the entry with `hash` whose key satisfies `eq`.
    pub(crate) fn find<F>(&self, hash: u64, mut eq: F) -> Option<Pos>
    where
        F: FnMut(&K) -> bool,
    {
        let b = self.bucket_of(hash);
        self.buckets[b]
            .iter()
            .position(|e| e.hash == hash && eq(&e.key))
            .map(|s| (b, s))
    }

    #[inline]
    pub(crate) fn entry(&self, (b, s): Pos) -> &Entry<K, V> {
        &self.buckets[b][s]
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, (b, s): Pos) -> &mut Entry<K, V> {
        &mut self.buckets[b][s]
    }

    /// Append an entry whose key is known to be absent, growing first if
    /// the table would otherwise exceed its upper load factor. Returns the
    /// entry's final position.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) -> Pos {
        if self.load_factors.should_grow(self.len + 1, self.capacity()) {
            self.rebuild(self.capacity() * 2);
        }
        let b = self.bucket_of(entry.hash);
        let bucket = &mut self.buckets[b];
        bucket.push(entry);
        self.len += 1;
        (b, bucket.len() - 1)
    }

    /// Remove the entry at `pos`, then shrink if the table fell below its
    /// lower load factor. Later entries in the same bucket keep their order.
    pub(crate) fn take(&mut self, (b, s): Pos) -> Entry<K, V> {
        let entry = self.buckets[b].remove(s);
        self.len -= 1;
        if self.load_factors.should_shrink(self.len, self.capacity()) {
            self.rebuild(self.capacity() / 2);
        }
        entry
    }

    /// Redistribute every entry into a fresh table of `new_capacity`
    /// buckets, using the cached hashes. `len` is unchanged.
    pub(crate) fn rebuild(&mut self, new_capacity: usize) {
        let old_capacity = self.capacity();
        let mut fresh = empty_buckets(new_capacity);
        for entry in self.buckets.drain(..).flatten() {
            fresh[bucket_index(entry.hash, new_capacity)].push(entry);
        }
        self.buckets = fresh;
        self.epoch = self.epoch.wrapping_add(1);
        log::debug!(
            "rebuilt bucket table: {} -> {} buckets, {} entries",
            old_capacity,
            new_capacity,
            self.len
        );
    }

    /// Drop every entry, keeping the current capacity.
    pub(crate) fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub(crate) fn into_buckets(self) -> Vec<Bucket<K, V>> {
        self.buckets
    }
}
