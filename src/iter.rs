//! Iteration over a `BucketedHashMap`.
//!
//! Every iterator walks the table bucket by bucket, and within a bucket in
//! slot order. That order is not insertion order and changes whenever the
//! table is rebuilt, but it is the same for every walk over one unmutated
//! table.
//!
//! Borrowing iterators (`Iter`, `IterMut`, `Keys`, `Values`, `ValuesMut`)
//! hold the map borrowed, so the map cannot be mutated while one is alive.
//! `Cursor` is the detached alternative: it stores only a position and the
//! table epoch it was created under, and refuses to advance once the table
//! has been rebuilt or cleared.

use crate::bucket_hash_map::BucketedHashMap;
use crate::error::{Error, Result};
use crate::table::{Bucket, Entry};
use core::iter::FusedIterator;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Position {
    bucket: usize,
    slot: usize,
}

impl Position {
    /// Return the entry at this position and move past it, skipping empty
    /// buckets. `None` once past the last bucket.
    fn step<'a, K, V>(&mut self, buckets: &'a [Bucket<K, V>]) -> Option<&'a Entry<K, V>> {
        while let Some(bucket) = buckets.get(self.bucket) {
            if let Some(e) = bucket.get(self.slot) {
                self.slot += 1;
                return Some(e);
            }
            self.bucket += 1;
            self.slot = 0;
        }
        None
    }
}

/// Iterator over `(&K, &V)` pairs. Cloning it restarts from the clone's
/// current position.
pub struct Iter<'a, K, V> {
    buckets: &'a [Bucket<K, V>],
    pos: Position,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Bucket<K, V>], len: usize) -> Self {
        Self {
            buckets,
            pos: Position::default(),
            remaining: len,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            pos: self.pos,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.pos.step(self.buckets)?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` pairs.
pub struct IterMut<'a, K, V> {
    buckets: core::slice::IterMut<'a, Bucket<K, V>>,
    current: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(buckets: &'a mut [Bucket<K, V>], len: usize) -> Self {
        Self {
            buckets: buckets.iter_mut(),
            current: Default::default(),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                self.remaining -= 1;
                return Some((&e.key, &mut e.value));
            }
            if self.remaining == 0 {
                return None;
            }
            self.current = self.buckets.next()?.iter_mut();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)` pairs.
pub struct IntoIter<K, V> {
    entries: core::iter::Flatten<std::vec::IntoIter<Bucket<K, V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(buckets: Vec<Bucket<K, V>>, len: usize) -> Self {
        Self {
            entries: buckets.into_iter().flatten(),
            remaining: len,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.entries.next()?;
        self.remaining -= 1;
        Some((e.key, e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// Detached `(bucket, slot)` position into a map's table.
///
/// A cursor does not borrow the map, so the map may be mutated between
/// calls to [`Cursor::advance`]. Any operation that rebuilds the table (an
/// insert that grows it, an erase that shrinks it) or clears it invalidates
/// the cursor: `advance` then fails with [`Error::StaleCursor`]. An erase
/// that does not resize shifts the later entries of its bucket down by one,
/// so a cursor positioned after the erased entry in that bucket skips one
/// entry; inserts that do not resize are either seen or not, never twice.
///
/// A cursor is only meaningful for the map that created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,
    epoch: u64,
}

impl Cursor {
    pub(crate) fn new(epoch: u64) -> Self {
        Self {
            pos: Position::default(),
            epoch,
        }
    }

    /// Whether the table has kept its shape since this cursor was created.
    pub fn is_valid_for<K, V, S>(&self, map: &BucketedHashMap<K, V, S>) -> bool {
        map.epoch() == self.epoch
    }

    /// Yield the next pair, or `Ok(None)` once the table is exhausted.
    pub fn advance<'a, K, V, S>(
        &mut self,
        map: &'a BucketedHashMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>> {
        if !self.is_valid_for(map) {
            return Err(Error::StaleCursor);
        }
        Ok(self.pos.step(map.buckets()).map(|e| (&e.key, &e.value)))
    }
}
