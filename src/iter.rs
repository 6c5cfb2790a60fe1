//! Iteration over a `PriorityMap` and construction from iterators.
//!
//! Every iterator here walks the heap array in storage order. That order is *not* priority
//! order; only the first element yielded is guaranteed to be the top entry.

use std::{hash::{BuildHasher, Hash},
          iter::FusedIterator,
          slice,
          vec};

use crate::compare::Compare;
use crate::priority_map::{Entry, PriorityMap};

/// Borrowing iterator over the entries of a `PriorityMap` in heap array order
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    inner: slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth(n)
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Owning iterator over the `(key, value)` pairs of a `PriorityMap` in heap array order
#[derive(Debug, Clone)]
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Entry::into_pair)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, C, S> PriorityMap<K, V, C, S> {
    /// Iterate over all entries in heap array order, which is not priority order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.heap.iter(),
        }
    }
}

impl<'a, K, V, C, S> IntoIterator for &'a PriorityMap<K, V, C, S> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C, S> IntoIterator for PriorityMap<K, V, C, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.heap.into_iter(),
        }
    }
}

/// Bulk construction, see `PriorityMap::from_pairs_with`
impl<K, V, C, S> FromIterator<(K, V)> for PriorityMap<K, V, C, S>
where
    K: Hash + Eq + Clone,
    C: Compare<V> + Default,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs_with(iter, C::default(), S::default())
    }
}

/// Upserts every pair, see `PriorityMap::update`
impl<K, V, C, S> Extend<(K, V)> for PriorityMap<K, V, C, S>
where
    K: Hash + Eq + Clone,
    C: Compare<V>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        self.update_all(iter);
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use crate::compare::Greater;
    use crate::priority_map::{Entry, PriorityMap};

    #[test]
    fn test_iter_array_order() {
        let map: PriorityMap<_, _> = (0..10).map(|k| (k, k * 3)).collect();
        let slice_keys: Vec<_> = map.as_slice().iter().map(|e| e.key).collect();
        let iter_keys: Vec<_> = map.iter().map(|e| e.key).collect();
        assert_eq!(iter_keys, slice_keys);
        assert_eq!(map.iter().next(), map.peek());
        assert_eq!(map.iter().len(), 10);

        let mut rev: Vec<_> = map.iter().rev().map(|e| e.key).collect();
        rev.reverse();
        assert_eq!(rev, slice_keys);

        // Every iteration starts over from the beginning
        assert_eq!((&map).into_iter().count(), 10);
        assert_eq!((&map).into_iter().count(), 10);
    }

    #[test]
    fn test_iter_every_entry_is_findable() {
        let map: PriorityMap<_, _, Greater> = vec![("a", 3), ("b", 2), ("c", 1)].into_iter().collect();
        for entry in &map {
            assert!(std::ptr::eq(map.find(&entry.key).unwrap(), entry));
        }
        assert_eq!(map.top(), Ok(&Entry { key: "c", value: 1 }));
    }

    #[test]
    fn test_into_iter() {
        let map = PriorityMap::from([(1, 'x'), (2, 'y'), (3, 'z')]);
        let first = map.peek().cloned().unwrap().into_pair();
        let pairs: Vec<_> = map.into_iter().collect();
        assert_eq!(pairs[0], first);

        let as_map: HashMap<_, _> = pairs.into_iter().collect();
        assert_eq!(as_map.len(), 3);
        assert_eq!(as_map[&2], 'y');
    }

    #[test]
    fn test_extend_upserts() {
        let mut map = PriorityMap::from([(1, 1), (2, 2)]);
        map.extend(vec![(1, 10), (3, 3)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.top().unwrap().key, 1);
    }
}
