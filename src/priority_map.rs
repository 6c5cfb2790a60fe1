use std::{borrow::Borrow,
          collections::{hash_map::{Entry as MapEntry, RandomState}, HashMap},
          fmt::{Debug, Formatter},
          hash::{BuildHasher, Hash}};

use serde::{Deserialize, Serialize};

use crate::compare::{Compare, Less};
use crate::error::PriorityMapError;

/// A key together with its priority value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Split this entry into a `(key, value)` pair
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Get the left child index of `index`
fn get_left(index: usize) -> usize {
    2 * index + 1
}

/// Get the right child index of `index`
fn get_right(index: usize) -> usize {
    2 * index + 2
}

/// Get the parent index of `index`, or `None` for the root
fn get_parent(index: usize) -> Option<usize> {
    if index > 0 {
        Some((index - 1) / 2)
    } else {
        None
    }
}

/// Binary heap of unique keys ordered by their values, with an index from every key to its
/// current heap position.
///
/// The entry whose value is greatest under the comparator `C` sits at the top. Keys are
/// addressable, so a value can be changed or an entry removed in `O(log n)` without scanning
/// the heap.
///
/// Both the heap array and the key index hold their own copy of each key, so `K: Clone` is
/// required for every mutation.
#[derive(Clone)]
pub struct PriorityMap<K, V, C = Less, S = RandomState> {
    pub(crate) heap: Vec<Entry<K, V>>,
    positions: HashMap<K, usize, S>,
    cmp: C,
}

impl<K, V> PriorityMap<K, V> {
    /// Create a new empty max-priority map
    pub fn new() -> Self {
        Self::with_comparator(Less)
    }

    /// Create a new empty max-priority map with space for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Less)
    }
}

impl<K, V> Default for PriorityMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> PriorityMap<K, V, C> {
    /// Create a new empty map ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_comparator_and_hasher(cmp, RandomState::new())
    }

    /// Create a new empty map ordered by `cmp` with space for `capacity` entries
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self::with_capacity_comparator_and_hasher(capacity, cmp, RandomState::new())
    }
}

impl<K, V, C, S> PriorityMap<K, V, C, S> {
    /// Create a new empty map ordered by `cmp` whose key index hashes with `hasher`
    pub fn with_comparator_and_hasher(cmp: C, hasher: S) -> Self {
        Self::with_capacity_comparator_and_hasher(0, cmp, hasher)
    }

    /// Create a new empty map with space for `capacity` entries, ordered by `cmp`, whose key
    /// index hashes with `hasher`
    pub fn with_capacity_comparator_and_hasher(capacity: usize, cmp: C, hasher: S) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity_and_hasher(capacity, hasher),
            cmp,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries the heap array can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// The comparator ordering this map
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The hasher of the key index
    pub fn hasher(&self) -> &S {
        self.positions.hasher()
    }

    /// Get the entry with the highest priority, or `None` if the map is empty
    pub fn peek(&self) -> Option<&Entry<K, V>> {
        self.heap.first()
    }

    /// Get the entry with the highest priority.
    /// Returns `PriorityMapError::Empty` if the map holds no entries.
    pub fn top(&self) -> Result<&Entry<K, V>, PriorityMapError> {
        self.peek().ok_or(PriorityMapError::Empty)
    }

    /// All entries in heap array order.
    ///
    /// This is *not* priority order; only the first entry is guaranteed to be the top.
    pub fn as_slice(&self) -> &[Entry<K, V>] {
        &self.heap
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        if !self.heap.is_empty() {
            log::trace!("Clearing {} entries", self.heap.len());
        }
        self.positions.clear();
        self.heap.clear();
    }

    /// Exchange the contents of `self` and `other`
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

impl<K, V, C, S> PriorityMap<K, V, C, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if the map contains `key`
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Get the entry for `key`, or `None` if `key` is not present
    pub fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).map(|&index| &self.heap[index])
    }

    /// Get the value for `key`, or `None` if `key` is not present
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|entry| &entry.value)
    }

    /// Current heap array position of `key`
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).copied()
    }

    /// Reserve space for at least `additional` more entries
    pub fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
        self.positions.reserve(additional);
    }

    /// Shrink both the heap array and the key index as much as possible
    pub fn shrink_to_fit(&mut self) {
        self.heap.shrink_to_fit();
        self.positions.shrink_to_fit();
    }

    /// Register the key at `index` under its current position
    fn set_position(&mut self, index: usize) {
        if let Some(pos) = self.positions.get_mut(&self.heap[index].key) {
            *pos = index;
        }
    }
}

impl<K, V, C, S> PriorityMap<K, V, C, S>
where
    K: Hash + Eq + Clone,
    C: Compare<V>,
    S: BuildHasher,
{
    /// Create a map from `(key, value)` pairs ordered by `cmp` whose key index hashes with
    /// `hasher`.
    /// The first occurrence of a key wins, later duplicates are dropped. The heap is built
    /// bottom-up in `O(n)`.
    pub fn from_pairs_with<I>(pairs: I, cmp: C, hasher: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity_comparator_and_hasher(pairs.size_hint().0, cmp, hasher);
        for (key, value) in pairs {
            if let MapEntry::Vacant(slot) = map.positions.entry(key) {
                let key = slot.key().clone();
                slot.insert(map.heap.len());
                map.heap.push(Entry { key, value });
            }
        }
        map.build_heap();
        map
    }

    /// Establish the heap order over the whole array by sifting down every inner node,
    /// starting from the last one
    fn build_heap(&mut self) {
        if let Some(last_parent) = self.heap.len().checked_sub(1).and_then(get_parent) {
            for index in (0..=last_parent).rev() {
                self.sift_down(index);
            }
            log::debug!("Built heap over {} entries", self.heap.len());
        }
    }

    /// Move the entry at `index` towards the root until its parent is not less than it
    fn sift_up(&mut self, mut index: usize) {
        while let Some(parent) = get_parent(index) {
            if !self.cmp.less(&self.heap[parent].value, &self.heap[index].value) {
                break;
            }
            self.heap.swap(parent, index);
            self.set_position(index);
            index = parent;
        }
        self.set_position(index);
    }

    /// Move the entry at `index` towards the leaves until no child is greater than it
    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = get_left(index);
            if left >= len {
                break;
            }
            let right = get_right(index);

            let mut child = left;
            if right < len && self.cmp.less(&self.heap[left].value, &self.heap[right].value) {
                child = right;
            }
            if !self.cmp.less(&self.heap[index].value, &self.heap[child].value) {
                break;
            }

            self.heap.swap(index, child);
            self.set_position(index);
            index = child;
        }
        self.set_position(index);
    }

    /// Restore the heap order at `index` after its value changed from `old`.
    /// A smaller value can only conflict with the children, a greater or equal one only with
    /// the parent.
    fn resift(&mut self, index: usize, old: &V) {
        if self.cmp.less(&self.heap[index].value, old) {
            self.sift_down(index);
        } else {
            self.sift_up(index);
        }
    }

    /// Overwrite the value at `index` and return the previous one
    fn change_value(&mut self, index: usize, value: V) -> V {
        let old = std::mem::replace(&mut self.heap[index].value, value);
        self.resift(index, &old);
        old
    }

    /// Remove the entry at `index` by moving the last entry into its place
    fn remove_at(&mut self, index: usize) -> Entry<K, V> {
        let removed = self.heap.swap_remove(index);
        self.positions.remove(&removed.key);
        if index < self.heap.len() {
            self.set_position(index);
            self.resift(index, &removed.value);
        }
        removed
    }

    /// Insert `key` with priority `value`.
    /// Returns `false` without changing anything if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let index = self.heap.len();
        match self.positions.entry(key) {
            MapEntry::Occupied(_) => {
                log::trace!("Rejected insert of a key that is already present");
                return false;
            }
            MapEntry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(index);
                self.heap.push(Entry { key, value });
            }
        }
        self.sift_up(index);
        true
    }

    /// Insert a `(key, value)` pair, see [`insert`](Self::insert)
    pub fn insert_entry(&mut self, (key, value): (K, V)) -> bool {
        self.insert(key, value)
    }

    /// Insert `key` with priority `value`.
    /// Returns `PriorityMapError::DuplicateKey` if `key` is already present.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), PriorityMapError> {
        if self.insert(key, value) {
            Ok(())
        } else {
            Err(PriorityMapError::DuplicateKey)
        }
    }

    /// Insert every pair of `pairs` in order. Returns the number of pairs inserted.
    pub fn insert_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter()
            .map(|(key, value)| self.insert(key, value))
            .filter(|&inserted| inserted)
            .count()
    }

    /// Set the priority of `key` to `value`, inserting `key` if it is not present yet.
    /// Returns the previous value if `key` was present.
    pub fn update(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&index) = self.positions.get(&key) {
            return Some(self.change_value(index, value));
        }
        self.insert(key, value);
        None
    }

    /// Update a `(key, value)` pair, see [`update`](Self::update)
    pub fn update_entry(&mut self, (key, value): (K, V)) -> Option<V> {
        self.update(key, value)
    }

    /// Update every pair of `pairs` in order
    pub fn update_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.update(key, value);
        }
    }

    /// Alias for [`update`](Self::update)
    pub fn push(&mut self, key: K, value: V) -> Option<V> {
        self.update(key, value)
    }

    /// Alias for [`update_entry`](Self::update_entry)
    pub fn push_entry(&mut self, pair: (K, V)) -> Option<V> {
        self.update_entry(pair)
    }

    /// Set the priority of the present `key` to `value`.
    /// Returns `false` without changing anything if `key` is not present.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.positions.get(key) {
            Some(&index) => {
                self.change_value(index, value);
                true
            }
            None => {
                log::trace!("Rejected replace of a key that is not present");
                false
            }
        }
    }

    /// Replace a `(key, value)` pair, see [`replace`](Self::replace)
    pub fn replace_entry(&mut self, (key, value): (K, V)) -> bool {
        self.replace(&key, value)
    }

    /// Set the priority of the present `key` to `value`.
    /// Returns `PriorityMapError::MissingKey` if `key` is not present.
    pub fn try_replace<Q>(&mut self, key: &Q, value: V) -> Result<(), PriorityMapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.replace(key, value) {
            Ok(())
        } else {
            Err(PriorityMapError::MissingKey)
        }
    }

    /// Replace every pair of `pairs` in order. Returns the number of pairs replaced.
    pub fn replace_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter()
            .map(|(key, value)| self.replace(&key, value))
            .filter(|&replaced| replaced)
            .count()
    }

    /// Remove `key` and return its value, or `None` if `key` is not present
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = *self.positions.get(key)?;
        Some(self.remove_at(index).value)
    }

    /// Remove `key` if it is present
    pub fn erase<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key);
    }

    /// Remove and return the entry with the highest priority, or `None` if the map is empty
    pub fn pop(&mut self) -> Option<(K, V)> {
        match self.heap.len() {
            0 => None,
            1 => {
                self.positions.clear();
                self.heap.pop().map(Entry::into_pair)
            }
            _ => Some(self.remove_at(0).into_pair()),
        }
    }
}

impl<K, V> PriorityMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Ord,
{
    /// Create a max-priority map from `(key, value)` pairs, see
    /// [`from_pairs_with`](Self::from_pairs_with)
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with(pairs, Less, RandomState::new())
    }
}

impl<K, V, C> PriorityMap<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Compare<V>,
{
    /// Create a map ordered by `cmp` from `(key, value)` pairs, see
    /// [`from_pairs_with`](Self::from_pairs_with)
    pub fn from_pairs_with_comparator<I>(pairs: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with(pairs, cmp, RandomState::new())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for PriorityMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Ord,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K: Debug, V: Debug, C, S> Debug for PriorityMap<K, V, C, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.heap.iter()).finish()
    }
}
