use std::{fmt, ops::RangeBounds};

use crate::{
    compare::{Compare, Natural},
    cursor::{Cursor, IntoIter, Iter, Position, Range},
    tree::{EraseError, RbTree},
};

/// Ordered set of unique keys.
///
/// # Examples
/// ```
/// use rb_tree::RbSet;
///
/// let mut set = RbSet::from([26, 17, 41, 14, 21, 30, 47]);
/// let (_, inserted) = set.insert(17);
/// assert!(!inserted);
///
/// let mut cur = set.find(&41);
/// cur.move_prev();
/// assert_eq!(cur.get(), Some(&30));
/// ```
pub struct RbSet<K, C = Natural> {
    tree: RbTree<K, C>,
}

impl<K: Ord> RbSet<K> {
    pub fn new() -> Self { Self { tree: RbTree::new() } }
}

impl<K, C> RbSet<K, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self { tree: RbTree::with_comparator(cmp) }
    }

    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn max_size(&self) -> usize { self.tree.max_size() }
    pub fn clear(&mut self) { self.tree.clear() }

    /// Removes the key at `pos` and returns it.
    ///
    /// # Panics
    /// Panics if `pos` is the end position or no longer designates a key
    /// of this set.
    pub fn erase(&mut self, pos: Position) -> K { self.tree.erase(pos) }
    pub fn try_erase(&mut self, pos: Position) -> Result<K, EraseError> {
        self.tree.try_erase(pos)
    }
    pub fn swap(&mut self, other: &mut Self) { self.tree.swap(&mut other.tree) }

    pub fn begin(&self) -> Cursor<'_, K, C> { self.tree.begin() }
    pub fn end(&self) -> Cursor<'_, K, C> { self.tree.end() }
    pub fn cursor(&self, pos: Position) -> Option<Cursor<'_, K, C>> {
        self.tree.cursor(pos)
    }
    pub fn get(&self, pos: Position) -> Option<&K> { self.tree.get(pos) }
    pub fn first(&self) -> Option<&K> { self.tree.first() }
    pub fn last(&self) -> Option<&K> { self.tree.last() }
    pub fn pop_first(&mut self) -> Option<K> { self.tree.pop_first() }
    pub fn pop_last(&mut self) -> Option<K> { self.tree.pop_last() }
    pub fn iter(&self) -> Iter<'_, K, C> { self.tree.iter() }
}

impl<K, C: Compare<K>> RbSet<K, C> {
    /// Inserts `key` unless an equal key is present. Returns the position
    /// of the key now in the set and whether `key` was inserted.
    pub fn insert(&mut self, key: K) -> (Position, bool) {
        self.tree.insert_unique(key)
    }
    /// Inserts each key in order, as if by repeated [`insert`](Self::insert).
    pub fn insert_many<I: IntoIterator<Item = K>>(
        &mut self,
        keys: I,
    ) -> Vec<(Position, bool)> {
        keys.into_iter().map(|key| self.insert(key)).collect()
    }
    pub fn remove(&mut self, key: &K) -> Option<K> { self.tree.remove(key) }

    /// Moves the keys of `other` that are not in `self` into `self`.
    /// Keys already present stay in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge_with(&mut other.tree, |dst, key| !dst.contains(key), true);
    }

    pub fn find(&self, key: &K) -> Cursor<'_, K, C> {
        self.tree.cursor(self.tree.search(key)).unwrap_or(self.tree.end())
    }
    pub fn contains(&self, key: &K) -> bool { self.tree.contains(key) }
    pub fn count(&self, key: &K) -> usize { self.contains(key) as usize }
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, C> {
        self.tree.lower_bound(key)
    }
    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, C> {
        self.tree.upper_bound(key)
    }
    pub fn equal_range(
        &self,
        key: &K,
    ) -> (Cursor<'_, K, C>, Cursor<'_, K, C>) {
        self.tree.equal_range(key)
    }
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, C> {
        self.tree.range(range)
    }
}

impl<K: Ord> Default for RbSet<K> {
    fn default() -> Self { Self::new() }
}

impl<K: Clone, C: Clone> Clone for RbSet<K, C> {
    fn clone(&self) -> Self { Self { tree: self.tree.clone() } }
}

impl<K: fmt::Debug, C> fmt::Debug for RbSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K: PartialEq, C> PartialEq for RbSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
impl<K: Eq, C> Eq for RbSet<K, C> {}

impl<K: Ord> FromIterator<K> for RbSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K, C: Compare<K>> Extend<K> for RbSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for RbSet<K> {
    fn from(keys: [K; N]) -> Self { keys.into_iter().collect() }
}

impl<K, C> IntoIterator for RbSet<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K, C>;
    fn into_iter(self) -> Self::IntoIter { self.tree.into_iter() }
}

impl<'a, K, C> IntoIterator for &'a RbSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
