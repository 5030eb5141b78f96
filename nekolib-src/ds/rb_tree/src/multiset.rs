use std::{fmt, ops::RangeBounds};

use crate::{
    compare::{Compare, Natural},
    cursor::{Cursor, IntoIter, Iter, Position, Range},
    tree::{EraseError, RbTree},
};

/// Ordered collection of keys where equal keys may repeat.
///
/// Equal keys are kept in insertion order.
///
/// # Examples
/// ```
/// use rb_tree::RbMultiset;
///
/// let ms = RbMultiset::from([3, 1, 2, 2, 5]);
/// assert_eq!(ms.count(&2), 2);
///
/// let (lo, hi) = ms.equal_range(&2);
/// assert_eq!(lo.get(), Some(&2));
/// assert_eq!(hi.get(), Some(&3));
/// ```
pub struct RbMultiset<K, C = Natural> {
    tree: RbTree<K, C>,
}

impl<K: Ord> RbMultiset<K> {
    pub fn new() -> Self { Self { tree: RbTree::new() } }
}

impl<K, C> RbMultiset<K, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self { tree: RbTree::with_comparator(cmp) }
    }

    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn max_size(&self) -> usize { self.tree.max_size() }
    pub fn clear(&mut self) { self.tree.clear() }

    /// Removes the key at `pos` and returns it. Other copies of an equal
    /// key are untouched.
    ///
    /// # Panics
    /// Panics if `pos` is the end position or no longer designates a key
    /// of this multiset.
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

impl<K, C: Compare<K>> RbMultiset<K, C> {
    /// Inserts `key` after every key equal to it.
    pub fn insert(&mut self, key: K) -> Position { self.tree.insert_equal(key) }
    /// Inserts each key in order. Every flag is `true`.
    pub fn insert_many<I: IntoIterator<Item = K>>(
        &mut self,
        keys: I,
    ) -> Vec<(Position, bool)> {
        keys.into_iter().map(|key| (self.insert(key), true)).collect()
    }
    /// Removes one key equal to `key`, if any.
    pub fn remove(&mut self, key: &K) -> Option<K> { self.tree.remove(key) }

    /// Moves every key of `other` into `self`, leaving `other` empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge_with(&mut other.tree, |_, _| true, false);
    }

    /// Returns a cursor at some key equal to `key`, or the end cursor.
    /// Use [`lower_bound`](Self::lower_bound) for the first one.
    pub fn find(&self, key: &K) -> Cursor<'_, K, C> {
        self.tree.cursor(self.tree.search(key)).unwrap_or(self.tree.end())
    }
    pub fn contains(&self, key: &K) -> bool { self.tree.contains(key) }
    pub fn count(&self, key: &K) -> usize { self.tree.count(key) }
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

impl<K: Ord> Default for RbMultiset<K> {
    fn default() -> Self { Self::new() }
}

impl<K: Clone, C: Clone> Clone for RbMultiset<K, C> {
    fn clone(&self) -> Self { Self { tree: self.tree.clone() } }
}

impl<K: fmt::Debug, C> fmt::Debug for RbMultiset<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K: PartialEq, C> PartialEq for RbMultiset<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
impl<K: Eq, C> Eq for RbMultiset<K, C> {}

impl<K: Ord> FromIterator<K> for RbMultiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut ms = Self::new();
        ms.extend(iter);
        ms
    }
}

impl<K, C: Compare<K>> Extend<K> for RbMultiset<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for RbMultiset<K> {
    fn from(keys: [K; N]) -> Self { keys.into_iter().collect() }
}

impl<K, C> IntoIterator for RbMultiset<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K, C>;
    fn into_iter(self) -> Self::IntoIter { self.tree.into_iter() }
}

impl<'a, K, C> IntoIterator for &'a RbMultiset<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use sorted_bag::SortedBag;

    use super::*;
    use crate::debug::assert_invariants;

    fn keys<K: Clone, C>(ms: &RbMultiset<K, C>) -> Vec<K> {
        ms.iter().cloned().collect()
    }

    fn distance<K, C>(
        mut from: Cursor<'_, K, C>,
        to: Cursor<'_, K, C>,
    ) -> usize {
        let mut res = 0;
        while from != to {
            from.move_next();
            res += 1;
        }
        res
    }

    #[test]
    fn construction_and_moves() {
        let empty = RbMultiset::<i32>::new();
        assert!(empty.is_empty());
        assert_eq!(empty.begin(), empty.end());

        let mut b = RbMultiset::from([3, 1, 2, 2, 5]);
        assert_eq!(b.len(), 5);
        assert_eq!(keys(&b), [1, 2, 2, 3, 5]);

        let c = b.clone();
        assert_eq!(c, b);
        let d = mem::take(&mut b);
        assert!(b.is_empty());
        assert_eq!(keys(&d), [1, 2, 2, 3, 5]);
        assert_eq!(format!("{d:?}"), "{1, 2, 2, 3, 5}");
        assert_eq!(d.max_size(), c.max_size());
        assert!(d.max_size() > 1000);
    }

    #[test]
    fn iterators() {
        let ms = RbMultiset::from([3, 1, 2, 2, 5]);
        let mut cur = ms.begin();
        for expected in [1, 2, 2, 3, 5] {
            assert_eq!(cur.get(), Some(&expected));
            cur.move_next();
        }
        assert_eq!(cur, ms.end());
        for expected in [5, 3, 2, 2, 1] {
            cur.move_prev();
            assert_eq!(cur.get(), Some(&expected));
        }
        assert_eq!(cur, ms.begin());
        assert_eq!(ms.iter().rev().copied().collect::<Vec<_>>(), [5, 3, 2, 2, 1]);

        let one = RbMultiset::from([42]);
        let mut cur = one.begin();
        assert_eq!(cur.get(), Some(&42));
        cur.move_next();
        assert_eq!(cur, one.end());
    }

    #[test]
    fn modifiers() {
        let mut ms = RbMultiset::new();
        let p3 = ms.insert(3);
        assert_eq!(ms.get(p3), Some(&3));
        let p1 = ms.insert(1);
        assert_eq!(ms.get(p1), Some(&1));
        ms.insert(2);
        ms.insert(2);
        assert_eq!(ms.len(), 4);
        assert_eq!(keys(&ms), [1, 2, 2, 3]);

        let res = ms.insert_many([5, 5, 1]);
        assert_eq!(res.len(), 3);
        assert!(res.iter().all(|&(_, inserted)| inserted));
        assert_eq!(ms.count(&5), 2);
        assert_eq!(ms.count(&1), 2);
        assert_eq!(ms.len(), 7);

        let first2 = ms.lower_bound(&2);
        assert_eq!(first2.get(), Some(&2));
        let pos = first2.position();
        ms.erase(pos);
        assert_eq!(ms.count(&2), 1);
        assert_eq!(ms.len(), 6);

        ms.clear();
        assert!(ms.is_empty());
        assert_eq!(ms.begin(), ms.end());
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let by_first = |l: &(i32, char), r: &(i32, char)| l.0.cmp(&r.0);
        let mut ms = RbMultiset::with_comparator(by_first);
        ms.extend([(2, 'a'), (1, 'x'), (2, 'b'), (3, 'y'), (2, 'c')]);
        assert_eq!(ms.count(&(2, '?')), 3);
        let tags: Vec<_> = ms.range((2, '?')..=(2, '?')).map(|p| p.1).collect();
        assert_eq!(tags, ['a', 'b', 'c']);
        assert_invariants(&ms.tree, false);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = RbMultiset::from([1, 1, 4]);
        let mut b = RbMultiset::from([2, 3]);
        a.swap(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
        assert_eq!(a.count(&2), 1);
        assert_eq!(a.count(&3), 1);
        assert_eq!(b.count(&1), 2);
        assert_eq!(b.count(&4), 1);
    }

    #[test]
    fn merge_moves_everything() {
        let mut x = RbMultiset::from([1, 2, 2]);
        let mut y = RbMultiset::from([2, 3]);
        x.merge(&mut y);
        assert!(y.is_empty());
        assert_eq!(keys(&x), [1, 2, 2, 2, 3]);
        assert_invariants(&x.tree, false);

        let mut dst = RbMultiset::new();
        let mut src = RbMultiset::from([4, 1, 4, 2]);
        dst.merge(&mut src);
        assert!(src.is_empty());
        assert_eq!(keys(&dst), [1, 2, 4, 4]);

        let mut dst = RbMultiset::from([5, 6]);
        let mut src = RbMultiset::new();
        dst.merge(&mut src);
        assert!(src.is_empty());
        assert_eq!(keys(&dst), [5, 6]);
    }

    #[test]
    fn merged_duplicates_go_after_existing_ones() {
        let by_first = |l: &(i32, char), r: &(i32, char)| l.0.cmp(&r.0);
        let mut dst = RbMultiset::with_comparator(by_first);
        let mut src = RbMultiset::with_comparator(by_first);
        dst.extend([(1, 'a'), (1, 'b')]);
        src.extend([(1, 'c'), (0, 'z')]);
        dst.merge(&mut src);
        let tags: Vec<_> = dst.iter().map(|p| p.1).collect();
        assert_eq!(tags, ['z', 'a', 'b', 'c']);
    }

    #[test]
    fn lookup_on_empty() {
        let ms = RbMultiset::<i32>::new();
        assert_eq!(ms.count(&10), 0);
        assert!(!ms.contains(&10));
        assert_eq!(ms.find(&10), ms.end());
        assert_eq!(ms.lower_bound(&10), ms.end());
        assert_eq!(ms.upper_bound(&10), ms.end());
        assert_eq!(ms.equal_range(&10), (ms.end(), ms.end()));
    }

    #[test]
    fn lookup() {
        let ms = RbMultiset::from([3, 1, 2, 2, 5]);

        assert!(ms.contains(&2));
        assert_eq!(ms.find(&2).get(), Some(&2));
        let (lo, hi) = ms.equal_range(&2);
        assert_eq!(lo.get(), Some(&2));
        assert_eq!(hi.get(), Some(&3));
        assert_eq!(distance(lo, hi), 2);

        assert_eq!(ms.lower_bound(&5).get(), Some(&5));
        assert_eq!(ms.upper_bound(&5), ms.end());

        // absent, between keys
        assert!(!ms.contains(&4));
        assert_eq!(ms.count(&4), 0);
        assert_eq!(ms.find(&4), ms.end());
        let (lo, hi) = ms.equal_range(&4);
        assert_eq!(lo.get(), Some(&5));
        assert_eq!(hi.get(), Some(&5));

        // below the minimum
        assert_eq!(ms.find(&0), ms.end());
        assert_eq!(ms.lower_bound(&0).get(), Some(&1));
        assert_eq!(ms.upper_bound(&0).get(), Some(&1));

        // above the maximum
        assert_eq!(ms.find(&6), ms.end());
        assert_eq!(ms.equal_range(&6), (ms.end(), ms.end()));

        let dup = RbMultiset::from([2, 2, 2]);
        let (lo, hi) = dup.equal_range(&2);
        assert_eq!(lo, dup.begin());
        assert_eq!(hi, dup.end());
        assert_eq!(distance(lo, hi), 3);
    }

    #[test]
    fn erase_found_reduces_count_by_one() {
        let mut ms = RbMultiset::from([7, 7, 7, 1, 9]);
        for left in (0..3).rev() {
            let pos = ms.find(&7).position();
            assert_eq!(ms.erase(pos), 7);
            assert_eq!(ms.count(&7), left);
            assert_invariants(&ms.tree, false);
        }
        assert_eq!(ms.find(&7), ms.end());
        assert_eq!(keys(&ms), [1, 9]);
    }

    #[test]
    fn random_against_naive() {
        let mut rng = ChaCha20Rng::seed_from_u64(0xBADCAFE);
        let mut actual = RbMultiset::new();
        let mut expected = SortedBag::new();

        for _ in 0..3000 {
            let key = rng.gen_range(0..100);
            match rng.gen_range(0..5) {
                0 | 1 => {
                    let pos = actual.insert(key);
                    expected.insert_equal(key);
                    assert_eq!(actual.get(pos), Some(&key));
                }
                2 => assert_eq!(actual.remove(&key), expected.remove_one(&key)),
                3 => {
                    if let Some(&last) = actual.last() {
                        let mut cur = actual.end();
                        cur.move_prev();
                        let pos = cur.position();
                        assert_eq!(actual.erase(pos), last);
                        assert_eq!(expected.pop_last(), Some(last));
                    }
                }
                _ => {
                    let (lo, hi) = actual.equal_range(&key);
                    assert_eq!(distance(lo, hi), expected.count(&key));
                    assert!(lo.get().map_or(true, |&k| k >= key));
                }
            }
            assert_invariants(&actual.tree, false);
            assert_eq!(actual.len(), expected.len());
            assert_eq!(actual.count(&key), expected.count(&key));
            assert_eq!(actual.lower_bound(&key).get(), expected.lower_bound(&key));
            assert_eq!(actual.upper_bound(&key).get(), expected.upper_bound(&key));
        }
        assert_eq!(keys(&actual), expected.as_slice());
    }
}
