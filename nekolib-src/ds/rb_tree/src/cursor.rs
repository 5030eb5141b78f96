use std::{
    fmt,
    iter::FusedIterator,
    ops::{Bound, RangeBounds},
    ptr,
};

use crate::{
    compare::Compare,
    node::{
        Direction::{Left, Right},
        Link, NodeId,
    },
    tree::RbTree,
};

/// Detached location in a tree: a node, or one past the last node.
///
/// Unlike [`Cursor`], a position does not borrow the tree, so it can be
/// kept across mutations and handed back to `erase`. A position taken from
/// one tree means nothing to another; it may resolve to an unrelated node
/// there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    At(NodeId),
    End,
}

/// Bidirectional in-order cursor.
///
/// Advancing walks child and parent links only. The tree reference is
/// needed for a single transition: stepping back from the end position
/// to the maximum.
pub struct Cursor<'a, K, C> {
    tree: &'a RbTree<K, C>,
    link: Link,
}

impl<'a, K, C> Cursor<'a, K, C> {
    pub(crate) fn new(tree: &'a RbTree<K, C>, link: Link) -> Self {
        Self { tree, link }
    }

    pub fn get(&self) -> Option<&'a K> {
        self.link.map(|i| &self.tree.node(i).key)
    }
    pub fn is_end(&self) -> bool { self.link.is_none() }
    pub fn position(&self) -> Position { self.tree.position_of(self.link) }

    /// Moves to the successor; the end position stays where it is.
    pub fn move_next(&mut self) {
        if let Some(i) = self.link {
            self.link = self.tree.step(i, Right);
        }
    }
    /// Moves to the predecessor. From the end this is the maximum; from
    /// the minimum this is the end position.
    pub fn move_prev(&mut self) {
        self.link = match self.link {
            Some(i) => self.tree.step(i, Left),
            None => {
                self.tree.root_link().map(|r| self.tree.descend(r, Right))
            }
        };
    }
}

impl<K, C> Clone for Cursor<'_, K, C> {
    fn clone(&self) -> Self { *self }
}
impl<K, C> Copy for Cursor<'_, K, C> {}

impl<K, C> PartialEq for Cursor<'_, K, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.link, other.link) {
            (None, None) => true,
            (Some(l), Some(r)) => l == r && ptr::eq(self.tree, other.tree),
            _ => false,
        }
    }
}
impl<K, C> Eq for Cursor<'_, K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for Cursor<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(key) => f.debug_tuple("Cursor").field(key).finish(),
            None => f.write_str("Cursor(End)"),
        }
    }
}

/// Nodes between `front` and `back`, both inclusive.
pub struct Range<'a, K, C> {
    tree: &'a RbTree<K, C>,
    front: Link,
    back: Link,
}

impl<'a, K, C> Range<'a, K, C> {
    fn take(&mut self, i: usize, toward_back: bool) -> &'a K {
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else if toward_back {
            self.front = self.tree.step(i, Right);
        } else {
            self.back = self.tree.step(i, Left);
        }
        &self.tree.node(i).key
    }
}

impl<'a, K, C> Iterator for Range<'a, K, C> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> {
        let i = self.front?;
        Some(self.take(i, true))
    }
}

impl<'a, K, C> DoubleEndedIterator for Range<'a, K, C> {
    fn next_back(&mut self) -> Option<&'a K> {
        let i = self.back?;
        Some(self.take(i, false))
    }
}

impl<K, C> FusedIterator for Range<'_, K, C> {}

impl<K, C> Clone for Range<'_, K, C> {
    fn clone(&self) -> Self {
        Self { tree: self.tree, front: self.front, back: self.back }
    }
}

pub struct Iter<'a, K, C> {
    range: Range<'a, K, C>,
    len: usize,
}

impl<'a, K, C> Iterator for Iter<'a, K, C> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> {
        let res = self.range.next()?;
        self.len -= 1;
        Some(res)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, C> DoubleEndedIterator for Iter<'a, K, C> {
    fn next_back(&mut self) -> Option<&'a K> {
        let res = self.range.next_back()?;
        self.len -= 1;
        Some(res)
    }
}

impl<K, C> ExactSizeIterator for Iter<'_, K, C> {}
impl<K, C> FusedIterator for Iter<'_, K, C> {}

impl<K, C> Clone for Iter<'_, K, C> {
    fn clone(&self) -> Self {
        Self { range: self.range.clone(), len: self.len }
    }
}

/// Owning in-order iterator; each step erases an extreme node.
pub struct IntoIter<K, C> {
    tree: RbTree<K, C>,
}

impl<K, C> Iterator for IntoIter<K, C> {
    type Item = K;
    fn next(&mut self) -> Option<K> { self.tree.pop_first() }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.tree.len();
        (len, Some(len))
    }
}

impl<K, C> DoubleEndedIterator for IntoIter<K, C> {
    fn next_back(&mut self) -> Option<K> { self.tree.pop_last() }
}

impl<K, C> ExactSizeIterator for IntoIter<K, C> {}
impl<K, C> FusedIterator for IntoIter<K, C> {}

impl<K, C> RbTree<K, C> {
    pub fn iter(&self) -> Iter<'_, K, C> {
        let range = Range {
            tree: self,
            front: self.extreme_link(Left),
            back: self.extreme_link(Right),
        };
        Iter { range, len: self.len() }
    }
}

impl<K, C: Compare<K>> RbTree<K, C> {
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, C> {
        let front = match range.start_bound() {
            Bound::Included(k) => self.lower_bound_link(k),
            Bound::Excluded(k) => self.upper_bound_link(k),
            Bound::Unbounded => self.extreme_link(Left),
        };
        let after = match range.end_bound() {
            Bound::Included(k) => self.upper_bound_link(k),
            Bound::Excluded(k) => self.lower_bound_link(k),
            Bound::Unbounded => None,
        };
        let back = match after {
            Some(i) => self.step(i, Left),
            None => self.extreme_link(Right),
        };
        let empty = match (front, back) {
            (Some(f), Some(b)) => self
                .comparator()
                .less(&self.node(b).key, &self.node(f).key),
            _ => true,
        };
        if empty {
            Range { tree: self, front: None, back: None }
        } else {
            Range { tree: self, front, back }
        }
    }
}

impl<K, C> IntoIterator for RbTree<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K, C>;
    fn into_iter(self) -> Self::IntoIter { IntoIter { tree: self } }
}

impl<'a, K, C> IntoIterator for &'a RbTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
