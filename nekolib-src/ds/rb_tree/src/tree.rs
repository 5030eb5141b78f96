use std::{cmp::Ordering, error, fmt, mem};

use log::{debug, trace};

use crate::{
    compare::{Compare, Natural},
    cursor::{Cursor, Position},
    node::{
        Arena, Color,
        Direction::{self, Left, Right},
        Link, Node, NodeId, Slot,
    },
};

/// Red-black tree engine shared by [`RbSet`](crate::RbSet) and
/// [`RbMultiset`](crate::RbMultiset).
///
/// Whether equal keys are admitted is decided per call:
/// [`insert_unique`](Self::insert_unique) stops at an equal key and
/// [`insert_equal`](Self::insert_equal) places the new key after it.
pub struct RbTree<K, C = Natural> {
    arena: Arena<K>,
    root: Link,
    cmp: C,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EraseError {
    End,
    Stale(NodeId),
}

impl fmt::Display for EraseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => write!(f, "cannot erase the past-the-end position"),
            Self::Stale(id) => {
                write!(f, "{id:?} does not designate a live node of this tree")
            }
        }
    }
}

impl error::Error for EraseError {}

impl<K: Ord> RbTree<K> {
    pub fn new() -> Self { Self::with_comparator(Natural) }
}

impl<K, C> RbTree<K, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self { arena: Arena::new(), root: None, cmp }
    }

    pub fn len(&self) -> usize { self.arena.len() }
    pub fn is_empty(&self) -> bool { self.root.is_none() }
    pub fn comparator(&self) -> &C { &self.cmp }

    /// Upper bound on the number of nodes the address space could hold.
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Slot<K>>()
    }

    pub fn clear(&mut self) {
        debug!("clear: releasing {} nodes", self.len());
        let mut stack: Vec<_> = self.root.take().into_iter().collect();
        while let Some(i) = stack.pop() {
            let node = self.arena.release(i);
            stack.extend(node.left);
            stack.extend(node.right);
        }
        debug_assert_eq!(self.arena.len(), 0);
    }

    pub fn swap(&mut self, other: &mut Self) { mem::swap(self, other); }

    pub fn begin(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, self.extreme_link(Left))
    }
    pub fn end(&self) -> Cursor<'_, K, C> { Cursor::new(self, None) }
    pub fn cursor(&self, pos: Position) -> Option<Cursor<'_, K, C>> {
        match pos {
            Position::End => Some(self.end()),
            Position::At(id) => {
                self.arena.resolve(id).map(|i| Cursor::new(self, Some(i)))
            }
        }
    }

    pub fn get(&self, pos: Position) -> Option<&K> {
        let Position::At(id) = pos else { return None };
        self.arena.resolve(id).map(|i| &self.arena.node(i).key)
    }
    pub fn first(&self) -> Option<&K> { self.key_of(self.extreme_link(Left)) }
    pub fn last(&self) -> Option<&K> { self.key_of(self.extreme_link(Right)) }

    pub fn next(&self, pos: Position) -> Position {
        self.cursor(pos).map_or(Position::End, |mut cur| {
            cur.move_next();
            cur.position()
        })
    }
    pub fn prev(&self, pos: Position) -> Position {
        self.cursor(pos).map_or(Position::End, |mut cur| {
            cur.move_prev();
            cur.position()
        })
    }

    pub fn erase(&mut self, pos: Position) -> K {
        match self.try_erase(pos) {
            Ok(key) => key,
            Err(e) => panic!("{e}"),
        }
    }
    pub fn try_erase(&mut self, pos: Position) -> Result<K, EraseError> {
        let Position::At(id) = pos else { return Err(EraseError::End) };
        let i = self.arena.resolve(id).ok_or(EraseError::Stale(id))?;
        Ok(self.erase_node(i))
    }

    pub fn pop_first(&mut self) -> Option<K> {
        self.extreme_link(Left).map(|i| self.erase_node(i))
    }
    pub fn pop_last(&mut self) -> Option<K> {
        self.extreme_link(Right).map(|i| self.erase_node(i))
    }

    pub(crate) fn root_link(&self) -> Link { self.root }
    pub(crate) fn node(&self, i: usize) -> &Node<K> { self.arena.node(i) }
    pub(crate) fn position_of(&self, link: Link) -> Position {
        link.map_or(Position::End, |i| Position::At(self.arena.id(i)))
    }
    fn key_of(&self, link: Link) -> Option<&K> {
        link.map(|i| &self.arena.node(i).key)
    }

    fn parent(&self, i: usize) -> Link { self.arena.node(i).parent }
    fn child(&self, i: usize, dir: Direction) -> Link {
        self.arena.node(i).child(dir)
    }
    fn set_child(&mut self, i: usize, dir: Direction, link: Link) {
        *self.arena.node_mut(i).child_mut(dir) = link;
    }
    fn set_parent(&mut self, link: Link, parent: Link) {
        if let Some(i) = link {
            self.arena.node_mut(i).parent = parent;
        }
    }
    fn color_of(&self, link: Link) -> Color {
        link.map_or(Color::Black, |i| self.arena.node(i).color)
    }
    fn set_color(&mut self, link: Link, color: Color) {
        if let Some(i) = link {
            self.arena.node_mut(i).color = color;
        }
    }
    fn side_of(&self, i: usize, parent: usize) -> Direction {
        if self.child(parent, Left) == Some(i) { Left } else { Right }
    }

    /// Leftmost (`Left`) or rightmost (`Right`) node under `i`.
    pub(crate) fn descend(&self, mut i: usize, dir: Direction) -> usize {
        while let Some(c) = self.child(i, dir) {
            i = c;
        }
        i
    }
    pub(crate) fn extreme_link(&self, dir: Direction) -> Link {
        self.root.map(|r| self.descend(r, dir))
    }

    /// In-order neighbor of `i` toward `dir`: the successor for `Right`,
    /// the predecessor for `Left`. `None` once the walk leaves the root.
    pub(crate) fn step(&self, i: usize, dir: Direction) -> Link {
        if let Some(c) = self.child(i, dir) {
            return Some(self.descend(c, dir.opposite()));
        }
        let mut cur = i;
        while let Some(p) = self.parent(cur) {
            if self.child(p, dir) != Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// Lifts `rising` over its parent `dad`, which moves down toward `dir`.
    ///
    /// `rising` must be the `dir.opposite()` child of `dad`, and `grand`
    /// the parent of `dad` (`None` if `dad` is the root).
    fn rotate(
        &mut self,
        rising: usize,
        dad: usize,
        grand: Link,
        dir: Direction,
    ) {
        trace!("rotate {dir:?}: {rising} over {dad}");
        debug_assert_eq!(self.child(dad, dir.opposite()), Some(rising));
        debug_assert_eq!(self.parent(dad), grand);

        let grandson = self.child(rising, dir);
        self.set_child(dad, dir.opposite(), grandson);
        self.set_parent(grandson, Some(dad));

        self.set_child(rising, dir, Some(dad));
        self.arena.node_mut(dad).parent = Some(rising);

        self.arena.node_mut(rising).parent = grand;
        match grand {
            None => self.root = Some(rising),
            Some(g) => {
                let side = self.side_of(dad, g);
                self.set_child(g, side, Some(rising));
            }
        }
    }

    /// Puts `new` where `old` hangs, keeping `old`'s own links untouched.
    fn transplant(&mut self, old: usize, new: Link) {
        let p = self.parent(old);
        match p {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(old, p);
                self.set_child(p, side, new);
            }
        }
        self.set_parent(new, p);
    }

    fn link_new(&mut self, key: K, parent: Link, dir: Direction) -> usize {
        let new = self.arena.alloc(Node::new(key));
        match parent {
            None => self.root = Some(new),
            Some(p) => {
                self.arena.node_mut(new).parent = Some(p);
                self.set_child(p, dir, Some(new));
            }
        }
        self.balance(new);
        new
    }

    fn balance(&mut self, mut node: usize) {
        while let Some(dad) = self.parent(node) {
            if self.color_of(Some(dad)) == Color::Black {
                break;
            }
            // a red node is never the root once balanced, but the walk may
            // have just painted the root red
            let Some(grand) = self.parent(dad) else { break };
            let side = self.side_of(dad, grand);
            let uncle = self.child(grand, side.opposite());

            if self.color_of(uncle) == Color::Red {
                trace!("balance: recolor at {grand}");
                self.set_color(Some(dad), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grand), Color::Red);
                node = grand;
                continue;
            }

            let mut dad = dad;
            if self.child(dad, side.opposite()) == Some(node) {
                // inner child: turn it into an outer one first
                self.rotate(node, dad, Some(grand), side);
                dad = node;
            }
            self.set_color(Some(dad), Color::Black);
            self.set_color(Some(grand), Color::Red);
            let great = self.parent(grand);
            self.rotate(dad, grand, great, side.opposite());
            break;
        }
        self.set_color(self.root, Color::Black);
    }

    fn erase_node(&mut self, n: usize) -> K {
        let Node { left, right, color, .. } = *self.arena.node(n);
        match (left, right) {
            (Some(l), Some(r)) => {
                let s = self.descend(r, Left);
                let s_color = self.color_of(Some(s));
                let x = self.child(s, Right);
                trace!("erase {n}: two children, successor {s}");

                let x_parent = if self.parent(s) == Some(n) {
                    s
                } else {
                    let Some(sp) = self.parent(s) else {
                        unreachable!("successor {s} has no parent");
                    };
                    self.transplant(s, x);
                    self.set_child(s, Right, Some(r));
                    self.set_parent(Some(r), Some(s));
                    sp
                };

                self.transplant(n, Some(s));
                self.set_child(s, Left, Some(l));
                self.set_parent(Some(l), Some(s));
                self.set_color(Some(s), color);

                let key = self.arena.release(n).key;
                if s_color == Color::Black {
                    self.erase_fixup(x, Some(x_parent));
                }
                key
            }
            (None, None) => {
                trace!("erase {n}: {color:?} leaf");
                let p = self.parent(n);
                self.transplant(n, None);
                let key = self.arena.release(n).key;
                if color == Color::Black {
                    self.erase_fixup(None, p);
                }
                key
            }
            (Some(c), None) | (None, Some(c)) => {
                // the lone child of a black node is a red leaf
                trace!("erase {n}: one child {c}");
                debug_assert_eq!(color, Color::Black);
                self.transplant(n, Some(c));
                self.set_color(Some(c), Color::Black);
                self.arena.release(n).key
            }
        }
    }

    /// Resolves the extra black carried by `x` (possibly a null leaf)
    /// hanging under `parent`.
    fn erase_fixup(&mut self, mut x: Link, mut parent: Link) {
        while x != self.root && self.color_of(x) == Color::Black {
            let Some(p) = parent else { break };
            let side = if self.child(p, Left) == x { Left } else { Right };
            let far = side.opposite();

            let mut w = self.child(p, far);
            if self.color_of(w) == Color::Red {
                self.set_color(w, Color::Black);
                self.set_color(Some(p), Color::Red);
                if let Some(wi) = w {
                    let g = self.parent(p);
                    self.rotate(wi, p, g, side);
                }
                w = self.child(p, far);
            }

            let near_child = w.and_then(|wi| self.child(wi, side));
            let far_child = w.and_then(|wi| self.child(wi, far));
            if self.color_of(near_child) == Color::Black
                && self.color_of(far_child) == Color::Black
            {
                self.set_color(w, Color::Red);
                x = Some(p);
                parent = self.parent(p);
                continue;
            }

            if self.color_of(far_child) == Color::Black {
                self.set_color(near_child, Color::Black);
                self.set_color(w, Color::Red);
                if let (Some(wi), Some(ni)) = (w, near_child) {
                    self.rotate(ni, wi, Some(p), far);
                }
                w = self.child(p, far);
            }
            let p_color = self.color_of(Some(p));
            self.set_color(w, p_color);
            self.set_color(Some(p), Color::Black);
            let far_child = w.and_then(|wi| self.child(wi, far));
            self.set_color(far_child, Color::Black);
            if let Some(wi) = w {
                let g = self.parent(p);
                self.rotate(wi, p, g, side);
            }
            x = self.root;
            break;
        }
        self.set_color(x, Color::Black);
        self.set_color(self.root, Color::Black);
    }
}

impl<K, C: Compare<K>> RbTree<K, C> {
    /// Returns the first node equal to `key` met while descending; with
    /// duplicates this is not necessarily the first one in order.
    pub fn search(&self, key: &K) -> Position {
        self.position_of(self.search_link(key))
    }
    fn search_link(&self, key: &K) -> Link {
        let mut cur = self.root;
        while let Some(i) = cur {
            let node = self.arena.node(i);
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(i),
            };
        }
        None
    }

    pub fn insert_unique(&mut self, key: K) -> (Position, bool) {
        let (i, inserted) = self.insert_with(key, true);
        (self.position_of(Some(i)), inserted)
    }
    pub fn insert_equal(&mut self, key: K) -> Position {
        let (i, _) = self.insert_with(key, false);
        self.position_of(Some(i))
    }

    fn insert_with(&mut self, key: K, unique: bool) -> (usize, bool) {
        let mut parent = None;
        let mut dir = Left;
        let mut cur = self.root;
        while let Some(i) = cur {
            let node = self.arena.node(i);
            dir = match self.cmp.compare(&key, &node.key) {
                Ordering::Less => Left,
                Ordering::Equal if unique => return (i, false),
                _ => Right,
            };
            parent = Some(i);
            cur = node.child(dir);
        }
        (self.link_new(key, parent, dir), true)
    }

    pub fn contains(&self, key: &K) -> bool { self.search_link(key).is_some() }

    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, C> {
        Cursor::new(self, self.lower_bound_link(key))
    }
    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, C> {
        Cursor::new(self, self.upper_bound_link(key))
    }
    pub fn equal_range(
        &self,
        key: &K,
    ) -> (Cursor<'_, K, C>, Cursor<'_, K, C>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// First node not less than `key`.
    pub(crate) fn lower_bound_link(&self, key: &K) -> Link {
        self.bound_link(|node_key| !self.cmp.less(node_key, key))
    }
    /// First node greater than `key`.
    pub(crate) fn upper_bound_link(&self, key: &K) -> Link {
        self.bound_link(|node_key| self.cmp.less(key, node_key))
    }
    fn bound_link(&self, pred: impl Fn(&K) -> bool) -> Link {
        let mut cur = self.root;
        let mut res = None;
        while let Some(i) = cur {
            let node = self.arena.node(i);
            if pred(&node.key) {
                res = Some(i);
                cur = node.left;
            } else {
                cur = node.right;
            }
        }
        res
    }

    pub fn count(&self, key: &K) -> usize {
        let end = self.upper_bound_link(key);
        let mut cur = self.lower_bound_link(key);
        let mut res = 0;
        while cur != end {
            let Some(i) = cur else { break };
            res += 1;
            cur = self.step(i, Right);
        }
        res
    }

    /// Removes one node equal to `key`, if any.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let i = self.lower_bound_link(key)?;
        if self.cmp.less(key, &self.arena.node(i).key) {
            return None;
        }
        Some(self.erase_node(i))
    }

    /// Moves every key of `other` that `accept` admits into `self`,
    /// leaving the rest in `other`.
    pub(crate) fn merge_with(
        &mut self,
        other: &mut Self,
        mut accept: impl FnMut(&Self, &K) -> bool,
        unique: bool,
    ) {
        let before = other.len();
        let mut cur = other.extreme_link(Left);
        while let Some(i) = cur {
            // erasing relinks nodes instead of moving keys, so the
            // successor stays valid
            cur = other.step(i, Right);
            if accept(&*self, &other.arena.node(i).key) {
                let key = other.erase_node(i);
                self.insert_with(key, unique);
            }
        }
        debug!("merge: moved {} of {before} keys", before - other.len());
    }
}

impl<K: Ord> Default for RbTree<K> {
    fn default() -> Self { Self::new() }
}

impl<K: Clone, C: Clone> Clone for RbTree<K, C> {
    fn clone(&self) -> Self {
        let mut arena = Arena::with_capacity(self.len());
        let root = self.root.map(|src_root| {
            let copy_of = |arena: &mut Arena<_>, src: &Node<K>, parent| {
                let mut node = Node::new(src.key.clone());
                node.color = src.color;
                node.parent = parent;
                arena.alloc(node)
            };
            let dst_root =
                copy_of(&mut arena, self.arena.node(src_root), None);
            // pre-order, parents are copied before their children
            let mut stack = vec![(src_root, dst_root)];
            while let Some((src, dst)) = stack.pop() {
                for dir in [Left, Right] {
                    let Some(c) = self.child(src, dir) else { continue };
                    let copy =
                        copy_of(&mut arena, self.arena.node(c), Some(dst));
                    *arena.node_mut(dst).child_mut(dir) = Some(copy);
                    stack.push((c, copy));
                }
            }
            dst_root
        });
        Self { arena, root, cmp: self.cmp.clone() }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for RbTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
