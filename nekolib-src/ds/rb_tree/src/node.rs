use std::mem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

pub(crate) type Link = Option<usize>;

#[derive(Clone)]
pub(crate) struct Node<K> {
    pub key: K,
    pub color: Color,
    pub parent: Link,
    pub left: Link,
    pub right: Link,
}

impl<K> Node<K> {
    // new nodes are red and unlinked
    pub fn new(key: K) -> Self {
        Self { key, color: Color::Red, parent: None, left: None, right: None }
    }

    pub fn child(&self, dir: Direction) -> Link {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
    pub fn child_mut(&mut self, dir: Direction) -> &mut Link {
        match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Identity of a node inside the tree that allocated it.
///
/// The identity goes stale once the node is erased; a later node that
/// reuses the same slot gets a different generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

pub(crate) struct Slot<K> {
    generation: u32,
    entry: Entry<K>,
}

enum Entry<K> {
    Occupied(Node<K>),
    Vacant { next_free: Link },
}

/// Owner of every node; links between nodes are plain slot indices.
pub(crate) struct Arena<K> {
    slots: Vec<Slot<K>>,
    free_head: Link,
    len: usize,
}

impl<K> Arena<K> {
    pub fn new() -> Self { Self::with_capacity(0) }
    pub fn with_capacity(cap: usize) -> Self {
        Self { slots: Vec::with_capacity(cap), free_head: None, len: 0 }
    }

    pub fn len(&self) -> usize { self.len }

    pub fn alloc(&mut self, node: Node<K>) -> usize {
        self.len += 1;
        if let Some(i) = self.free_head {
            let slot = &mut self.slots[i];
            let Entry::Vacant { next_free } = slot.entry else {
                unreachable!("free list points at an occupied slot {i}");
            };
            self.free_head = next_free;
            slot.entry = Entry::Occupied(node);
            i
        } else {
            self.slots.push(Slot { generation: 0, entry: Entry::Occupied(node) });
            self.slots.len() - 1
        }
    }

    /// Vacates slot `i`. The caller must have unlinked the node already.
    pub fn release(&mut self, i: usize) -> Node<K> {
        let slot = &mut self.slots[i];
        let vacant = Entry::Vacant { next_free: self.free_head };
        let Entry::Occupied(node) = mem::replace(&mut slot.entry, vacant)
        else {
            unreachable!("double release of slot {i}");
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = Some(i);
        self.len -= 1;
        node
    }

    pub fn node(&self, i: usize) -> &Node<K> {
        match &self.slots[i].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("link to vacant slot {i}"),
        }
    }
    pub fn node_mut(&mut self, i: usize) -> &mut Node<K> {
        match &mut self.slots[i].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("link to vacant slot {i}"),
        }
    }

    pub fn id(&self, i: usize) -> NodeId {
        NodeId { index: i, generation: self.slots[i].generation }
    }
    pub fn resolve(&self, id: NodeId) -> Link {
        let slot = self.slots.get(id.index)?;
        let live = matches!(slot.entry, Entry::Occupied(_))
            && slot.generation == id.generation;
        live.then_some(id.index)
    }
}
