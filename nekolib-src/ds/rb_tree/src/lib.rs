//! Red-black tree and the ordered containers built on it.
//!
//! [`RbTree`] is the engine; [`RbSet`] keeps keys unique and
//! [`RbMultiset`] admits duplicates. Nodes live in an arena owned by the
//! tree, and a [`Position`] names a node without borrowing the tree, so it
//! stays usable across unrelated insertions and erasures.
//!
//! # Complexity
//! | operation | time |
//! |---|---|
//! | `insert`, `erase`, `find`, `lower_bound`, `upper_bound` | $O(\log n)$ |
//! | `count` | $O(\log n + m)$, $m$ equal keys |
//! | cursor step | amortized $O(1)$, worst $O(\log n)$ |
//! | `merge` | $O(m \log(n + m))$ |
//! | `swap` | $O(1)$ |
//!
//! # Examples
//! ```
//! use rb_tree::RbSet;
//!
//! let mut set = RbSet::new();
//! set.insert_many([5, 1, 4, 1]);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 4, 5]);
//!
//! let pos = set.find(&4).position();
//! set.insert(3);
//! assert_eq!(set.erase(pos), 4);
//! ```

mod compare;
mod cursor;
mod multiset;
mod node;
mod set;
mod tree;

#[cfg(test)]
mod debug;

pub use compare::{Compare, Natural};
pub use cursor::{Cursor, IntoIter, Iter, Position, Range};
pub use multiset::RbMultiset;
pub use node::NodeId;
pub use set::RbSet;
pub use tree::{EraseError, RbTree};
