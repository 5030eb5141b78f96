use std::fmt;

use crate::{
    compare::Compare,
    node::{
        Color,
        Direction::{self, Left, Right},
    },
    tree::RbTree,
};

pub fn visualize<K: fmt::Debug, C>(tree: &RbTree<K, C>) {
    fn dfs<K: fmt::Debug, C>(
        tree: &RbTree<K, C>,
        i: usize,
        prefix: &mut String,
        side: Option<Direction>,
    ) {
        let node = tree.node(i);
        let branch = match side {
            None => "",
            Some(Left) => "└── ",
            Some(Right) => "┌── ",
        };
        if let Some(r) = node.right {
            let len = prefix.len();
            prefix.push_str(if side == Some(Left) { "│   " } else { "    " });
            dfs(tree, r, prefix, Some(Right));
            prefix.truncate(len);
        }
        let color = if node.color == Color::Red { "R" } else { "B" };
        eprintln!("{prefix}{branch}{:?} ({color})", node.key);
        if let Some(l) = node.left {
            let len = prefix.len();
            prefix.push_str(if side == Some(Right) { "│   " } else { "    " });
            dfs(tree, l, prefix, Some(Left));
            prefix.truncate(len);
        }
    }

    if let Some(root) = tree.root_link() {
        dfs(tree, root, &mut String::new(), None);
    }
}

/// Checks the red-black invariants, the parent links and the key order,
/// and returns the black height. `strict` forbids equal neighbors.
pub fn assert_invariants<K, C: Compare<K>>(
    tree: &RbTree<K, C>,
    strict: bool,
) -> usize {
    fn dfs<K, C>(tree: &RbTree<K, C>, i: usize, count: &mut usize) -> usize {
        *count += 1;
        let node = tree.node(i);
        let mut heights = [0; 2];
        for (h, child) in heights.iter_mut().zip([node.left, node.right]) {
            let Some(c) = child else { continue };
            let child_node = tree.node(c);
            assert_eq!(child_node.parent, Some(i), "parent link of {c}");
            assert!(
                node.color == Color::Black || child_node.color == Color::Black,
                "red node {i} has a red child {c}"
            );
            *h = dfs(tree, c, count);
        }
        assert_eq!(heights[0], heights[1], "black heights differ under {i}");
        heights[0] + (node.color == Color::Black) as usize
    }

    let Some(root) = tree.root_link() else {
        assert_eq!(tree.len(), 0);
        return 0;
    };
    assert_eq!(tree.node(root).parent, None, "root has a parent");
    assert_eq!(tree.node(root).color, Color::Black, "root is red");

    let mut count = 0;
    let black_height = dfs(tree, root, &mut count);
    assert_eq!(count, tree.len(), "node count");

    let cmp = tree.comparator();
    let keys: Vec<_> = tree.iter().collect();
    assert_eq!(keys.len(), tree.len());
    for w in keys.windows(2) {
        if strict {
            assert!(cmp.less(w[0], w[1]), "keys not strictly increasing");
        } else {
            assert!(!cmp.less(w[1], w[0]), "keys decreasing");
        }
    }
    black_height
}

#[test]
fn black_height_after_ascending_inserts() {
    let mut tree = RbTree::new();
    for x in 0..7 {
        tree.insert_unique(x);
    }
    visualize(&tree);
    assert_eq!(assert_invariants(&tree, true), 2);
    assert_eq!(assert_invariants(&RbTree::<i32>::new(), true), 0);
}
