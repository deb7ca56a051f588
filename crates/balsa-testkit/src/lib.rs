use balsa_avl::{AvlTree, BalanceStrategy};

pub mod proptest;

/// Build a tree by inserting `keys` in order.
///
/// Keeping these in a microcrate avoids copy-paste across the unit,
/// property, and CLI tests.
pub fn tree_from_keys(keys: &[i32], strategy: BalanceStrategy) -> AvlTree<i32> {
    let mut tree = AvlTree::with_strategy(strategy);
    for &key in keys {
        tree.insert(key);
    }
    tree
}

/// A single step of an ordered-set workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOp {
    Insert(i32),
    Remove(i32),
    Contains(i32),
}

impl TreeOp {
    /// Apply the step to a tree, returning what the tree reported
    /// (inserted / removed / found).
    pub fn apply(self, tree: &mut AvlTree<i32>) -> bool {
        match self {
            TreeOp::Insert(key) => tree.insert(key),
            TreeOp::Remove(key) => tree.remove(&key),
            TreeOp::Contains(key) => tree.contains(&key),
        }
    }
}
