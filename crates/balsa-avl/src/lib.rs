//! A height-balanced binary search tree (AVL) behind an ordered-set API.
//!
//! Rebalancing runs on every frame of the insert and remove recursion, so
//! the balance invariant holds again by the time each public call returns.
//! The double-rotation step comes in two interchangeable implementations,
//! selected per tree at construction; see [`BalanceStrategy`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

mod node;

pub use node::BalanceStrategy;

use node::{AvlNode, Link};

/// Errors returned by tree queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TreeError {
    /// A minimum or maximum was requested from an empty tree.
    Underflow,
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::Underflow => write!(f, "Tree is empty"),
        }
    }
}

impl std::error::Error for TreeError {}

/// An ordered set of unique keys backed by an AVL tree.
///
/// Duplicate inserts and removals of missing keys are no-ops reported
/// through the returned `bool`; only an empty-tree min/max query is an
/// error. Lookup, insert, and remove all run in O(log n).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvlTree<T> {
    root: Link<T>,
    strategy: BalanceStrategy,
    len: usize,
}

impl<T: Ord> AvlTree<T> {
    /// Create an empty tree using the composed rebalancing strategy.
    pub fn new() -> Self {
        Self::with_strategy(BalanceStrategy::Composed)
    }

    /// Create an empty tree with an explicit rebalancing strategy.
    pub fn with_strategy(strategy: BalanceStrategy) -> Self {
        AvlTree {
            root: None,
            strategy,
            len: 0,
        }
    }

    /// The rebalancing strategy this tree was built with.
    pub fn strategy(&self) -> BalanceStrategy {
        self.strategy
    }

    /// Number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree: -1 when empty, 0 for a single key.
    pub fn height(&self) -> i32 {
        node::height(&self.root)
    }

    /// Insert a key. Returns `false` and leaves the tree untouched when the
    /// key is already present.
    pub fn insert(&mut self, key: T) -> bool {
        let (root, inserted) = node::insert_link(self.root.take(), key, self.strategy);
        self.root = root;
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Remove a key. Returns `false` and leaves the tree untouched when the
    /// key is absent.
    pub fn remove(&mut self, key: &T) -> bool {
        let (root, removed) = node::remove_link(self.root.take(), key, self.strategy);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &T) -> bool {
        let mut current = &self.root;
        while let Some(n) = current {
            match key.cmp(&n.key) {
                Ordering::Less => current = &n.left,
                Ordering::Greater => current = &n.right,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Smallest key in the tree.
    pub fn find_min(&self) -> Result<&T, TreeError> {
        let mut n = self.root.as_deref().ok_or(TreeError::Underflow)?;
        while let Some(left) = n.left.as_deref() {
            n = left;
        }
        Ok(&n.key)
    }

    /// Largest key in the tree.
    pub fn find_max(&self) -> Result<&T, TreeError> {
        let mut n = self.root.as_deref().ok_or(TreeError::Underflow)?;
        while let Some(right) = n.right.as_deref() {
            n = right;
        }
        Ok(&n.key)
    }

    /// Drop every key. Idempotent.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Keys in node-before-children order, the traversal the CLI prints.
    pub fn pre_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        pre_order_rec(&self.root, &mut out);
        out
    }

    /// Iterate over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: Vec::new(),
            descent: self.root.as_deref(),
        }
    }

    /// Recheck every structural invariant from scratch: cached heights,
    /// the balance bound at each node, strict key order, and the stored
    /// length. Meant for tests and debugging; O(n).
    pub fn verify(&self) -> Result<(), String> {
        let mut count = 0usize;
        check_link(&self.root, &mut count)?;
        if count != self.len {
            return Err(format!(
                "stored len {} does not match node count {count}",
                self.len
            ));
        }
        let mut prev: Option<&T> = None;
        for key in self.iter() {
            if let Some(p) = prev {
                if p >= key {
                    return Err("keys are not strictly ascending".to_string());
                }
            }
            prev = Some(key);
        }
        Ok(())
    }
}

impl<T: Ord> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality is structural: same keys at the same positions with the same
/// cached heights. The rebalancing strategy does not participate, so trees
/// built under different strategies can be compared shape for shape.
impl<T: PartialEq> PartialEq for AvlTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.root == other.root
    }
}

/// In-order iterator over borrowed keys.
pub struct Iter<'a, T> {
    stack: Vec<&'a AvlNode<T>>,
    descent: Option<&'a AvlNode<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(n) = self.descent {
            self.stack.push(n);
            self.descent = n.left.as_deref();
        }
        let n = self.stack.pop()?;
        self.descent = n.right.as_deref();
        Some(&n.key)
    }
}

fn pre_order_rec<'a, T>(link: &'a Link<T>, out: &mut Vec<&'a T>) {
    if let Some(n) = link {
        out.push(&n.key);
        pre_order_rec(&n.left, out);
        pre_order_rec(&n.right, out);
    }
}

/// Returns the verified height of the subtree.
fn check_link<T>(link: &Link<T>, count: &mut usize) -> Result<i32, String> {
    let Some(n) = link else {
        return Ok(-1);
    };
    *count += 1;
    let lh = check_link(&n.left, count)?;
    let rh = check_link(&n.right, count)?;
    let computed = 1 + lh.max(rh);
    if n.height != computed {
        return Err(format!(
            "stored height {} does not match computed height {computed}",
            n.height
        ));
    }
    if (lh - rh).abs() > node::ALLOWED_IMBALANCE {
        return Err(format!("subtree heights differ by {}", (lh - rh).abs()));
    }
    Ok(computed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_from(keys: &[i32], strategy: BalanceStrategy) -> AvlTree<i32> {
        let mut tree = AvlTree::with_strategy(strategy);
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    const STRATEGIES: [BalanceStrategy; 2] = [BalanceStrategy::Composed, BalanceStrategy::Fused];

    #[test]
    fn empty_tree_behavior() {
        let tree: AvlTree<i32> = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), -1);
        assert!(!tree.contains(&7));
        assert!(tree.pre_order().is_empty());
        assert_eq!(tree.find_min(), Err(TreeError::Underflow));
        assert_eq!(tree.find_max(), Err(TreeError::Underflow));
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn remove_from_empty_is_a_no_op() {
        let mut tree: AvlTree<i32> = AvlTree::new();
        assert!(!tree.remove(&7));
        assert!(tree.is_empty());
    }

    #[test]
    fn single_key_round_trip() {
        let mut tree = AvlTree::new();
        assert!(tree.insert(42));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.find_min(), Ok(&42));
        assert_eq!(tree.find_max(), Ok(&42));
        assert!(tree.remove(&42));
        assert!(tree.is_empty());
        assert_eq!(tree.find_min(), Err(TreeError::Underflow));
    }

    #[test]
    fn ascending_inserts_take_a_single_left_rotation() {
        for strategy in STRATEGIES {
            let tree = tree_from(&[1, 2, 3], strategy);
            assert_eq!(tree.pre_order(), [&2, &1, &3]);
            assert_eq!(tree.height(), 1);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn descending_inserts_take_a_single_right_rotation() {
        for strategy in STRATEGIES {
            let tree = tree_from(&[3, 2, 1], strategy);
            assert_eq!(tree.pre_order(), [&2, &1, &3]);
            assert_eq!(tree.height(), 1);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn inner_left_inserts_take_a_double_rotation() {
        for strategy in STRATEGIES {
            let tree = tree_from(&[3, 1, 2], strategy);
            assert_eq!(tree.pre_order(), [&2, &1, &3]);
            assert_eq!(tree.height(), 1);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn inner_right_inserts_take_a_double_rotation() {
        for strategy in STRATEGIES {
            let tree = tree_from(&[1, 3, 2], strategy);
            assert_eq!(tree.pre_order(), [&2, &1, &3]);
            assert_eq!(tree.height(), 1);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn duplicate_insert_changes_nothing() {
        let mut tree = tree_from(&[5, 3, 8], BalanceStrategy::Fused);
        let before = tree.clone();
        assert!(!tree.insert(3));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree, before);
    }

    #[test]
    fn remove_leaf() {
        let mut tree = tree_from(&[2, 1, 3], BalanceStrategy::Composed);
        assert!(tree.remove(&1));
        assert_eq!(tree.pre_order(), [&2, &3]);
        assert_eq!(tree.len(), 2);
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn remove_node_with_one_child() {
        let mut tree = tree_from(&[2, 1, 3, 4], BalanceStrategy::Composed);
        assert!(tree.remove(&3));
        assert_eq!(tree.pre_order(), [&2, &1, &4]);
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn remove_root_with_two_children_splices_successor() {
        let mut tree = tree_from(&[2, 1, 3], BalanceStrategy::Composed);
        assert!(tree.remove(&2));
        assert_eq!(tree.pre_order(), [&3, &1]);
        assert_eq!(tree.height(), 1);
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn remove_rebalances_on_the_way_up() {
        // Dropping the lone left leaf leaves 2 right-heavy; a single left
        // rotation must restore the bound.
        for strategy in STRATEGIES {
            let mut tree = tree_from(&[1, 2, 3, 4], strategy);
            assert!(tree.remove(&1));
            assert_eq!(tree.pre_order(), [&3, &2, &4]);
            assert_eq!(tree.height(), 1);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn absent_key_remove_is_a_no_op() {
        let mut tree = tree_from(&[5, 3, 8], BalanceStrategy::Composed);
        let before = tree.clone();
        assert!(!tree.remove(&7));
        assert_eq!(tree, before);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn demo_sequence_shape_after_inserts() {
        for strategy in STRATEGIES {
            let tree = tree_from(&[50, 30, 40, 35, 32, 40, 45, 48, 46, 30, 47], strategy);
            assert_eq!(tree.len(), 9);
            assert_eq!(tree.height(), 3);
            assert_eq!(tree.pre_order(), [&40, &32, &30, &35, &48, &46, &45, &47, &50]);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn demo_sequence_shape_after_removal() {
        for strategy in STRATEGIES {
            let mut tree = tree_from(&[50, 30, 40, 35, 32, 40, 45, 48, 46, 30, 47], strategy);
            assert!(tree.remove(&48));
            assert_eq!(tree.len(), 8);
            assert_eq!(tree.pre_order(), [&40, &32, &30, &35, &46, &45, &50, &47]);
            assert!(tree.verify().is_ok());
        }
    }

    #[test]
    fn strategies_build_identical_trees() {
        let keys = [50, 30, 40, 35, 32, 40, 45, 48, 46, 30, 47];
        let composed = tree_from(&keys, BalanceStrategy::Composed);
        let fused = tree_from(&keys, BalanceStrategy::Fused);
        assert_eq!(composed, fused);
    }

    #[test]
    fn iteration_is_in_ascending_order() {
        let tree = tree_from(
            &[50, 30, 40, 35, 32, 40, 45, 48, 46, 30, 47],
            BalanceStrategy::Composed,
        );
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, [30, 32, 35, 40, 45, 46, 47, 48, 50]);
    }

    #[test]
    fn min_and_max_on_populated_tree() {
        let tree = tree_from(&[50, 30, 40, 35, 32], BalanceStrategy::Fused);
        assert_eq!(tree.find_min(), Ok(&30));
        assert_eq!(tree.find_max(), Ok(&50));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut tree = tree_from(&[5, 3, 8], BalanceStrategy::Composed);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.find_min(), Err(TreeError::Underflow));
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = tree_from(&[5, 3, 8], BalanceStrategy::Composed);
        let copy = tree.clone();
        tree.remove(&3);
        assert!(!tree.contains(&3));
        assert!(copy.contains(&3));
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn equality_ignores_strategy() {
        let composed = tree_from(&[5, 3, 8], BalanceStrategy::Composed);
        let fused = tree_from(&[5, 3, 8], BalanceStrategy::Fused);
        assert_ne!(composed.strategy(), fused.strategy());
        assert_eq!(composed, fused);
    }

    #[test]
    fn works_with_non_copy_keys() {
        let mut tree = AvlTree::new();
        for word in ["pear", "apple", "quince", "fig"] {
            tree.insert(word.to_string());
        }
        assert!(tree.contains(&"fig".to_string()));
        assert_eq!(tree.find_min().unwrap(), "apple");
        assert_eq!(tree.find_max().unwrap(), "quince");
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let tree = tree_from(&[50, 30, 40, 35, 32], BalanceStrategy::Fused);
        let json = serde_json::to_string(&tree).unwrap();
        let back: AvlTree<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.strategy(), BalanceStrategy::Fused);
        assert!(back.verify().is_ok());
    }

    #[test]
    fn verify_flags_a_broken_height() {
        let mut tree = tree_from(&[2, 1, 3], BalanceStrategy::Composed);
        tree.root.as_mut().unwrap().height = 9;
        let err = tree.verify().unwrap_err();
        assert!(err.contains("stored height"), "{err}");
    }

    #[test]
    fn verify_flags_an_unbalanced_shape() {
        // Hand-built left spine 3 -> 2 -> 1 with honest heights.
        let mut spine: Link<i32> = None;
        for key in [1, 2, 3] {
            let mut n = AvlNode::new(key);
            n.left = spine.take();
            n.update_height();
            spine = Some(Box::new(n));
        }
        let tree = AvlTree {
            root: spine,
            strategy: BalanceStrategy::Composed,
            len: 3,
        };
        let err = tree.verify().unwrap_err();
        assert!(err.contains("differ"), "{err}");
    }

    #[test]
    fn verify_flags_a_wrong_len() {
        let mut tree = tree_from(&[2, 1, 3], BalanceStrategy::Composed);
        tree.len = 5;
        let err = tree.verify().unwrap_err();
        assert!(err.contains("stored len"), "{err}");
    }

    #[test]
    fn tree_error_display() {
        assert_eq!(TreeError::Underflow.to_string(), "Tree is empty");
    }
}
