//! Node representation and the rebalancing core.
//!
//! Every mutating routine here takes its subtree by value and returns the
//! (possibly new) subtree root; callers store the result back into the child
//! slot they took it from. Heights are cached on the nodes: an absent child
//! counts as -1, so a leaf has height 0.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Maximum tolerated difference between sibling subtree heights.
pub(crate) const ALLOWED_IMBALANCE: i32 = 1;

pub(crate) type Link<T> = Option<Box<AvlNode<T>>>;

/// How the balance step carries out a double rotation.
///
/// Both strategies produce identical tree shapes. `Fused` relinks the three
/// affected nodes in one pass and writes each cached height exactly once;
/// `Composed` runs two single rotations back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStrategy {
    Composed,
    Fused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AvlNode<T> {
    pub(crate) key: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: i32,
}

impl<T> AvlNode<T> {
    pub(crate) fn new(key: T) -> Self {
        AvlNode {
            key,
            left: None,
            right: None,
            height: 0,
        }
    }

    /// Recompute this node's cached height from its children.
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

/// Cached height of a subtree; -1 for the empty subtree.
pub(crate) fn height<T>(link: &Link<T>) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

/// Single rotation promoting the left child. Heights are rewritten for the
/// demoted node first, then for the promoted one.
pub(crate) fn rotate_right<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let mut new_root = node.left.take().unwrap();
    node.left = new_root.right.take();
    node.update_height();
    new_root.right = Some(node);
    new_root.update_height();
    new_root
}

/// Single rotation promoting the right child.
pub(crate) fn rotate_left<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let mut new_root = node.right.take().unwrap();
    node.right = new_root.left.take();
    node.update_height();
    new_root.left = Some(node);
    new_root.update_height();
    new_root
}

/// One-pass double rotation for the left-right case: the left child's right
/// subtree rises to the top. Each affected height is written once.
pub(crate) fn double_rotate_right<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let mut left = node.left.take().unwrap();
    let mut pivot = left.right.take().unwrap();
    left.right = pivot.left.take();
    node.left = pivot.right.take();
    left.update_height();
    node.update_height();
    pivot.left = Some(left);
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// One-pass double rotation for the right-left case.
pub(crate) fn double_rotate_left<T>(mut node: Box<AvlNode<T>>) -> Box<AvlNode<T>> {
    let mut right = node.right.take().unwrap();
    let mut pivot = right.left.take().unwrap();
    right.left = pivot.right.take();
    node.right = pivot.left.take();
    right.update_height();
    node.update_height();
    pivot.right = Some(right);
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restore the balance invariant at `node` and recompute its height.
///
/// Child heights must already be correct when this is called; insert and
/// remove guarantee that by rebalancing on the way back up. A tie between
/// the heavy child's subtrees counts as the outer case and takes a single
/// rotation, which removal depends on.
pub(crate) fn rebalance<T>(
    mut node: Box<AvlNode<T>>,
    strategy: BalanceStrategy,
) -> Box<AvlNode<T>> {
    if height(&node.left) - height(&node.right) > ALLOWED_IMBALANCE {
        let left = node.left.as_ref().unwrap();
        if height(&left.left) >= height(&left.right) {
            node = rotate_right(node);
        } else {
            node = match strategy {
                BalanceStrategy::Composed => {
                    node.left = node.left.take().map(rotate_left);
                    rotate_right(node)
                }
                BalanceStrategy::Fused => double_rotate_right(node),
            };
        }
    } else if height(&node.right) - height(&node.left) > ALLOWED_IMBALANCE {
        let right = node.right.as_ref().unwrap();
        if height(&right.right) >= height(&right.left) {
            node = rotate_left(node);
        } else {
            node = match strategy {
                BalanceStrategy::Composed => {
                    node.right = node.right.take().map(rotate_right);
                    rotate_left(node)
                }
                BalanceStrategy::Fused => double_rotate_left(node),
            };
        }
    }
    node.update_height();
    node
}

/// Insert `key` into the subtree, rebalancing every frame on the unwind.
/// Returns the new subtree root and whether a node was added; inserting a
/// key that is already present changes nothing.
pub(crate) fn insert_link<T: Ord>(
    link: Link<T>,
    key: T,
    strategy: BalanceStrategy,
) -> (Link<T>, bool) {
    let Some(mut node) = link else {
        return (Some(Box::new(AvlNode::new(key))), true);
    };
    let inserted = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, inserted) = insert_link(node.left.take(), key, strategy);
            node.left = left;
            inserted
        }
        Ordering::Greater => {
            let (right, inserted) = insert_link(node.right.take(), key, strategy);
            node.right = right;
            inserted
        }
        Ordering::Equal => return (Some(node), false),
    };
    (Some(rebalance(node, strategy)), inserted)
}

/// Remove `key` from the subtree, rebalancing every frame on the unwind.
/// Returns the new subtree root and whether a node was removed; a missing
/// key changes nothing.
pub(crate) fn remove_link<T: Ord>(
    link: Link<T>,
    key: &T,
    strategy: BalanceStrategy,
) -> (Link<T>, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };
    let removed = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, removed) = remove_link(node.left.take(), key, strategy);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove_link(node.right.take(), key, strategy);
            node.right = right;
            removed
        }
        Ordering::Equal => return (remove_node(node, strategy), true),
    };
    (Some(rebalance(node, strategy)), removed)
}

/// Unlink a node whose key matched. With two children the in-order
/// successor is spliced into its place, which leaves the same shape as
/// removing the successor's key from the right subtree.
fn remove_node<T>(mut node: Box<AvlNode<T>>, strategy: BalanceStrategy) -> Link<T> {
    match (node.left.take(), node.right.take()) {
        (None, right) => right,
        (left, None) => left,
        (left, Some(right)) => {
            let (rest, mut successor) = take_min(right, strategy);
            successor.left = left;
            successor.right = rest;
            Some(rebalance(successor, strategy))
        }
    }
}

/// Detach the minimum node of a subtree, rebalancing the frames it leaves
/// behind. Returns the remaining subtree and the detached node, whose child
/// links are cleared.
fn take_min<T>(
    mut node: Box<AvlNode<T>>,
    strategy: BalanceStrategy,
) -> (Link<T>, Box<AvlNode<T>>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (rest, min) = take_min(left, strategy);
            node.left = rest;
            (Some(rebalance(node, strategy)), min)
        }
    }
}
