//! Strategy definitions for tree workloads.

use crate::TreeOp;
use balsa_avl::BalanceStrategy;
use proptest::prelude::*;

// ============================================================================
// Base Strategies
// ============================================================================

/// Strategy for generating keys. The range is kept deliberately narrow so
/// that duplicate inserts and hit-or-miss removals occur often.
pub fn strategy_key() -> impl Strategy<Value = i32> {
    -100i32..=100
}

/// Strategy for generating insertion sequences.
pub fn strategy_keys(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(strategy_key(), 0..max_len)
}

/// Strategy for generating either rebalancing strategy.
pub fn strategy_balance_strategy() -> impl Strategy<Value = BalanceStrategy> {
    prop_oneof![
        Just(BalanceStrategy::Composed),
        Just(BalanceStrategy::Fused),
    ]
}

// ============================================================================
// Workload Strategies
// ============================================================================

/// Strategy for generating a single workload step.
pub fn strategy_tree_op() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        strategy_key().prop_map(TreeOp::Insert),
        strategy_key().prop_map(TreeOp::Remove),
        strategy_key().prop_map(TreeOp::Contains),
    ]
}

/// Strategy for generating mixed insert/remove/contains workloads.
pub fn strategy_op_seq(max_len: usize) -> impl Strategy<Value = Vec<TreeOp>> {
    proptest::collection::vec(strategy_tree_op(), 0..max_len)
}
