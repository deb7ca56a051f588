//! Proptest strategies for balsa property-based testing
//!
//! This module provides reusable proptest strategies for generating tree
//! workloads across the balsa crates.

pub mod strategies;

// Re-export all strategies from strategies module
pub use strategies::{
    strategy_balance_strategy, strategy_key, strategy_keys, strategy_op_seq, strategy_tree_op,
};
