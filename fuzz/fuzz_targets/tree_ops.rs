//! Fuzz harness for tree workloads
//!
//! Decodes the fuzzer's bytes into insert/remove/contains steps, applies
//! them to one tree per rebalancing strategy and to a BTreeSet model, and
//! rechecks every invariant after each step.

#![no_main]

use balsa_avl::{AvlTree, BalanceStrategy};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;

fuzz_target!(|data: &[u8]| {
    let mut composed = AvlTree::with_strategy(BalanceStrategy::Composed);
    let mut fused = AvlTree::with_strategy(BalanceStrategy::Fused);
    let mut model = BTreeSet::new();

    // Two bytes per step: opcode, then a key biased into a small range so
    // removals and duplicate inserts actually hit.
    for chunk in data.chunks_exact(2) {
        let key = i32::from(chunk[1]) - 128;
        match chunk[0] % 3 {
            0 => {
                let inserted = composed.insert(key);
                assert_eq!(inserted, fused.insert(key));
                assert_eq!(inserted, model.insert(key));
            }
            1 => {
                let removed = composed.remove(&key);
                assert_eq!(removed, fused.remove(&key));
                assert_eq!(removed, model.remove(&key));
            }
            _ => {
                let found = composed.contains(&key);
                assert_eq!(found, fused.contains(&key));
                assert_eq!(found, model.contains(&key));
            }
        }

        composed.verify().expect("composed tree invariant");
        fused.verify().expect("fused tree invariant");
        assert_eq!(composed, fused);
        assert_eq!(composed.len(), model.len());
    }

    let keys: Vec<i32> = composed.iter().copied().collect();
    let expected: Vec<i32> = model.iter().copied().collect();
    assert_eq!(keys, expected);
});
