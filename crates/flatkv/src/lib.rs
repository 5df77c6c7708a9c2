//! Flat versioned key-value capability contract.
//!
//! This crate defines the minimal store surface the hierarchical
//! namespace layer is built on: single-key get/put, prefix range scan,
//! and one-shot optimistic transactions (compare guard, then a batch of
//! operations against the same snapshot). It deliberately models an
//! etcd-style store without depending on any particular backend.

/// Store contract: guards, operations, transactions
pub mod store;

/// In-memory reference engine
pub mod memory;

pub use memory::MemoryStore;
pub use store::{
    Compare, FlatStore, KeyValue, StoreError, StoreResult, TxnOp, TxnOutcome, TxnResponse,
};

/// Return the exclusive end key for a prefix range scan.
///
/// Increments the last non-0xFF byte of the prefix. If the prefix is all
/// 0xFF bytes (or empty), returns an empty vec to indicate "no upper
/// bound".
pub fn prefix_end_key(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return end;
        }
        end.pop();
    }
    end
}
