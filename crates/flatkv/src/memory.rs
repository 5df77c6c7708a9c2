use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::store::{
    Compare, FlatStore, KeyValue, StoreError, StoreResult, TxnOp, TxnOutcome, TxnResponse,
};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    version: i64,
}

/// In-memory reference engine.
///
/// A single mutex around a `BTreeMap` gives every transaction a trivially
/// consistent snapshot, which is exactly the atomicity contract the
/// namespace layer relies on. Intended for tests and embedders.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, Entry>>>,
    // Key prefixes whose operations fail with Unavailable (test hook)
    fail_prefixes: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make any operation touching a key under `prefix` fail with
    /// `StoreError::Unavailable`. Used by tests to exercise partial
    /// materialization.
    pub async fn fail_prefix(&self, prefix: impl Into<String>) {
        self.fail_prefixes.lock().await.push(prefix.into());
    }

    /// Clear all injected faults.
    pub async fn clear_faults(&self) {
        self.fail_prefixes.lock().await.clear();
    }

    async fn check_fault(&self, key: &str) -> StoreResult<()> {
        let faults = self.fail_prefixes.lock().await;
        for prefix in faults.iter() {
            if key.starts_with(prefix.as_str()) {
                return Err(StoreError::unavailable(format!(
                    "injected fault for key {key}"
                )));
            }
        }
        Ok(())
    }
}

fn scan(entries: &BTreeMap<String, Entry>, prefix: &str) -> Vec<KeyValue> {
    let upper = match String::from_utf8(crate::prefix_end_key(prefix.as_bytes())) {
        Ok(end) if !end.is_empty() => Bound::Excluded(end),
        _ => Bound::Unbounded,
    };
    entries
        .range::<String, _>((Bound::Included(prefix.to_string()), upper))
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, entry)| KeyValue {
            key: key.clone(),
            value: entry.value.clone(),
            version: entry.version,
        })
        .collect()
}

fn write(entries: &mut BTreeMap<String, Entry>, key: &str, value: &[u8]) {
    let version = entries.get(key).map_or(0, |e| e.version);
    entries.insert(
        key.to_string(),
        Entry {
            value: value.to_vec(),
            version: version + 1,
        },
    );
}

fn evaluate(entries: &BTreeMap<String, Entry>, guard: &Compare) -> bool {
    match guard {
        Compare::ValueEquals { key, value } => {
            entries.get(key).is_some_and(|e| e.value == *value)
        }
        Compare::VersionEquals { key, version } => {
            entries.get(key).map_or(0, |e| e.version) == *version
        }
    }
}

#[async_trait]
impl FlatStore for MemoryStore {
    async fn transact(&self, guard: Compare, then: Vec<TxnOp>) -> StoreResult<TxnOutcome> {
        let guard_key = match &guard {
            Compare::ValueEquals { key, .. } | Compare::VersionEquals { key, .. } => key.clone(),
        };
        self.check_fault(&guard_key).await?;
        for op in &then {
            match op {
                TxnOp::Put { key, .. } => self.check_fault(key).await?,
                TxnOp::RangeGet { prefix } => self.check_fault(prefix).await?,
            }
        }

        let mut entries = self.entries.lock().await;
        if !evaluate(&entries, &guard) {
            return Ok(TxnOutcome {
                succeeded: false,
                responses: Vec::new(),
            });
        }

        let mut responses = Vec::with_capacity(then.len());
        for op in then {
            match op {
                TxnOp::Put { key, value } => {
                    write(&mut entries, &key, &value);
                    responses.push(TxnResponse::Put);
                }
                TxnOp::RangeGet { prefix } => {
                    responses.push(TxnResponse::Range(scan(&entries, &prefix)));
                }
            }
        }
        Ok(TxnOutcome {
            succeeded: true,
            responses,
        })
    }

    async fn range_get(&self, prefix: &str) -> StoreResult<Vec<KeyValue>> {
        self.check_fault(prefix).await?;
        let entries = self.entries.lock().await;
        Ok(scan(&entries, prefix))
    }

    async fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.check_fault(key).await?;
        let mut entries = self.entries.lock().await;
        write(&mut entries, key, value);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<KeyValue>> {
        self.check_fault(key).await?;
        let entries = self.entries.lock().await;
        Ok(entries.get(key).map(|entry| KeyValue {
            key: key.to_string(),
            value: entry.value.clone(),
            version: entry.version,
        }))
    }
}
