use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a store backend.
///
/// A guard that evaluates false is not an error; it is reported through
/// [`TxnOutcome::succeeded`]. `Unavailable` covers transport and commit
/// failures, the caller decides whether to retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}

/// A raw store entry as returned by reads and range scans.
///
/// `version` counts puts since the key was created; a key that does not
/// exist has version 0. Deleting a key resets its version.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
    pub version: i64,
}

/// Optimistic guard evaluated at the head of a transaction.
#[derive(Debug, Clone)]
pub enum Compare {
    /// True iff the key exists and its value equals `value`.
    ValueEquals { key: String, value: Vec<u8> },
    /// True iff the key's version equals `version` (0 = key absent).
    VersionEquals { key: String, version: i64 },
}

/// Operation executed when a transaction's guard holds.
#[derive(Debug, Clone)]
pub enum TxnOp {
    Put { key: String, value: Vec<u8> },
    RangeGet { prefix: String },
}

/// Per-operation result, in the same order as the submitted ops.
#[derive(Debug, Clone)]
pub enum TxnResponse {
    Put,
    Range(Vec<KeyValue>),
}

/// Result of a committed transaction.
///
/// `succeeded == false` means the guard evaluated false; no operation
/// ran and `responses` is empty.
#[derive(Debug, Clone)]
pub struct TxnOutcome {
    pub succeeded: bool,
    pub responses: Vec<TxnResponse>,
}

/// The flat store capability the namespace layer consumes.
///
/// Implementations must make `transact` atomic: the guard check and
/// every operation in `then` observe the same store snapshot, and
/// either all operations apply or none do.
#[async_trait]
pub trait FlatStore: Send + Sync {
    /// Evaluate `guard` and, if it holds, apply `then` atomically.
    async fn transact(&self, guard: Compare, then: Vec<TxnOp>) -> StoreResult<TxnOutcome>;

    /// All entries whose key starts with `prefix`, in key order.
    async fn range_get(&self, prefix: &str) -> StoreResult<Vec<KeyValue>>;

    /// Unconditional single-key write. Bumps the key's version.
    async fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Single-key read; `None` when the key is absent.
    async fn get(&self, key: &str) -> StoreResult<Option<KeyValue>>;
}
