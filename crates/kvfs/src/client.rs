use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use flatkv::{Compare, FlatStore, TxnOp};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::path;

/// Sentinel written at a key to mark it as a directory.
pub const DEFAULT_DIR_VALUE: &[u8] = b"__kvfs_dir__";

/// Result of a create-if-absent attempt. Losing the creation race is
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Namespace client over a flat store.
///
/// Holds no locks and caches nothing across calls; every operation
/// re-derives its answer from a fresh store transaction. The
/// cancellation token is raced against every store await.
#[derive(Clone)]
pub struct Client {
    store: Arc<dyn FlatStore>,
    dir_value: Vec<u8>,
    cancel: CancellationToken,
}

impl Client {
    pub fn new(store: Arc<dyn FlatStore>) -> Self {
        Client {
            store,
            dir_value: DEFAULT_DIR_VALUE.to_vec(),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the directory sentinel (per-deployment convention).
    pub fn with_dir_value(mut self, dir_value: impl Into<Vec<u8>>) -> Self {
        self.dir_value = dir_value.into();
        self
    }

    /// Thread an external cancellation token through every store call.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn dir_value(&self) -> &[u8] {
        &self.dir_value
    }

    pub(crate) fn store(&self) -> &dyn FlatStore {
        self.store.as_ref()
    }

    /// Await a store future, racing the cancellation token.
    ///
    /// Cancellation rolls nothing back; any marker writes already
    /// committed are idempotent and safe to re-observe.
    pub(crate) async fn run<T>(
        &self,
        fut: impl Future<Output = flatkv::StoreResult<T>>,
    ) -> Result<T> {
        tokio::select! {
            // Check cancellation first so an already-cancelled token
            // wins over a ready store future
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            result = fut => result.map_err(Error::from),
        }
    }

    /// Fetch a single materialized node.
    pub async fn get(&self, key: &str) -> Result<Node> {
        let key = path::normalize(key)?;
        let kv = self.run(self.store.get(&key)).await?;
        match kv {
            Some(kv) => Ok(Node::from_entry(kv, &self.dir_value)),
            None => Err(Error::not_found(key)),
        }
    }

    /// Write a plain value at a key.
    ///
    /// The directory sentinel is rejected as user data so that value
    /// equality stays an unambiguous directory test.
    pub async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let key = path::normalize(key)?;
        if value == self.dir_value.as_slice() {
            return Err(Error::ReservedValue(key));
        }
        self.run(self.store.put(&key, value)).await
    }

    /// Create a directory marker at `key` unless the key already exists.
    ///
    /// This is the optimistic create-if-absent pattern: a version-zero
    /// guard means at most one concurrent writer's put commits, and the
    /// losers observe a harmless false condition.
    pub async fn create_dir(&self, key: &str) -> Result<CreateOutcome> {
        let key = path::normalize(key)?;
        self.create_if_absent(&key).await
    }

    pub(crate) async fn create_if_absent(&self, key: &str) -> Result<CreateOutcome> {
        let outcome = self
            .run(self.store.transact(
                Compare::VersionEquals {
                    key: key.to_string(),
                    version: 0,
                },
                vec![TxnOp::Put {
                    key: key.to_string(),
                    value: self.dir_value.clone(),
                }],
            ))
            .await?;
        if outcome.succeeded {
            diagnostics::log_debug!("created directory marker at {key}", key: key);
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::AlreadyExists)
        }
    }
}
