// Error types for namespace operations

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The listed key is absent or does not carry the directory marker.
    #[error("not a directory: {0}")]
    ListOnNonDirectory(String),

    #[error("key not found: {0}")]
    NotFound(String),

    /// Transaction/commit/transport failure in the backing store.
    /// Surfaced as-is; retry policy belongs to the caller.
    #[error("store error: {0}")]
    Store(#[from] flatkv::StoreError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The put value equals the directory sentinel. A key holds either
    /// user data or the marker, never both.
    #[error("value is reserved for directory markers: {0}")]
    ReservedValue(String),
}

impl Error {
    pub fn list_on_non_directory(key: impl Into<String>) -> Self {
        Error::ListOnNonDirectory(key.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound(key.into())
    }

    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Error::InvalidKey(reason.into())
    }
}
