use flatkv::KeyValue;

/// A materialized directory entry.
///
/// `is_dir` is derived from value equality with the client's directory
/// sentinel; the backing store has no separate directory type. Immutable
/// once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    pub value: Vec<u8>,
    pub version: i64,
    pub is_dir: bool,
}

impl Node {
    pub(crate) fn from_entry(kv: KeyValue, dir_value: &[u8]) -> Self {
        let is_dir = kv.value == dir_value;
        Node {
            key: kv.key,
            value: kv.value,
            version: kv.version,
            is_dir,
        }
    }

    /// The entry's name within its parent directory.
    pub fn name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(self.key.as_str())
    }
}
