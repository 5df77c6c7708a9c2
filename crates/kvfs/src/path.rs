use crate::error::{Error, Result};

/// Canonicalize a user-supplied path into the store's absolute key form.
///
/// A leading slash is added if missing, repeated slashes collapse, and a
/// trailing slash is stripped. `/` alone names the root key. Only the
/// normalization the lister needs; no `.`/`..` resolution.
pub fn normalize(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(Error::invalid_key("empty path"));
    }
    let mut key = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        key.push('/');
        key.push_str(segment);
    }
    if key.is_empty() {
        // Nothing but slashes: the root key
        key.push('/');
    }
    Ok(key)
}

/// The range-scan prefix covering a directory key's children.
pub fn dir_prefix(key: &str) -> String {
    if key == "/" {
        "/".to_string()
    } else {
        format!("{key}/")
    }
}

/// Join a directory prefix and a child name into an absolute key.
pub fn join(dir: &str, name: &str) -> String {
    format!("{dir}{name}")
}

/// The first `/`-delimited segment of a relative name.
pub fn first_segment(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}
