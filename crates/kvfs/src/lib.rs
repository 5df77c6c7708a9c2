//! Hierarchical namespace over a flat versioned key-value store.
//!
//! The backing store only knows flat keys, prefix range scans, and
//! one-shot optimistic transactions. This crate layers slash-delimited
//! directory semantics on top: a reserved sentinel value marks a key as
//! a directory, listings collapse deeper descendants into one entry per
//! immediate child, and directory markers implied by deeply nested keys
//! are materialized lazily on first listing.
//!
//! Set the KVFS_LOG environment variable to control logging:
//! - KVFS_LOG=off (default) - silent
//! - KVFS_LOG=info - basic operations
//! - KVFS_LOG=debug - per-segment materialization steps

// Error types
pub mod error;

// Key normalization helpers
pub mod path;

// Materialized directory entries
pub mod node;

// Client state and single-node accessors
pub mod client;

// Directory listing and namespace materialization
pub mod list;

// Re-export key types
pub use client::{Client, CreateOutcome, DEFAULT_DIR_VALUE};
pub use error::{Error, Result};
pub use list::{ListReport, Skipped};
pub use node::Node;

#[cfg(test)]
mod tests;
