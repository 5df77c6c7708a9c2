use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use flatkv::{Compare, KeyValue, TxnOp, TxnResponse};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::path;

/// A child name omitted from a listing because its marker backfill or
/// fetch failed. The rest of the listing is unaffected.
#[derive(Debug)]
pub struct Skipped {
    pub name: String,
    pub reason: Error,
}

/// Explicit partial-success listing result: the nodes that
/// materialized, plus one record per child name that had to be skipped.
#[derive(Debug, Default)]
pub struct ListReport {
    pub nodes: Vec<Node>,
    pub skipped: Vec<Skipped>,
}

impl Client {
    /// List the immediate children of a directory.
    ///
    /// Convenience wrapper over [`Client::list_report`] that drops the
    /// skip records.
    pub async fn list(&self, path: &str) -> Result<Vec<Node>> {
        Ok(self.list_report(path).await?.nodes)
    }

    /// List the immediate children of a directory, reporting skipped
    /// entries explicitly.
    ///
    /// The directory-type check and the prefix range scan run in one
    /// store transaction, so both observe the same snapshot. Deeper
    /// descendants collapse into a single entry per first-level child
    /// name, and directory markers implied by deep keys but not yet
    /// present are created before the result is returned.
    ///
    /// Hard failures (target is not a directory, the verify+scan
    /// transaction fails, cancellation) abort the call. A failed
    /// backfill for one collapsed child only omits that child.
    pub async fn list_report(&self, path: &str) -> Result<ListReport> {
        let key = path::normalize(path)?;
        let dir = path::dir_prefix(&key);

        let outcome = self
            .run(self.store().transact(
                Compare::ValueEquals {
                    key: key.clone(),
                    value: self.dir_value().to_vec(),
                },
                vec![TxnOp::RangeGet {
                    prefix: dir.clone(),
                }],
            ))
            .await?;

        if !outcome.succeeded {
            return Err(Error::list_on_non_directory(key));
        }

        let entries = match outcome.responses.into_iter().next() {
            Some(TxnResponse::Range(kvs)) => kvs,
            _ => Vec::new(),
        };
        if entries.is_empty() {
            // Empty directory, not an error
            return Ok(ListReport::default());
        }

        self.materialize(&dir, entries).await
    }

    /// Partition scanned entries into direct children and collapsed
    /// descendants, backfilling missing intermediate markers.
    async fn materialize(&self, dir: &str, entries: Vec<KeyValue>) -> Result<ListReport> {
        let mut report = ListReport::default();
        // Every direct child name already emitted
        let mut direct_names: HashSet<String> = HashSet::new();
        // Direct children whose value is the sentinel
        let mut materialized: HashSet<String> = HashSet::new();
        // Distinct relative names lying under deeper subdirectories
        let mut deep_names: BTreeSet<String> = BTreeSet::new();
        // First segment -> number of deep entries beneath it
        let mut collapsed: BTreeMap<String, usize> = BTreeMap::new();

        for kv in entries {
            let Some(name) = kv.key.strip_prefix(dir) else {
                continue;
            };
            if name.is_empty() {
                // The root prefix scan sees the root key itself
                continue;
            }
            match name.split_once('/') {
                None => {
                    if kv.value == self.dir_value() {
                        materialized.insert(name.to_string());
                    }
                    direct_names.insert(name.to_string());
                    report.nodes.push(Node::from_entry(kv, self.dir_value()));
                }
                Some((first, _)) => {
                    *collapsed.entry(first.to_string()).or_default() += 1;
                    deep_names.insert(name.to_string());
                }
            }
        }

        // Walk every distinct deep name and create the markers its
        // ancestors imply. Walk failures are soft: the first error per
        // first segment is held back until we know whether the child's
        // own marker materialized anyway (a walk can fail at a deeper
        // level after this level's marker was already created).
        let mut walk_errors: HashMap<String, Error> = HashMap::new();
        for name in &deep_names {
            match self.ensure_ancestors(dir, name).await {
                Ok(_first) => {}
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(reason) => {
                    let first = path::first_segment(name).to_string();
                    let detail = reason.to_string();
                    diagnostics::log_warn!(
                        "ancestor backfill under {first} failed: {detail}",
                        first: first.clone(),
                        detail: detail
                    );
                    walk_errors.entry(first).or_insert(reason);
                }
            }
        }

        for (first, count) in collapsed {
            if materialized.contains(&first) {
                continue;
            }
            if direct_names.contains(&first) {
                // Degenerate state: a plain value at this name coexists
                // with deeper keys. The direct entry already represents
                // the name; the version guard kept its data intact.
                diagnostics::log_warn!(
                    "child {first} holds user data but has {count} deeper entries",
                    first: first,
                    count: count
                );
                continue;
            }
            let child_key = path::join(dir, &first);
            match self.get(&child_key).await {
                Ok(node) => {
                    // This level's marker exists even if a deeper walk
                    // failed, so the child is listed, not skipped.
                    if walk_errors.remove(&first).is_some() {
                        diagnostics::log_warn!(
                            "listing {first} despite a failed deeper backfill",
                            first: first.clone()
                        );
                    }
                    diagnostics::log_debug!(
                        "collapsed {count} entries into {child_key}",
                        count: count,
                        child_key: child_key
                    );
                    report.nodes.push(node);
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(fetch_error) => {
                    // The walk failure, when there was one, is the root
                    // cause; a fetch on a never-created marker only
                    // reports NotFound.
                    let reason = walk_errors.remove(&first).unwrap_or(fetch_error);
                    let detail = reason.to_string();
                    diagnostics::log_warn!(
                        "skipping {first}: backfill failed: {detail}",
                        first: first.clone(),
                        detail: detail
                    );
                    report.skipped.push(Skipped {
                        name: first,
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Idempotently create a directory marker for every ancestor
    /// segment of `relative_name` below `dir`, except the leaf.
    ///
    /// Each segment gets its own version-zero-guarded transaction, so a
    /// concurrent creator simply makes this walk observe a false guard
    /// and move on. Returns the first path segment, the immediate child
    /// name being listed.
    pub(crate) async fn ensure_ancestors(&self, dir: &str, relative_name: &str) -> Result<String> {
        let segments: Vec<&str> = relative_name.split('/').collect();
        let first = segments.first().copied().unwrap_or_default().to_string();

        let mut key = dir.trim_end_matches('/').to_string();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            key.push('/');
            key.push_str(segment);
            // AlreadyExists covers both a pre-existing marker and a
            // lost creation race; neither stops the walk.
            self.create_if_absent(&key).await?;
        }
        Ok(first)
    }
}
