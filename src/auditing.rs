//! Tamper-evident audit sealing for automated pipeline runs.
//!
//! A Merkle root gives a single verifiable digest for an ordered transaction
//! log: change any entry, or the order of entries, and the root changes.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a string token.
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Computes the Merkle root over an ordered transaction log.
///
/// Each token is hashed to form the leaf layer; adjacent pairs are then
/// repeatedly hashed (concatenating their hex digests) until one digest
/// remains. An odd layer duplicates its last element so every node has a
/// partner. Returns `None` for an empty log.
///
/// The input is never mutated, so the function can be re-applied to a
/// growing log; the automated pipeline seals the log at every exit point.
pub fn compute_merkle_root(transactions: &[String]) -> Option<String> {
    if transactions.is_empty() {
        return None;
    }

    let mut level: Vec<String> = transactions.iter().map(|tx| sha256_hex(tx)).collect();

    while level.len() > 1 {
        if level.len() % 2 != 0 {
            let last = level[level.len() - 1].clone();
            level.push(last);
        }
        level = level
            .chunks(2)
            .map(|pair| sha256_hex(&format!("{}{}", pair[0], pair[1])))
            .collect();
    }

    level.into_iter().next()
}
