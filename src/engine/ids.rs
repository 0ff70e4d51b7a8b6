//! engine::ids
//!
//! Commit id issuance.
//!
//! Ids are six lowercase hex characters. An [`IdSource`] never hands out
//! the same id twice, and never hands out one already present in the
//! snapshot it is asked about, so amend-deleted ids stay retired.
//!
//! [`RandomIds`] draws from UUID v4 entropy and is what interactive
//! sessions use; [`SequentialIds`] counts upward and keeps tests and
//! scripted runs reproducible.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::core::commit::Commit;
use crate::core::types::CommitId;

/// Length of an issued id, in hex characters.
pub const ID_LEN: usize = 6;

/// Draws before a random source gives up.
const MAX_ATTEMPTS: usize = 4096;

/// A source of fresh commit ids.
pub trait IdSource {
    /// Issue an id not present in `in_use` and never issued before.
    ///
    /// Returns `None` only if the source is exhausted.
    fn issue(&mut self, in_use: &BTreeMap<CommitId, Commit>) -> Option<CommitId>;
}

/// Random six-hex-digit ids.
#[derive(Debug, Default)]
pub struct RandomIds {
    issued: HashSet<String>,
}

impl RandomIds {
    /// Create a source with an empty issue record.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for RandomIds {
    fn issue(&mut self, in_use: &BTreeMap<CommitId, Commit>) -> Option<CommitId> {
        for _ in 0..MAX_ATTEMPTS {
            let hex = Uuid::new_v4().simple().to_string();
            let candidate = &hex[..ID_LEN];
            if in_use.contains_key(candidate) || self.issued.contains(candidate) {
                continue;
            }
            self.issued.insert(candidate.to_string());
            return Some(CommitId::trusted(candidate));
        }
        None
    }
}

/// Counting ids: `000001`, `000002`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    /// Start counting after `start`.
    pub fn starting_at(start: u32) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn issue(&mut self, in_use: &BTreeMap<CommitId, Commit>) -> Option<CommitId> {
        const LIMIT: u32 = 0x00ff_ffff;
        while self.next < LIMIT {
            self.next += 1;
            let candidate = format!("{:06x}", self.next);
            if !in_use.contains_key(candidate.as_str()) {
                return Some(CommitId::trusted(candidate));
            }
        }
        None
    }
}
