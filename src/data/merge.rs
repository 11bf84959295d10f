use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::model::SessionRecord;

/// Upstream session sheets. Their position in a merge order decides which
/// copy of a shared session is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionSource {
    /// The recurring-sessions sheet.
    Recurring,
    /// The per-teacher sessions sheet.
    Teacher,
}

/// Default precedence: recurring sessions win over teacher sessions.
pub const DEFAULT_MERGE_ORDER: [SessionSource; 2] = [SessionSource::Recurring, SessionSource::Teacher];

/// Merge session collections into one canonical collection.
///
/// `sources` are concatenated in the order given and scanned once; a record
/// is kept only if no earlier record shares its `(unique_id1, unique_id2)`
/// identity. Earlier sources therefore win when duplicates disagree.
/// Dropped duplicates are expected and only logged.
pub fn merge_sessions<'a, I>(sources: I) -> Vec<SessionRecord>
where
    I: IntoIterator<Item = &'a [SessionRecord]>,
{
    let mut seen: HashSet<(&'a str, &'a str)> = HashSet::new();
    let mut merged = Vec::new();
    let mut dropped = 0usize;

    for record in sources.into_iter().flatten() {
        if seen.insert(record.identity()) {
            merged.push(record.clone());
        } else {
            dropped += 1;
        }
    }

    log::debug!(
        "merged {} sessions ({} duplicate identities dropped)",
        merged.len(),
        dropped
    );
    merged
}
