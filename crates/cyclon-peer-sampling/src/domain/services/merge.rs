//! The three-way view merge.

use super::aging::sort_by_age;
use super::selection::exclude;
use crate::domain::{Address, Addressed, Descriptor, Node};
use std::collections::HashSet;

/// Result of merging a local view with a shuffle exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome<C> {
    /// The new view, at most `capacity` entries, no duplicates, no self.
    pub result: Vec<Node<C>>,
    /// Offered or local entries that did not survive.
    pub removed: Vec<Node<C>>,
}

impl<C> Default for MergeOutcome<C> {
    fn default() -> Self {
        Self {
            result: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// Combine `local` with the `received` subset and the `sent` subset.
///
/// 1. Entries for `own` are dropped from `received` and `sent`.
/// 2. `received` loses anything already in `local` or `sent`.
/// 3. `local` loses anything in `sent`.
/// 4. The result keeps every remaining local entry, then fills up to
///    `min(capacity, candidates)` from `received` youngest first, then from
///    `sent` youngest first.
/// 5. Whatever was not consumed is returned as `removed`.
///
/// Local survivors are always kept and, among offered entries, fresher ones
/// win. Repeated addresses within `received` or `sent` keep their first
/// occurrence.
pub fn merge<C: Clone>(
    local: &[Node<C>],
    received: &[Descriptor],
    sent: &[Descriptor],
    capacity: usize,
    own: &Address,
) -> MergeOutcome<C> {
    let own = [own];
    let sent = dedup(exclude(sent, &own));
    let received = exclude(&exclude(received, &own), local);
    let received = dedup(exclude(&received, &sent));
    let local = exclude(local, &sent);

    let target = capacity.min(local.len() + received.len() + sent.len());

    let mut outcome = MergeOutcome::default();
    for entry in local {
        if outcome.result.len() < target {
            outcome.result.push(entry);
        } else {
            outcome.removed.push(entry);
        }
    }

    for candidate in sort_by_age(received).into_iter().chain(sort_by_age(sent)) {
        if outcome.result.len() < target {
            outcome.result.push(Node::from(candidate));
        } else {
            outcome.removed.push(Node::from(candidate));
        }
    }

    outcome
}

fn dedup<T: Addressed>(list: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|entry| seen.insert(entry.address().clone()))
        .collect()
}
