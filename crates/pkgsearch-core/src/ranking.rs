//! Cross-registry deduplication and ranking.

use crate::types::PackageInfo;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Orders records best-first: `relevance_score` descending, then `downloads`
/// descending.
pub fn rank_order(a: &PackageInfo, b: &PackageInfo) -> Ordering {
    b.relevance_score
        .total_cmp(&a.relevance_score)
        .then_with(|| b.downloads.cmp(&a.downloads))
}

/// Merges per-registry result lists into one ranked sequence.
///
/// Records are grouped by lower-cased name; within each group the
/// best-ranked record (see [`rank_order`]) survives. Exact ties keep the
/// record seen first. The survivors are then sorted with the same order.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::{PackageInfo, Registry, merge_and_rank};
///
/// let npm = vec![PackageInfo::new(Registry::Npm, "Flask", "0.1").with_relevance(0.3)];
/// let pypi = vec![PackageInfo::new(Registry::PyPi, "flask", "3.0.0").with_relevance(1.0)];
///
/// let merged = merge_and_rank([npm, pypi]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].registry, Registry::PyPi);
/// ```
pub fn merge_and_rank<I>(per_registry: I) -> Vec<PackageInfo>
where
    I: IntoIterator<Item = Vec<PackageInfo>>,
{
    let mut best: HashMap<String, PackageInfo> = HashMap::new();
    // Group keys in first-seen order so the final stable sort is deterministic.
    let mut order: Vec<String> = Vec::new();

    for package in per_registry.into_iter().flatten() {
        match best.entry(package.dedup_key()) {
            Entry::Occupied(mut slot) => {
                if rank_order(&package, slot.get()) == Ordering::Less {
                    slot.insert(package);
                }
            }
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(package);
            }
        }
    }

    let mut merged: Vec<PackageInfo> = order
        .into_iter()
        .filter_map(|key| best.remove(&key))
        .collect();
    merged.sort_by(rank_order);
    merged
}
