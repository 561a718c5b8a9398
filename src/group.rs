//! Grouping of flat snapshot lists into per-listing histories.
//!
//! The aggregation API returns one row per observation. Grouping buckets those
//! rows by listing id so each listing carries its full price history, newest
//! observation first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::Snapshot;

// ---------------------------------------------------------------------------
// EntityHistory
// ---------------------------------------------------------------------------

/// All snapshots sharing one listing id, newest first. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHistory<L> {
    key: String,
    snapshots: Vec<Snapshot<L>>,
}

impl<L> EntityHistory<L> {
    /// The listing id shared by every snapshot in this history.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn snapshots(&self) -> &[Snapshot<L>] {
        &self.snapshots
    }

    /// The latest observation.
    pub fn newest(&self) -> &Snapshot<L> {
        &self.snapshots[0]
    }

    /// The earliest observation.
    pub fn oldest(&self) -> &Snapshot<L> {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Capture time of the latest observation.
    pub fn last_captured(&self) -> DateTime<Utc> {
        self.newest().captured_at
    }

    pub fn into_snapshots(self) -> Vec<Snapshot<L>> {
        self.snapshots
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Bucket snapshots by `entity_key`.
///
/// Snapshots are first sorted by `captured_at` descending (stable, so equal
/// timestamps keep their input order). Histories come out in the order their
/// key first appears in that sorted sequence, and each history is newest
/// first. Every input snapshot lands in exactly one history.
pub fn group_snapshots<L>(mut snapshots: Vec<Snapshot<L>>) -> Vec<EntityHistory<L>> {
    snapshots.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<EntityHistory<L>> = Vec::new();

    for snapshot in snapshots {
        match index.get(&snapshot.entity_key) {
            Some(&i) => groups[i].snapshots.push(snapshot),
            None => {
                index.insert(snapshot.entity_key.clone(), groups.len());
                groups.push(EntityHistory {
                    key: snapshot.entity_key.clone(),
                    snapshots: vec![snapshot],
                });
            }
        }
    }

    groups
}

/// Look up one listing's history by id.
pub fn find_history<'a, L>(histories: &'a [EntityHistory<L>], key: &str) -> Option<&'a EntityHistory<L>> {
    histories.iter().find(|h| h.key == key)
}

/// Total number of snapshots across all histories.
pub fn snapshot_total<L>(histories: &[EntityHistory<L>]) -> usize {
    histories.iter().map(|h| h.snapshots.len()).sum()
}
