//! Aggregate price metadata folded from a listing's snapshot history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::group::EntityHistory;
use crate::models::{Listing, Snapshot};

// ---------------------------------------------------------------------------
// AggregateMeta
// ---------------------------------------------------------------------------

/// Derived summary of one [`EntityHistory`]. A pure function of the history.
///
/// Prices are optional because scrapers occasionally record a listing without
/// one; such snapshots never contribute to `min_value` / `max_value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateMeta {
    /// Price on the newest snapshot.
    pub current_value: Option<f64>,
    /// When the current price first appeared.
    pub current_changed_at: DateTime<Utc>,
    /// Price held before the current one, if it ever changed.
    pub previous_value: Option<f64>,
    pub min_value: Option<f64>,
    /// Newest capture time at which `min_value` was observed.
    pub min_changed_at: Option<DateTime<Utc>>,
    pub max_value: Option<f64>,
    pub first_seen: DateTime<Utc>,
    pub last_checked: Option<DateTime<Utc>>,
    pub snapshots: usize,
}

impl AggregateMeta {
    /// `current - previous`; negative when the price dropped.
    pub fn price_change(&self) -> Option<f64> {
        Some(self.current_value? - self.previous_value?)
    }

    /// Whether the current price is the lowest ever observed.
    pub fn at_minimum(&self) -> bool {
        matches!((self.current_value, self.min_value), (Some(c), Some(m)) if c <= m)
    }
}

/// Fold a history into its [`AggregateMeta`].
///
/// Walks newest to oldest. The first snapshot sets the current value; the run
/// of equal prices that follows it dates the last change. A new minimum is only
/// taken on a strictly lower price, so ties keep the newest timestamp.
pub fn reduce<L: Listing>(history: &EntityHistory<L>) -> AggregateMeta {
    let newest = history.newest();
    let current_value = newest.payload.price();
    let mut current_changed_at = newest.captured_at;
    let mut previous_value = None;
    let mut in_current_run = true;

    let mut min: Option<(f64, DateTime<Utc>)> = None;
    let mut max: Option<f64> = None;
    let mut last_checked: Option<DateTime<Utc>> = None;

    for snapshot in history.snapshots() {
        let value = snapshot.payload.price();

        if in_current_run && !(value.is_none() && current_value.is_some()) {
            if value == current_value {
                current_changed_at = snapshot.captured_at;
            } else {
                in_current_run = false;
                previous_value = value;
            }
        }

        if let Some(v) = value {
            if min.map_or(true, |(m, _)| v < m) {
                min = Some((v, snapshot.captured_at));
            }
            if max.map_or(true, |m| v >= m) {
                max = Some(v);
            }
        }

        last_checked = latest(last_checked, snapshot);
    }

    AggregateMeta {
        current_value,
        current_changed_at,
        previous_value,
        min_value: min.map(|(v, _)| v),
        min_changed_at: min.map(|(_, at)| at),
        max_value: max,
        first_seen: history.oldest().captured_at,
        last_checked,
        snapshots: history.snapshot_count(),
    }
}

fn latest<L>(acc: Option<DateTime<Utc>>, snapshot: &Snapshot<L>) -> Option<DateTime<Utc>> {
    match (acc, snapshot.checked_at) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

// ---------------------------------------------------------------------------
// TrackedEntity
// ---------------------------------------------------------------------------

/// A listing's history paired with its reduced meta.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity<L> {
    pub history: EntityHistory<L>,
    pub meta: AggregateMeta,
}

impl<L: Listing> TrackedEntity<L> {
    pub fn new(history: EntityHistory<L>) -> Self {
        let meta = reduce(&history);
        Self { history, meta }
    }

    pub fn key(&self) -> &str {
        self.history.key()
    }

    /// Payload of the newest snapshot; filters and sorts read from this.
    pub fn latest(&self) -> &L {
        &self.history.newest().payload
    }
}

/// Reduce every history, keeping the grouper's order.
pub fn track<L: Listing>(histories: Vec<EntityHistory<L>>) -> Vec<TrackedEntity<L>> {
    histories.into_iter().map(TrackedEntity::new).collect()
}
