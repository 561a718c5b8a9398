//! Filter and sort engine over tracked listings.
//!
//! A [`FilterCriteria`] is a conjunction of independent predicates: a search
//! string, numeric ranges and categorical selections. [`apply`] returns the
//! listings satisfying all of them, ordered by the selected [`Metric`].
//!
//! # Example
//!
//! ```rust
//! use pricewatch_sdk::filter::{FilterCriteria, Metric};
//! use pricewatch_sdk::models::VehicleListing;
//!
//! let mut criteria = FilterCriteria::for_listing::<VehicleListing>();
//! criteria
//!     .search("golf")
//!     .range("price", 5_000.0, 20_000.0)
//!     .select("fuel", "diesel")
//!     .sort_by(Metric::Price);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::str::FromStr;

use tracing::warn;

use crate::meta::TrackedEntity;
use crate::models::Listing;

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// A numeric value read off a tracked listing, used for ranges and sorting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Current price.
    Price,
    MinPrice,
    MaxPrice,
    /// Current minus previous price.
    PriceChange,
    /// When the current price appeared.
    ChangedAt,
    FirstSeen,
    LastCaptured,
    /// A numeric payload field of the newest snapshot.
    Field(String),
}

impl Metric {
    /// Read this metric from a listing. Timestamps read as epoch milliseconds.
    pub fn value<L: Listing>(&self, entity: &TrackedEntity<L>) -> Option<f64> {
        let meta = &entity.meta;
        match self {
            Metric::Price => meta.current_value,
            Metric::MinPrice => meta.min_value,
            Metric::MaxPrice => meta.max_value,
            Metric::PriceChange => meta.price_change(),
            Metric::ChangedAt => Some(meta.current_changed_at.timestamp_millis() as f64),
            Metric::FirstSeen => Some(meta.first_seen.timestamp_millis() as f64),
            Metric::LastCaptured => Some(entity.history.last_captured().timestamp_millis() as f64),
            Metric::Field(name) => entity.latest().numeric(name),
        }
    }
}

impl FromStr for Metric {
    type Err = Infallible;

    /// Known metric names map to their variant; anything else is a payload field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "price" => Metric::Price,
            "minPrice" => Metric::MinPrice,
            "maxPrice" => Metric::MaxPrice,
            "priceChange" => Metric::PriceChange,
            "changedAt" => Metric::ChangedAt,
            "firstSeen" => Metric::FirstSeen,
            "lastCaptured" => Metric::LastCaptured,
            other => Metric::Field(other.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// RangeDimension
// ---------------------------------------------------------------------------

/// A numeric dimension a vertical offers for range filtering.
///
/// `options` is the list of selectable bounds. Its first entry is the "off"
/// sentinel: an upper bound equal to it disables the dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeDimension {
    pub name: &'static str,
    pub metric: Metric,
    pub options: Vec<f64>,
}

impl RangeDimension {
    pub fn new(name: &'static str, metric: Metric, options: &[f64]) -> Self {
        Self {
            name,
            metric,
            options: options.to_vec(),
        }
    }

    /// The `price` dimension over the lowest price a listing has been seen at.
    ///
    /// A listing passes a lower bound only if it never sold below it, so one
    /// that dipped to 80 and now asks 120 fails `price >= 90`.
    pub fn price(options: &[f64]) -> Self {
        Self::new("price", Metric::MinPrice, options)
    }

    /// The `currentPrice` dimension over the newest snapshot's price.
    pub fn current_price(options: &[f64]) -> Self {
        Self::new("currentPrice", Metric::Price, options)
    }

    /// Both price dimensions over the same bound list.
    pub fn prices(options: &[f64]) -> Vec<Self> {
        vec![Self::price(options), Self::current_price(options)]
    }

    /// The "no upper limit" sentinel.
    pub fn off(&self) -> f64 {
        self.options.first().copied().unwrap_or(0.0)
    }

    /// A fresh, disabled range over this dimension.
    pub fn filter(&self) -> RangeFilter {
        RangeFilter::new(self.metric.clone(), self.off())
    }
}

// ---------------------------------------------------------------------------
// RangeFilter
// ---------------------------------------------------------------------------

/// A `from <= value <= to` predicate with a distinguished "off" upper bound.
///
/// While `to == off` the predicate is skipped entirely. Moving one bound past
/// the other drags the other along, so `from <= to` holds whenever the range
/// is active. An off range keeps its lower bound as entered, which may exceed
/// the sentinel; it takes effect once an upper bound is chosen, and the
/// ordering is restored at that point.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    metric: Metric,
    from: f64,
    to: f64,
    off: f64,
}

impl RangeFilter {
    pub fn new(metric: Metric, off: f64) -> Self {
        Self {
            metric,
            from: off,
            to: off,
            off,
        }
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn off(&self) -> f64 {
        self.off
    }

    pub fn is_active(&self) -> bool {
        self.to != self.off
    }

    pub fn set_from(&mut self, value: f64) {
        self.from = value;
        if self.is_active() && self.from > self.to {
            self.to = self.from;
        }
    }

    pub fn set_to(&mut self, value: f64) {
        self.to = value;
        if self.is_active() && self.to < self.from {
            self.from = self.to;
        }
    }

    /// Whether a listing's value passes. Listings without a value fail an
    /// active range.
    pub fn matches(&self, value: Option<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        match value {
            Some(v) => self.from <= v && v <= self.to,
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// User-selected filter state. Builder methods return `&mut Self` for chaining.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    search: String,
    ranges: BTreeMap<String, RangeFilter>,
    categories: BTreeMap<String, String>,
    sort: Metric,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            ranges: BTreeMap::new(),
            categories: BTreeMap::new(),
            sort: Metric::ChangedAt,
        }
    }
}

impl FilterCriteria {
    /// Pass-through criteria for a vertical: every range off, every category
    /// unselected, the vertical's default sort.
    pub fn for_listing<L: Listing>() -> Self {
        let ranges = L::range_dimensions()
            .iter()
            .map(|d| (d.name.to_string(), d.filter()))
            .collect();
        let categories = L::category_fields()
            .iter()
            .map(|f| (f.to_string(), String::new()))
            .collect();
        Self {
            search: String::new(),
            ranges,
            categories,
            sort: L::default_sort(),
        }
    }

    // -- Builders ----------------------------------------------------------

    pub fn search(&mut self, text: &str) -> &mut Self {
        self.search = text.to_string();
        self
    }

    /// Set the lower bound of a range dimension.
    pub fn range_from(&mut self, name: &str, value: f64) -> &mut Self {
        match self.ranges.get_mut(name) {
            Some(range) => range.set_from(value),
            None => warn!(dimension = name, "ignoring lower bound for unknown range"),
        }
        self
    }

    /// Set the upper bound of a range dimension.
    pub fn range_to(&mut self, name: &str, value: f64) -> &mut Self {
        match self.ranges.get_mut(name) {
            Some(range) => range.set_to(value),
            None => warn!(dimension = name, "ignoring upper bound for unknown range"),
        }
        self
    }

    pub fn range(&mut self, name: &str, from: f64, to: f64) -> &mut Self {
        self.range_from(name, from).range_to(name, to)
    }

    /// Add or replace a range over an arbitrary metric.
    pub fn with_range(&mut self, name: &str, range: RangeFilter) -> &mut Self {
        self.ranges.insert(name.to_string(), range);
        self
    }

    /// Select a categorical value; an empty string clears the selection.
    pub fn select(&mut self, field: &str, value: &str) -> &mut Self {
        match self.categories.get_mut(field) {
            Some(selected) => *selected = value.to_string(),
            None => warn!(field, "ignoring selection for unknown category"),
        }
        self
    }

    pub fn sort_by(&mut self, metric: Metric) -> &mut Self {
        self.sort = metric;
        self
    }

    // -- Accessors ---------------------------------------------------------

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn range_filter(&self, name: &str) -> Option<&RangeFilter> {
        self.ranges.get(name)
    }

    pub fn ranges(&self) -> impl Iterator<Item = (&str, &RangeFilter)> {
        self.ranges.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The selected value of a categorical field, `""` when unselected.
    pub fn selection(&self, field: &str) -> &str {
        self.categories.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn sort_metric(&self) -> &Metric {
        &self.sort
    }

    /// Copy with the search text lowercased and trimmed.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.search = self.search.trim().to_lowercase();
        out
    }

    /// Copy with surrounding whitespace removed from the search text.
    pub fn trimmed(&self) -> Self {
        let mut out = self.clone();
        out.search = self.search.trim().to_string();
        out
    }

    /// Whether two criteria differ at most in search case and padding.
    pub fn same_query(&self, other: &FilterCriteria) -> bool {
        self.normalized() == other.normalized()
    }

    // -- Predicates --------------------------------------------------------

    /// Whether a listing passes every predicate.
    pub fn matches<L: Listing>(&self, entity: &TrackedEntity<L>) -> bool {
        self.matches_search(entity)
            && self
                .ranges
                .values()
                .all(|r| r.matches(r.metric().value(entity)))
            && self
                .categories
                .iter()
                .all(|(field, selected)| {
                    selected.is_empty() || entity.latest().category(field) == Some(selected.as_str())
                })
    }

    fn matches_search<L: Listing>(&self, entity: &TrackedEntity<L>) -> bool {
        let needle = self.search.trim();
        if needle.is_empty() {
            return true;
        }
        // Ids match exactly; only the title match ignores case
        if entity.key() == needle {
            return true;
        }
        entity
            .latest()
            .title()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Filter and sort listings. Returns references in display order; the input
/// slice is never reordered or modified.
pub fn apply<'a, L: Listing>(
    entities: &'a [TrackedEntity<L>],
    criteria: &FilterCriteria,
) -> Vec<&'a TrackedEntity<L>> {
    let mut out: Vec<&TrackedEntity<L>> = entities.iter().filter(|e| criteria.matches(*e)).collect();
    let ascending = L::ascending_metrics().contains(criteria.sort_metric());
    sort_entities(&mut out, criteria.sort_metric(), ascending);
    out
}

/// Stable sort by a metric, descending unless `ascending`. Listings missing
/// the metric go last.
pub fn sort_entities<L: Listing>(entities: &mut [&TrackedEntity<L>], metric: &Metric, ascending: bool) {
    entities.sort_by(|a, b| compare(metric.value(*a), metric.value(*b), ascending));
}

fn compare(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.total_cmp(&b),
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct values of each categorical field across every loaded snapshot,
/// sorted. Empty strings are left out.
pub fn options<L: Listing>(entities: &[TrackedEntity<L>]) -> BTreeMap<&'static str, Vec<String>> {
    L::category_fields()
        .iter()
        .map(|&field| {
            let values: BTreeSet<&str> = entities
                .iter()
                .flat_map(|e| e.history.snapshots())
                .filter_map(|s| s.payload.category(field))
                .filter(|v| !v.is_empty())
                .collect();
            (field, values.into_iter().map(str::to_string).collect())
        })
        .collect()
}
