use std::fmt;

use serde::de::DeserializeOwned;

use crate::config::Vertical;
use crate::filter::{Metric, RangeDimension};

/// Field accessors a vertical's payload supplies to the shared pipeline.
///
/// Everything the grouper, reducer and filter engine need to know about a
/// vertical goes through this trait; the pipeline itself is vertical-agnostic.
pub trait Listing: DeserializeOwned + Clone + fmt::Debug {
    /// Verticals whose responses deserialize into this payload.
    fn verticals() -> &'static [Vertical];

    /// The tracked price, if this snapshot carries one.
    fn price(&self) -> Option<f64>;

    /// Display text matched by the search box.
    fn title(&self) -> &str;

    /// Value of a categorical field, by name.
    fn category(&self, _field: &str) -> Option<&str> {
        None
    }

    /// Value of a numeric payload field, by name.
    fn numeric(&self, _field: &str) -> Option<f64> {
        None
    }

    /// Categorical fields offered as filter options.
    fn category_fields() -> &'static [&'static str] {
        &[]
    }

    /// Numeric range dimensions; each option list starts with its "off" sentinel.
    fn range_dimensions() -> Vec<RangeDimension> {
        RangeDimension::prices(&[0.0, 10.0, 50.0, 100.0, 500.0, 1_000.0, 5_000.0, 10_000.0])
    }

    /// Sort keys where lower is better and which therefore sort ascending.
    fn ascending_metrics() -> Vec<Metric> {
        vec![Metric::Price, Metric::MinPrice, Metric::MaxPrice]
    }

    fn default_sort() -> Metric {
        Metric::ChangedAt
    }
}
