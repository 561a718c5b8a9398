use serde::{Deserialize, Serialize};

use crate::config::Vertical;
use crate::filter::{Metric, RangeDimension};
use crate::models::Listing;

// ---------------------------------------------------------------------------
// CurrencyRate: exchange rate of one currency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    pub code: String,
    pub currency: Option<String>,
    pub table: Option<String>,
    #[serde(alias = "mid")]
    pub rate: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

impl Listing for CurrencyRate {
    fn verticals() -> &'static [Vertical] {
        &[Vertical::Euro]
    }

    fn price(&self) -> Option<f64> {
        self.rate
    }

    fn title(&self) -> &str {
        &self.code
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "table" => self.table.as_deref(),
            _ => None,
        }
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "bid" => self.bid,
            "ask" => self.ask,
            "spread" => Some(self.ask? - self.bid?),
            _ => None,
        }
    }

    fn category_fields() -> &'static [&'static str] {
        &["table"]
    }

    fn range_dimensions() -> Vec<RangeDimension> {
        RangeDimension::prices(&[0.0, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0])
    }

    // A higher rate is not "worse", so nothing inverts except the spread.
    fn ascending_metrics() -> Vec<Metric> {
        vec![Metric::Field("spread".into())]
    }
}
