use serde::{Deserialize, Serialize};

use crate::config::Vertical;
use crate::filter::RangeDimension;
use crate::models::Listing;

// ---------------------------------------------------------------------------
// FuelPrice: pump price of one fuel grade at one station
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPrice {
    #[serde(alias = "name")]
    pub station: String,
    pub brand: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub grade: String,
    pub price: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Listing for FuelPrice {
    fn verticals() -> &'static [Vertical] {
        &[Vertical::Fuel]
    }

    fn price(&self) -> Option<f64> {
        self.price
    }

    fn title(&self) -> &str {
        &self.station
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "brand" => self.brand.as_deref(),
            "city" => self.city.as_deref(),
            "type" => Some(&self.grade),
            _ => None,
        }
    }

    fn category_fields() -> &'static [&'static str] {
        &["brand", "city", "type"]
    }

    fn range_dimensions() -> Vec<RangeDimension> {
        RangeDimension::prices(&[0.0, 4.0, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0])
    }
}
