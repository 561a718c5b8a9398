use serde::{Deserialize, Serialize};

use crate::config::Vertical;
use crate::filter::{Metric, RangeDimension};
use crate::models::Listing;

// ---------------------------------------------------------------------------
// PropertyListing: flats and houses for sale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub title: String,
    pub city: Option<String>,
    pub district: Option<String>,
    pub market: Option<String>,
    pub kind: Option<String>,
    pub rooms: Option<i64>,
    pub area: Option<f64>,
    pub floor: Option<i64>,
    pub price: Option<f64>,
    pub url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl PropertyListing {
    pub fn price_per_meter(&self) -> Option<f64> {
        match (self.price, self.area) {
            (Some(price), Some(area)) if area > 0.0 => Some(price / area),
            _ => None,
        }
    }
}

impl Listing for PropertyListing {
    fn verticals() -> &'static [Vertical] {
        &[Vertical::Prop]
    }

    fn price(&self) -> Option<f64> {
        self.price
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "city" => self.city.as_deref(),
            "district" => self.district.as_deref(),
            "market" => self.market.as_deref(),
            "kind" => self.kind.as_deref(),
            _ => None,
        }
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "rooms" => self.rooms.map(|r| r as f64),
            "area" => self.area,
            "floor" => self.floor.map(|f| f as f64),
            "pricePerMeter" => self.price_per_meter(),
            _ => None,
        }
    }

    fn category_fields() -> &'static [&'static str] {
        &["city", "district", "market", "kind"]
    }

    fn range_dimensions() -> Vec<RangeDimension> {
        let mut dims = RangeDimension::prices(&[
            0.0, 200_000.0, 300_000.0, 400_000.0, 500_000.0, 750_000.0, 1_000_000.0,
            1_500_000.0, 2_000_000.0,
        ]);
        dims.extend([
            RangeDimension::new(
                "area",
                Metric::Field("area".into()),
                &[0.0, 25.0, 35.0, 50.0, 70.0, 90.0, 120.0, 200.0],
            ),
            RangeDimension::new(
                "rooms",
                Metric::Field("rooms".into()),
                &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            ),
        ]);
        dims
    }

    fn ascending_metrics() -> Vec<Metric> {
        vec![
            Metric::Price,
            Metric::MinPrice,
            Metric::MaxPrice,
            Metric::Field("pricePerMeter".into()),
        ]
    }
}
