use serde::{Deserialize, Serialize};

use crate::config::Vertical;
use crate::filter::{Metric, RangeDimension};
use crate::models::Listing;

// ---------------------------------------------------------------------------
// VehicleListing: cars, bicycles and motorbikes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListing {
    #[serde(alias = "name")]
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub mileage: Option<f64>,
    pub fuel: Option<String>,
    pub gearbox: Option<String>,
    pub body: Option<String>,
    pub city: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Listing for VehicleListing {
    fn verticals() -> &'static [Vertical] {
        &[Vertical::Auto, Vertical::Bike, Vertical::Moto]
    }

    fn price(&self) -> Option<f64> {
        self.price
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "brand" => self.brand.as_deref(),
            "fuel" => self.fuel.as_deref(),
            "gearbox" => self.gearbox.as_deref(),
            "body" => self.body.as_deref(),
            "city" => self.city.as_deref(),
            _ => None,
        }
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "year" => self.year.map(|y| y as f64),
            "mileage" => self.mileage,
            _ => None,
        }
    }

    fn category_fields() -> &'static [&'static str] {
        &["brand", "fuel", "gearbox", "body", "city"]
    }

    fn range_dimensions() -> Vec<RangeDimension> {
        let mut dims = RangeDimension::prices(&[
            0.0, 1_000.0, 5_000.0, 10_000.0, 20_000.0, 30_000.0, 50_000.0, 75_000.0, 100_000.0,
            150_000.0, 250_000.0,
        ]);
        dims.extend([
            RangeDimension::new(
                "year",
                Metric::Field("year".into()),
                &[0.0, 1990.0, 2000.0, 2005.0, 2010.0, 2015.0, 2018.0, 2020.0, 2022.0, 2024.0],
            ),
            RangeDimension::new(
                "mileage",
                Metric::Field("mileage".into()),
                &[0.0, 10_000.0, 50_000.0, 100_000.0, 150_000.0, 200_000.0, 300_000.0],
            ),
        ]);
        dims
    }

    fn ascending_metrics() -> Vec<Metric> {
        vec![
            Metric::Price,
            Metric::MinPrice,
            Metric::MaxPrice,
            Metric::Field("mileage".into()),
        ]
    }
}
