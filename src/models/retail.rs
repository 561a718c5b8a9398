use serde::{Deserialize, Serialize};

use crate::config::Vertical;
use crate::filter::{Metric, RangeDimension};
use crate::models::Listing;

// ---------------------------------------------------------------------------
// RetailProduct: shop products and promotions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailProduct {
    #[serde(alias = "title")]
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub shop: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub promo: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
}

impl RetailProduct {
    /// Percentage off the pre-promotion price.
    pub fn discount(&self) -> Option<f64> {
        match (self.price, self.old_price) {
            (Some(price), Some(old)) if old > 0.0 => Some((old - price) / old * 100.0),
            _ => None,
        }
    }
}

impl Listing for RetailProduct {
    fn verticals() -> &'static [Vertical] {
        &[Vertical::Prod, Vertical::Ross, Vertical::Xkom]
    }

    fn price(&self) -> Option<f64> {
        self.price
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "brand" => self.brand.as_deref(),
            "category" => self.category.as_deref(),
            "shop" => self.shop.as_deref(),
            "promo" => self.promo.as_deref(),
            _ => None,
        }
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "oldPrice" => self.old_price,
            "discount" => self.discount(),
            _ => None,
        }
    }

    fn category_fields() -> &'static [&'static str] {
        &["brand", "category", "shop", "promo"]
    }

    fn range_dimensions() -> Vec<RangeDimension> {
        let mut dims = RangeDimension::prices(&[
            0.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0,
        ]);
        dims.push(RangeDimension::new(
            "discount",
            Metric::Field("discount".into()),
            &[0.0, 10.0, 20.0, 30.0, 50.0, 70.0, 100.0],
        ));
        dims
    }
}
