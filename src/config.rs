use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PriceError;

/// Environment variable holding the backend aggregation API base URL.
pub const API_URL_ENV: &str = "PRICE_API_URL";

/// Base URL used when `PRICE_API_URL` is unset.
///
/// This is a relative root and cannot be fetched from outside a browser; the
/// client rejects it with [`PriceError::InvalidArgument`].
pub const DEFAULT_API_URL: &str = "/";

/// Quiet period the query channel waits for before emitting.
pub const QUIET_WINDOW: Duration = Duration::from_millis(400);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Vertical
// ---------------------------------------------------------------------------

/// One listing vertical served by the aggregation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Auto,
    Bike,
    Euro,
    Moto,
    Fuel,
    Prop,
    Prod,
    Ross,
    Xkom,
}

impl Vertical {
    pub const ALL: [Vertical; 9] = [
        Vertical::Auto,
        Vertical::Bike,
        Vertical::Euro,
        Vertical::Moto,
        Vertical::Fuel,
        Vertical::Prop,
        Vertical::Prod,
        Vertical::Ross,
        Vertical::Xkom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Vertical::Auto => "auto",
            Vertical::Bike => "bike",
            Vertical::Euro => "euro",
            Vertical::Moto => "moto",
            Vertical::Fuel => "fuel",
            Vertical::Prop => "prop",
            Vertical::Prod => "prod",
            Vertical::Ross => "ross",
            Vertical::Xkom => "xkom",
        }
    }

    /// Path appended to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Vertical::Auto => "/stock/v1",
            Vertical::Bike => "/bikes",
            Vertical::Euro => "/euro",
            Vertical::Moto => "/motos",
            Vertical::Fuel => "/fuels",
            Vertical::Prop => "/props",
            Vertical::Prod => "/prods",
            Vertical::Ross => "/rossm",
            Vertical::Xkom => "/promo/v2",
        }
    }

    /// `limit` sent when the caller does not pick one.
    pub fn default_limit(self) -> usize {
        match self {
            Vertical::Auto => 1500,
            Vertical::Bike => 500,
            Vertical::Euro => 100,
            Vertical::Moto => 500,
            Vertical::Fuel => 300,
            Vertical::Prop => 1000,
            Vertical::Prod => 1000,
            Vertical::Ross => 1000,
            Vertical::Xkom => 500,
        }
    }

    /// Environment variable naming the public site used for outbound display links.
    pub fn display_base_env(self) -> String {
        format!("NEXT_PUBLIC_{}_BASE_URL", self.name().to_ascii_uppercase())
    }

    /// File name of the cached response body for this vertical.
    pub fn cache_file(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vertical {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vertical::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PriceError::InvalidArgument(format!("Unknown vertical: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Environment lookups
// ---------------------------------------------------------------------------

/// The API base URL from `PRICE_API_URL`, or [`DEFAULT_API_URL`].
pub fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Build an outbound display link for a listing, using the vertical's
/// `NEXT_PUBLIC_*_BASE_URL`. Returns `None` when the variable is unset.
pub fn display_link(vertical: Vertical, path: &str) -> Option<String> {
    let base = std::env::var(vertical.display_base_env()).ok()?;
    Some(join_url(&base, path))
}

/// Join a base URL and a path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("pricewatch-sdk")
    } else {
        PathBuf::from(".pricewatch-sdk-cache")
    }
}
