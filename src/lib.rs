//! Price watch SDK for Rust.
//!
//! Provides a high-level client for the price aggregation API. Scraped
//! snapshots (cars, bikes, motorbikes, fuel, property, retail products and
//! currency rates) are fetched over HTTP, validated against typed payloads,
//! grouped into per-listing price histories and filtered in-process.
//!
//! # Quick start
//!
//! ```no_run
//! use pricewatch_sdk::{Metric, PriceSdk};
//!
//! let sdk = PriceSdk::builder()
//!     .base_url("https://prices.example.com")
//!     .build()
//!     .unwrap();
//!
//! // Group fuel snapshots into per-station histories
//! let fuels = sdk.fuels().tracked(None).unwrap();
//!
//! // Cheapest diesel in town
//! let mut view = sdk.fuels().view();
//! sdk.fuels().load(&mut view, None).unwrap();
//! view.criteria_mut().select("type", "ON").sort_by(Metric::Price);
//! let cheapest = view.visible();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod group;
pub mod meta;
pub mod models;
pub mod queries;
pub mod request;
pub mod sequence;
pub mod view;

#[cfg(feature = "async")]
pub use async_client::AsyncPriceSdk;
pub use cache::ResponseCache;
pub use client::SnapshotClient;
pub use config::Vertical;
pub use debounce::{Debouncer, QueryChannel};
pub use error::{PriceError, Result};
pub use filter::{FilterCriteria, Metric, RangeDimension, RangeFilter};
pub use group::{group_snapshots, EntityHistory};
pub use meta::{reduce, AggregateMeta, TrackedEntity};
pub use request::ApiRequest;
pub use sequence::{FetchTicket, RequestSequencer};
pub use view::ListingView;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use models::{CurrencyRate, FuelPrice, Listing, PropertyListing, RetailProduct, VehicleListing};
use queries::ListingQuery;

// ---------------------------------------------------------------------------
// PriceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceSdk`] instance.
///
/// Use [`PriceSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceSdkBuilder::build) to create the SDK.
pub struct PriceSdkBuilder {
    base_url: Option<String>,
    cache_dir: Option<PathBuf>,
    cache: bool,
    offline: bool,
    timeout: Duration,
    quiet_window: Duration,
}

impl Default for PriceSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            cache_dir: None,
            cache: false,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            quiet_window: config::QUIET_WINDOW,
        }
    }
}

impl PriceSdkBuilder {
    /// Set the API base URL.
    ///
    /// If not set, `PRICE_API_URL` is read from the environment, falling back
    /// to `/`. A relative base can only be used offline.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Write fetched bodies through to a cache in the given directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self.cache = true;
        self
    }

    /// Enable or disable the response cache in the default directory
    /// (e.g. `~/.cache/pricewatch-sdk` on Linux).
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never touches the network and serves the last
    /// cached response per vertical. Implies the cache. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the quiet window used by [`PriceSdk::query_channel`]. Defaults to 400 ms.
    pub fn quiet_window(mut self, quiet: Duration) -> Self {
        self.quiet_window = quiet;
        self
    }

    /// Build the SDK. No request is sent until the first query.
    pub fn build(self) -> Result<PriceSdk> {
        let base_url = self.base_url.unwrap_or_else(config::api_url_from_env);
        let cache = if self.cache || self.offline {
            Some(ResponseCache::new(self.cache_dir)?)
        } else {
            None
        };
        let client = SnapshotClient::new(&base_url, self.timeout, self.offline, cache)?;
        Ok(PriceSdk {
            client,
            quiet_window: self.quiet_window,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceSdk
// ---------------------------------------------------------------------------

/// The main entry point for the price SDK.
///
/// Wraps a [`SnapshotClient`] and exposes per-vertical query interfaces as
/// lightweight borrowing wrappers.
///
/// Created via [`PriceSdk::builder()`].
pub struct PriceSdk {
    client: SnapshotClient,
    quiet_window: Duration,
}

impl PriceSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> PriceSdkBuilder {
        PriceSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access any vertical, decoding rows into `L`.
    ///
    /// Fetching fails with [`PriceError::InvalidArgument`] if `L` does not
    /// model `vertical`.
    pub fn listings<L: Listing>(&self, vertical: Vertical) -> ListingQuery<'_, L> {
        ListingQuery::new(&self.client, vertical)
    }

    /// Car listings (`/stock/v1`).
    pub fn autos(&self) -> ListingQuery<'_, VehicleListing> {
        self.listings(Vertical::Auto)
    }

    /// Bicycle listings.
    pub fn bikes(&self) -> ListingQuery<'_, VehicleListing> {
        self.listings(Vertical::Bike)
    }

    /// Motorbike listings.
    pub fn motos(&self) -> ListingQuery<'_, VehicleListing> {
        self.listings(Vertical::Moto)
    }

    /// Pump prices per station and grade.
    pub fn fuels(&self) -> ListingQuery<'_, FuelPrice> {
        self.listings(Vertical::Fuel)
    }

    /// Currency exchange rates.
    pub fn rates(&self) -> ListingQuery<'_, CurrencyRate> {
        self.listings(Vertical::Euro)
    }

    /// Flats and houses.
    pub fn properties(&self) -> ListingQuery<'_, PropertyListing> {
        self.listings(Vertical::Prop)
    }

    /// Retail products from one of the shop verticals (`prod`, `ross`, `xkom`).
    pub fn products(&self, vertical: Vertical) -> ListingQuery<'_, RetailProduct> {
        self.listings(vertical)
    }

    // -- Utilities ---------------------------------------------------------

    /// A debounced query channel using the configured quiet window.
    ///
    /// Create one per view; dropping it stops its worker thread.
    pub fn query_channel(&self, initial: Option<&FilterCriteria>) -> QueryChannel {
        match initial {
            Some(c) => QueryChannel::with_initial(self.quiet_window, c),
            None => QueryChannel::new(self.quiet_window),
        }
    }

    /// Remove every cached response body. A no-op without a cache.
    pub fn clear_cache(&self) -> Result<()> {
        match self.client.cache() {
            Some(cache) => cache.clear(),
            None => Ok(()),
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Return a reference to the underlying [`SnapshotClient`] for advanced usage.
    pub fn client(&self) -> &SnapshotClient {
        &self.client
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self
            .client
            .cache()
            .map(|c| c.cache_dir.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "PriceSdk(base_url={}, cache_dir={}, offline={})",
            self.client.base_url(),
            cache,
            self.client.offline
        )
    }
}
