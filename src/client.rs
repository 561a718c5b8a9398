//! Blocking HTTP client for the aggregation API.
//!
//! Fetches `{ "result": [...] }` bodies and validates them against the
//! vertical's payload type. Validation is all-or-nothing: one malformed row
//! fails the whole response with [`PriceError::Schema`].

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::config::Vertical;
use crate::error::{PriceError, Result};
use crate::models::{Listing, Snapshot, SnapshotEnvelope};
use crate::request::ApiRequest;

/// Fetches snapshot lists, optionally writing them through to a [`ResponseCache`].
pub struct SnapshotClient {
    base_url: String,
    /// If true, never hit the network (serve from the cache only).
    pub offline: bool,
    http: Client,
    cache: Option<ResponseCache>,
}

impl SnapshotClient {
    /// Create a client for `base_url`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        offline: bool,
        cache: Option<ResponseCache>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.to_string(),
            offline,
            http,
            cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Fetch and validate the snapshots a request selects.
    ///
    /// No retries: a network failure, a non-2xx status, or a schema mismatch
    /// is returned to the caller as-is.
    pub fn fetch<L: Listing>(&self, request: &ApiRequest) -> Result<Vec<Snapshot<L>>> {
        let vertical = request.vertical();
        ensure_supported::<L>(vertical)?;

        if self.offline {
            let cache = self.cache.as_ref().ok_or_else(|| {
                PriceError::NotFound(format!(
                    "{} requested offline but no response cache is configured",
                    vertical
                ))
            })?;
            debug!(%vertical, "serving snapshots from cache");
            return cache.load::<L>(vertical);
        }

        ensure_absolute(&self.base_url)?;
        let (url, params) = request.build(&self.base_url);
        debug!(%vertical, %url, ?params, "fetching snapshots");

        let resp = self.http.get(&url).query(&params).send()?.error_for_status()?;
        let body = resp.bytes()?;
        let snapshots = parse_snapshots::<L>(vertical, &body)?;

        if let Some(ref cache) = self.cache {
            if let Err(e) = cache.store(vertical, &body) {
                warn!(%vertical, error = %e, "failed to cache response body");
            }
        }

        info!(%vertical, rows = snapshots.len(), "fetched snapshots");
        Ok(snapshots)
    }
}

/// Parse a response body into snapshots.
pub fn parse_snapshots<L: Listing>(vertical: Vertical, body: &[u8]) -> Result<Vec<Snapshot<L>>> {
    serde_json::from_slice::<SnapshotEnvelope<L>>(body)
        .map(|envelope| envelope.result)
        .map_err(|source| PriceError::Schema { vertical, source })
}

fn ensure_supported<L: Listing>(vertical: Vertical) -> Result<()> {
    if L::verticals().contains(&vertical) {
        Ok(())
    } else {
        Err(PriceError::InvalidArgument(format!(
            "{} responses do not deserialize into {}",
            vertical,
            std::any::type_name::<L>()
        )))
    }
}

fn ensure_absolute(base_url: &str) -> Result<()> {
    match reqwest::Url::parse(base_url) {
        Ok(url) if url.has_host() && matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(PriceError::InvalidArgument(format!(
            "API base URL must be absolute, got '{}' (set PRICE_API_URL)",
            base_url
        ))),
    }
}
