//! Async wrapper around [`PriceSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. The
//! blocking reqwest client must never be driven from an async task directly.
//!
//! # Example
//!
//! ```no_run
//! use pricewatch_sdk::{AsyncPriceSdk, Vertical};
//! use pricewatch_sdk::models::CurrencyRate;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncPriceSdk::builder()
//!         .base_url("https://prices.example.com")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let stations = sdk.run(|s| s.fuels().tracked(None)).await.unwrap();
//!
//!     // Convenience method for grouped data
//!     let rates = sdk
//!         .tracked::<CurrencyRate>(Vertical::Euro, None)
//!         .await
//!         .unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{self, Vertical};
use crate::debounce::{spawn_query_channel, AsyncQueryChannel};
use crate::error::{PriceError, Result};
use crate::filter::FilterCriteria;
use crate::meta::TrackedEntity;
use crate::models::Listing;
use crate::PriceSdk;

// ---------------------------------------------------------------------------
// AsyncPriceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncPriceSdk`] instance.
pub struct AsyncPriceSdkBuilder {
    base_url: Option<String>,
    cache_dir: Option<PathBuf>,
    cache: bool,
    offline: bool,
    timeout: Duration,
    quiet_window: Duration,
}

impl Default for AsyncPriceSdkBuilder {
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

impl AsyncPriceSdkBuilder {
    /// Set the API base URL.
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

    /// Enable or disable the response cache in the default directory.
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the quiet window for [`AsyncPriceSdk::query_channel`].
    pub fn quiet_window(mut self, quiet: Duration) -> Self {
        self.quiet_window = quiet;
        self
    }

    /// Build the async SDK.
    ///
    /// Construction runs on the blocking thread pool because the blocking
    /// HTTP client cannot be created on an async worker.
    pub async fn build(self) -> Result<AsyncPriceSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = PriceSdk::builder();
            if let Some(url) = self.base_url {
                builder = builder.base_url(&url);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            builder = builder
                .cache(self.cache)
                .offline(self.offline)
                .timeout(self.timeout)
                .quiet_window(self.quiet_window);
            let sdk = builder.build()?;
            Ok::<_, PriceError>(AsyncPriceSdk {
                inner: Arc::new(sdk),
            })
        })
        .await
        .map_err(|e| PriceError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncPriceSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`PriceSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`].
#[derive(Clone)]
pub struct AsyncPriceSdk {
    inner: Arc<PriceSdk>,
}

impl AsyncPriceSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncPriceSdkBuilder {
        AsyncPriceSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&PriceSdk` reference and should return a
    /// `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PriceSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&sdk))
            .await
            .map_err(|e| PriceError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch, group and reduce one vertical asynchronously.
    pub async fn tracked<L>(&self, vertical: Vertical, limit: Option<usize>) -> Result<Vec<TrackedEntity<L>>>
    where
        L: Listing + Send + 'static,
    {
        self.run(move |s| s.listings::<L>(vertical).tracked(limit)).await
    }

    /// A debounced query channel running on the current runtime.
    pub fn query_channel(&self, initial: Option<&FilterCriteria>) -> AsyncQueryChannel {
        spawn_query_channel(self.inner.quiet_window(), initial)
    }

    /// Close the SDK, releasing the HTTP client on the blocking pool.
    ///
    /// Other clones of this handle keep the SDK alive.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(|e| PriceError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
