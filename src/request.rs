//! Request builder for the aggregation API.
//!
//! Query parameters are collected as key/value pairs and handed to reqwest
//! for encoding, never spliced into the URL by hand. Builder methods return
//! `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use pricewatch_sdk::request::ApiRequest;
//! use pricewatch_sdk::config::Vertical;
//!
//! let (url, params) = ApiRequest::new(Vertical::Auto)
//!     .limit(200)
//!     .param("brand", "skoda")
//!     .build("https://api.example.com");
//! assert_eq!(url, "https://api.example.com/stock/v1");
//! ```

use crate::config::{self, Vertical};

/// Builds the URL and query string for one snapshot fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    vertical: Vertical,
    limit_val: Option<usize>,
    item_val: Option<String>,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request targeting a vertical's endpoint.
    pub fn new(vertical: Vertical) -> Self {
        Self {
            vertical,
            limit_val: None,
            item_val: None,
            params: Vec::new(),
        }
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    /// Set the number of rows requested. Defaults to the vertical's limit.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Restrict the response to one listing's history.
    pub fn item(&mut self, id: &str) -> &mut Self {
        self.item_val = Some(id.to_string());
        self
    }

    /// Add a vertical-specific query parameter. Empty values are dropped.
    pub fn param(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.params.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Produce the full URL and the ordered query parameters.
    ///
    /// `limit` always comes first, then `item`, then extra parameters in the
    /// order they were added.
    pub fn build(&self, base_url: &str) -> (String, Vec<(String, String)>) {
        let url = config::join_url(base_url, self.vertical.path());

        let mut params = Vec::with_capacity(self.params.len() + 2);
        let limit = self.limit_val.unwrap_or_else(|| self.vertical.default_limit());
        params.push(("limit".to_string(), limit.to_string()));
        if let Some(ref item) = self.item_val {
            params.push(("item".to_string(), item.clone()));
        }
        params.extend(self.params.iter().cloned());

        (url, params)
    }
}
