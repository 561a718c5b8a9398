//! Listing queries against one vertical of the aggregation API.

use std::marker::PhantomData;

use crate::client::SnapshotClient;
use crate::config::Vertical;
use crate::error::Result;
use crate::filter::{self, FilterCriteria};
use crate::group::{find_history, group_snapshots};
use crate::meta::{track, TrackedEntity};
use crate::models::{Listing, Snapshot};
use crate::request::ApiRequest;
use crate::view::ListingView;

// ---------------------------------------------------------------------------
// ListingQuery
// ---------------------------------------------------------------------------

/// Query interface for one vertical, decoding rows into `L`.
pub struct ListingQuery<'a, L> {
    client: &'a SnapshotClient,
    vertical: Vertical,
    _payload: PhantomData<L>,
}

impl<'a, L: Listing> ListingQuery<'a, L> {
    /// Create a new `ListingQuery` bound to the given client.
    pub fn new(client: &'a SnapshotClient, vertical: Vertical) -> Self {
        Self {
            client,
            vertical,
            _payload: PhantomData,
        }
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    /// A request for this vertical, for adding extra parameters.
    pub fn request(&self) -> ApiRequest {
        ApiRequest::new(self.vertical)
    }

    // -- Raw snapshots -----------------------------------------------------

    /// Fetch raw snapshots. `None` uses the vertical's default limit.
    pub fn snapshots(&self, limit: Option<usize>) -> Result<Vec<Snapshot<L>>> {
        let mut req = self.request();
        if let Some(n) = limit {
            req.limit(n);
        }
        self.client.fetch::<L>(&req)
    }

    /// Fetch raw snapshots for a prepared request.
    pub fn execute(&self, request: &ApiRequest) -> Result<Vec<Snapshot<L>>> {
        self.client.fetch::<L>(request)
    }

    // -- Grouped and reduced -----------------------------------------------

    /// Fetch, group by listing and reduce each history to its meta.
    pub fn tracked(&self, limit: Option<usize>) -> Result<Vec<TrackedEntity<L>>> {
        Ok(track(group_snapshots(self.snapshots(limit)?)))
    }

    /// Full history of a single listing, via the `item` parameter.
    pub fn history(&self, item: &str) -> Result<Option<TrackedEntity<L>>> {
        let mut req = self.request();
        req.item(item);
        let histories = group_snapshots(self.client.fetch::<L>(&req)?);
        Ok(find_history(&histories, item)
            .cloned()
            .map(TrackedEntity::new))
    }

    // -- Filtered ----------------------------------------------------------

    /// Fetch and return the listings matching `criteria`, in display order.
    pub fn search(&self, limit: Option<usize>, criteria: &FilterCriteria) -> Result<Vec<TrackedEntity<L>>> {
        let tracked = self.tracked(limit)?;
        Ok(filter::apply(&tracked, criteria)
            .into_iter()
            .cloned()
            .collect())
    }

    // -- Views -------------------------------------------------------------

    /// An empty view for this vertical with pass-through criteria.
    pub fn view(&self) -> ListingView<L> {
        ListingView::new(self.vertical)
    }

    /// Load (or reload) a view with the vertical's default request.
    pub fn load(&self, view: &mut ListingView<L>, limit: Option<usize>) -> Result<bool> {
        let mut req = self.request();
        if let Some(n) = limit {
            req.limit(n);
        }
        view.refresh(self.client, &req)
    }
}
