//! State behind one listing view: the latest accepted data and the active criteria.

use tracing::{debug, info};

use crate::client::SnapshotClient;
use crate::config::Vertical;
use crate::error::Result;
use crate::filter::{self, FilterCriteria};
use crate::group::group_snapshots;
use crate::meta::{track, TrackedEntity};
use crate::models::{Listing, Snapshot};
use crate::request::ApiRequest;
use crate::sequence::{FetchTicket, RequestSequencer};

/// Owns one view's tracked listings and filter criteria.
///
/// Every fetch takes a ticket from the view's sequencer; a response is only
/// applied if no newer fetch has been issued since. Data is rebuilt from
/// scratch on each accepted response.
pub struct ListingView<L> {
    vertical: Vertical,
    sequencer: RequestSequencer,
    entities: Vec<TrackedEntity<L>>,
    criteria: FilterCriteria,
    loaded: bool,
}

impl<L: Listing> ListingView<L> {
    pub fn new(vertical: Vertical) -> Self {
        Self {
            vertical,
            sequencer: RequestSequencer::new(),
            entities: Vec::new(),
            criteria: FilterCriteria::for_listing::<L>(),
            loaded: false,
        }
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    /// Take a ticket for a fetch about to be issued.
    pub fn begin_fetch(&self) -> FetchTicket {
        self.sequencer.issue()
    }

    /// Apply the outcome of the fetch holding `ticket`.
    ///
    /// Returns `Ok(false)` without touching the view when a newer fetch has
    /// been issued, whether this one succeeded or failed. A failure of the
    /// latest fetch is returned; the previous data stays in place.
    pub fn apply_response(
        &mut self,
        ticket: FetchTicket,
        response: Result<Vec<Snapshot<L>>>,
    ) -> Result<bool> {
        if !self.sequencer.is_current(ticket) {
            debug!(
                vertical = %self.vertical,
                ticket = ticket.value(),
                "discarding superseded response"
            );
            return Ok(false);
        }

        let snapshots = response?;
        let rows = snapshots.len();
        self.entities = track(group_snapshots(snapshots));
        self.loaded = true;
        info!(
            vertical = %self.vertical,
            rows,
            listings = self.entities.len(),
            "view data replaced"
        );
        Ok(true)
    }

    /// Fetch through `client` and apply the response.
    pub fn refresh(&mut self, client: &SnapshotClient, request: &ApiRequest) -> Result<bool> {
        let ticket = self.begin_fetch();
        let response = client.fetch::<L>(request);
        self.apply_response(ticket, response)
    }

    /// Whether any response has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn entities(&self) -> &[TrackedEntity<L>] {
        &self.entities
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Mutable access for incremental edits (builder methods on [`FilterCriteria`]).
    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    /// Listings passing the current criteria, in display order.
    pub fn visible(&self) -> Vec<&TrackedEntity<L>> {
        filter::apply(&self.entities, &self.criteria)
    }

    /// Selectable categorical values for the loaded data.
    pub fn options(&self) -> std::collections::BTreeMap<&'static str, Vec<String>> {
        filter::options(&self.entities)
    }

    pub fn get(&self, key: &str) -> Option<&TrackedEntity<L>> {
        self.entities.iter().find(|e| e.key() == key)
    }
}
