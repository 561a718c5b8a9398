//! Listing view tests: response sequencing, reloads and filtering.

mod common;

use common::{car, sample_cars};
use pricewatch_sdk::models::VehicleListing;
use pricewatch_sdk::{ListingView, Metric, PriceError, RequestSequencer, Vertical};

fn view() -> ListingView<VehicleListing> {
    ListingView::new(Vertical::Auto)
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

#[test]
fn tickets_increase() {
    let seq = RequestSequencer::new();
    assert!(seq.latest().is_none());
    let a = seq.issue();
    let b = seq.issue();
    assert!(b > a);
    assert_eq!(seq.latest(), Some(b));
    assert!(!seq.is_current(a));
    assert!(seq.is_current(b));
}

// ---------------------------------------------------------------------------
// Applying responses
// ---------------------------------------------------------------------------

#[test]
fn starts_unloaded() {
    let v = view();
    assert!(!v.is_loaded());
    assert!(v.visible().is_empty());
}

#[test]
fn latest_response_is_applied() {
    let mut v = view();
    let ticket = v.begin_fetch();
    assert!(v.apply_response(ticket, Ok(sample_cars())).unwrap());
    assert!(v.is_loaded());
    assert_eq!(v.entities().len(), 5);
    assert_eq!(v.visible().len(), 5);
}

#[test]
fn superseded_response_is_discarded() {
    let mut v = view();
    let slow = v.begin_fetch();
    let fast = v.begin_fetch();

    assert!(v.apply_response(fast, Ok(vec![car("new", "Fresh", Some(1.0), 10)])).unwrap());
    // The older request finishes last and must not overwrite the newer data
    assert!(!v.apply_response(slow, Ok(sample_cars())).unwrap());

    assert_eq!(v.entities().len(), 1);
    assert_eq!(v.entities()[0].key(), "new");
}

#[test]
fn superseded_failure_is_discarded_too() {
    let mut v = view();
    let slow = v.begin_fetch();
    let fast = v.begin_fetch();
    v.apply_response(fast, Ok(sample_cars())).unwrap();

    let stale = Err(PriceError::NotFound("gone".into()));
    assert!(!v.apply_response(slow, stale).unwrap());
    assert_eq!(v.entities().len(), 5);
}

#[test]
fn failure_of_latest_fetch_is_returned_and_keeps_data() {
    let mut v = view();
    let first = v.begin_fetch();
    v.apply_response(first, Ok(sample_cars())).unwrap();

    let second = v.begin_fetch();
    let err = v
        .apply_response(second, Err(PriceError::InvalidArgument("boom".into())))
        .unwrap_err();
    assert!(matches!(err, PriceError::InvalidArgument(_)));
    assert_eq!(v.entities().len(), 5);
}

#[test]
fn reload_rebuilds_from_scratch() {
    let mut v = view();
    let t = v.begin_fetch();
    v.apply_response(t, Ok(sample_cars())).unwrap();
    let t = v.begin_fetch();
    v.apply_response(t, Ok(vec![car("1001", "VW Golf", Some(38_000.0), 9)])).unwrap();

    assert_eq!(v.entities().len(), 1);
    let golf = v.get("1001").unwrap();
    assert_eq!(golf.meta.snapshots, 1);
    assert_eq!(golf.meta.current_value, Some(38_000.0));
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

#[test]
fn criteria_edits_change_visible_set() {
    let mut v = view();
    let t = v.begin_fetch();
    v.apply_response(t, Ok(sample_cars())).unwrap();

    v.criteria_mut().select("fuel", "petrol").sort_by(Metric::Price);
    let visible: Vec<&str> = v.visible().iter().map(|e| e.key()).collect();
    assert_eq!(visible, vec!["4004", "2002", "5005"]);

    let opts = v.options();
    assert_eq!(opts["fuel"], vec!["diesel", "hybrid", "petrol"]);
}
