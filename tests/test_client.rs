//! Response parsing, request construction and client guard tests.
//!
//! None of these hit the network: requests that would are expected to fail
//! before sending.

mod common;

use common::{at, fuel_body, serve_once};
use pricewatch_sdk::client::parse_snapshots;
use pricewatch_sdk::models::{CurrencyRate, FuelPrice, RetailProduct, VehicleListing};
use pricewatch_sdk::{ApiRequest, PriceError, PriceSdk, Vertical};

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_fuel_envelope() {
    let snapshots = parse_snapshots::<FuelPrice>(Vertical::Fuel, fuel_body().as_bytes()).unwrap();
    assert_eq!(snapshots.len(), 3);

    let first = &snapshots[0];
    assert_eq!(first.entity_key, "orlen-1-ON");
    assert_eq!(first.captured_at, at(0));
    assert_eq!(first.checked_at, Some(at(1)));
    assert_eq!(first.payload.station, "Orlen Opolska");
    assert_eq!(first.payload.grade, "ON");
    assert_eq!(first.payload.price, Some(6.49));

    assert_eq!(snapshots[1].checked_at, None);
}

#[test]
fn numeric_ids_become_strings() {
    let snapshots = parse_snapshots::<FuelPrice>(Vertical::Fuel, fuel_body().as_bytes()).unwrap();
    assert_eq!(snapshots[2].entity_key, "77");
    assert_eq!(snapshots[2].payload.station, "Shell Wielicka");
}

#[test]
fn optional_fields_may_be_absent() {
    let body = r#"{"result":[{"id":"abc","created":"2024-03-01T08:00:00Z","title":"Kross Level 2.0"}]}"#;
    let snapshots = parse_snapshots::<VehicleListing>(Vertical::Bike, body.as_bytes()).unwrap();
    let bike = &snapshots[0].payload;
    assert_eq!(snapshots[0].entity_key, "abc");
    assert_eq!(bike.title, "Kross Level 2.0");
    assert_eq!(bike.price, None);
    assert!(bike.images.is_empty());
}

#[test]
fn parses_retail_and_rates() {
    let body = r#"{"result":[{"item":"sku-1","created":"2024-03-01T08:00:00Z","name":"Nivea Creme","price":12.99,"oldPrice":19.99,"promo":"-35%"}]}"#;
    let products = parse_snapshots::<RetailProduct>(Vertical::Ross, body.as_bytes()).unwrap();
    let discount = products[0].payload.discount().unwrap();
    assert!((discount - 35.017).abs() < 0.01);

    let body = r#"{"result":[{"item":"EUR","created":"2024-03-01T08:00:00Z","code":"EUR","mid":4.31,"bid":4.27,"ask":4.35}]}"#;
    let rates = parse_snapshots::<CurrencyRate>(Vertical::Euro, body.as_bytes()).unwrap();
    assert_eq!(rates[0].payload.rate, Some(4.31));
}

#[test]
fn empty_result_is_valid() {
    let snapshots = parse_snapshots::<FuelPrice>(Vertical::Fuel, br#"{"result":[]}"#).unwrap();
    assert!(snapshots.is_empty());
}

#[test]
fn one_bad_row_fails_the_whole_response() {
    let body = r#"{"result":[
        {"item":"1","created":"2024-03-01T08:00:00Z","name":"A","type":"ON","price":6.1},
        {"item":"2","created":"not a date","name":"B","type":"ON","price":6.2}
    ]}"#;
    let err = parse_snapshots::<FuelPrice>(Vertical::Fuel, body.as_bytes()).unwrap_err();
    match err {
        PriceError::Schema { vertical, .. } => assert_eq!(vertical, Vertical::Fuel),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn missing_envelope_is_a_schema_error() {
    let err = parse_snapshots::<FuelPrice>(Vertical::Fuel, br#"[{"item":"1"}]"#).unwrap_err();
    assert!(matches!(err, PriceError::Schema { .. }));
    assert!(err.to_string().contains("fuel"));
}

#[test]
fn wrong_price_type_is_a_schema_error() {
    let body = r#"{"result":[{"item":"1","created":"2024-03-01T08:00:00Z","title":"X","price":"cheap"}]}"#;
    let err = parse_snapshots::<VehicleListing>(Vertical::Auto, body.as_bytes()).unwrap_err();
    assert!(matches!(err, PriceError::Schema { .. }));
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

#[test]
fn request_uses_vertical_path_and_default_limit() {
    let (url, params) = ApiRequest::new(Vertical::Auto).build("https://api.example.com/");
    assert_eq!(url, "https://api.example.com/stock/v1");
    assert_eq!(params, vec![("limit".to_string(), "1500".to_string())]);
}

#[test]
fn request_param_order() {
    let (url, params) = ApiRequest::new(Vertical::Xkom)
        .limit(50)
        .item("sku-9")
        .param("category", "laptops")
        .param("empty", "")
        .build("https://api.example.com");
    assert_eq!(url, "https://api.example.com/promo/v2");
    let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["limit", "item", "category"]);
    assert_eq!(params[0].1, "50");
    assert_eq!(params[1].1, "sku-9");
}

#[test]
fn default_limits_are_within_range() {
    for vertical in Vertical::ALL {
        let limit = vertical.default_limit();
        assert!((100..=1500).contains(&limit), "{vertical}: {limit}");
    }
}

// ---------------------------------------------------------------------------
// Client guards
// ---------------------------------------------------------------------------

#[test]
fn relative_base_url_is_rejected_before_sending() {
    let sdk = PriceSdk::builder().base_url("/").build().unwrap();
    let err = sdk.fuels().snapshots(None).unwrap_err();
    assert!(matches!(err, PriceError::InvalidArgument(_)));
}

#[test]
fn payload_must_model_the_vertical() {
    let sdk = PriceSdk::builder().base_url("https://api.example.com").build().unwrap();
    let err = sdk
        .listings::<FuelPrice>(Vertical::Auto)
        .snapshots(Some(10))
        .unwrap_err();
    assert!(matches!(err, PriceError::InvalidArgument(_)));
}

#[test]
fn offline_without_cached_body_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = PriceSdk::builder()
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();
    let err = sdk.rates().snapshots(None).unwrap_err();
    assert!(matches!(err, PriceError::NotFound(_)));
}

#[test]
fn offline_serves_cached_body() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("fuel.json"), fuel_body()).unwrap();

    let sdk = PriceSdk::builder()
        .base_url("/")
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();

    let tracked = sdk.fuels().tracked(None).unwrap();
    assert_eq!(tracked.len(), 2);
    let orlen = tracked.iter().find(|e| e.key() == "orlen-1-ON").unwrap();
    assert_eq!(orlen.meta.current_value, Some(6.39));
    assert_eq!(orlen.meta.max_value, Some(6.49));

    let history = sdk.fuels().history("77").unwrap().unwrap();
    assert_eq!(history.history.snapshot_count(), 1);
    assert!(sdk.fuels().history("missing").unwrap().is_none());
}

#[test]
fn base_url_must_have_http_scheme_and_host() {
    for base in ["ftp://api.example.com", "https://", "api.example.com/v1"] {
        let sdk = PriceSdk::builder().base_url(base).build().unwrap();
        let err = sdk.fuels().snapshots(None).unwrap_err();
        assert!(matches!(err, PriceError::InvalidArgument(_)), "{base}");
    }
}

// ---------------------------------------------------------------------------
// Online fetches
// ---------------------------------------------------------------------------

#[test]
fn online_fetch_parses_and_writes_through_to_cache() {
    let body = fuel_body();
    let (base_url, server) = serve_once("200 OK", &body);
    let tmp = tempfile::tempdir().unwrap();
    let sdk = PriceSdk::builder()
        .base_url(&base_url)
        .cache_dir(tmp.path())
        .build()
        .unwrap();

    let snapshots = sdk.fuels().snapshots(Some(25)).unwrap();
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].entity_key, "orlen-1-ON");
    assert_eq!(snapshots[2].entity_key, "77");

    let request_line = server.join().unwrap();
    assert!(request_line.starts_with("GET /fuels?limit=25 "), "{request_line}");

    let cached = std::fs::read_to_string(tmp.path().join("fuel.json")).unwrap();
    assert_eq!(cached, body);
}

#[test]
fn scheme_is_matched_case_insensitively() {
    let (base_url, server) = serve_once("200 OK", r#"{"result":[]}"#);
    let shouting = base_url.replacen("http://", "HTTP://", 1);
    let sdk = PriceSdk::builder().base_url(&shouting).build().unwrap();

    assert!(sdk.rates().snapshots(None).unwrap().is_empty());
    assert!(server.join().unwrap().starts_with("GET /euro?limit=100 "));
}

#[test]
fn error_status_is_an_http_error_and_not_cached() {
    let (base_url, server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#);
    let tmp = tempfile::tempdir().unwrap();
    let sdk = PriceSdk::builder()
        .base_url(&base_url)
        .cache_dir(tmp.path())
        .build()
        .unwrap();

    let err = sdk.fuels().snapshots(None).unwrap_err();
    match err {
        PriceError::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(503)),
        other => panic!("expected HTTP error, got {other:?}"),
    }
    server.join().unwrap();
    assert!(!tmp.path().join("fuel.json").exists());
}

#[test]
fn display_mentions_base_url() {
    let sdk = PriceSdk::builder().base_url("https://api.example.com").build().unwrap();
    let shown = sdk.to_string();
    assert!(shown.contains("https://api.example.com"));
    assert!(shown.contains("cache_dir=none"));
}
