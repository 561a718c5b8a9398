//! Shared test fixtures for the price SDK integration tests.
//!
//! Builds snapshots directly from typed payloads, plus raw response bodies
//! shaped like the aggregation API's `{ "result": [...] }` envelope.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pricewatch_sdk::group_snapshots;
use pricewatch_sdk::meta::{track, TrackedEntity};
use pricewatch_sdk::models::{FuelPrice, Snapshot, VehicleListing};

/// Fixed origin; `at(h)` is `h` hours after it.
pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::hours(hours)
}

pub fn vehicle(title: &str, price: Option<f64>) -> VehicleListing {
    VehicleListing {
        title: title.to_string(),
        brand: None,
        model: None,
        year: None,
        mileage: None,
        fuel: None,
        gearbox: None,
        body: None,
        city: None,
        price,
        currency: Some("PLN".to_string()),
        url: None,
        images: Vec::new(),
    }
}

/// A vehicle snapshot captured `hours` after the origin.
pub fn car(key: &str, title: &str, price: Option<f64>, hours: i64) -> Snapshot<VehicleListing> {
    Snapshot {
        entity_key: key.to_string(),
        captured_at: at(hours),
        checked_at: None,
        payload: vehicle(title, price),
    }
}

pub fn car_with(key: &str, hours: i64, payload: VehicleListing) -> Snapshot<VehicleListing> {
    Snapshot {
        entity_key: key.to_string(),
        captured_at: at(hours),
        checked_at: None,
        payload,
    }
}

/// Five listings, mixed order, with histories of different lengths.
pub fn sample_cars() -> Vec<Snapshot<VehicleListing>> {
    let mut golf = vehicle("VW Golf VII 1.6 TDI", Some(42_000.0));
    golf.brand = Some("Volkswagen".into());
    golf.fuel = Some("diesel".into());
    golf.year = Some(2016);
    golf.mileage = Some(180_000.0);

    let mut golf_cheaper = golf.clone();
    golf_cheaper.price = Some(39_500.0);

    let mut octavia = vehicle("Skoda Octavia III", Some(55_000.0));
    octavia.brand = Some("Skoda".into());
    octavia.fuel = Some("petrol".into());
    octavia.year = Some(2018);
    octavia.mileage = Some(95_000.0);

    let mut yaris = vehicle("Toyota Yaris Hybrid", Some(61_000.0));
    yaris.brand = Some("Toyota".into());
    yaris.fuel = Some("hybrid".into());
    yaris.year = Some(2020);
    yaris.mileage = Some(40_000.0);

    let mut civic = vehicle("Honda Civic", Some(28_000.0));
    civic.brand = Some("Honda".into());
    civic.fuel = Some("petrol".into());
    civic.year = Some(2009);

    let mut unpriced = vehicle("Fiat Panda (ask for price)", None);
    unpriced.brand = Some("Fiat".into());
    unpriced.fuel = Some("petrol".into());

    vec![
        car_with("1001", 0, golf.clone()),
        car_with("2002", 1, octavia.clone()),
        car_with("1001", 5, golf_cheaper),
        car_with("3003", 2, yaris),
        car_with("2002", 6, octavia),
        car_with("4004", 3, civic),
        car_with("5005", 4, unpriced),
    ]
}

pub fn sample_tracked() -> Vec<TrackedEntity<VehicleListing>> {
    track(group_snapshots(sample_cars()))
}

pub fn fuel(key: &str, station: &str, grade: &str, price: f64, hours: i64) -> Snapshot<FuelPrice> {
    Snapshot {
        entity_key: key.to_string(),
        captured_at: at(hours),
        checked_at: Some(at(hours + 1)),
        payload: FuelPrice {
            station: station.to_string(),
            brand: Some("Orlen".to_string()),
            city: Some("Kraków".to_string()),
            address: None,
            grade: grade.to_string(),
            price: Some(price),
            lat: None,
            lon: None,
        },
    }
}

/// A fuel response body as the API returns it.
pub fn fuel_body() -> String {
    serde_json::json!({
        "result": [
            {
                "item": "orlen-1-ON",
                "created": "2024-03-01T08:00:00Z",
                "checked": "2024-03-01T09:00:00Z",
                "name": "Orlen Opolska",
                "brand": "Orlen",
                "city": "Kraków",
                "type": "ON",
                "price": 6.49
            },
            {
                "item": "orlen-1-ON",
                "created": "2024-03-02T08:00:00Z",
                "checked": null,
                "name": "Orlen Opolska",
                "brand": "Orlen",
                "city": "Kraków",
                "type": "ON",
                "price": 6.39,
                "promoBanner": "ignored passthrough field"
            },
            {
                "item": 77,
                "created": "2024-03-01T12:00:00Z",
                "station": "Shell Wielicka",
                "brand": "Shell",
                "city": "Kraków",
                "type": "PB95",
                "price": 6.79
            }
        ]
    })
    .to_string()
}

/// Serve a single HTTP response on a loopback port.
///
/// Returns the base URL to point the SDK at and a handle yielding the request
/// line the server received.
pub fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (base_url, handle)
}
