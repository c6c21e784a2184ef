//! Live REST service tests.
//!
//! Run with: cargo test -p dronz-rest --test live_test -- --ignored
//! Requires a reachable ILP REST service at DRONZ_TEST_URL.

use chrono::NaiveDate;
use dronz_rest::IlpClient;
use std::time::Duration;

fn base_url() -> String {
    std::env::var("DRONZ_TEST_URL")
        .unwrap_or_else(|_| "http://localhost:8080/".to_string())
}

fn client() -> IlpClient {
    IlpClient::new(base_url(), Duration::from_secs(30)).unwrap()
}

#[tokio::test]
#[ignore]
async fn test_service_is_alive() {
    assert!(client().is_alive().await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_fetch_day() {
    let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
    let day = client().fetch_day(date).await.unwrap();

    assert!(!day.restaurants.is_empty());
    assert!(day.central_area.is_valid());
    assert!(day.no_fly_zones.iter().all(|zone| zone.is_valid()));
    assert!(day.orders.iter().all(|order| order.order_date == date));
}
