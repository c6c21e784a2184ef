//! ILP REST service HTTP client.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dronz_core::models::{NamedRegion, Order, Restaurant};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything needed to plan one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayData {
    pub date: NaiveDate,
    pub restaurants: Vec<Restaurant>,
    pub orders: Vec<Order>,
    pub central_area: NamedRegion,
    pub no_fly_zones: Vec<NamedRegion>,
}

/// HTTP client for the restaurant and order service.
pub struct IlpClient {
    client: Client,
    base_url: String,
}

impl IlpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    /// Always ends in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Request to {} failed: {} {}",
                url,
                status,
                body
            ));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// True if the service answers its liveness check with `true`.
    pub async fn is_alive(&self) -> Result<bool> {
        self.get_json::<bool>("isAlive").await
    }

    pub async fn restaurants(&self) -> Result<Vec<Restaurant>> {
        self.get_json("restaurants").await
    }

    pub async fn orders_on(&self, date: NaiveDate) -> Result<Vec<Order>> {
        self.get_json(&format!("orders/{}", date.format("%Y-%m-%d")))
            .await
    }

    pub async fn central_area(&self) -> Result<NamedRegion> {
        self.get_json("centralArea").await
    }

    pub async fn no_fly_zones(&self) -> Result<Vec<NamedRegion>> {
        self.get_json("noFlyZones").await
    }

    /// Fetch restaurants, the day's orders, the central area and the no-fly zones.
    pub async fn fetch_day(&self, date: NaiveDate) -> Result<DayData> {
        let (restaurants, orders, central_area, no_fly_zones) = tokio::try_join!(
            self.restaurants(),
            self.orders_on(date),
            self.central_area(),
            self.no_fly_zones(),
        )?;

        tracing::info!(
            "Fetched {} restaurants, {} orders and {} no-fly zones for {}",
            restaurants.len(),
            orders.len(),
            no_fly_zones.len(),
            date
        );

        Ok(DayData {
            date,
            restaurants,
            orders,
            central_area,
            no_fly_zones,
        })
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    let trimmed = base_url.trim_end().len();
    base_url.truncate(trimmed);
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}
