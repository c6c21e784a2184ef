//! dronz CLI - plans one day of deliveries and writes the result files.

pub mod config;
pub mod writer;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dronz_core::flightpath::FlightLogBuilder;
use dronz_core::{Dispatcher, Planner, PlannerConfig, BASE};
use dronz_rest::IlpClient;

pub use config::Config;
pub use writer::{write_day, ResultFiles};

/// Options for a single run, after merging flags over the environment.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub date: NaiveDate,
    pub url: String,
    pub config: Config,
    pub hover_at_base: bool,
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Fetch, plan and write one day.
pub async fn run(options: &RunOptions) -> Result<ResultFiles> {
    let client = IlpClient::new(options.url.as_str(), options.config.http_timeout)?;

    let alive = client
        .is_alive()
        .await
        .with_context(|| format!("REST service at {} is unreachable", client.base_url()))?;
    if !alive {
        bail!("REST service at {} reports it is not alive", client.base_url());
    }

    let day = client.fetch_day(options.date).await?;

    let planner = Planner::new(PlannerConfig {
        max_expansions: options.config.max_expansions,
        ..PlannerConfig::default()
    });
    let plan = Dispatcher::new(planner)
        .run(
            day.orders,
            &day.restaurants,
            &day.central_area,
            &day.no_fly_zones,
        )
        .context("Route planning failed")?;

    tracing::info!(
        "{} of {} orders delivered on {}",
        plan.delivered_count(),
        plan.orders.len(),
        options.date
    );

    let log_builder = if options.hover_at_base {
        FlightLogBuilder::new().with_hover_anchor(BASE)
    } else {
        FlightLogBuilder::new()
    };
    write_day(&options.config.output_dir, options.date, &plan, &log_builder)
}
