//! Writes a day's result files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dronz_core::flightpath::FlightLogBuilder;
use dronz_core::output::{delivery_records, flight_path_entries, FeatureCollection};
use dronz_core::DayPlan;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of the three files written for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFiles {
    pub deliveries: PathBuf,
    pub flightpath: PathBuf,
    pub geojson: PathBuf,
}

impl ResultFiles {
    pub fn for_date(dir: &Path, date: NaiveDate) -> Self {
        let date = date.format("%Y-%m-%d");
        Self {
            deliveries: dir.join(format!("deliveries-{}.json", date)),
            flightpath: dir.join(format!("flightpath-{}.json", date)),
            geojson: dir.join(format!("drone-{}.geojson", date)),
        }
    }
}

/// Write deliveries, flight path and GeoJSON for `day` into `dir`, creating
/// the directory if needed.
pub fn write_day(
    dir: &Path,
    date: NaiveDate,
    day: &DayPlan,
    log_builder: &FlightLogBuilder,
) -> Result<ResultFiles> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let files = ResultFiles::for_date(dir, date);
    let moves = log_builder.build(&day.flights);

    write_json(&files.deliveries, &delivery_records(&day.orders))?;
    write_json(&files.flightpath, &flight_path_entries(&moves))?;
    write_json(&files.geojson, &FeatureCollection::from_flights(&day.flights))?;

    tracing::info!(
        "Wrote {} orders and {} moves to {}",
        day.orders.len(),
        moves.len(),
        dir.display()
    );
    Ok(files)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}
