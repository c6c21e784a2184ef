//! dronz REST - ILP service client
//!
//! Fetches restaurants, orders and flying regions for a delivery day.

pub mod client;

pub use client::{DayData, IlpClient};
