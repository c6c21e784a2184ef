//! Documents written at the end of a run: the delivery summary, the move log
//! and the GeoJSON track.

use crate::flightpath::{route_geometry, Flight, MoveRecord};
use crate::models::{Order, OrderStatus, OrderValidationCode};
use serde::{Deserialize, Serialize};

/// One row of the delivery summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub order_no: String,
    pub order_status: OrderStatus,
    pub order_validation_code: OrderValidationCode,
    pub cost_in_pence: u32,
}

impl From<&Order> for DeliveryRecord {
    fn from(order: &Order) -> Self {
        Self {
            order_no: order.order_no.clone(),
            order_status: order.order_status,
            order_validation_code: order.order_validation_code,
            cost_in_pence: order.price_total_in_pence,
        }
    }
}

/// One row of the move log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPathEntry {
    pub order_no: String,
    pub from_longitude: f64,
    pub from_latitude: f64,
    pub angle: f64,
    pub to_longitude: f64,
    pub to_latitude: f64,
}

impl From<&MoveRecord<'_>> for FlightPathEntry {
    fn from(record: &MoveRecord<'_>) -> Self {
        Self {
            order_no: record.order_no.to_string(),
            from_longitude: record.from.lng,
            from_latitude: record.from.lat,
            angle: record.angle,
            to_longitude: record.to.lng,
            to_latitude: record.to.lat,
        }
    }
}

pub fn delivery_records(orders: &[Order]) -> Vec<DeliveryRecord> {
    orders.iter().map(DeliveryRecord::from).collect()
}

pub fn flight_path_entries(records: &[MoveRecord<'_>]) -> Vec<FlightPathEntry> {
    records.iter().map(FlightPathEntry::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lng, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: LineString,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// The whole day's track as a single line. No flights, no features.
    pub fn from_flights(flights: &[Flight]) -> Self {
        let coordinates: Vec<[f64; 2]> = route_geometry(flights)
            .into_iter()
            .map(|position| [position.lng, position.lat])
            .collect();

        let features = if coordinates.is_empty() {
            Vec::new()
        } else {
            vec![Feature {
                kind: "Feature".to_string(),
                geometry: LineString {
                    kind: "LineString".to_string(),
                    coordinates,
                },
                properties: serde_json::Map::new(),
            }]
        };

        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}
