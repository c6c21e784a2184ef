//! Core data models for the delivery system.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A point in the planar (longitude, latitude) approximation used for flying.
///
/// Equality is exact on both components. Two positions that differ only by
/// floating-point drift are different positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Bit pattern of both coordinates, used as the identity key in searches.
    pub fn key(&self) -> PositionKey {
        PositionKey {
            lng_bits: self.lng.to_bits(),
            lat_bits: self.lat.to_bits(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl PartialEq for LngLat {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for LngLat {}

impl Hash for LngLat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Exact identity of a [`LngLat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    lng_bits: u64,
    lat_bits: u64,
}

/// A named polygon. The ring is implicitly closed: the last vertex joins the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub vertices: Vec<LngLat>,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, vertices: Vec<LngLat>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }

    /// Validate region geometry.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.vertices.len() < 3 {
            errors.push(format!(
                "region '{}' needs at least 3 vertices, got {}",
                self.name,
                self.vertices.len()
            ));
        }

        if self.vertices.iter().any(|vertex| !vertex.is_finite()) {
            errors.push(format!("region '{}' has a non-finite vertex", self.name));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ========== CATALOG MODELS ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    pub name: String,
    pub price_in_pence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: String,
    pub location: LngLat,
    #[serde(with = "day_names")]
    pub opening_days: Vec<Weekday>,
    pub menu: Vec<Pizza>,
}

impl Restaurant {
    pub fn is_open_on(&self, day: Weekday) -> bool {
        self.opening_days.contains(&day)
    }

    pub fn menu_price(&self, pizza_name: &str) -> Option<u32> {
        self.menu
            .iter()
            .find(|pizza| pizza.name == pizza_name)
            .map(|pizza| pizza.price_in_pence)
    }
}

/// Opening days travel as upper-case English names ("MONDAY").
mod day_names {
    use chrono::Weekday;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const NAMES: [(Weekday, &str); 7] = [
        (Weekday::Mon, "MONDAY"),
        (Weekday::Tue, "TUESDAY"),
        (Weekday::Wed, "WEDNESDAY"),
        (Weekday::Thu, "THURSDAY"),
        (Weekday::Fri, "FRIDAY"),
        (Weekday::Sat, "SATURDAY"),
        (Weekday::Sun, "SUNDAY"),
    ];

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(days.iter().map(|day| {
            NAMES
                .iter()
                .find(|(known, _)| known == day)
                .map(|(_, name)| *name)
                .unwrap_or("UNDEFINED")
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
        let raw: Vec<String> = Vec::deserialize(deserializer)?;
        raw.iter()
            .map(|value| {
                NAMES
                    .iter()
                    .find(|(_, name)| name.eq_ignore_ascii_case(value))
                    .map(|(day, _)| *day)
                    .ok_or_else(|| D::Error::custom(format!("unknown day of week '{value}'")))
            })
            .collect()
    }
}

// ========== ORDER MODELS ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardInformation {
    #[serde(default)]
    pub credit_card_number: Option<String>,
    /// "MM/YY"
    #[serde(default)]
    pub credit_card_expiry: Option<String>,
    #[serde(default)]
    pub cvv: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_no: String,
    pub order_date: NaiveDate,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub order_validation_code: OrderValidationCode,
    pub price_total_in_pence: u32,
    pub pizzas_in_order: Vec<Pizza>,
    pub credit_card_information: CreditCardInformation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Undefined,
    /// Failed validation
    Invalid,
    /// Passed validation, no route flown yet
    ValidButNotDelivered,
    /// A route to the restaurant was planned
    Delivered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderValidationCode {
    #[default]
    Undefined,
    NoError,
    CardNumberInvalid,
    ExpiryDateInvalid,
    CvvInvalid,
    TotalIncorrect,
    PizzaNotDefined,
    MaxPizzaCountExceeded,
    PizzaFromMultipleRestaurants,
    RestaurantClosed,
    EmptyOrder,
}
