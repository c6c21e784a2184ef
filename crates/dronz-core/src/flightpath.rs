//! Turns planned routes into the shapes the output files need: a polyline of
//! the whole day's flying and a per-order log of individual moves.
//!
//! Each delivery is a round trip: the route out to the restaurant, then the
//! same route reversed back to base.

use crate::geometry::{bearing, HOVER_ANGLE};
use crate::models::LngLat;
use crate::planner::Route;

/// A delivered order and the route flown for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub order_no: String,
    pub route: Route,
}

impl Flight {
    pub fn new(order_no: impl Into<String>, route: Route) -> Self {
        Self {
            order_no: order_no.into(),
            route,
        }
    }
}

/// One discrete move. A hover has angle [`HOVER_ANGLE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRecord<'a> {
    pub order_no: &'a str,
    pub from: LngLat,
    pub angle: f64,
    pub to: LngLat,
}

impl MoveRecord<'_> {
    pub fn is_hover(&self) -> bool {
        self.angle == HOVER_ANGLE
    }
}

/// Every position flown during the day, in order: each route out and back.
pub fn route_geometry(flights: &[Flight]) -> Vec<LngLat> {
    let mut coordinates = Vec::new();
    for flight in flights {
        coordinates.extend(flight.route.positions.iter().copied());
        coordinates.extend(flight.route.positions.iter().rev().copied());
    }
    coordinates
}

/// Builds the move log for a day of flights.
///
/// With a hover anchor set, every move that starts close to the anchor is
/// reported as a hover regardless of direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightLogBuilder {
    hover_anchor: Option<LngLat>,
}

impl FlightLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hover_anchor(mut self, anchor: LngLat) -> Self {
        self.hover_anchor = Some(anchor);
        self
    }

    /// Moves for every flight, outbound then return.
    ///
    /// Each leg ends in a hover record. The hover closing a return leg points
    /// at the first position of the next flight, so consecutive deliveries
    /// chain; the very last hover of the day points at itself.
    pub fn build<'a>(&self, flights: &'a [Flight]) -> Vec<MoveRecord<'a>> {
        let mut records = Vec::new();
        for (idx, flight) in flights.iter().enumerate() {
            let order_no = flight.order_no.as_str();
            let outbound = &flight.route.positions;
            let inbound = flight.route.reversed_positions();
            let next_start = flights.get(idx + 1).and_then(|next| next.route.start());

            self.push_leg(&mut records, order_no, outbound, None);
            self.push_leg(&mut records, order_no, &inbound, next_start);
        }
        records
    }

    fn push_leg<'a>(
        &self,
        records: &mut Vec<MoveRecord<'a>>,
        order_no: &'a str,
        positions: &[LngLat],
        hover_to: Option<LngLat>,
    ) {
        let Some(&last) = positions.last() else {
            return;
        };

        for pair in positions.windows(2) {
            records.push(MoveRecord {
                order_no,
                from: pair[0],
                angle: bearing(pair[0], pair[1], self.hover_anchor),
                to: pair[1],
            });
        }

        records.push(MoveRecord {
            order_no,
            from: last,
            angle: HOVER_ANGLE,
            to: hover_to.unwrap_or(last),
        });
    }
}

/// Move log with no hover anchor.
///
/// Hovers appear only at the end of each leg. Reporting every move that
/// starts at base as a hover is off by default; use
/// [`FlightLogBuilder::with_hover_anchor`] (the CLI's `--hover-at-base`) to
/// turn it on.
pub fn build_flight_log(flights: &[Flight]) -> Vec<MoveRecord<'_>> {
    FlightLogBuilder::new().build(flights)
}
