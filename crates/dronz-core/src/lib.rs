pub mod dispatch;
pub mod flightpath;
pub mod geometry;
pub mod models;
pub mod output;
pub mod planner;
pub mod validation;

pub use dispatch::{DayPlan, Dispatcher};
pub use flightpath::{build_flight_log, route_geometry, Flight, FlightLogBuilder, MoveRecord};
pub use geometry::{
    bearing, distance, is_close, is_in_any_region, is_in_region, step, Heading, BASE,
    CLOSE_DISTANCE, HOVER_ANGLE, MOVE_DISTANCE,
};
pub use models::{
    CreditCardInformation, LngLat, NamedRegion, Order, OrderStatus, OrderValidationCode, Pizza,
    PositionKey, Restaurant,
};
pub use output::{
    delivery_records, flight_path_entries, DeliveryRecord, FeatureCollection, FlightPathEntry,
};
pub use planner::{plan, PlanError, Planner, PlannerConfig, PlanningContext, Route};
pub use validation::OrderValidator;
