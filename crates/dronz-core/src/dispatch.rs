//! One day of deliveries: validate orders, plan a route per restaurant and
//! mark what can be delivered.

use crate::flightpath::Flight;
use crate::geometry::BASE;
use crate::models::{NamedRegion, Order, OrderStatus, OrderValidationCode, Restaurant};
use crate::planner::{PlanError, Planner, PlanningContext, Route};
use crate::validation::OrderValidator;
use std::collections::HashMap;

/// Result of dispatching a day's orders.
#[derive(Debug, Clone)]
pub struct DayPlan {
    /// Every order, with its final status and validation code.
    pub orders: Vec<Order>,
    /// Delivered orders in the order they were received.
    pub flights: Vec<Flight>,
}

impl DayPlan {
    pub fn delivered_count(&self) -> usize {
        self.flights.len()
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    planner: Planner,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Planner::default())
    }
}

impl Dispatcher {
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// Validate and route every order.
    ///
    /// Each restaurant is planned at most once; an unreachable restaurant is
    /// remembered so its other orders are not searched again. Invalid
    /// geometry aborts the whole day.
    pub fn run(
        &self,
        mut orders: Vec<Order>,
        restaurants: &[Restaurant],
        central: &NamedRegion,
        no_fly: &[NamedRegion],
    ) -> Result<DayPlan, PlanError> {
        let validator = OrderValidator::new(restaurants);
        let ctx = PlanningContext::new(no_fly, central);
        let mut routes: HashMap<String, Option<Route>> = HashMap::new();
        let mut flights = Vec::new();

        for order in orders.iter_mut() {
            if validator.validate(order) != OrderValidationCode::NoError {
                tracing::debug!(
                    "Order {} rejected: {:?}",
                    order.order_no,
                    order.order_validation_code
                );
                continue;
            }
            let Some(restaurant) = validator.restaurant_for(order) else {
                continue;
            };

            let route = match routes.get(&restaurant.name) {
                Some(cached) => cached.clone(),
                None => {
                    let planned = self.planner.plan(&ctx, BASE, restaurant.location)?;
                    match &planned {
                        Some(route) => tracing::info!(
                            "Planned route to {}: {} moves",
                            restaurant.name,
                            route.steps()
                        ),
                        None => tracing::warn!("No route to {}", restaurant.name),
                    }
                    routes.insert(restaurant.name.clone(), planned.clone());
                    planned
                }
            };

            if let Some(route) = route {
                order.order_status = OrderStatus::Delivered;
                flights.push(Flight::new(order.order_no.clone(), route));
            }
        }

        tracing::info!(
            "Dispatched {} of {} orders across {} restaurants",
            flights.len(),
            orders.len(),
            routes.len()
        );

        Ok(DayPlan { orders, flights })
    }
}
