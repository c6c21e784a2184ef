//! A* route planner over discretized drone moves.
//!
//! Every move has the same length, and the heuristic is straight-line
//! distance to the goal, so it never overestimates the remaining cost and
//! drops by at most one move per step. The first time a node is expanded its
//! cost is final, which is why expanded nodes are never reopened.

pub mod node;

use crate::geometry::{self, Heading, CLOSE_DISTANCE, MOVE_DISTANCE};
use crate::models::{LngLat, NamedRegion, PositionKey};
use node::{CentralHistory, FloatOrd, FrontierEntry, NodeId, SearchNode};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub move_distance: f64,
    pub close_distance: f64,
    /// Upper bound on expanded nodes before the search gives up.
    pub max_expansions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            move_distance: MOVE_DISTANCE,
            close_distance: CLOSE_DISTANCE,
            max_expansions: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },
}

/// Obstacles and the central area for one planning call.
#[derive(Debug, Clone, Copy)]
pub struct PlanningContext<'a> {
    pub no_fly: &'a [NamedRegion],
    pub central: &'a NamedRegion,
}

impl<'a> PlanningContext<'a> {
    pub fn new(no_fly: &'a [NamedRegion], central: &'a NamedRegion) -> Self {
        Self { no_fly, central }
    }

    /// Regions must be well formed and the start must be finite and clear of
    /// no-fly zones. The goal only needs to be finite: a goal inside a zone is
    /// reached from any position within close distance outside it.
    fn validate(&self, start: LngLat, goal: LngLat) -> Result<(), PlanError> {
        let mut errors: Vec<String> = self
            .no_fly
            .iter()
            .chain(std::iter::once(self.central))
            .flat_map(NamedRegion::validate)
            .collect();

        if !start.is_finite() {
            errors.push("start position is not finite".to_string());
        }
        if !goal.is_finite() {
            errors.push("goal position is not finite".to_string());
        }
        if let Some(zone) = self.no_fly.iter().find(|zone| geometry::is_in_region(start, zone)) {
            errors.push(format!("start lies inside no-fly zone '{}'", zone.name));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlanError::InvalidGeometry {
                reason: errors.join("; "),
            })
        }
    }
}

/// Ordered positions from start to goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub positions: Vec<LngLat>,
    /// Nodes expanded by the search that produced this route.
    pub nodes_visited: usize,
}

impl Route {
    /// Number of moves (one less than the number of positions).
    pub fn steps(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<LngLat> {
        self.positions.first().copied()
    }

    pub fn end(&self) -> Option<LngLat> {
        self.positions.last().copied()
    }

    /// Positions of the flight back, goal to start.
    pub fn reversed_positions(&self) -> Vec<LngLat> {
        self.positions.iter().rev().copied().collect()
    }
}

/// Plan with the default configuration.
///
/// `Ok(None)` means no admissible route exists; it is not an error.
pub fn plan(
    no_fly: &[NamedRegion],
    central: &NamedRegion,
    start: LngLat,
    goal: LngLat,
) -> Result<Option<Route>, PlanError> {
    Planner::default().plan(&PlanningContext::new(no_fly, central), start, goal)
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn plan(
        &self,
        ctx: &PlanningContext<'_>,
        start: LngLat,
        goal: LngLat,
    ) -> Result<Option<Route>, PlanError> {
        ctx.validate(start, goal)?;

        let mut search = Search::new(ctx, goal, &self.config);
        search.push_start(start);

        let mut nodes_visited = 0usize;
        while let Some(current) = search.pop() {
            nodes_visited += 1;
            let position = search.nodes[current.0].position;

            if geometry::distance(position, goal) < self.config.close_distance {
                let route = Route {
                    positions: search.reconstruct(current),
                    nodes_visited,
                };
                tracing::debug!(
                    "Route found: {} steps, {} nodes visited, {} discovered",
                    route.steps(),
                    nodes_visited,
                    search.nodes.len()
                );
                return Ok(Some(route));
            }

            if nodes_visited >= self.config.max_expansions {
                tracing::warn!(
                    "Search budget of {} expansions exhausted before reaching ({}, {})",
                    self.config.max_expansions,
                    goal.lng,
                    goal.lat
                );
                return Ok(None);
            }

            search.expand(current);
        }

        tracing::debug!(
            "No route to ({}, {}): frontier exhausted after {} nodes",
            goal.lng,
            goal.lat,
            nodes_visited
        );
        Ok(None)
    }
}

/// State of a single planning call. Nothing here outlives the call.
struct Search<'a> {
    ctx: &'a PlanningContext<'a>,
    goal: LngLat,
    move_distance: f64,
    nodes: Vec<SearchNode>,
    index: HashMap<PositionKey, NodeId>,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    next_seq: u64,
}

impl<'a> Search<'a> {
    fn new(ctx: &'a PlanningContext<'a>, goal: LngLat, config: &PlannerConfig) -> Self {
        Self {
            ctx,
            goal,
            move_distance: config.move_distance,
            nodes: Vec::new(),
            index: HashMap::new(),
            frontier: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push_start(&mut self, start: LngLat) {
        let central = CentralHistory::at_start(geometry::is_in_region(start, self.ctx.central));
        let h = geometry::distance(start, self.goal);
        let id = self.insert(SearchNode::new(start, 0.0, h, None, central));
        self.enqueue(id);
    }

    fn insert(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(node.position.key(), id);
        self.nodes.push(node);
        id
    }

    fn enqueue(&mut self, id: NodeId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let node = &mut self.nodes[id.0];
        node.queued_seq = seq;
        self.frontier.push(Reverse(FrontierEntry {
            f: FloatOrd(node.f),
            seq,
            node: id,
        }));
    }

    /// Next live frontier node, now marked visited. Entries superseded by a
    /// relaxation are skipped.
    fn pop(&mut self) -> Option<NodeId> {
        while let Some(Reverse(entry)) = self.frontier.pop() {
            let node = &mut self.nodes[entry.node.0];
            if node.closed || node.queued_seq != entry.seq {
                continue;
            }
            node.closed = true;
            return Some(entry.node);
        }
        None
    }

    fn expand(&mut self, current: NodeId) {
        let (position, g, history) = {
            let node = &self.nodes[current.0];
            (node.position, node.g, node.central)
        };
        let tentative_g = g + self.move_distance;

        for heading in Heading::COMPASS {
            let next = geometry::step_by(position, heading, self.move_distance);

            if geometry::is_in_any_region(next, self.ctx.no_fly) {
                continue;
            }
            let inside_central = geometry::is_in_region(next, self.ctx.central);
            if history.forbids(inside_central) {
                continue;
            }
            let next_history = history.advance(inside_central);

            match self.index.get(&next.key()).copied() {
                Some(existing) => {
                    let node = &mut self.nodes[existing.0];
                    if node.closed || node.g <= tentative_g {
                        continue;
                    }
                    let h = geometry::distance(next, self.goal);
                    node.relax(tentative_g, h, current, next_history);
                    self.enqueue(existing);
                }
                None => {
                    let h = geometry::distance(next, self.goal);
                    let id = self.insert(SearchNode::new(
                        next,
                        tentative_g,
                        h,
                        Some(current),
                        next_history,
                    ));
                    self.enqueue(id);
                }
            }
        }
    }

    fn reconstruct(&self, last: NodeId) -> Vec<LngLat> {
        let mut positions = Vec::new();
        let mut cursor = Some(last);
        while let Some(id) = cursor {
            let node = &self.nodes[id.0];
            positions.push(node.position);
            cursor = node.parent;
        }
        positions.reverse();
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(name: &str, min: (f64, f64), max: (f64, f64)) -> NamedRegion {
        NamedRegion::new(
            name,
            vec![
                LngLat::new(min.0, min.1),
                LngLat::new(max.0, min.1),
                LngLat::new(max.0, max.1),
                LngLat::new(min.0, max.1),
            ],
        )
    }

    fn everywhere() -> NamedRegion {
        rectangle("central", (-10.0, -10.0), (10.0, 10.0))
    }

    #[test]
    fn start_already_close_returns_single_position() {
        let central = everywhere();
        let start = LngLat::new(0.0, 0.0);
        let route = plan(&[], &central, start, LngLat::new(0.00001, 0.0))
            .unwrap()
            .expect("route");
        assert_eq!(route.positions, vec![start]);
        assert_eq!(route.steps(), 0);
        assert_eq!(route.nodes_visited, 1);
    }

    #[test]
    fn straight_east_takes_ceil_steps() {
        let central = everywhere();
        let start = LngLat::new(0.0, 0.0);
        let goal = LngLat::new(10.0 * MOVE_DISTANCE, 0.0);
        let route = plan(&[], &central, start, goal).unwrap().expect("route");
        // Within CLOSE_DISTANCE after nine or ten moves.
        assert!(route.steps() <= 10 && route.steps() >= 9, "{}", route.steps());
        assert!(geometry::is_close(route.end().unwrap(), goal));
        assert_eq!(route.start(), Some(start));
    }

    #[test]
    fn invalid_region_fails_fast() {
        let central = everywhere();
        let broken = NamedRegion::new("broken", vec![LngLat::new(0.0, 0.0)]);
        let err = plan(&[broken], &central, LngLat::new(1.0, 1.0), LngLat::new(1.001, 1.0))
            .unwrap_err();
        let PlanError::InvalidGeometry { reason } = err;
        assert!(reason.contains("broken"));
    }

    #[test]
    fn start_inside_no_fly_is_rejected() {
        let central = everywhere();
        let zone = rectangle("zone", (-1.0, -1.0), (1.0, 1.0));
        let result = plan(&[zone], &central, LngLat::new(0.0, 0.0), LngLat::new(2.0, 2.0));
        assert!(matches!(result, Err(PlanError::InvalidGeometry { .. })));
    }

    #[test]
    fn goal_just_inside_no_fly_is_reached_from_outside() {
        let central = everywhere();
        let zone = rectangle("zone", (-0.001, -0.001), (0.001, 0.001));
        let goal = LngLat::new(0.0, 0.00095);

        let route = plan(&[zone.clone()], &central, LngLat::new(0.0, 0.002), goal)
            .unwrap()
            .expect("route");
        assert!(geometry::is_close(route.end().unwrap(), goal));
        assert!(!geometry::is_in_region(route.end().unwrap(), &zone));
    }

    #[test]
    fn expansion_budget_ends_in_not_found() {
        let central = everywhere();
        let planner = Planner::new(PlannerConfig {
            max_expansions: 5,
            ..PlannerConfig::default()
        });
        let ctx = PlanningContext::new(&[], &central);
        let result = planner
            .plan(&ctx, LngLat::new(0.0, 0.0), LngLat::new(0.01, 0.0))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn route_reversal() {
        let route = Route {
            positions: vec![LngLat::new(0.0, 0.0), LngLat::new(1.0, 0.0), LngLat::new(2.0, 0.0)],
            nodes_visited: 3,
        };
        assert_eq!(
            route.reversed_positions(),
            vec![LngLat::new(2.0, 0.0), LngLat::new(1.0, 0.0), LngLat::new(0.0, 0.0)]
        );
    }
}
