//! Search bookkeeping for the route planner.

use crate::models::LngLat;
use std::cmp::Ordering;

/// Stable handle of a node in the per-search arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Where a path stands relative to the central area.
///
/// A path may start outside, enter once, stay inside for any number of
/// moves, and leave. Once it has left it may not come back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralHistory {
    NotEntered,
    Inside,
    Left,
}

impl CentralHistory {
    pub fn at_start(inside: bool) -> Self {
        if inside {
            CentralHistory::Inside
        } else {
            CentralHistory::NotEntered
        }
    }

    /// History of a path extended by one position.
    pub fn advance(self, inside: bool) -> Self {
        match (self, inside) {
            (CentralHistory::NotEntered, false) => CentralHistory::NotEntered,
            (CentralHistory::NotEntered, true) | (CentralHistory::Inside, true) => {
                CentralHistory::Inside
            }
            (CentralHistory::Inside, false) | (CentralHistory::Left, _) => CentralHistory::Left,
        }
    }

    /// True if extending the path to a position with this membership would
    /// re-enter the central area.
    pub fn forbids(self, inside: bool) -> bool {
        self == CentralHistory::Left && inside
    }
}

/// One state of the search graph.
///
/// Identity is the position alone; cost fields are rewritten in place when a
/// cheaper parent is found.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub position: LngLat,
    pub g: f64,
    pub h: f64,
    pub f: f64,
    pub parent: Option<NodeId>,
    pub central: CentralHistory,
    /// Sequence number of this node's live frontier entry.
    pub(crate) queued_seq: u64,
    pub(crate) closed: bool,
}

impl SearchNode {
    pub fn new(
        position: LngLat,
        g: f64,
        h: f64,
        parent: Option<NodeId>,
        central: CentralHistory,
    ) -> Self {
        Self {
            position,
            g,
            h,
            f: g + h,
            parent,
            central,
            queued_seq: 0,
            closed: false,
        }
    }

    /// Point this node at a cheaper parent.
    pub fn relax(&mut self, g: f64, h: f64, parent: NodeId, central: CentralHistory) {
        self.g = g;
        self.h = h;
        self.f = g + h;
        self.parent = Some(parent);
        self.central = central;
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FloatOrd(pub f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Frontier entry. Orders by `f`, then by insertion sequence so that equal
/// priorities pop in the order they were queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrontierEntry {
    pub f: FloatOrd,
    pub seq: u64,
    pub node: NodeId,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| self.seq.cmp(&other.seq))
            .then_with(|| self.node.0.cmp(&other.node.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    #[test]
    fn central_history_is_one_way() {
        let start = CentralHistory::at_start(true);
        assert_eq!(start, CentralHistory::Inside);
        assert!(!start.forbids(true));

        let left = start.advance(false);
        assert_eq!(left, CentralHistory::Left);
        assert!(left.forbids(true));
        assert!(!left.forbids(false));
        assert_eq!(left.advance(false), CentralHistory::Left);
    }

    #[test]
    fn path_starting_outside_may_enter_once() {
        let outside = CentralHistory::at_start(false);
        assert!(!outside.forbids(true));
        let entered = outside.advance(true);
        assert_eq!(entered, CentralHistory::Inside);
        assert!(entered.advance(false).forbids(true));
    }

    #[test]
    fn frontier_pops_lowest_f_then_earliest_insert() {
        let mut heap = BinaryHeap::new();
        let entries = [
            FrontierEntry { f: FloatOrd(2.0), seq: 0, node: NodeId(0) },
            FrontierEntry { f: FloatOrd(1.0), seq: 2, node: NodeId(1) },
            FrontierEntry { f: FloatOrd(1.0), seq: 1, node: NodeId(2) },
        ];
        for entry in entries {
            heap.push(Reverse(entry));
        }

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|Reverse(e)| e.node.0)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn relax_rewrites_costs_and_parent() {
        let mut node = SearchNode::new(
            LngLat::new(0.0, 0.0),
            3.0,
            1.0,
            Some(NodeId(7)),
            CentralHistory::Inside,
        );
        assert_eq!(node.f, 4.0);
        node.relax(2.0, 1.0, NodeId(3), CentralHistory::Left);
        assert_eq!(node.f, 3.0);
        assert_eq!(node.parent, Some(NodeId(3)));
        assert_eq!(node.central, CentralHistory::Left);
    }
}
