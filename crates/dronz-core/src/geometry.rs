//! Planar geometry for drone movement: distance, closeness, region membership
//! and the discretized step function.
//!
//! Coordinates are treated as a flat (lng, lat) plane. There is no geodesic
//! correction; at city scale the error is far below one move.

use crate::models::{LngLat, NamedRegion};

/// Length of a single drone move, in degrees.
pub const MOVE_DISTANCE: f64 = 0.00015;

/// Two positions closer than this are "close" (goal reached, hovering at base).
pub const CLOSE_DISTANCE: f64 = 0.00015;

/// Angle reported for a move with no displacement.
pub const HOVER_ANGLE: f64 = 999.0;

/// Appleton Tower, where every delivery flight starts and ends.
pub const BASE: LngLat = LngLat::new(-3.186874, 55.944494);

/// The 16 compass directions a drone may fly, plus hovering in place.
///
/// Angles are measured counter-clockwise from the longitude (east) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    E,
    ENE,
    NE,
    NNE,
    N,
    NNW,
    NW,
    WNW,
    W,
    WSW,
    SW,
    SSW,
    S,
    SSE,
    SE,
    ESE,
    Hover,
}

impl Heading {
    /// Every heading that moves, in expansion order.
    pub const COMPASS: [Heading; 16] = [
        Heading::E,
        Heading::ENE,
        Heading::NE,
        Heading::NNE,
        Heading::N,
        Heading::NNW,
        Heading::NW,
        Heading::WNW,
        Heading::W,
        Heading::WSW,
        Heading::SW,
        Heading::SSW,
        Heading::S,
        Heading::SSE,
        Heading::SE,
        Heading::ESE,
    ];

    fn index(self) -> Option<usize> {
        Self::COMPASS.iter().position(|heading| *heading == self)
    }

    /// Angle in degrees, or [`HOVER_ANGLE`] for [`Heading::Hover`].
    pub fn degrees(self) -> f64 {
        match self.index() {
            Some(idx) => idx as f64 * 22.5,
            None => HOVER_ANGLE,
        }
    }

    pub fn opposite(self) -> Heading {
        match self.index() {
            Some(idx) => Self::COMPASS[(idx + 8) % 16],
            None => Heading::Hover,
        }
    }
}

/// Euclidean distance in the (lng, lat) plane.
pub fn distance(a: LngLat, b: LngLat) -> f64 {
    let d_lng = a.lng - b.lng;
    let d_lat = a.lat - b.lat;
    (d_lng * d_lng + d_lat * d_lat).sqrt()
}

pub fn is_close(a: LngLat, b: LngLat) -> bool {
    distance(a, b) < CLOSE_DISTANCE
}

/// Even-odd ray casting against the closed vertex ring.
///
/// An edge counts when the point's latitude lies in `(min_lat, max_lat]` and
/// the point is at or left of the edge. Points on the boundary follow that
/// rule, so for an axis-aligned square the bottom-left corner tests outside
/// and the top-right corner tests inside.
pub fn is_in_region(point: LngLat, region: &NamedRegion) -> bool {
    let vertices = &region.vertices;
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut prev = vertices[n - 1];
    for &next in vertices {
        let (lo_lat, hi_lat) = (prev.lat.min(next.lat), prev.lat.max(next.lat));
        if point.lat > lo_lat && point.lat <= hi_lat && point.lng <= prev.lng.max(next.lng) {
            // Horizontal edges never get here: lat > lo && lat <= hi needs lo < hi.
            let vertical = prev.lng == next.lng;
            if vertical {
                inside = !inside;
            } else {
                let x_intercept =
                    (point.lat - prev.lat) * (next.lng - prev.lng) / (next.lat - prev.lat) + prev.lng;
                if point.lng <= x_intercept {
                    inside = !inside;
                }
            }
        }
        prev = next;
    }

    inside
}

/// True if the point lies in any of the regions.
pub fn is_in_any_region(point: LngLat, regions: &[NamedRegion]) -> bool {
    regions.iter().any(|region| is_in_region(point, region))
}

/// Position after one move of [`MOVE_DISTANCE`] along `heading`.
pub fn step(from: LngLat, heading: Heading) -> LngLat {
    step_by(from, heading, MOVE_DISTANCE)
}

/// Position after one move of `move_distance` along `heading`.
pub fn step_by(from: LngLat, heading: Heading, move_distance: f64) -> LngLat {
    if heading == Heading::Hover {
        return from;
    }
    let radians = heading.degrees().to_radians();
    LngLat::new(
        from.lng + move_distance * radians.cos(),
        from.lat + move_distance * radians.sin(),
    )
}

/// Compass angle from `from` to `to` in degrees, rounded to one decimal place
/// and normalized to `[0, 360)`.
///
/// Returns [`HOVER_ANGLE`] when the two positions are identical, or when
/// `anchor` is given and `from` is close to it (the drone is sitting at base).
pub fn bearing(from: LngLat, to: LngLat, anchor: Option<LngLat>) -> f64 {
    if from == to {
        return HOVER_ANGLE;
    }
    if let Some(anchor) = anchor {
        if is_close(from, anchor) {
            return HOVER_ANGLE;
        }
    }

    let degrees = (to.lat - from.lat).atan2(to.lng - from.lng).to_degrees();
    // Half-up rounding; never yields negative zero.
    let rounded = (degrees * 10.0 + 0.5).floor() / 10.0;
    if rounded < 0.0 {
        rounded + 360.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> NamedRegion {
        NamedRegion::new(
            "square",
            vec![
                LngLat::new(0.0, 1.0),
                LngLat::new(0.0, 0.0),
                LngLat::new(1.0, 0.0),
                LngLat::new(1.0, 1.0),
            ],
        )
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = LngLat::new(3.0, 12.0);
        let b = LngLat::new(6.0, 6.0);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
        assert!((distance(a, b) - 6.708203932499369).abs() < 1e-12);
        assert_eq!(distance(LngLat::new(0.0, 0.0), LngLat::new(0.0, 10.0)), 10.0);
    }

    #[test]
    fn closeness_threshold() {
        assert!(is_close(LngLat::new(0.0, 0.0), LngLat::new(0.0, 0.0001)));
        assert!(!is_close(LngLat::new(1.0, 0.0), LngLat::new(0.0, 0.0001)));
        assert!(!is_close(
            LngLat::new(0.0, 0.0),
            LngLat::new(0.0, CLOSE_DISTANCE)
        ));
    }

    #[test]
    fn unit_square_membership() {
        let square = unit_square();
        assert!(is_in_region(LngLat::new(0.5, 0.5), &square));
        assert!(!is_in_region(LngLat::new(1.0, 1.1), &square));
        assert!(!is_in_region(LngLat::new(1.0001, 0.5), &square));
        assert!(!is_in_region(LngLat::new(-0.0001, 0.5), &square));
        assert!(!is_in_region(LngLat::new(0.5, -0.0001), &square));
    }

    #[test]
    fn unit_square_vertices_follow_edge_rule() {
        let square = unit_square();
        assert!(!is_in_region(LngLat::new(0.0, 0.0), &square));
        assert!(is_in_region(LngLat::new(1.0, 1.0), &square));
        // On the right edge only that edge toggles; on the left edge both do.
        assert!(is_in_region(LngLat::new(1.0, 0.5), &square));
        assert!(!is_in_region(LngLat::new(0.0, 0.5), &square));
    }

    #[test]
    fn concave_region_excludes_notch() {
        let u_shape = NamedRegion::new(
            "u",
            vec![
                LngLat::new(0.0, 0.0),
                LngLat::new(3.0, 0.0),
                LngLat::new(3.0, 3.0),
                LngLat::new(2.0, 3.0),
                LngLat::new(2.0, 1.0),
                LngLat::new(1.0, 1.0),
                LngLat::new(1.0, 3.0),
                LngLat::new(0.0, 3.0),
            ],
        );
        assert!(is_in_region(LngLat::new(0.5, 2.0), &u_shape));
        assert!(is_in_region(LngLat::new(2.5, 2.0), &u_shape));
        assert!(!is_in_region(LngLat::new(1.5, 2.0), &u_shape));
        assert!(is_in_region(LngLat::new(1.5, 0.5), &u_shape));
    }

    #[test]
    fn degenerate_region_contains_nothing() {
        let line = NamedRegion::new("line", vec![LngLat::new(0.0, 0.0), LngLat::new(1.0, 1.0)]);
        assert!(!is_in_region(LngLat::new(0.5, 0.5), &line));
    }

    #[test]
    fn step_north_moves_latitude_only() {
        let next = step(LngLat::new(0.0, 0.0), Heading::N);
        assert!(next.lng.abs() < 1e-12);
        assert!((next.lat - 0.00015).abs() < 1e-12);
    }

    #[test]
    fn hover_does_not_move() {
        let here = LngLat::new(-3.19, 55.94);
        assert_eq!(step(here, Heading::Hover), here);
        assert_eq!(Heading::Hover.degrees(), HOVER_ANGLE);
        assert_eq!(Heading::Hover.opposite(), Heading::Hover);
    }

    #[test]
    fn step_then_opposite_returns_home() {
        let start = LngLat::new(-3.186874, 55.944494);
        for heading in Heading::COMPASS {
            let out = step(start, heading);
            let back = step(out, heading.opposite());
            assert!(
                distance(start, back) < 1e-12,
                "{heading:?} did not return, off by {}",
                distance(start, back)
            );
            assert!((distance(start, out) - MOVE_DISTANCE).abs() < 1e-12);
        }
    }

    #[test]
    fn compass_covers_full_circle() {
        let mut degrees: Vec<f64> = Heading::COMPASS.iter().map(|h| h.degrees()).collect();
        degrees.sort_by(f64::total_cmp);
        for (idx, value) in degrees.iter().enumerate() {
            assert_eq!(*value, idx as f64 * 22.5);
        }
    }

    #[test]
    fn bearing_matches_compass_steps() {
        let start = LngLat::new(-3.19, 55.945);
        for heading in Heading::COMPASS {
            let next = step(start, heading);
            assert_eq!(bearing(start, next, None), heading.degrees());
        }
    }

    #[test]
    fn bearing_hovers_on_identical_points_and_at_anchor() {
        let here = LngLat::new(-3.19, 55.945);
        assert_eq!(bearing(here, here, None), HOVER_ANGLE);

        let near_base = LngLat::new(BASE.lng + 0.00005, BASE.lat);
        let away = LngLat::new(BASE.lng + 0.001, BASE.lat);
        assert_eq!(bearing(near_base, away, Some(BASE)), HOVER_ANGLE);
        assert_eq!(bearing(near_base, away, None), 0.0);
    }

    #[test]
    fn bearing_is_normalized() {
        let origin = LngLat::new(0.0, 0.0);
        assert_eq!(bearing(origin, LngLat::new(0.0, -1.0), None), 270.0);
        assert_eq!(bearing(origin, LngLat::new(-1.0, 0.0), None), 180.0);
        // Just below the positive axis rounds up to a positive zero.
        let flat = bearing(origin, LngLat::new(1.0, -0.0001), None);
        assert_eq!(flat.to_bits(), 0.0_f64.to_bits());
        assert_eq!(bearing(origin, LngLat::new(1.0, -0.01), None), 359.4);
    }
}
