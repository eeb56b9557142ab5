//! 2D construction helpers for the layout engine
//!
//! Everything here operates on plane-space coordinates. Degenerate inputs
//! return `None` or an empty set; the callers supply the deterministic
//! fallbacks.

use crate::types::Vector2;

/// Geometric tolerance for parallelism and coincidence tests
pub const GEOM_TOL: f64 = 1e-9;

/// Intersection of two infinite lines given in point/direction form
pub fn line_line_intersection(
    p1: Vector2,
    d1: Vector2,
    p2: Vector2,
    d2: Vector2,
) -> Option<Vector2> {
    let denom = d1.cross(&d2);
    if denom.abs() < GEOM_TOL {
        return None;
    }
    let t = (p2 - p1).cross(&d2) / denom;
    Some(p1 + d1 * t)
}

/// Foot of the perpendicular from a point onto an infinite line
pub fn project_onto_line(p: Vector2, origin: Vector2, dir: Vector2) -> Vector2 {
    let d = dir.normalize();
    origin + d * (p - origin).dot(&d)
}

/// Intersections of an infinite line with a circle, ordered by line parameter
pub fn line_circle_intersections(
    origin: Vector2,
    dir: Vector2,
    center: Vector2,
    radius: f64,
) -> Vec<Vector2> {
    let d = dir.normalize();
    let oc = origin - center;
    let b = oc.dot(&d);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc < GEOM_TOL {
        return vec![origin + d * (-b)];
    }
    let root = disc.sqrt();
    vec![origin + d * (-b - root), origin + d * (-b + root)]
}

/// Normalize an angle into [0, 2*pi)
pub fn normalize_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let mut a = angle % tau;
    if a < 0.0 {
        a += tau;
    }
    a
}

/// Counter-clockwise sweep from `start` to `end`, in [0, 2*pi)
pub fn ccw_sweep(start: f64, end: f64) -> f64 {
    normalize_angle(end - start)
}

/// Whether `angle` lies on the counter-clockwise arc from `start` to `end`
pub fn angle_on_arc(angle: f64, start: f64, end: f64) -> bool {
    ccw_sweep(start, angle) <= ccw_sweep(start, end) + GEOM_TOL
}
