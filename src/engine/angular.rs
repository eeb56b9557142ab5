//! Angular ray normalization
//!
//! The three angular dimension kinds all reduce to two bounding rays and an
//! arc point that must sit angularly between them. Normalization reorders
//! and reorients the rays so the forward (counter-clockwise) angle from the
//! first ray to the second stays at or below a quarter turn, then walks a
//! fixed retry ladder until the arc point lands inside the wedge.
//!
//! The retry ladder order is load-bearing: for ambiguous and reflex-angle
//! configurations, different geometrically equivalent orders select
//! different wedges and change the rendered output.

use crate::types::Vector2;
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::trace;

/// Perturbation applied when the arc point is codirectional with a ray
const ARC_POINT_NUDGE: f64 = 0.01;

/// Tolerance for codirectionality and wedge-membership tests
const ANGLE_TOL: f64 = 1e-9;

/// Normalized bounding rays of an angular dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRays {
    /// First ray direction after normalization
    pub dir1: Vector2,
    /// Second ray direction after normalization
    pub dir2: Vector2,
    /// Arc-point direction, possibly nudged off a ray
    pub arc_dir: Vector2,
    /// Number of ray swaps performed
    pub swaps: u32,
}

impl NormalizedRays {
    /// Counter-clockwise angle of the wedge from the first to the second ray
    pub fn span(&self) -> f64 {
        self.dir1.angle_to(&self.dir2)
    }

    /// Odd parity: one more swap is owed before exposing first/second
    /// identities to the caller
    pub fn swapped(&self) -> bool {
        self.swaps % 2 == 1
    }
}

/// Whether `probe` lies in the counter-clockwise wedge from `a` to `b`
///
/// Valid for wedges under a half turn, which normalization guarantees.
fn in_wedge(a: Vector2, b: Vector2, probe: Vector2) -> bool {
    a.cross(&probe) >= -ANGLE_TOL && probe.cross(&b) >= -ANGLE_TOL
}

fn codirectional(a: Vector2, b: Vector2) -> bool {
    a.cross(&b).abs() <= ANGLE_TOL && a.dot(&b) > 0.0
}

/// Normalize two bounding rays and the arc-point direction
///
/// Degenerate inputs (zero-length rays, a zero arc vector) resolve to a
/// canonical configuration instead of failing.
pub fn normalize_rays(ray1: Vector2, ray2: Vector2, arc_vec: Vector2) -> NormalizedRays {
    let mut dir1 = fallback_unit(ray1, Vector2::UNIT_X);
    let mut dir2 = fallback_unit(ray2, Vector2::UNIT_Y);
    if dir1.is_parallel_to(&dir2, ANGLE_TOL) {
        // Coincident or opposite rays get a canonical quarter-turn wedge
        dir2 = dir1.perp();
    }
    let mut swaps = 0u32;

    if dir1.angle_to(&dir2) > PI {
        std::mem::swap(&mut dir1, &mut dir2);
        swaps += 1;
    }
    if dir1.angle_to(&dir2) > FRAC_PI_2 + ANGLE_TOL {
        dir1 = -dir1;
        std::mem::swap(&mut dir1, &mut dir2);
        swaps += 1;
    }
    debug_assert!(dir1.angle_to(&dir2) <= FRAC_PI_2 + 1e-6);

    let mut arc_dir = fallback_unit(arc_vec, (dir1 + dir2).normalize());
    if codirectional(arc_dir, dir1) {
        arc_dir = arc_dir.rotate(ARC_POINT_NUDGE);
    } else if codirectional(arc_dir, dir2) {
        arc_dir = arc_dir.rotate(-ARC_POINT_NUDGE);
    }

    // Fixed retry ladder; the first configuration containing the arc point
    // wins. Every branch keeps the wedge orientation counter-clockwise.
    if !in_wedge(dir1, dir2, arc_dir) {
        dir1 = -dir1;
        dir2 = -dir2;
        if !in_wedge(dir1, dir2, arc_dir) {
            dir1 = -dir1;
            std::mem::swap(&mut dir1, &mut dir2);
            swaps += 1;
            if !in_wedge(dir1, dir2, arc_dir) {
                dir1 = -dir1;
                dir2 = -dir2;
            }
        }
    }

    trace!(
        swaps,
        span = dir1.angle_to(&dir2),
        "angular rays normalized"
    );
    NormalizedRays {
        dir1,
        dir2,
        arc_dir,
        swaps,
    }
}

fn fallback_unit(v: Vector2, fallback: Vector2) -> Vector2 {
    if v.length_squared() < ANGLE_TOL * ANGLE_TOL {
        fallback
    } else {
        v.normalize()
    }
}
