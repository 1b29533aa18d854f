/*!
Edge sweep: did a moving ECB edge sweep across a surface endpoint (corner)?

The edge's two endpoints move independently between the previous and
candidate poses, so the edge line rotates as it translates; the crossing
instant is the root of a quadratic in the sweep fraction. Re-centering both
poses on the corner keeps the algebra in "corner at origin" form. The
winding of the `same -> other` traversal picks which quadratic root is the
physical entry crossing.
*/

use crate::collision::types::SweepHit;
use crate::ecb::{Ecb, edge_angular, next_vertex, prev_vertex};
use crate::geometry::{DEGENERACY_EPS, Vec2, cross, solve_quadratic};

/// Sweep the ECB edge bounded by vertices `same` and `other` across the
/// corner point. Returns a corner-hit event with the crossing's angular
/// parameter, or `None` when the corner did not cross the moving edge within
/// this frame's motion and the edge's finite extent.
pub fn edge_sweep(
    ecb1: &Ecb,
    ecbp: &Ecb,
    same: usize,
    other: usize,
    corner: Vec2,
) -> Option<SweepHit> {
    debug_assert!(other == next_vertex(same) || other == prev_vertex(same));

    let a1 = ecb1.points[same];
    let b1 = ecb1.points[other];
    let ap = ecbp.points[same];
    let bp = ecbp.points[other];

    // Counter-clockwise traversal keeps the diamond interior on the edge's
    // left; the entry crossing is then the rising root. Clockwise flips it.
    let ccw = other == next_vertex(same);
    let sign = if ccw { 1.0 } else { -1.0 };

    // Directional gate: the corner must start on the outward side of the
    // edge line and end on the inward side.
    let e1 = b1 - a1;
    let ep = bp - ap;
    let c_start = cross(e1, corner - a1);
    let c_end = cross(ep, corner - ap);
    if !(sign * c_start <= 0.0 && sign * c_end > 0.0) {
        return None;
    }

    // Corner-centered sweep: A(s) = a1 + s*u, B(s) = b1 + s*w; the corner is
    // on the edge line when cross(B(s)-A(s), corner-A(s)) = 0, a quadratic
    // in s.
    let u = ap - a1;
    let w = bp - b1;
    let r0 = corner - a1;
    let a0 = cross(e1, r0);
    let a1c = cross(w - u, r0) - cross(e1, u);
    let a2c = cross(u, w);

    let sweep = solve_quadratic(a0, a1c, a2c, sign)?;
    if !sweep.is_finite() || !(0.0..=1.0).contains(&sweep) {
        return None;
    }

    // Position along the edge at the crossing instant; must fall within the
    // edge's finite extent.
    let a_s = a1 + u * sweep;
    let b_s = b1 + w * sweep;
    let e_s = b_s - a_s;
    let len_sq = e_s.norm_squared();
    if len_sq <= DEGENERACY_EPS {
        return None;
    }
    let t = (corner - a_s).dot(&e_s) / len_sq;
    if !t.is_finite() || !(0.0..=1.0).contains(&t) {
        return None;
    }

    Some(SweepHit::Corner {
        sweep,
        point: corner,
        angular: edge_angular(same, other, t),
    })
}
