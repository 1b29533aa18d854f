/*!
Point sweep: did a specific ECB vertex cross a given surface during the
frame's motion?

The test is directional. A vertex only collides when it starts on the
surface's outward side and ends on the inward side; a vertex leaving through
a surface never collides. Spurious algebraic solutions (parallel motion,
crossings outside the motion or outside the surface's finite extent) are
screened out and reported as "no collision".
*/

use crate::collision::types::SweepHit;
use crate::ecb::{BOTTOM, Ecb, TOP};
use crate::geometry::{DEGENERACY_EPS, intersection_parameter, line_angle};
use crate::stage::{Surface, SurfaceType};

/// Pick the ECB vertex a slanted wall is actually tested against.
///
/// A wall steeper than the cone spanned by the ECB's own bottom/top edges
/// contacts the side vertex; outside that cone the first contact is the flat
/// bottom or top vertex instead. Angles are measured on the wall direction
/// normalized to point upward.
pub(crate) fn wall_relevant_vertex(ecb: &Ecb, surface: &Surface, ty: SurfaceType) -> usize {
    let mut d = surface.p2 - surface.p1;
    if d.y < 0.0 {
        d = -d;
    }
    if d.y.abs() <= DEGENERACY_EPS {
        // Horizontal "wall": degenerate authoring, keep the side vertex.
        return ty.relevant_vertex();
    }
    // A collapsed ECB (the point seed of an inflation sweep) has no edge
    // cone; the nominal side vertex stands in.
    if (ecb.right() - ecb.left()).norm_squared() <= DEGENERACY_EPS {
        return ty.relevant_vertex();
    }
    let wall = d.y.atan2(d.x);

    match ty {
        SurfaceType::RightWall => {
            let low = line_angle((ecb.bottom(), ecb.right()));
            let high = line_angle((ecb.right(), ecb.top()));
            if wall <= low {
                BOTTOM
            } else if wall >= high {
                TOP
            } else {
                ty.relevant_vertex()
            }
        }
        SurfaceType::LeftWall => {
            let low = line_angle((ecb.left(), ecb.top()));
            let high = line_angle((ecb.bottom(), ecb.left()));
            if wall <= low {
                TOP
            } else if wall >= high {
                BOTTOM
            } else {
                ty.relevant_vertex()
            }
        }
        _ => ty.relevant_vertex(),
    }
}

/// Sweep one ECB vertex against one surface.
///
/// `same` is the nominally relevant vertex for the surface type; for walls
/// it may be re-selected per the slant rule above. Returns the surface-hit
/// event, or `None` when the vertex did not cross within this frame's
/// motion and the surface's extent.
pub fn point_sweep(
    ecb1: &Ecb,
    ecbp: &Ecb,
    same: usize,
    surface: &Surface,
    ty: SurfaceType,
    index: usize,
) -> Option<SweepHit> {
    let same = if ty.is_wall() {
        wall_relevant_vertex(ecb1, surface, ty)
    } else {
        same
    };

    let n = surface.outward_normal(ty)?;
    let start = ecb1.points[same];
    let end = ecbp.points[same];

    // Directionality: outside at the start, inside by the end. This also
    // guarantees the motion is not parallel to the surface line.
    let d_start = (start - surface.p1).dot(&n);
    let d_end = (end - surface.p1).dot(&n);
    if !(d_start >= 0.0 && d_end < 0.0) {
        return None;
    }

    let motion = (start, end);
    let sweep = intersection_parameter(surface.line(), motion);
    if !sweep.is_finite() || !(0.0..=1.0).contains(&sweep) {
        return None;
    }

    // The crossing must fall within the surface's own finite extent.
    let along = intersection_parameter(motion, surface.line());
    if !along.is_finite() || !(0.0..=1.0).contains(&along) {
        return None;
    }

    Some(SweepHit::Surface {
        sweep,
        surface: *surface,
        ty,
        index,
        vertex: same,
    })
}
