/*!
Per-surface resolution and the closest-collision search.

For one labelled surface the resolver combines the vertex sweep with up to
three corner (edge-sweep) candidates, applying the surface-type rules: which
ECB vertex is relevant, which corners can be clipped from which side, and the
one-directional behavior of platforms. The earliest event wins; when a point
hit and an edge hit occur at numerically equal sweep values the point hit is
kept (see the tie-break test).

The closest-collision search runs the resolver over every candidate surface
and keeps the globally earliest event.
*/

use crate::collision::edge_sweep::edge_sweep;
use crate::collision::point_sweep::point_sweep;
use crate::collision::types::SweepHit;
use crate::ecb::{BOTTOM, Ecb, LEFT, RIGHT, TOP};
use crate::stage::{LabelledSurface, SurfaceType};

/// Cheap separation test on the bounding boxes of both poses vs the
/// surface's extremes.
fn bbox_separated(ecb1: &Ecb, ecbp: &Ecb, s: &LabelledSurface) -> bool {
    let mut min = ecb1.points[0];
    let mut max = ecb1.points[0];
    for p in ecb1.points.iter().chain(ecbp.points.iter()) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let (p1, p2) = (s.surface.p1, s.surface.p2);
    let smin_x = p1.x.min(p2.x);
    let smax_x = p1.x.max(p2.x);
    let smin_y = p1.y.min(p2.y);
    let smax_y = p1.y.max(p2.y);

    max.x < smin_x || min.x > smax_x || max.y < smin_y || min.y > smax_y
}

/// Corner (edge-sweep) candidates for one surface, gated on the relevant
/// vertex having started outside the surface's span on that side.
fn corner_candidates(
    ecb1: &Ecb,
    ecbp: &Ecb,
    ls: &LabelledSurface,
    out: &mut Vec<SweepHit>,
) {
    let s = &ls.surface;
    match ls.ty {
        SurfaceType::Ground | SurfaceType::Platform => {
            let (lo, hi) = s.endpoints_by_x();
            let v = ecb1.points[BOTTOM];
            if v.x < lo.x {
                out.extend(edge_sweep(ecb1, ecbp, BOTTOM, RIGHT, lo));
            }
            if v.x > hi.x {
                out.extend(edge_sweep(ecb1, ecbp, BOTTOM, LEFT, hi));
            }
        }
        SurfaceType::Ceiling => {
            let (lo, hi) = s.endpoints_by_x();
            let v = ecb1.points[TOP];
            if v.x < lo.x {
                out.extend(edge_sweep(ecb1, ecbp, TOP, RIGHT, lo));
            }
            if v.x > hi.x {
                out.extend(edge_sweep(ecb1, ecbp, TOP, LEFT, hi));
            }
        }
        SurfaceType::RightWall => {
            let (lo, hi) = s.endpoints_by_y();
            let v = ecb1.points[RIGHT];
            if v.y < lo.y {
                out.extend(edge_sweep(ecb1, ecbp, RIGHT, TOP, lo));
            }
            if v.y > hi.y {
                out.extend(edge_sweep(ecb1, ecbp, RIGHT, BOTTOM, hi));
            }
            // The topmost point can still clip the wall's far (upper)
            // corner while the side vertex stays within the span.
            if ecb1.points[TOP].y < hi.y {
                out.extend(edge_sweep(ecb1, ecbp, TOP, RIGHT, hi));
            }
        }
        SurfaceType::LeftWall => {
            let (lo, hi) = s.endpoints_by_y();
            let v = ecb1.points[LEFT];
            if v.y < lo.y {
                out.extend(edge_sweep(ecb1, ecbp, LEFT, TOP, lo));
            }
            if v.y > hi.y {
                out.extend(edge_sweep(ecb1, ecbp, LEFT, BOTTOM, hi));
            }
            if ecb1.points[TOP].y < hi.y {
                out.extend(edge_sweep(ecb1, ecbp, TOP, LEFT, hi));
            }
        }
    }
}

/// Resolve one labelled surface: earliest of the vertex sweep and the corner
/// candidates, or `None`. Equal-sweep ties go to the vertex sweep.
pub fn surface_collision(ecb1: &Ecb, ecbp: &Ecb, ls: &LabelledSurface) -> Option<SweepHit> {
    if bbox_separated(ecb1, ecbp, ls) {
        return None;
    }

    // Platforms are one-directional: a vertex already below at the start of
    // the frame passes through freely, corners included.
    if ls.ty == SurfaceType::Platform {
        let n = ls.surface.outward_normal(ls.ty)?;
        if (ecb1.points[BOTTOM] - ls.surface.p1).dot(&n) < 0.0 {
            return None;
        }
    }

    let mut best = point_sweep(
        ecb1,
        ecbp,
        ls.ty.relevant_vertex(),
        &ls.surface,
        ls.ty,
        ls.index,
    );

    let mut corners = Vec::new();
    corner_candidates(ecb1, ecbp, ls, &mut corners);
    for hit in corners {
        // Strict comparison: an edge hit at exactly the point hit's sweep
        // does not displace it.
        if best.as_ref().is_none_or(|b| hit.sweep() < b.sweep()) {
            best = Some(hit);
        }
    }
    best
}

/// Run the per-surface resolver over every candidate surface and return the
/// globally earliest event. Stable for a fixed input order; permuting the
/// list only matters for exactly equal sweeps.
pub fn closest_collision(
    ecb1: &Ecb,
    ecbp: &Ecb,
    surfaces: &[LabelledSurface],
) -> Option<SweepHit> {
    let mut best: Option<SweepHit> = None;
    for ls in surfaces {
        if let Some(hit) = surface_collision(ecb1, ecbp, ls) {
            if best.as_ref().is_none_or(|b| hit.sweep() < b.sweep()) {
                best = Some(hit);
            }
        }
    }
    best
}
