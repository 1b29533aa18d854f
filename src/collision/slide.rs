/*!
Sweep-and-slide resolution.

Repeatedly finds the closest collision between the current source pose and
the current target pose, then either ends the slide (landed on a
ground/platform, or a conflicting second collision) or transfers the
remaining motion along the hit surface/corner and iterates. Each transfer
re-targets the candidate pose so it rests flush against the just-hit
geometry, with a small outward offset so the next query does not re-detect
the contact.

The loop carries a hard iteration cap derived from the surface count;
exceeding it force-ends the slide at the last midpoint. This is deliberately
conservative behavior for pathological geometry (e.g. acute concave corners
causing oscillation).
*/

use log::{trace, warn};

use crate::collision::narrow_phase::closest_collision;
use crate::collision::settings::{ADDITIONAL_OFFSET, CollisionSettings};
use crate::collision::types::SweepHit;
use crate::ecb::{Ecb, next_vertex};
use crate::geometry::{DEGENERACY_EPS, Vec2};
use crate::stage::{LabelledSurface, SurfaceType};

/// What the slide is currently redirected along.
#[derive(Clone, Copy, Debug, PartialEq)]
enum SlidingAgainst {
    Surface(SurfaceType),
    Corner(f32),
}

/// Which half of the ECB perimeter a slide partner engages. Corners are only
/// accepted as transfer targets when they fall on the engaged half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EngagedSide {
    /// Left-half edges ride the geometry (sliding along a left wall).
    LeftEdges,
    /// Right-half edges ride the geometry (sliding along a right wall).
    RightEdges,
}

impl EngagedSide {
    fn of(against: SlidingAgainst) -> Option<EngagedSide> {
        match against {
            SlidingAgainst::Surface(SurfaceType::LeftWall) => Some(EngagedSide::LeftEdges),
            SlidingAgainst::Surface(SurfaceType::RightWall) => Some(EngagedSide::RightEdges),
            SlidingAgainst::Surface(_) => None,
            SlidingAgainst::Corner(a) => {
                if a <= 2.0 {
                    Some(EngagedSide::RightEdges)
                } else {
                    Some(EngagedSide::LeftEdges)
                }
            }
        }
    }

    /// Fixed angular-range acceptance for corner transfers.
    fn accepts(self, angular: f32) -> bool {
        match self {
            EngagedSide::RightEdges => angular <= 2.0,
            EngagedSide::LeftEdges => angular == 0.0 || angular >= 2.0,
        }
    }
}

/// Final pose plus the last geometry touched (if any) during the slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideOutcome {
    pub ecb: Ecb,
    pub touch: Option<SweepHit>,
}

fn transfer_allowed(against: SlidingAgainst, hit: &SweepHit) -> bool {
    match (against, hit) {
        (SlidingAgainst::Surface(cur), SweepHit::Surface { ty, .. }) => {
            *ty == cur || cur.is_landing()
        }
        (_, SweepHit::Corner { angular, .. }) => EngagedSide::of(against)
            .map(|side| side.accepts(*angular))
            .unwrap_or(false),
        (SlidingAgainst::Corner(_), SweepHit::Surface { .. }) => false,
    }
}

/// Outward nudge applied when resting against a corner, keyed by which part
/// of the perimeter the corner touches.
fn corner_nudge(angular: f32) -> Vec2 {
    if angular == 0.0 {
        Vec2::new(0.0, ADDITIONAL_OFFSET)
    } else if angular == 2.0 {
        Vec2::new(0.0, -ADDITIONAL_OFFSET)
    } else if angular < 2.0 {
        Vec2::new(-ADDITIONAL_OFFSET, 0.0)
    } else {
        Vec2::new(ADDITIONAL_OFFSET, 0.0)
    }
}

/// Signed outward offset along the projection axis for a surface type.
fn surface_outward_offset(ty: SurfaceType) -> f32 {
    match ty {
        SurfaceType::Ground | SurfaceType::Platform | SurfaceType::LeftWall => ADDITIONAL_OFFSET,
        SurfaceType::Ceiling | SurfaceType::RightWall => -ADDITIONAL_OFFSET,
    }
}

/// The pose at the moment of impact: the interpolated midpoint, pushed out
/// by the fixed offset so the contact vertex/edge sits just outside the hit
/// geometry.
fn touch_pose(source: &Ecb, target: &Ecb, hit: &SweepHit) -> Ecb {
    let mid = Ecb::interpolate(source, target, hit.sweep());
    match hit {
        SweepHit::Surface {
            surface, ty, vertex, ..
        } => {
            let v = mid.points[*vertex];
            let d = surface.p2 - surface.p1;
            let off = surface_outward_offset(*ty);
            match ty {
                SurfaceType::Ground | SurfaceType::Platform | SurfaceType::Ceiling => {
                    if d.x.abs() <= DEGENERACY_EPS {
                        return mid;
                    }
                    let y_on = surface.p1.y + (v.x - surface.p1.x) * d.y / d.x;
                    mid.translate(Vec2::new(0.0, y_on + off - v.y))
                }
                SurfaceType::LeftWall | SurfaceType::RightWall => {
                    if d.y.abs() <= DEGENERACY_EPS {
                        return mid;
                    }
                    let x_on = surface.p1.x + (v.y - surface.p1.y) * d.x / d.y;
                    mid.translate(Vec2::new(x_on + off - v.x, 0.0))
                }
            }
        }
        SweepHit::Corner { angular, .. } => mid.translate(corner_nudge(*angular)),
    }
}

/// Re-target the candidate pose so it rests flush against the just-hit
/// geometry: vertical projection for ground-type surfaces, horizontal for
/// walls and corners. When the relevant vertex/edge falls outside the hit
/// geometry's extent, re-target toward the nearest endpoint instead.
fn next_target(target: &Ecb, hit: &SweepHit) -> Ecb {
    match hit {
        SweepHit::Surface {
            surface, ty, vertex, ..
        } => {
            let v = target.points[*vertex];
            let d = surface.p2 - surface.p1;
            let off = surface_outward_offset(*ty);
            match ty {
                SurfaceType::Ground | SurfaceType::Platform | SurfaceType::Ceiling => {
                    let (lo, hi) = surface.endpoints_by_x();
                    let y_on = if v.x < lo.x {
                        lo.y
                    } else if v.x > hi.x {
                        hi.y
                    } else {
                        if d.x.abs() <= DEGENERACY_EPS {
                            return *target;
                        }
                        surface.p1.y + (v.x - surface.p1.x) * d.y / d.x
                    };
                    target.translate(Vec2::new(0.0, y_on + off - v.y))
                }
                SurfaceType::LeftWall | SurfaceType::RightWall => {
                    let (lo, hi) = surface.endpoints_by_y();
                    let x_on = if v.y < lo.y {
                        lo.x
                    } else if v.y > hi.y {
                        hi.x
                    } else {
                        if d.y.abs() <= DEGENERACY_EPS {
                            return *target;
                        }
                        surface.p1.x + (v.y - surface.p1.y) * d.x / d.y
                    };
                    target.translate(Vec2::new(x_on + off - v.x, 0.0))
                }
            }
        }
        SweepHit::Corner { point, angular, .. } => {
            let i = (angular.floor() as usize).min(3);
            let j = next_vertex(i);
            let a = target.points[i];
            let b = target.points[j];
            let dy = b.y - a.y;
            let nudge = if *angular <= 2.0 {
                -ADDITIONAL_OFFSET
            } else {
                ADDITIONAL_OFFSET
            };

            if dy.abs() <= DEGENERACY_EPS {
                return *target;
            }
            let (y_min, y_max) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
            if (y_min..=y_max).contains(&point.y) {
                // Keep the corner on the edge line at the target's height.
                let x_on = a.x + (point.y - a.y) * (b.x - a.x) / dy;
                target.translate(Vec2::new(point.x + nudge - x_on, 0.0))
            } else {
                // The edge no longer spans the corner: the nearer endpoint
                // rides it instead.
                let k = if (point.y - a.y).abs() <= (point.y - b.y).abs() {
                    a
                } else {
                    b
                };
                target.translate(Vec2::new(point.x + nudge - k.x, 0.0))
            }
        }
    }
}

/// Resolve one frame of motion from `ecb1` toward `ecbp` against the
/// labelled surface set, sliding along walls/ceilings/corners until the
/// motion is exhausted, the character lands, or a conflicting collision
/// interrupts the slide.
pub fn resolve_slide(
    ecb1: &Ecb,
    ecbp: &Ecb,
    surfaces: &[LabelledSurface],
    settings: &CollisionSettings,
) -> SlideOutcome {
    let mut source = *ecb1;
    let mut target = *ecbp;
    let mut sliding: Option<SlidingAgainst> = None;
    let mut touch: Option<SweepHit> = None;

    let cap = settings.slide_iteration_cap(surfaces.len());
    for _ in 0..cap {
        let Some(hit) = closest_collision(&source, &target, surfaces) else {
            // Motion exhausted without further contact.
            return SlideOutcome { ecb: target, touch };
        };

        let mid = touch_pose(&source, &target, &hit);

        let transfer = match sliding {
            None => match hit {
                // Landing takes priority over sliding.
                SweepHit::Surface { ty, .. } if ty.is_landing() => false,
                _ => true,
            },
            Some(against) => transfer_allowed(against, &hit),
        };

        if !transfer {
            return SlideOutcome {
                ecb: mid,
                touch: Some(hit),
            };
        }

        trace!(
            "slide transfer at sweep {:.4} onto {:?}",
            hit.sweep(),
            hit.label()
        );
        target = next_target(&target, &hit);
        sliding = Some(match hit {
            SweepHit::Surface { ty, .. } => SlidingAgainst::Surface(ty),
            SweepHit::Corner { angular, .. } => SlidingAgainst::Corner(angular),
        });
        touch = Some(hit);
        source = mid;
    }

    warn!("slide iteration cap ({cap}) exceeded; ending at last midpoint");
    SlideOutcome { ecb: source, touch }
}
