/*!
Squash and reinflate: temporarily shrinking the ECB to fit through gaps
narrower than its nominal size, and growing it back once space permits.

The squash requirement is measured by sweeping a degenerate, point-like ECB
at the focus outward to the real shape: the sweep fraction at the first
collision is exactly the largest scale that still fits. Reinflation runs the
same check at the attempted full size, anchored at the bottom vertex so the
ground being stood on does not block the regrowth.
*/

use log::debug;

use crate::collision::narrow_phase::closest_collision;
use crate::collision::settings::{CollisionSettings, REINFLATE_MARGIN, SQUASH_FACTOR_FLOOR};
use crate::collision::types::SquashDatum;
use crate::ecb::Ecb;
use crate::geometry::Vec2;
use crate::stage::LabelledSurface;

/// Clamp a computed squash factor: never below the hard floor, and never so
/// small that the squashed width drops under the configured minimum. `ecb`
/// must be the nominal-size shape the factor is measured against; handing it
/// an already-squashed shape would overstate the width floor.
fn clamp_factor(factor: f32, ecb: &Ecb, settings: &CollisionSettings) -> f32 {
    let width = 2.0 * ecb.half_width();
    let width_floor = if width > settings.smallest_ecb_width {
        settings.smallest_ecb_width / width
    } else {
        1.0
    };
    factor.max(width_floor).max(SQUASH_FACTOR_FLOOR).min(1.0)
}

/// How much the ECB must shrink toward the focus to avoid penetrating
/// `surfaces`. A factor of 1 means no squashing is required.
pub fn compute_squash_factor(
    ecb: &Ecb,
    location: Option<f32>,
    surfaces: &[LabelledSurface],
    settings: &CollisionSettings,
) -> SquashDatum {
    let focus = ecb.focus_point(location);
    let seed = Ecb::new(focus, focus, focus, focus);

    let factor = match closest_collision(&seed, ecb, surfaces) {
        Some(hit) => {
            let f = clamp_factor(hit.sweep(), ecb, settings);
            debug!("squash required: factor {f:.4} at focus {location:?}");
            f
        }
        None => 1.0,
    };

    SquashDatum {
        location: if factor < 1.0 { location } else { None },
        factor,
    }
}

/// Attempt to grow a previously squashed ECB back toward nominal size.
///
/// The fully regrown candidate is computed about the stored focus, then
/// re-anchored so the bottom vertex stays put; the inflation sweep against
/// `surfaces` then yields the largest safe intermediate size. Returns the
/// corrected position (kept in lock-step with the bottom vertex), the new
/// squash state and the resulting ECB.
pub fn reinflate(
    ecb: &Ecb,
    position: Vec2,
    surfaces: &[LabelledSurface],
    old: &SquashDatum,
    settings: &CollisionSettings,
) -> (Vec2, SquashDatum, Ecb) {
    if old.factor >= 1.0 {
        return (position, SquashDatum::default(), *ecb);
    }

    let grown = ecb.squash_toward_focus(old.location, 1.0 / old.factor);
    let grown = grown.translate(ecb.bottom() - grown.bottom());

    let safe = match closest_collision(ecb, &grown, surfaces) {
        Some(hit) => (hit.sweep() - REINFLATE_MARGIN).max(0.0),
        None => 1.0,
    };

    let result = Ecb::interpolate(ecb, &grown, safe);
    // Growth actually achieved, as a multiple of the current size; the
    // cumulative factor scales up by the same amount. An unobstructed sweep
    // restores nominal size exactly.
    let factor = if safe >= 1.0 {
        1.0
    } else {
        let growth = 1.0 + safe * (1.0 / old.factor - 1.0);
        // `grown` is the nominal-size shape; clamping against the partially
        // regrown `result` would inflate the width floor by 1/factor and
        // desync the stored factor from the shape's true scale.
        clamp_factor(old.factor * growth, &grown, settings)
    };

    let squash = SquashDatum {
        location: if factor < 1.0 { old.location } else { None },
        factor,
    };
    if factor < 1.0 {
        debug!("reinflate limited: factor {factor:.4}");
    }
    let position = position + (result.bottom() - ecb.bottom());
    (position, squash, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{LabelledSurface, Surface, SurfaceType};
    use approx::assert_relative_eq;

    fn diamond(bottom: Vec2, half_w: f32, half_h: f32) -> Ecb {
        Ecb::new(
            bottom,
            bottom + Vec2::new(half_w, half_h),
            bottom + Vec2::new(0.0, 2.0 * half_h),
            bottom + Vec2::new(-half_w, half_h),
        )
    }

    fn wall(x: f32, ty: SurfaceType, index: usize) -> LabelledSurface {
        LabelledSurface {
            surface: Surface::new(Vec2::new(x, -10.0), Vec2::new(x, 10.0)),
            ty,
            index,
        }
    }

    #[test]
    fn open_space_requires_no_squashing() {
        let e = diamond(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let datum = compute_squash_factor(&e, None, &[], &CollisionSettings::default());
        assert_eq!(datum.factor, 1.0);
        assert_eq!(datum.location, None);
    }

    #[test]
    fn a_nearby_wall_limits_the_inflation_sweep() {
        // Diamond centered at the origin with half-width 2; a right wall at
        // x = 1 allows only half the inflation from the center.
        let e = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let w = wall(1.0, SurfaceType::RightWall, 0);
        let datum = compute_squash_factor(&e, None, &[w], &CollisionSettings::default());
        assert_relative_eq!(datum.factor, 0.5, epsilon = 1.0e-5);
        assert_eq!(datum.location, None);
    }

    #[test]
    fn squash_factor_respects_the_width_floor() {
        let e = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let w = wall(0.01, SurfaceType::RightWall, 0);
        let settings = CollisionSettings {
            smallest_ecb_width: 1.0,
            ..Default::default()
        };
        let datum = compute_squash_factor(&e, None, &[w], &settings);
        // Width floor: 1.0 / 4.0 = 0.25, above the geometric requirement.
        assert_relative_eq!(datum.factor, 0.25, epsilon = 1.0e-5);
    }

    #[test]
    fn reinflate_in_open_space_recovers_the_nominal_shape() {
        let nominal = diamond(Vec2::new(3.0, 1.0), 2.0, 2.0);
        let squashed = nominal.squash_toward_focus(Some(1.5), 0.4);
        let datum = SquashDatum {
            location: Some(1.5),
            factor: 0.4,
        };

        let (pos, new_datum, restored) = reinflate(
            &squashed,
            squashed.bottom(),
            &[],
            &datum,
            &CollisionSettings::default(),
        );
        assert_eq!(new_datum.factor, 1.0);
        assert_eq!(new_datum.location, None);
        // Shape (vertex offsets from the bottom vertex) matches nominal.
        for i in 0..4 {
            let want = nominal.points[i] - nominal.bottom();
            let got = restored.points[i] - restored.bottom();
            assert_relative_eq!(got.x, want.x, epsilon = 1.0e-4);
            assert_relative_eq!(got.y, want.y, epsilon = 1.0e-4);
        }
        // Position stays in lock-step with the bottom vertex.
        assert_relative_eq!(pos.x, restored.bottom().x, epsilon = 1.0e-5);
        assert_relative_eq!(pos.y, restored.bottom().y, epsilon = 1.0e-5);
    }

    #[test]
    fn reinflate_stays_small_while_the_gap_is_tight() {
        // Squashed to half size between two walls that still pinch the
        // nominal shape: the factor may creep but must stay below 1 and the
        // shape must not cross either wall.
        let nominal = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let squashed = nominal.squash_toward_focus(None, 0.5);
        let datum = SquashDatum {
            location: None,
            factor: 0.5,
        };
        let walls = [
            wall(1.2, SurfaceType::RightWall, 0),
            wall(-1.2, SurfaceType::LeftWall, 0),
        ];

        let (_, new_datum, grown) = reinflate(
            &squashed,
            squashed.bottom(),
            &walls,
            &datum,
            &CollisionSettings::default(),
        );
        assert!(new_datum.factor < 1.0);
        assert!(new_datum.location.is_none());
        assert!(grown.right().x <= 1.2);
        assert!(grown.left().x >= -1.2);
    }

    #[test]
    fn deep_squash_bookkeeping_tracks_the_actual_shape_scale() {
        // Squashed to 2% inside a 0.1-wide gap: the obstructed reinflate may
        // only creep, and the stored factor must stay equal to the shape's
        // true scale relative to nominal. If the factor ran ahead of the
        // shape, the growth target would shrink and the ECB could never
        // regrow once the gap opens.
        let nominal = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let squashed = nominal.squash_toward_focus(None, 0.02);
        let datum = SquashDatum {
            location: None,
            factor: 0.02,
        };
        let walls = [
            wall(0.05, SurfaceType::RightWall, 0),
            wall(-0.05, SurfaceType::LeftWall, 0),
        ];

        let (_, pinched, crept) = reinflate(
            &squashed,
            squashed.bottom(),
            &walls,
            &datum,
            &CollisionSettings::default(),
        );
        assert!(pinched.factor < 0.05);
        assert_relative_eq!(pinched.factor, crept.half_width() / 2.0, epsilon = 1.0e-4);
        assert!(crept.right().x <= 0.05);
        assert!(crept.left().x >= -0.05);

        // The gap opens: one unobstructed pass restores nominal size.
        let (_, restored_datum, restored) = reinflate(
            &crept,
            crept.bottom(),
            &[],
            &pinched,
            &CollisionSettings::default(),
        );
        assert_eq!(restored_datum.factor, 1.0);
        assert_relative_eq!(restored.half_width(), 2.0, epsilon = 1.0e-3);
    }

    #[test]
    fn full_size_state_passes_through_reinflate_unchanged() {
        let e = diamond(Vec2::zeros(), 1.0, 1.0);
        let datum = SquashDatum::default();
        let (pos, new_datum, out) = reinflate(
            &e,
            Vec2::new(7.0, 7.0),
            &[],
            &datum,
            &CollisionSettings::default(),
        );
        assert_eq!(out, e);
        assert_eq!(new_datum, SquashDatum::default());
        assert_eq!(pos, Vec2::new(7.0, 7.0));
    }
}
