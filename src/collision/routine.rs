/*!
Frame orchestrator: the single entry point the simulation loop calls once
per player per tick.

Given the committed previous pose (ECB1), the candidate pose for this frame
(ECBp), the candidate position and the persisted squash state, it assembles
the labelled surface set, runs the sweep-and-slide resolution, keeps the
caller's position in lock-step with the resolved ECB's bottom vertex, and
applies the squash/reinflate pass. The engine is stateless between calls
except for the squash datum the caller threads through.
*/

use crate::collision::settings::CollisionSettings;
use crate::collision::slide::resolve_slide;
use crate::collision::squash::{compute_squash_factor, reinflate};
use crate::collision::types::{CollisionResult, SquashDatum, SweepHit};
use crate::ecb::Ecb;
use crate::geometry::Vec2;
use crate::stage::{HorizontalFilter, Stage, SurfaceType, assemble_surfaces};

/// Resolve one player's motion for one simulation tick.
///
/// - `ecb1`/`ecbp`: previous and candidate poses for this frame.
/// - `position`: the candidate position matching `ecbp`; the returned
///   position is moved by the same delta the resolved ECB's bottom vertex
///   moved relative to `ecbp`.
/// - `squash`: squash state persisted from last frame; the returned state
///   replaces it.
/// - `filter`: which horizontal surfaces this query considers (walls are
///   always included).
/// - `ignored`: `(type, index)` pairs to exclude from the query, e.g. a
///   platform being dropped through.
pub fn run_collision_routine(
    ecb1: &Ecb,
    ecbp: &Ecb,
    position: Vec2,
    squash: &SquashDatum,
    filter: HorizontalFilter,
    ignored: &[(SurfaceType, usize)],
    stage: &Stage,
    settings: &CollisionSettings,
) -> CollisionResult {
    let surfaces = assemble_surfaces(stage, filter, ignored);
    let slide = resolve_slide(ecb1, ecbp, &surfaces, settings);

    let mut ecb = slide.ecb;
    let mut position = position + (ecb.bottom() - ecbp.bottom());
    let label = slide.touch.as_ref().map(SweepHit::label);

    // Squash focus: the angular parameter of whatever was touched last.
    let focus = match slide.touch {
        Some(SweepHit::Corner { angular, .. }) => Some(angular),
        Some(SweepHit::Surface { vertex, .. }) => Some(vertex as f32),
        None => None,
    };

    // This frame's squash requirement is measured against walls only;
    // horizontal surfaces must never pinch the shape.
    let walls = assemble_surfaces(stage, HorizontalFilter::WallsOnly, ignored);
    let frame_squash = compute_squash_factor(&ecb, focus, &walls, settings);
    if frame_squash.factor < 1.0 {
        let squashed = ecb.squash_toward_focus(frame_squash.location, frame_squash.factor);
        position += squashed.bottom() - ecb.bottom();
        ecb = squashed;
    }

    // Cumulative across frames: the caller's incoming factor times this
    // frame's requirement.
    let mut combined = SquashDatum {
        location: frame_squash.location.or(squash.location),
        factor: (frame_squash.factor * squash.factor).clamp(0.0, 1.0),
    };

    if combined.factor < 1.0 {
        // Platforms must not block reinflation.
        let no_platforms = assemble_surfaces(stage, HorizontalFilter::IgnorePlatforms, ignored);
        let (p, datum, grown) = reinflate(&ecb, position, &no_platforms, &combined, settings);
        position = p;
        combined = datum;
        ecb = grown;
    }

    CollisionResult {
        position,
        label,
        squash: combined,
        ecb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::settings::ADDITIONAL_OFFSET;
    use crate::collision::types::CollisionLabel;
    use crate::stage::Surface;
    use approx::assert_relative_eq;

    fn diamond(bottom: Vec2, half_w: f32, half_h: f32) -> Ecb {
        Ecb::new(
            bottom,
            bottom + Vec2::new(half_w, half_h),
            bottom + Vec2::new(0.0, 2.0 * half_h),
            bottom + Vec2::new(-half_w, half_h),
        )
    }

    fn one_wall_stage() -> Stage {
        Stage {
            right_walls: vec![Surface::new(Vec2::new(3.0, -10.0), Vec2::new(3.0, 10.0))],
            ..Default::default()
        }
    }

    #[test]
    fn unobstructed_motion_passes_the_candidate_through() {
        let stage = Stage::default();
        let e1 = diamond(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let ep = e1.translate(Vec2::new(2.0, -1.0));
        let pos = Vec2::new(2.0, -1.0);

        let out = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum::default(),
            HorizontalFilter::All,
            &[],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(out.label, None);
        assert_eq!(out.ecb, ep);
        assert_eq!(out.position, pos);
        assert_eq!(out.squash, SquashDatum::default());
    }

    #[test]
    fn wall_collision_reports_label_and_moves_position_in_lock_step() {
        // Half-width 2 diamond moving +5 in x into a wall
        // at x = 3. The right vertex must stop at the wall minus the offset;
        // the position moves by the same delta as the resolved bottom
        // vertex.
        let stage = one_wall_stage();
        let e1 = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let ep = e1.translate(Vec2::new(5.0, 0.0));
        let pos = Vec2::new(5.0, -2.0);

        let out = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum::default(),
            HorizontalFilter::All,
            &[],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(
            out.label,
            Some(CollisionLabel::Surface(SurfaceType::RightWall, 0))
        );
        assert_relative_eq!(out.ecb.right().x, 3.0 - ADDITIONAL_OFFSET, epsilon = 1.0e-4);
        // Bottom vertex moved from x=5 back to x=1 (minus offset); the
        // position follows.
        assert_relative_eq!(out.position.x, 1.0, epsilon = 1.0e-3);
        assert_relative_eq!(out.position.y, -2.0);
    }

    #[test]
    fn ground_landing_scenario_matches_the_expected_numbers() {
        let stage = Stage {
            grounds: vec![Surface::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0))],
            ..Default::default()
        };
        let e1 = diamond(Vec2::new(0.0, 5.0), 1.0, 1.0);
        let ep = diamond(Vec2::new(0.0, -5.0), 1.0, 1.0);
        let pos = Vec2::new(0.0, -5.0);

        let out = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum::default(),
            HorizontalFilter::All,
            &[],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(out.label, Some(CollisionLabel::Surface(SurfaceType::Ground, 0)));
        assert_relative_eq!(out.ecb.bottom().y, ADDITIONAL_OFFSET, epsilon = 1.0e-6);
        assert_relative_eq!(out.position.y, ADDITIONAL_OFFSET, epsilon = 1.0e-6);
    }

    #[test]
    fn orchestrator_is_idempotent_for_identical_inputs() {
        let stage = one_wall_stage();
        let e1 = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let ep = e1.translate(Vec2::new(5.0, 1.0));
        let pos = Vec2::new(5.0, -1.0);

        let run = || {
            run_collision_routine(
                &e1,
                &ep,
                pos,
                &SquashDatum::default(),
                HorizontalFilter::All,
                &[],
                &stage,
                &CollisionSettings::default(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn ignored_surfaces_are_transparent() {
        let stage = one_wall_stage();
        let e1 = diamond(Vec2::new(0.0, -2.0), 2.0, 2.0);
        let ep = e1.translate(Vec2::new(5.0, 0.0));
        let pos = Vec2::new(5.0, -2.0);

        let out = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum::default(),
            HorizontalFilter::All,
            &[(SurfaceType::RightWall, 0)],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(out.label, None);
        assert_eq!(out.ecb, ep);
    }

    #[test]
    fn platform_filter_allows_dropping_through() {
        let stage = Stage {
            platforms: vec![Surface::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0))],
            ..Default::default()
        };
        let e1 = diamond(Vec2::new(0.0, 5.0), 1.0, 1.0);
        let ep = diamond(Vec2::new(0.0, -5.0), 1.0, 1.0);
        let pos = Vec2::new(0.0, -5.0);

        let landed = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum::default(),
            HorizontalFilter::All,
            &[],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(
            landed.label,
            Some(CollisionLabel::Surface(SurfaceType::Platform, 0))
        );

        let dropped = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum::default(),
            HorizontalFilter::IgnorePlatforms,
            &[],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(dropped.label, None);
        assert_eq!(dropped.ecb, ep);
    }

    #[test]
    fn incoming_squash_state_reinflates_in_open_space() {
        // Previously squashed to 0.6 but the stage is empty now: the shape
        // grows back to nominal and the state resets.
        let stage = Stage::default();
        let nominal = diamond(Vec2::new(0.0, 0.0), 2.0, 2.0);
        let squashed = nominal.squash_toward_focus(None, 0.6);
        let e1 = squashed;
        let ep = squashed.translate(Vec2::new(1.0, 0.0));
        let pos = ep.bottom();

        let out = run_collision_routine(
            &e1,
            &ep,
            pos,
            &SquashDatum {
                location: None,
                factor: 0.6,
            },
            HorizontalFilter::All,
            &[],
            &stage,
            &CollisionSettings::default(),
        );
        assert_eq!(out.squash, SquashDatum::default());
        // Back to nominal proportions.
        assert_relative_eq!(out.ecb.half_width(), 2.0, epsilon = 1.0e-4);
        assert_relative_eq!(out.position.x, out.ecb.bottom().x, epsilon = 1.0e-5);
        assert_relative_eq!(out.position.y, out.ecb.bottom().y, epsilon = 1.0e-5);
    }
}
