/*!
Result types exchanged between the collision submodules.

This module intentionally contains no algorithms. It defines the data types
flowing between the sweep tests, the per-surface resolver, the slide
resolver, the squash subsystem and the frame orchestrator.
*/

use crate::ecb::Ecb;
use crate::geometry::Vec2;
use crate::stage::{Surface, SurfaceType};

/// Outcome of sweeping the ECB against one piece of geometry: either one of
/// its vertices crossed a surface, or one of its edges swept across a
/// surface endpoint (a corner). The two payloads are distinct on purpose;
/// no optional fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SweepHit {
    Surface {
        /// Fraction of the frame's motion at which the crossing occurs.
        sweep: f32,
        surface: Surface,
        ty: SurfaceType,
        index: usize,
        /// The ECB vertex that crossed.
        vertex: usize,
    },
    Corner {
        /// Fraction of the frame's motion at which the crossing occurs.
        sweep: f32,
        /// The surface endpoint the edge swept across.
        point: Vec2,
        /// Angular parameter of the crossing point on the ECB perimeter.
        angular: f32,
    },
}

impl SweepHit {
    #[inline]
    pub fn sweep(&self) -> f32 {
        match *self {
            SweepHit::Surface { sweep, .. } | SweepHit::Corner { sweep, .. } => sweep,
        }
    }

    /// The caller-facing label for this hit.
    #[inline]
    pub fn label(&self) -> CollisionLabel {
        match *self {
            SweepHit::Surface { ty, index, .. } => CollisionLabel::Surface(ty, index),
            SweepHit::Corner { .. } => CollisionLabel::Corner,
        }
    }
}

/// What the frame's motion ended up touching, reported to the caller for
/// game-side reactions (landing states, wall-jump timers, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionLabel {
    Surface(SurfaceType, usize),
    /// Sentinel for a slide that ended against a surface endpoint.
    Corner,
}

/// Persistent squash state threaded through the orchestrator by the caller.
///
/// `factor` of 1 means the ECB is at nominal size; `location` is the angular
/// parameter of the focus the shape was squashed toward, kept so later
/// reinflation grows back out from the same focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquashDatum {
    pub location: Option<f32>,
    pub factor: f32,
}

impl Default for SquashDatum {
    fn default() -> Self {
        Self {
            location: None,
            factor: 1.0,
        }
    }
}

/// Everything the frame orchestrator returns for one player tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResult {
    /// The caller's position, moved in lock-step with the resolved ECB.
    pub position: Vec2,
    /// Final geometry touched, or `None` for unobstructed motion.
    pub label: Option<CollisionLabel>,
    /// Squash state to persist for next frame.
    pub squash: SquashDatum,
    /// The resolved ECB, the baseline for next frame.
    pub ecb: Ecb,
}
