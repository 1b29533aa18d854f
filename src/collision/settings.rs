/*!
Collision engine tunables and tolerances.

These constants centralize the parameters used by the sweep tests, the slide
resolver and the squash subsystem. Keeping them together makes tuning easier
and helps ensure deterministic behavior across platforms.

Notes
- Distances are in world units; sweep fractions are dimensionless.
- Favor practical world-space tolerances over machine epsilon for robust
  behavior.
- Per-character customization goes through [`CollisionSettings`]; the
  constants are its defaults.
*/

/// Outward separation applied when placing the ECB flush against a surface
/// or corner. Prevents the next query from re-detecting the contact it just
/// resolved. Too large creates visible gaps; too small risks re-collision.
pub const ADDITIONAL_OFFSET: f32 = 1.0e-5;

/// Base number of slide iterations before the per-surface allowance kicks
/// in. The full cap is `base + per_surface * surface_count`.
pub const BASE_SLIDE_ITERATIONS: u32 = 4;

/// Extra slide iterations granted per candidate surface.
pub const SLIDE_ITERATIONS_PER_SURFACE: u32 = 2;

/// Hard floor for the squash factor itself; keeps a computed factor from
/// collapsing the shape to numerically unusable size.
pub const SQUASH_FACTOR_FLOOR: f32 = 1.0e-3;

/// Default smallest full width the squashed ECB may reach. The matching
/// factor floor is `smallest_ecb_width / width`. Game data overrides this
/// per character via [`CollisionSettings`].
pub const DEFAULT_SMALLEST_ECB_WIDTH: f32 = 0.05;

/// Safety margin subtracted from the reinflation sweep so the regrown shape
/// does not end exactly touching the obstacle that limited it.
pub const REINFLATE_MARGIN: f32 = 1.0e-3;

/// Caller-tunable knobs for one character/entity. `Default` pulls from the
/// module constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSettings {
    /// Smallest full width the squashed ECB may reach.
    pub smallest_ecb_width: f32,
    /// Override for the slide-iteration cap. `None` derives the cap from
    /// the surface count.
    pub max_slide_iterations: Option<u32>,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            smallest_ecb_width: DEFAULT_SMALLEST_ECB_WIDTH,
            max_slide_iterations: None,
        }
    }
}

impl CollisionSettings {
    /// Iteration budget for one slide resolution over `surface_count`
    /// candidate surfaces.
    #[inline]
    pub fn slide_iteration_cap(&self, surface_count: usize) -> u32 {
        self.max_slide_iterations.unwrap_or(
            BASE_SLIDE_ITERATIONS + SLIDE_ITERATIONS_PER_SURFACE * surface_count as u32,
        )
    }
}
