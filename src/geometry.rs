/*!
2D geometry kernel.

Small, allocation-free primitives used by the sweep tests:
- line/line intersection in parameter form
- a direction-aware quadratic solver for the projective edge sweep
- signed angle of a segment (used to classify slanted walls)

All functions are pure. "No solution" is always an `Option::None` or a
non-finite value the caller screens out; nothing here panics in release
builds.
*/

use nalgebra as na;

/// Common math alias for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;

/// A line through two points. Used both for infinite lines (intersection
/// queries) and finite segments (extent checks); which one is meant is up to
/// the caller.
pub type Line = (Vec2, Vec2);

/// Magnitudes below this are treated as zero when testing for degeneracy
/// (parallel lines, vanishing quadratic coefficients, zero-length edges).
pub const DEGENERACY_EPS: f32 = 1.0e-9;

/// 2D cross product (z component of the 3D cross).
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp(&b)
}

/// Parameter `t` such that `line2.0 + t * (line2.1 - line2.0)` lies on
/// `line1`.
///
/// Parallel input is a caller contract violation: the result would be
/// NaN/infinite. Callers establish non-parallelism beforehand (e.g. via a
/// half-plane crossing test).
#[inline]
pub fn intersection_parameter(line1: Line, line2: Line) -> f32 {
    let d1 = line1.1 - line1.0;
    let d2 = line2.1 - line2.0;
    let denom = cross(d2, d1);
    // The cross product scales with both operand lengths, so the parallelism
    // threshold must too; a fixed epsilon would reject genuine crossings at
    // small world scales.
    debug_assert!(
        denom.abs() > DEGENERACY_EPS * d1.norm() * d2.norm(),
        "intersection_parameter called on (near-)parallel lines"
    );
    cross(line1.0 - line2.0, d1) / denom
}

/// Point form of [`intersection_parameter`]: the intersection of the two
/// lines, expressed on `line2`.
#[inline]
pub fn intersection_point(line1: Line, line2: Line) -> Vec2 {
    let t = intersection_parameter(line1, line2);
    line2.0 + (line2.1 - line2.0) * t
}

/// Signed angle of the segment's direction, in radians (`atan2` convention,
/// range `(-pi, pi]`).
#[inline]
pub fn line_angle(line: Line) -> f32 {
    let d = line.1 - line.0;
    d.y.atan2(d.x)
}

/// Solve `a0 + a1*s + a2*s^2 = 0`, selecting the root at which the
/// polynomial crosses zero in the direction given by `sign`: `+1.0` picks
/// the rising crossing (derivative `> 0`), `-1.0` the falling one.
///
/// When `a2` vanishes the equation degenerates to a linear one and is solved
/// with the same direction gate. Returns `None` when there is no real root,
/// no crossing in the requested direction, or the result is non-finite.
pub fn solve_quadratic(a0: f32, a1: f32, a2: f32, sign: f32) -> Option<f32> {
    debug_assert!(sign == 1.0 || sign == -1.0, "sign must be +1 or -1");

    if a2.abs() <= DEGENERACY_EPS {
        // Linear: the derivative everywhere is a1, so the crossing direction
        // is fixed by its sign.
        if a1 * sign <= 0.0 {
            return None;
        }
        let s = -a0 / a1;
        return s.is_finite().then_some(s);
    }

    let disc = a1 * a1 - 4.0 * a0 * a2;
    if disc < 0.0 {
        return None;
    }
    // At a root, the derivative equals +/- sqrt(disc); the requested
    // crossing direction therefore selects the root directly.
    let s = (-a1 + sign * disc.sqrt()) / (2.0 * a2);
    s.is_finite().then_some(s)
}
