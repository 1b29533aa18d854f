/*!
The ECB (Environment Collision Box): a four-point diamond representing a
character's collidable extent against stage geometry.

Vertices are stored in the fixed order bottom, right, top, left, which walks
the perimeter counter-clockwise. Any point on the perimeter can be addressed
continuously by an *angular parameter* in `[0, 4)`: the integer part selects
a vertex, the fractional part interpolates along the edge toward the next
vertex.
*/

use crate::geometry::Vec2;

pub const BOTTOM: usize = 0;
pub const RIGHT: usize = 1;
pub const TOP: usize = 2;
pub const LEFT: usize = 3;

/// Vertex index following `i` on the counter-clockwise perimeter walk.
#[inline]
pub fn next_vertex(i: usize) -> usize {
    (i + 1) % 4
}

/// Vertex index preceding `i` on the counter-clockwise perimeter walk.
#[inline]
pub fn prev_vertex(i: usize) -> usize {
    (i + 3) % 4
}

/// Angular parameter of a point on the edge traversed from `same` to
/// `other`, at fraction `t` of the traversal. The two vertices must be
/// perimeter neighbors; the 3↔0 wrap-around pair maps into `[3, 4)`.
#[inline]
pub fn edge_angular(same: usize, other: usize, t: f32) -> f32 {
    debug_assert!(other == next_vertex(same) || other == prev_vertex(same));
    let raw = if other == next_vertex(same) {
        same as f32 + t
    } else {
        // Traversal runs against the perimeter order; measure from `other`.
        other as f32 + (1.0 - t)
    };
    raw.rem_euclid(4.0)
}

/// The four-point diamond. `points` is ordered bottom, right, top, left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ecb {
    pub points: [Vec2; 4],
}

impl Ecb {
    #[inline]
    pub fn new(bottom: Vec2, right: Vec2, top: Vec2, left: Vec2) -> Self {
        Self {
            points: [bottom, right, top, left],
        }
    }

    #[inline]
    pub fn bottom(&self) -> Vec2 {
        self.points[BOTTOM]
    }

    #[inline]
    pub fn right(&self) -> Vec2 {
        self.points[RIGHT]
    }

    #[inline]
    pub fn top(&self) -> Vec2 {
        self.points[TOP]
    }

    #[inline]
    pub fn left(&self) -> Vec2 {
        self.points[LEFT]
    }

    /// Half the horizontal extent, measured between the side vertices.
    #[inline]
    pub fn half_width(&self) -> f32 {
        (self.right().x - self.left().x) * 0.5
    }

    /// Add `v` to every vertex.
    #[inline]
    pub fn translate(&self, v: Vec2) -> Ecb {
        Ecb {
            points: self.points.map(|p| p + v),
        }
    }

    /// Per-vertex linear interpolation between two poses, `t` in `[0, 1]`.
    #[inline]
    pub fn interpolate(a: &Ecb, b: &Ecb, t: f32) -> Ecb {
        Ecb {
            points: [
                a.points[0].lerp(&b.points[0], t),
                a.points[1].lerp(&b.points[1], t),
                a.points[2].lerp(&b.points[2], t),
                a.points[3].lerp(&b.points[3], t),
            ],
        }
    }

    /// The focus point addressed by an angular parameter, or the vertical
    /// midpoint of bottom and top when no parameter is given.
    pub fn focus_point(&self, angular: Option<f32>) -> Vec2 {
        match angular {
            None => (self.bottom() + self.top()) * 0.5,
            Some(a) => {
                debug_assert!((0.0..4.0).contains(&a), "angular parameter out of [0,4)");
                let i = (a.floor() as usize).min(3);
                let frac = a - i as f32;
                self.points[i].lerp(&self.points[next_vertex(i)], frac)
            }
        }
    }

    /// Scale every vertex toward the focus point. `factor` of 1 leaves the
    /// shape unchanged; as it approaches 0 the diamond degenerates to the
    /// focus point. Vertex ordering is preserved for any positive factor.
    pub fn squash_toward_focus(&self, angular: Option<f32>, factor: f32) -> Ecb {
        let focus = self.focus_point(angular);
        Ecb {
            points: self.points.map(|p| focus + (p - focus) * factor),
        }
    }
}
