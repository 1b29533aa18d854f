/*!
Stage geometry: directed line-segment surfaces, grouped by type, plus the
labelled-surface sets the collision queries run against.

Conventions per surface type:
- Ground and Platform are walked on from above; the ECB's bottom vertex is
  the relevant one and the outward side is +y. Platforms are one-directional
  (passable from below).
- Ceiling blocks upward motion; top vertex, outward -y.
- RightWall blocks rightward motion (approached from the left); right
  vertex, outward -x. LeftWall is the mirror image.
*/

use crate::ecb::{BOTTOM, LEFT, RIGHT, TOP};
use crate::geometry::{DEGENERACY_EPS, Line, Vec2};

/// Closed set of surface types. Every use site matches exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Ground,
    Platform,
    Ceiling,
    LeftWall,
    RightWall,
}

impl SurfaceType {
    /// The ECB vertex nominally closest to surfaces of this type.
    #[inline]
    pub fn relevant_vertex(self) -> usize {
        match self {
            SurfaceType::Ground | SurfaceType::Platform => BOTTOM,
            SurfaceType::Ceiling => TOP,
            SurfaceType::LeftWall => LEFT,
            SurfaceType::RightWall => RIGHT,
        }
    }

    /// True for surfaces the character can land (come to rest) on.
    #[inline]
    pub fn is_landing(self) -> bool {
        matches!(self, SurfaceType::Ground | SurfaceType::Platform)
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, SurfaceType::LeftWall | SurfaceType::RightWall)
    }

    /// Canonical outward direction: the side of the surface the ECB
    /// approaches from.
    #[inline]
    pub fn outward_axis(self) -> Vec2 {
        match self {
            SurfaceType::Ground | SurfaceType::Platform => Vec2::new(0.0, 1.0),
            SurfaceType::Ceiling => Vec2::new(0.0, -1.0),
            SurfaceType::LeftWall => Vec2::new(1.0, 0.0),
            SurfaceType::RightWall => Vec2::new(-1.0, 0.0),
        }
    }
}

/// A directed line-segment surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Surface {
    #[inline]
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn line(&self) -> Line {
        (self.p1, self.p2)
    }

    /// Endpoints ordered by x (used for ground/ceiling extent checks).
    #[inline]
    pub fn endpoints_by_x(&self) -> (Vec2, Vec2) {
        if self.p1.x <= self.p2.x {
            (self.p1, self.p2)
        } else {
            (self.p2, self.p1)
        }
    }

    /// Endpoints ordered by y (used for wall extent checks).
    #[inline]
    pub fn endpoints_by_y(&self) -> (Vec2, Vec2) {
        if self.p1.y <= self.p2.y {
            (self.p1, self.p2)
        } else {
            (self.p2, self.p1)
        }
    }

    /// Unit normal oriented along the type's outward axis, or `None` for a
    /// zero-length segment.
    pub fn outward_normal(&self, ty: SurfaceType) -> Option<Vec2> {
        let d = self.p2 - self.p1;
        let len = d.norm();
        if len <= DEGENERACY_EPS {
            return None;
        }
        let mut n = Vec2::new(-d.y, d.x) / len;
        if n.dot(&ty.outward_axis()) < 0.0 {
            n = -n;
        }
        Some(n)
    }
}

/// A surface bundled with its type and its index in the stage's per-type
/// list; the unit the collision queries operate on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelledSurface {
    pub surface: Surface,
    pub ty: SurfaceType,
    pub index: usize,
}

/// Which end of a ground/platform an adjacency entry refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Per-stage surface lists plus optional edge adjacency between grounds and
/// platforms. The adjacency is consumed by external ledge-walking logic, not
/// by the sweep core.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    pub grounds: Vec<Surface>,
    pub platforms: Vec<Surface>,
    pub ceilings: Vec<Surface>,
    pub left_walls: Vec<Surface>,
    pub right_walls: Vec<Surface>,
    /// `(type, index, side) -> (type, index)` for neighboring
    /// grounds/platforms. Only Ground/Platform entries are meaningful.
    pub connections: Vec<((SurfaceType, usize, Side), (SurfaceType, usize))>,
}

impl Stage {
    /// Neighboring ground/platform across the given side, if the stage
    /// declares one.
    pub fn neighbor(
        &self,
        ty: SurfaceType,
        index: usize,
        side: Side,
    ) -> Option<(SurfaceType, usize)> {
        self.connections
            .iter()
            .find(|(key, _)| *key == (ty, index, side))
            .map(|(_, dst)| *dst)
    }
}

/// Which horizontal surfaces a query considers. Walls are always included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalFilter {
    /// Grounds, platforms, ceilings and walls.
    All,
    /// Everything except platforms (e.g. while dropping through one).
    IgnorePlatforms,
    /// Walls only; used by the squash/inflate passes and corner checks,
    /// where horizontal surfaces must never block.
    WallsOnly,
}

/// Assemble the labelled-surface set for a query: apply the horizontal
/// filter, then drop any `(type, index)` pair on the caller's ignore list
/// (linear containment; the lists are small).
pub fn assemble_surfaces(
    stage: &Stage,
    filter: HorizontalFilter,
    ignored: &[(SurfaceType, usize)],
) -> Vec<LabelledSurface> {
    let mut out = Vec::new();

    let mut push_all = |list: &[Surface], ty: SurfaceType| {
        for (index, surface) in list.iter().enumerate() {
            if ignored.contains(&(ty, index)) {
                continue;
            }
            out.push(LabelledSurface {
                surface: *surface,
                ty,
                index,
            });
        }
    };

    if filter != HorizontalFilter::WallsOnly {
        push_all(&stage.grounds, SurfaceType::Ground);
        push_all(&stage.ceilings, SurfaceType::Ceiling);
        if filter == HorizontalFilter::All {
            push_all(&stage.platforms, SurfaceType::Platform);
        }
    }
    push_all(&stage.left_walls, SurfaceType::LeftWall);
    push_all(&stage.right_walls, SurfaceType::RightWall);

    out
}
