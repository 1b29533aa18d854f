pub mod collision;
pub mod ecb;
pub mod geometry;
pub mod stage;

pub use collision::{
    CollisionLabel, CollisionResult, CollisionSettings, SquashDatum, SweepHit,
    run_collision_routine,
};
pub use ecb::Ecb;
pub use geometry::Vec2;
pub use stage::{
    HorizontalFilter, LabelledSurface, Side, Stage, Surface, SurfaceType, assemble_surfaces,
};
