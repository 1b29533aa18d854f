/*!
Continuous collision detection and resolution for the diamond ECB.

Layered bottom-up: `point_sweep` and `edge_sweep` answer the two primitive
swept-geometry questions, `narrow_phase` combines them per surface and
searches for the earliest event, `slide` turns that event into the
sweep-and-slide state machine, `squash` handles gap-fitting, and `routine`
is the per-frame orchestrator the simulation calls.
*/

pub mod edge_sweep;
pub mod narrow_phase;
pub mod point_sweep;
pub mod routine;
pub mod settings;
pub mod slide;
pub mod squash;
pub mod types;

pub use routine::run_collision_routine;
pub use settings::CollisionSettings;
pub use types::{CollisionLabel, CollisionResult, SquashDatum, SweepHit};
