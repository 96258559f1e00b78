mod actor;
mod articulation;
mod constraint;
mod element;
mod shape;
mod world;

pub use actor::*;
pub use articulation::*;
pub use constraint::*;
pub use element::ElementHandle;
pub use shape::*;
pub use world::*;

slotmap::new_key_type! {
    pub struct ActorKey;
    pub struct ShapeKey;
    pub struct ArticulationKey;
    pub struct ConstraintKey;
}

/// Order-independent key for an actor pair.
#[must_use]
pub fn sorted_actor_pair(actor0: ActorKey, actor1: ActorKey) -> (ActorKey, ActorKey) {
    if actor1 < actor0 {
        (actor1, actor0)
    } else {
        (actor0, actor1)
    }
}
