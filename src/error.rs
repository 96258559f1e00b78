use crate::scene::{ActorKey, ArticulationKey, ShapeKey};
use thiserror::Error;

/// Why a broad-phase element handle could not be turned into a shape pair.
///
/// These only happen when the broad phase hands over stale data, never through user input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    #[error("found null elements")]
    NullElement,
    #[error("element {0} does not belong to any shape")]
    UnknownElement(u32),
    #[error("element {0} has an invalid shape core")]
    InvalidShapeCore(u32),
    #[error("shape or its actor was removed")]
    StaleShape,
    #[error("elements {0} and {1} belong to the same actor")]
    SameActor(u32, u32),
}

/// Misuse of the scene building API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("actor {0:?} does not exist")]
    UnknownActor(ActorKey),
    #[error("shape {0:?} does not exist")]
    UnknownShape(ShapeKey),
    #[error("articulation {0:?} does not exist")]
    UnknownArticulation(ArticulationKey),
    #[error("articulation {articulation:?} has no link {link}")]
    UnknownLink {
        articulation: ArticulationKey,
        link: u32,
    },
    #[error("actor {0:?} is an articulation link and goes with its articulation")]
    LinkActor(ActorKey),
    #[error("a joint needs two different actors, got {0:?} twice")]
    SelfConstraint(ActorKey),
}
