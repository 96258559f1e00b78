pub mod config;
pub mod consts;
pub mod error;
mod filter_core;
pub mod filtering;
pub mod interaction;
pub mod logging;
pub mod scene;

pub use config::{FilterConfig, PairFilteringMode};
pub use error::{ResolveError, SceneError};
pub use filter_core::FilteringCore;
pub use filtering::{
    DefaultFilterShader, FilterCallback, FilterData, FilterFlags, FilterInfo, FilterObject,
    FilterObjectAttributes, FilterObjectFlags, FilterObjectType, FilterShader, OverlapFilterCounts,
    OverlapPair, PairFlags, PairId, StatusChange,
};
pub use interaction::{Interaction, InteractionKind, InteractionType};
pub use scene::{ActorKey, ElementHandle, Scene, ShapeKey};
