mod shape_interaction;
mod state_machine;
mod table;
mod trigger_interaction;

pub use shape_interaction::{ShapeInteraction, ShapeInteractionFlags};
pub use state_machine::next_type;
pub use table::{ActorPairReport, InteractionTable};
pub use trigger_interaction::TriggerInteraction;

use crate::{
    filtering::PairId,
    scene::{ActorKey, ShapeKey},
};

/// What a filtering decision turns a pair into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionType {
    /// Not tracked at all.
    None,
    /// Tracked so the pair is not reported again, nothing else.
    Marker,
    Trigger,
    Overlap,
}

#[derive(Clone, Debug)]
pub enum InteractionKind {
    Marker,
    Trigger(TriggerInteraction),
    Overlap(ShapeInteraction),
}

impl InteractionKind {
    #[must_use]
    pub const fn interaction_type(&self) -> InteractionType {
        match self {
            Self::Marker => InteractionType::Marker,
            Self::Trigger(_) => InteractionType::Trigger,
            Self::Overlap(_) => InteractionType::Overlap,
        }
    }
}

/// The live tracked object of one shape pair.
#[derive(Clone, Debug)]
pub struct Interaction {
    pair_id: PairId,
    shapes: [ShapeKey; 2],
    actors: [ActorKey; 2],
    /// Registered with the filter callback.
    pub(crate) is_filter_pair: bool,
    pub(crate) is_active: bool,
    pub(crate) kind: InteractionKind,
}

impl Interaction {
    pub(crate) const fn new(
        pair_id: PairId,
        shapes: [ShapeKey; 2],
        actors: [ActorKey; 2],
        kind: InteractionKind,
    ) -> Self {
        Self {
            pair_id,
            shapes,
            actors,
            is_filter_pair: false,
            is_active: !matches!(kind, InteractionKind::Marker),
            kind,
        }
    }

    #[must_use]
    pub const fn pair_id(&self) -> PairId {
        self.pair_id
    }

    #[must_use]
    pub const fn shapes(&self) -> [ShapeKey; 2] {
        self.shapes
    }

    #[must_use]
    pub const fn actors(&self) -> [ActorKey; 2] {
        self.actors
    }

    #[must_use]
    pub const fn interaction_type(&self) -> InteractionType {
        self.kind.interaction_type()
    }

    #[must_use]
    pub const fn kind(&self) -> &InteractionKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_filter_pair(&self) -> bool {
        self.is_filter_pair
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn involves_shape(&self, shape: ShapeKey) -> bool {
        self.shapes.contains(&shape)
    }

    #[must_use]
    pub const fn as_overlap(&self) -> Option<&ShapeInteraction> {
        match &self.kind {
            InteractionKind::Overlap(si) => Some(si),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_trigger(&self) -> Option<&TriggerInteraction> {
        match &self.kind {
            InteractionKind::Trigger(ti) => Some(ti),
            _ => None,
        }
    }

    pub(crate) const fn as_overlap_mut(&mut self) -> Option<&mut ShapeInteraction> {
        match &mut self.kind {
            InteractionKind::Overlap(si) => Some(si),
            _ => None,
        }
    }
}
