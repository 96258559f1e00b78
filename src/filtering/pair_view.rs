use super::{FilterObject, FilterObjectAttributes, FilterObjectType, PairId};
use crate::{
    error::ResolveError,
    scene::{Actor, ActorKey, Scene, Shape, ShapeKey},
};

/// Both sides of a candidate pair, resolved against the scene.
#[derive(Clone, Copy)]
pub struct ShapePair<'a> {
    pub scene: &'a Scene,
    pub keys: [ShapeKey; 2],
    pub shapes: [&'a Shape; 2],
    pub actors: [&'a Actor; 2],
}

impl<'a> ShapePair<'a> {
    pub fn new(scene: &'a Scene, shape0: ShapeKey, shape1: ShapeKey) -> Option<Self> {
        let shapes = [scene.shape(shape0)?, scene.shape(shape1)?];
        let actors = [scene.actor(shapes[0].actor())?, scene.actor(shapes[1].actor())?];

        Some(Self {
            scene,
            keys: [shape0, shape1],
            shapes,
            actors,
        })
    }

    /// Like [`Self::new`] but reports why the pair is unusable.
    pub fn resolve(
        scene: &'a Scene,
        shape0: ShapeKey,
        shape1: ShapeKey,
    ) -> Result<Self, ResolveError> {
        let pair = Self::new(scene, shape0, shape1).ok_or(ResolveError::StaleShape)?;

        if pair.actor_keys()[0] == pair.actor_keys()[1] {
            return Err(ResolveError::SameActor(
                pair.shapes[0].element_id(),
                pair.shapes[1].element_id(),
            ));
        }

        Ok(pair)
    }

    #[must_use]
    pub fn pair_id(&self) -> PairId {
        PairId::new(self.shapes[0].element_id(), self.shapes[1].element_id())
    }

    #[must_use]
    pub fn actor_keys(&self) -> [ActorKey; 2] {
        [self.shapes[0].actor(), self.shapes[1].actor()]
    }

    #[must_use]
    pub fn is_trigger_pair(&self) -> bool {
        self.shapes[0].is_trigger() || self.shapes[1].is_trigger()
    }

    /// What the callback gets to see of side `i`.
    #[must_use]
    pub fn filter_object(&self, i: usize, attributes: FilterObjectAttributes) -> FilterObject {
        let shape = (attributes.object_type() != FilterObjectType::ParticleSystem)
            .then_some(self.keys[i]);

        FilterObject {
            attributes,
            data: *self.shapes[i].filter_data(),
            actor: self.shapes[i].actor(),
            shape,
        }
    }
}
