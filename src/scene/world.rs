use super::{
    Actor, ActorConstructionInfo, ActorKey, ActorKind, Articulation, ArticulationFlags,
    ArticulationKey, ArticulationLink, ArticulationLinkRef, Constraint, ConstraintFlags,
    ConstraintKey, ElementHandle, Shape, ShapeConstructionInfo, ShapeFlags, ShapeKey,
    element::ElementIdPool, sorted_actor_pair,
};
use crate::{
    error::{ResolveError, SceneError},
    filtering::FilterData,
};
use ahash::AHashMap;
use slotmap::SlotMap;

/// Owning arenas for everything the filtering pipeline reads.
///
/// Shapes refer to actors, actors to articulations, only through keys. Callers are expected to
/// notify [`FilteringCore`](crate::FilteringCore) before removing shapes or actors so that live
/// interactions get torn down first.
#[derive(Default)]
pub struct Scene {
    actors: SlotMap<ActorKey, Actor>,
    shapes: SlotMap<ShapeKey, Shape>,
    articulations: SlotMap<ArticulationKey, Articulation>,
    constraints: SlotMap<ConstraintKey, Constraint>,
    /// Every live joint of an actor pair, in insertion order.
    constraint_lookup: AHashMap<(ActorKey, ActorKey), Vec<ConstraintKey>>,
    /// Indexed by element ID.
    elements: Vec<Option<ShapeKey>>,
    element_ids: ElementIdPool,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor(&mut self, info: ActorConstructionInfo) -> ActorKey {
        self.actors.insert(Actor::new(info))
    }

    pub fn add_articulation(&mut self, flags: ArticulationFlags) -> ArticulationKey {
        self.articulations.insert(Articulation::new(flags))
    }

    /// Adds a link and the actor backing it.
    ///
    /// `parent` must be an existing link, `None` for the root.
    pub fn add_articulation_link(
        &mut self,
        articulation: ArticulationKey,
        parent: Option<u32>,
    ) -> Result<(ActorKey, u32), SceneError> {
        let art = self
            .articulations
            .get_mut(articulation)
            .ok_or(SceneError::UnknownArticulation(articulation))?;

        if let Some(parent) = parent
            && parent as usize >= art.links.len()
        {
            return Err(SceneError::UnknownLink {
                articulation,
                link: parent,
            });
        }

        let link = art.links.len() as u32;
        let fixed_base = parent.is_none() && art.flags.contains(ArticulationFlags::FIX_BASE);

        let mut actor = Actor::new(ActorConstructionInfo::new(ActorKind::ArticulationLink));
        actor.link = Some(ArticulationLinkRef { articulation, link });
        let actor = self.actors.insert(actor);

        art.links.push(ArticulationLink {
            actor,
            parent,
            fixed_base,
        });

        Ok((actor, link))
    }

    pub fn set_articulation_flags(
        &mut self,
        articulation: ArticulationKey,
        flags: ArticulationFlags,
    ) -> Result<(), SceneError> {
        let art = self
            .articulations
            .get_mut(articulation)
            .ok_or(SceneError::UnknownArticulation(articulation))?;

        art.flags = flags;
        let fixed = flags.contains(ArticulationFlags::FIX_BASE);
        for link in &mut art.links {
            link.fixed_base = fixed && link.parent.is_none();
        }

        Ok(())
    }

    pub fn add_shape(
        &mut self,
        actor: ActorKey,
        info: ShapeConstructionInfo,
    ) -> Result<ShapeKey, SceneError> {
        let owner = self
            .actors
            .get_mut(actor)
            .ok_or(SceneError::UnknownActor(actor))?;

        let element_id = self.element_ids.acquire();
        let shape = self.shapes.insert(Shape::new(actor, element_id, info));
        owner.shapes.push(shape);

        let idx = element_id as usize;
        if idx >= self.elements.len() {
            self.elements.resize(idx + 1, None);
        }
        self.elements[idx] = Some(shape);

        Ok(shape)
    }

    pub fn add_constraint(
        &mut self,
        actor0: ActorKey,
        actor1: ActorKey,
        flags: ConstraintFlags,
    ) -> Result<ConstraintKey, SceneError> {
        if actor0 == actor1 {
            return Err(SceneError::SelfConstraint(actor0));
        }

        for actor in [actor0, actor1] {
            if !self.actors.contains_key(actor) {
                return Err(SceneError::UnknownActor(actor));
            }
        }

        let actors = sorted_actor_pair(actor0, actor1);
        let key = self.constraints.insert(Constraint { actors, flags });
        self.constraint_lookup.entry(actors).or_default().push(key);

        for actor in [actor0, actor1] {
            let actor = &mut self.actors[actor];
            // Statics never carry the marker, see `Actor::has_constraints`.
            if actor.kind().has_body() {
                actor.constraint_count += 1;
            }
        }

        Ok(key)
    }

    pub fn set_constraint_flags(&mut self, constraint: ConstraintKey, flags: ConstraintFlags) {
        if let Some(c) = self.constraints.get_mut(constraint) {
            c.flags = flags;
        }
    }

    pub fn remove_constraint(&mut self, constraint: ConstraintKey) -> Option<Constraint> {
        let removed = self.constraints.remove(constraint)?;

        if let Some(keys) = self.constraint_lookup.get_mut(&removed.actors) {
            keys.retain(|k| *k != constraint);
            if keys.is_empty() {
                self.constraint_lookup.remove(&removed.actors);
            }
        }

        for actor in [removed.actors.0, removed.actors.1] {
            if let Some(actor) = self.actors.get_mut(actor)
                && actor.kind().has_body()
            {
                actor.constraint_count = actor.constraint_count.saturating_sub(1);
            }
        }

        Some(removed)
    }

    /// Removes the shape and recycles its element ID.
    pub fn remove_shape(&mut self, shape: ShapeKey) -> Option<Shape> {
        let removed = self.shapes.remove(shape)?;

        if let Some(slot) = self.elements.get_mut(removed.element_id() as usize) {
            *slot = None;
        }
        self.element_ids.release(removed.element_id());

        if let Some(actor) = self.actors.get_mut(removed.actor()) {
            actor.shapes.retain(|s| *s != shape);
        }

        Some(removed)
    }

    /// Removes the actor along with its shapes and joints.
    ///
    /// Articulation links are owned by their articulation and cannot be removed one by one.
    pub fn remove_actor(&mut self, actor: ActorKey) -> Result<Actor, SceneError> {
        let owner = self
            .actors
            .get(actor)
            .ok_or(SceneError::UnknownActor(actor))?;
        if owner.link().is_some() {
            return Err(SceneError::LinkActor(actor));
        }

        let shapes = owner.shapes.clone();
        for shape in shapes {
            self.remove_shape(shape);
        }

        let attached: Vec<_> = self
            .constraints
            .iter()
            .filter(|(_, c)| c.actors.0 == actor || c.actors.1 == actor)
            .map(|(key, _)| key)
            .collect();
        for constraint in attached {
            self.remove_constraint(constraint);
        }

        self.actors
            .remove(actor)
            .ok_or(SceneError::UnknownActor(actor))
    }

    pub fn set_shape_flags(
        &mut self,
        shape: ShapeKey,
        flags: ShapeFlags,
    ) -> Result<(), SceneError> {
        let s = self
            .shapes
            .get_mut(shape)
            .ok_or(SceneError::UnknownShape(shape))?;
        s.flags = flags;
        Ok(())
    }

    pub fn set_filter_data(&mut self, shape: ShapeKey, data: FilterData) -> Result<(), SceneError> {
        let s = self
            .shapes
            .get_mut(shape)
            .ok_or(SceneError::UnknownShape(shape))?;
        s.filter_data = data;
        Ok(())
    }

    pub fn set_body_flags(
        &mut self,
        actor: ActorKey,
        flags: super::RigidBodyFlags,
    ) -> Result<(), SceneError> {
        let a = self
            .actors
            .get_mut(actor)
            .ok_or(SceneError::UnknownActor(actor))?;
        a.body_flags = flags;
        Ok(())
    }

    /// Marks the low-level shape data as gone while the shape is still registered.
    pub fn invalidate_shape_core(&mut self, shape: ShapeKey) {
        if let Some(s) = self.shapes.get_mut(shape) {
            s.core_valid = false;
        }
    }

    #[must_use]
    pub fn actor(&self, actor: ActorKey) -> Option<&Actor> {
        self.actors.get(actor)
    }

    #[must_use]
    pub fn shape(&self, shape: ShapeKey) -> Option<&Shape> {
        self.shapes.get(shape)
    }

    #[must_use]
    pub fn articulation(&self, articulation: ArticulationKey) -> Option<&Articulation> {
        self.articulations.get(articulation)
    }

    #[must_use]
    pub fn constraint(&self, constraint: ConstraintKey) -> Option<&Constraint> {
        self.constraints.get(constraint)
    }

    /// Live joints between two actors, oldest first.
    pub fn constraints_between(
        &self,
        actor0: ActorKey,
        actor1: ActorKey,
    ) -> impl Iterator<Item = &Constraint> {
        self.constraint_lookup
            .get(&sorted_actor_pair(actor0, actor1))
            .into_iter()
            .flatten()
            .filter_map(|key| self.constraints.get(*key))
    }

    #[must_use]
    pub fn find_constraint(&self, actor0: ActorKey, actor1: ActorKey) -> Option<&Constraint> {
        self.constraints_between(actor0, actor1).next()
    }

    /// Whether any joint between the two actors turns their collision off.
    #[must_use]
    pub fn joints_disable_collision(&self, actor0: ActorKey, actor1: ActorKey) -> bool {
        self.constraints_between(actor0, actor1)
            .any(Constraint::disables_collision)
    }

    #[must_use]
    pub fn element_handle(&self, shape: ShapeKey) -> ElementHandle {
        self.shapes
            .get(shape)
            .map_or(ElementHandle::NULL, |s| ElementHandle::new(s.element_id()))
    }

    #[must_use]
    pub fn shape_by_element(&self, element_id: u32) -> Option<ShapeKey> {
        self.elements.get(element_id as usize).copied().flatten()
    }

    /// Turns a broad-phase handle back into a live shape.
    pub fn resolve(&self, handle: ElementHandle) -> Result<ShapeKey, ResolveError> {
        if handle.is_null() {
            return Err(ResolveError::NullElement);
        }

        let key = self
            .shape_by_element(handle.id())
            .ok_or(ResolveError::UnknownElement(handle.id()))?;

        match self.shapes.get(key) {
            Some(shape) if shape.is_core_valid() => Ok(key),
            Some(_) => Err(ResolveError::InvalidShapeCore(handle.id())),
            None => Err(ResolveError::UnknownElement(handle.id())),
        }
    }

    pub fn actors(&self) -> impl Iterator<Item = (ActorKey, &Actor)> {
        self.actors.iter()
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeKey, &Shape)> {
        self.shapes.iter()
    }
}
