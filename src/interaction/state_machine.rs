use super::{
    Interaction, InteractionKind, InteractionTable, InteractionType, ShapeInteraction,
    ShapeInteractionFlags, TriggerInteraction,
};
use crate::{
    filtering::{FilterFlags, FilterInfo, PairFlags, PairId, ShapePair},
    scene::Shape,
};
use log::{error, trace};

/// Interaction type a decision maps to.
#[must_use]
pub fn next_type(shape0: &Shape, shape1: &Shape, filter_flags: FilterFlags) -> InteractionType {
    if filter_flags.is_killed() {
        InteractionType::None
    } else if filter_flags.is_suppressed() {
        InteractionType::Marker
    } else if shape0.is_trigger() || shape1.is_trigger() {
        InteractionType::Trigger
    } else {
        InteractionType::Overlap
    }
}

impl InteractionTable {
    /// Builds the interaction for a pair that has none yet.
    pub(crate) fn create(
        &mut self,
        pair: &ShapePair<'_>,
        interaction_type: InteractionType,
        info: &FilterInfo,
    ) -> Option<&Interaction> {
        let kind = match interaction_type {
            InteractionType::None => return None,
            InteractionType::Marker => InteractionKind::Marker,
            InteractionType::Trigger => {
                InteractionKind::Trigger(TriggerInteraction::new(info.pair_flags))
            }
            InteractionType::Overlap => {
                let mut si = ShapeInteraction::new(info.pair_flags);
                if info.pair_flags.intersects(PairFlags::CONTACT_REPORT_EVENTS) {
                    let [actor0, actor1] = pair.actor_keys();
                    si.actor_pair = Some(self.actor_pairs.acquire(actor0, actor1));
                }
                InteractionKind::Overlap(si)
            }
        };

        let pair_id = pair.pair_id();
        let mut interaction = Interaction::new(pair_id, pair.keys, pair.actor_keys(), kind);
        interaction.is_filter_pair = info.has_pair_id;

        trace!("created {interaction_type:?} interaction for {pair_id:?}");

        if self.interactions.insert(pair_id, interaction).is_some() {
            error!("InteractionTable::create: {pair_id:?} was already tracked, replacing it");
        }
        self.interactions.get(&pair_id)
    }

    /// Removes the interaction and detaches it from every shared list.
    pub(crate) fn destroy(&mut self, pair_id: PairId) -> Option<Interaction> {
        let mut interaction = self.interactions.remove(&pair_id)?;

        if let InteractionKind::Overlap(si) = &mut interaction.kind {
            self.event_lists.remove_all(pair_id, si);
            if let Some(actor_pair) = si.actor_pair.take() {
                self.actor_pairs.release(actor_pair);
            }
        }

        trace!("destroyed {:?} interaction for {pair_id:?}", interaction.interaction_type());
        Some(interaction)
    }

    /// Replaces an interaction by one of another type.
    ///
    /// Touch and report state does not survive a type change; activity does when both the old and
    /// the new type can be active.
    pub(crate) fn convert(
        &mut self,
        pair: &ShapePair<'_>,
        new_type: InteractionType,
        info: &FilterInfo,
    ) -> Option<&Interaction> {
        let old = self.destroy(pair.pair_id())?;

        let carry_active = old.interaction_type() != InteractionType::Marker;
        let created = self.create(pair, new_type, info)?;
        let pair_id = created.pair_id();

        if carry_active
            && new_type != InteractionType::Marker
            && let Some(interaction) = self.interactions.get_mut(&pair_id)
        {
            interaction.is_active = old.is_active;
        }

        self.interactions.get(&pair_id)
    }

    /// Forwards a new decision to an interaction whose type did not change.
    pub(crate) fn refresh(&mut self, pair_id: PairId, info: &FilterInfo) -> Option<&Interaction> {
        let Self {
            interactions,
            actor_pairs,
            event_lists,
        } = self;

        let interaction = interactions.get_mut(&pair_id)?;
        interaction.is_filter_pair = info.has_pair_id;
        let is_active = interaction.is_active;
        let [actor0, actor1] = interaction.actors();

        match &mut interaction.kind {
            InteractionKind::Marker => {}
            InteractionKind::Trigger(ti) => ti.set_trigger_flags(info.pair_flags),
            InteractionKind::Overlap(si) => {
                let new_flags = info.pair_flags;
                let old_flags = si.pair_flags;

                if new_flags != old_flags {
                    if !old_flags.intersects(PairFlags::CONTACT_REPORT_EVENTS)
                        && new_flags.intersects(PairFlags::CONTACT_REPORT_EVENTS)
                        && si.actor_pair.is_none()
                    {
                        si.actor_pair = Some(actor_pairs.acquire(actor0, actor1));
                    }

                    if si.flags.intersects(ShapeInteractionFlags::IN_PERSISTENT_EVENT_LIST)
                        && !new_flags.contains(PairFlags::NOTIFY_TOUCH_PERSISTS)
                    {
                        if si.flags.contains(ShapeInteractionFlags::IS_IN_PERSISTENT_EVENT_LIST) {
                            event_lists.remove_persistent(pair_id, si);
                        } else {
                            si.flags.remove(ShapeInteractionFlags::WAS_IN_PERSISTENT_EVENT_LIST);
                        }
                    }

                    if new_flags.intersects(PairFlags::CONTACT_FORCE_THRESHOLD_PAIRS) {
                        if !si.flags.intersects(ShapeInteractionFlags::IN_REPORT_LIST)
                            && is_active
                            && si.has_touch()
                        {
                            event_lists.add_force_threshold(pair_id, si);
                        }
                    } else if old_flags.intersects(PairFlags::CONTACT_FORCE_THRESHOLD_PAIRS) {
                        si.flags.remove(ShapeInteractionFlags::FORCE_THRESHOLD_EXCEEDED_FLAGS);
                        event_lists.remove_force_threshold(pair_id, si);
                    }
                }

                si.pair_flags = new_flags;
            }
        }

        interactions.get(&pair_id)
    }

    /// Records a narrow-phase touch change. Returns `false` for pairs that track no touch state.
    pub(crate) fn report_touch(&mut self, pair_id: PairId, has_touch: bool) -> bool {
        let Self {
            interactions,
            event_lists,
            ..
        } = self;

        let Some(interaction) = interactions.get_mut(&pair_id) else {
            return false;
        };
        let is_active = interaction.is_active;

        match &mut interaction.kind {
            InteractionKind::Marker => false,
            InteractionKind::Trigger(ti) => {
                ti.last_frame_had_contact = has_touch;
                true
            }
            InteractionKind::Overlap(si) => {
                si.set_touch(has_touch);

                if !has_touch {
                    event_lists.remove_all(pair_id, si);
                } else if is_active {
                    if si.pair_flags.contains(PairFlags::NOTIFY_TOUCH_PERSISTS) {
                        event_lists.add_persistent(pair_id, si);
                    } else if si.pair_flags.intersects(PairFlags::CONTACT_FORCE_THRESHOLD_PAIRS) {
                        event_lists.add_force_threshold(pair_id, si);
                    }
                }

                true
            }
        }
    }

    pub(crate) fn set_active(&mut self, pair_id: PairId, active: bool) -> bool {
        let Self {
            interactions,
            event_lists,
            ..
        } = self;

        let Some(interaction) = interactions.get_mut(&pair_id) else {
            return false;
        };

        if interaction.is_active == active {
            return true;
        }
        interaction.is_active = active;

        let Some(si) = interaction.as_overlap_mut() else {
            return true;
        };

        if active {
            if si.flags.contains(ShapeInteractionFlags::WAS_IN_PERSISTENT_EVENT_LIST) {
                si.flags.remove(ShapeInteractionFlags::WAS_IN_PERSISTENT_EVENT_LIST);
                if si.has_touch() {
                    event_lists.add_persistent(pair_id, si);
                }
            } else if si.has_touch()
                && si
                    .pair_flags
                    .intersects(PairFlags::CONTACT_FORCE_THRESHOLD_PAIRS)
            {
                event_lists.add_force_threshold(pair_id, si);
            }
        } else {
            if si.flags.contains(ShapeInteractionFlags::IS_IN_PERSISTENT_EVENT_LIST) {
                event_lists.remove_persistent(pair_id, si);
                si.flags.insert(ShapeInteractionFlags::WAS_IN_PERSISTENT_EVENT_LIST);
            }
            event_lists.remove_force_threshold(pair_id, si);
        }

        true
    }

    pub(crate) fn mark_force_threshold_exceeded(
        &mut self,
        pair_id: PairId,
        exceeded: bool,
    ) -> bool {
        let Some(si) = self
            .interactions
            .get_mut(&pair_id)
            .and_then(Interaction::as_overlap_mut)
        else {
            return false;
        };

        let before = si.flags.contains(ShapeInteractionFlags::FORCE_THRESHOLD_EXCEEDED_NOW);
        si.flags.set(ShapeInteractionFlags::FORCE_THRESHOLD_EXCEEDED_BEFORE, before);
        si.flags.set(ShapeInteractionFlags::FORCE_THRESHOLD_EXCEEDED_NOW, exceeded);
        true
    }

    pub(crate) fn mark_filter_state_dirty(&mut self, pair_id: PairId) {
        if let Some(si) = self
            .interactions
            .get_mut(&pair_id)
            .and_then(Interaction::as_overlap_mut)
        {
            si.flags.insert(ShapeInteractionFlags::FILTER_STATE_DIRTY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ActorConstructionInfo, GeometryType, Scene, ShapeConstructionInfo};

    #[test]
    fn next_type_covers_every_outcome() {
        let mut scene = Scene::new();
        let a = scene.add_actor(ActorConstructionInfo::rigid_dynamic());
        let b = scene.add_actor(ActorConstructionInfo::rigid_dynamic());
        let solid = scene.add_shape(a, ShapeConstructionInfo::new(GeometryType::Box)).unwrap();
        let other = scene.add_shape(b, ShapeConstructionInfo::new(GeometryType::Sphere)).unwrap();
        let trigger = scene
            .add_shape(b, ShapeConstructionInfo::trigger(GeometryType::Sphere))
            .unwrap();

        let solid = scene.shape(solid).unwrap();
        let other = scene.shape(other).unwrap();
        let trigger = scene.shape(trigger).unwrap();

        for bits in 0..16u16 {
            let flags = FilterFlags::from_bits_truncate(bits);
            let ty = next_type(solid, trigger, flags);
            let expected = if flags.is_killed() {
                InteractionType::None
            } else if flags.is_suppressed() {
                InteractionType::Marker
            } else {
                InteractionType::Trigger
            };
            assert_eq!(ty, expected, "{flags:?}");
        }

        assert_eq!(next_type(solid, other, FilterFlags::DEFAULT), InteractionType::Overlap);
        assert_eq!(
            next_type(solid, other, FilterFlags::KILL | FilterFlags::SUPPRESS),
            InteractionType::None
        );
    }

    #[test]
    fn threshold_toggle_updates_list_and_clears_flags() {
        let mut scene = Scene::new();
        let a = scene.add_actor(ActorConstructionInfo::rigid_dynamic());
        let b = scene.add_actor(ActorConstructionInfo::rigid_dynamic());
        let s0 = scene.add_shape(a, ShapeConstructionInfo::new(GeometryType::Box)).unwrap();
        let s1 = scene.add_shape(b, ShapeConstructionInfo::new(GeometryType::Box)).unwrap();
        let pair = ShapePair::new(&scene, s0, s1).unwrap();
        let pair_id = pair.pair_id();

        let mut table = InteractionTable::new();
        let info =
            FilterInfo::new(FilterFlags::DEFAULT).with_pair_flags(PairFlags::CONTACT_DEFAULT);
        table.create(&pair, InteractionType::Overlap, &info);
        assert!(table.report_touch(pair_id, true));
        assert!(table.force_threshold_event_pairs().is_empty());

        let threshold = info.with_pair_flags(
            PairFlags::CONTACT_DEFAULT | PairFlags::NOTIFY_THRESHOLD_FORCE_FOUND,
        );
        table.refresh(pair_id, &threshold);
        assert_eq!(table.force_threshold_event_pairs(), &[pair_id]);
        assert!(table.actor_pair_report(a, b).is_some());

        table.mark_force_threshold_exceeded(pair_id, true);
        table.refresh(pair_id, &info);
        let si = table.get(pair_id).and_then(Interaction::as_overlap).unwrap();
        assert!(table.force_threshold_event_pairs().is_empty());
        assert!(!si.flags().intersects(ShapeInteractionFlags::FORCE_THRESHOLD_EXCEEDED_FLAGS));
        assert!(si.has_touch());

        table.destroy(pair_id);
        assert!(table.actor_pair_report(a, b).is_none());
    }

    #[test]
    fn deactivation_parks_persistent_pairs() {
        let mut scene = Scene::new();
        let a = scene.add_actor(ActorConstructionInfo::rigid_dynamic());
        let b = scene.add_actor(ActorConstructionInfo::rigid_dynamic());
        let s0 = scene.add_shape(a, ShapeConstructionInfo::new(GeometryType::Box)).unwrap();
        let s1 = scene.add_shape(b, ShapeConstructionInfo::new(GeometryType::Box)).unwrap();
        let pair = ShapePair::new(&scene, s0, s1).unwrap();
        let pair_id = pair.pair_id();

        let mut table = InteractionTable::new();
        let info = FilterInfo::new(FilterFlags::DEFAULT)
            .with_pair_flags(PairFlags::CONTACT_DEFAULT | PairFlags::NOTIFY_TOUCH_PERSISTS);
        table.create(&pair, InteractionType::Overlap, &info);
        table.report_touch(pair_id, true);
        assert_eq!(table.persistent_event_pairs(), &[pair_id]);

        table.set_active(pair_id, false);
        assert!(table.persistent_event_pairs().is_empty());
        let si = table.get(pair_id).and_then(Interaction::as_overlap).unwrap();
        assert!(si.flags().contains(ShapeInteractionFlags::WAS_IN_PERSISTENT_EVENT_LIST));

        table.set_active(pair_id, true);
        assert_eq!(table.persistent_event_pairs(), &[pair_id]);
    }
}
