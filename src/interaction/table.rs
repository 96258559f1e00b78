use super::{Interaction, ShapeInteraction, ShapeInteractionFlags};
use crate::{
    filtering::PairId,
    scene::{ActorKey, ShapeKey, sorted_actor_pair},
};
use ahash::AHashMap;
use log::error;

/// Contact report aggregator shared by every reporting shape pair of two actors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActorPairReport {
    ref_count: u32,
}

impl ActorPairReport {
    #[must_use]
    pub const fn ref_count(&self) -> u32 {
        self.ref_count
    }
}

#[derive(Default)]
pub(crate) struct ActorPairs {
    reports: AHashMap<(ActorKey, ActorKey), ActorPairReport>,
}

impl ActorPairs {
    pub fn acquire(&mut self, actor0: ActorKey, actor1: ActorKey) -> (ActorKey, ActorKey) {
        let key = sorted_actor_pair(actor0, actor1);
        self.reports.entry(key).or_default().ref_count += 1;
        key
    }

    pub fn release(&mut self, key: (ActorKey, ActorKey)) {
        let Some(report) = self.reports.get_mut(&key) else {
            error!("ActorPairs::release: no report aggregator for {key:?}");
            return;
        };

        report.ref_count -= 1;
        if report.ref_count == 0 {
            self.reports.remove(&key);
        }
    }
}

/// Pairs the narrow phase re-reports every frame. A pair sits in at most one list.
#[derive(Default)]
pub(crate) struct EventLists {
    pub persistent: Vec<PairId>,
    pub force_threshold: Vec<PairId>,
}

impl EventLists {
    fn remove_from(list: &mut Vec<PairId>, pair_id: PairId) {
        if let Some(pos) = list.iter().copied().position(|x| x == pair_id) {
            list.swap_remove(pos);
        }
    }

    pub fn add_persistent(&mut self, pair_id: PairId, si: &mut ShapeInteraction) {
        if si.flags.contains(ShapeInteractionFlags::IS_IN_PERSISTENT_EVENT_LIST) {
            return;
        }

        self.remove_force_threshold(pair_id, si);
        self.persistent.push(pair_id);
        si.flags.insert(ShapeInteractionFlags::IS_IN_PERSISTENT_EVENT_LIST);
    }

    pub fn remove_persistent(&mut self, pair_id: PairId, si: &mut ShapeInteraction) {
        if si.flags.contains(ShapeInteractionFlags::IS_IN_PERSISTENT_EVENT_LIST) {
            Self::remove_from(&mut self.persistent, pair_id);
            si.flags.remove(ShapeInteractionFlags::IS_IN_PERSISTENT_EVENT_LIST);
        }
    }

    pub fn add_force_threshold(&mut self, pair_id: PairId, si: &mut ShapeInteraction) {
        if si.flags.intersects(ShapeInteractionFlags::IN_REPORT_LIST) {
            return;
        }

        self.force_threshold.push(pair_id);
        si.flags.insert(ShapeInteractionFlags::IS_IN_FORCE_THRESHOLD_EVENT_LIST);
    }

    pub fn remove_force_threshold(&mut self, pair_id: PairId, si: &mut ShapeInteraction) {
        if si.flags.contains(ShapeInteractionFlags::IS_IN_FORCE_THRESHOLD_EVENT_LIST) {
            Self::remove_from(&mut self.force_threshold, pair_id);
            si.flags.remove(ShapeInteractionFlags::IS_IN_FORCE_THRESHOLD_EVENT_LIST);
        }
    }

    pub fn remove_all(&mut self, pair_id: PairId, si: &mut ShapeInteraction) {
        self.remove_persistent(pair_id, si);
        self.remove_force_threshold(pair_id, si);
        si.flags.remove(ShapeInteractionFlags::WAS_IN_PERSISTENT_EVENT_LIST);
    }
}

/// Exactly one [`Interaction`] per unordered shape pair, plus the report bookkeeping shared
/// between them.
#[derive(Default)]
pub struct InteractionTable {
    pub(crate) interactions: AHashMap<PairId, Interaction>,
    pub(crate) actor_pairs: ActorPairs,
    pub(crate) event_lists: EventLists,
}

impl InteractionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    #[must_use]
    pub fn get(&self, pair_id: PairId) -> Option<&Interaction> {
        self.interactions.get(&pair_id)
    }

    #[must_use]
    pub fn contains(&self, pair_id: PairId) -> bool {
        self.interactions.contains_key(&pair_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.interactions.values()
    }

    /// Pairs currently tracked for persistent touch reports.
    #[must_use]
    pub fn persistent_event_pairs(&self) -> &[PairId] {
        &self.event_lists.persistent
    }

    /// Pairs currently tracked for contact force threshold reports.
    #[must_use]
    pub fn force_threshold_event_pairs(&self) -> &[PairId] {
        &self.event_lists.force_threshold
    }

    #[must_use]
    pub fn actor_pair_report(
        &self,
        actor0: ActorKey,
        actor1: ActorKey,
    ) -> Option<&ActorPairReport> {
        self.actor_pairs.reports.get(&sorted_actor_pair(actor0, actor1))
    }

    /// Every pair one of whose shapes is `shape`.
    #[must_use]
    pub fn pairs_of_shape(&self, shape: ShapeKey) -> Vec<PairId> {
        self.interactions
            .values()
            .filter(|i| i.involves_shape(shape))
            .map(Interaction::pair_id)
            .collect()
    }
}
