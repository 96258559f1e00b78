use crate::{filtering::PairFlags, scene::ActorKey};
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ShapeInteractionFlags: u16 {
        const HAS_TOUCH = 1 << 0;
        const HAS_NO_TOUCH = 1 << 1;
        const IS_IN_PERSISTENT_EVENT_LIST = 1 << 2;
        /// Was in the persistent list before the pair got deactivated.
        const WAS_IN_PERSISTENT_EVENT_LIST = 1 << 3;
        const IS_IN_FORCE_THRESHOLD_EVENT_LIST = 1 << 4;
        const FORCE_THRESHOLD_EXCEEDED_NOW = 1 << 5;
        const FORCE_THRESHOLD_EXCEEDED_BEFORE = 1 << 6;
        /// Pair flags changed in place; the narrow phase has to pick them up.
        const FILTER_STATE_DIRTY = 1 << 7;

        const IN_PERSISTENT_EVENT_LIST = Self::IS_IN_PERSISTENT_EVENT_LIST.bits()
            | Self::WAS_IN_PERSISTENT_EVENT_LIST.bits();
        const IN_REPORT_LIST = Self::IS_IN_PERSISTENT_EVENT_LIST.bits()
            | Self::IS_IN_FORCE_THRESHOLD_EVENT_LIST.bits();
        const FORCE_THRESHOLD_EXCEEDED_FLAGS = Self::FORCE_THRESHOLD_EXCEEDED_NOW.bits()
            | Self::FORCE_THRESHOLD_EXCEEDED_BEFORE.bits();
    }
}

/// Bookkeeping of a pair that generates contacts.
#[derive(Clone, Debug, Default)]
pub struct ShapeInteraction {
    pub(crate) pair_flags: PairFlags,
    pub(crate) flags: ShapeInteractionFlags,
    /// Shared report aggregator of the two actors, attached once reports are requested.
    pub(crate) actor_pair: Option<(ActorKey, ActorKey)>,
    pub(crate) touch_events: u32,
}

impl ShapeInteraction {
    pub(crate) fn new(pair_flags: PairFlags) -> Self {
        Self {
            pair_flags,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn pair_flags(&self) -> PairFlags {
        self.pair_flags
    }

    #[must_use]
    pub const fn flags(&self) -> ShapeInteractionFlags {
        self.flags
    }

    #[must_use]
    pub const fn has_touch(&self) -> bool {
        self.flags.contains(ShapeInteractionFlags::HAS_TOUCH)
    }

    /// Neither touching nor known to be apart; the narrow phase has not run yet.
    #[must_use]
    pub const fn is_touch_unknown(&self) -> bool {
        !self
            .flags
            .intersects(ShapeInteractionFlags::HAS_TOUCH.union(ShapeInteractionFlags::HAS_NO_TOUCH))
    }

    #[must_use]
    pub const fn actor_pair(&self) -> Option<(ActorKey, ActorKey)> {
        self.actor_pair
    }

    /// How many times the pair started touching.
    #[must_use]
    pub const fn touch_events(&self) -> u32 {
        self.touch_events
    }

    #[must_use]
    pub const fn is_filter_state_dirty(&self) -> bool {
        self.flags.contains(ShapeInteractionFlags::FILTER_STATE_DIRTY)
    }

    /// Called once the narrow phase consumed the new pair flags.
    pub fn clear_filter_state_dirty(&mut self) {
        self.flags.remove(ShapeInteractionFlags::FILTER_STATE_DIRTY);
    }

    pub(crate) fn set_touch(&mut self, has_touch: bool) {
        if has_touch {
            if !self.has_touch() {
                self.touch_events += 1;
            }
            self.flags.remove(ShapeInteractionFlags::HAS_NO_TOUCH);
            self.flags.insert(ShapeInteractionFlags::HAS_TOUCH);
        } else {
            self.flags.remove(ShapeInteractionFlags::HAS_TOUCH);
            self.flags.insert(ShapeInteractionFlags::HAS_NO_TOUCH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_events_count_transitions() {
        let mut si = ShapeInteraction::new(PairFlags::CONTACT_DEFAULT);
        assert!(si.is_touch_unknown());

        si.set_touch(true);
        si.set_touch(true);
        assert_eq!(si.touch_events(), 1);

        si.set_touch(false);
        assert!(!si.has_touch());
        assert!(!si.is_touch_unknown());

        si.set_touch(true);
        assert_eq!(si.touch_events(), 2);
    }
}
