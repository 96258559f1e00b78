use crate::filtering::PairFlags;

/// Bookkeeping of a pair involving a trigger shape.
#[derive(Clone, Debug, Default)]
pub struct TriggerInteraction {
    pub(crate) trigger_flags: PairFlags,
    pub(crate) last_frame_had_contact: bool,
}

impl TriggerInteraction {
    pub(crate) const fn new(trigger_flags: PairFlags) -> Self {
        Self {
            trigger_flags,
            last_frame_had_contact: false,
        }
    }

    #[must_use]
    pub const fn trigger_flags(&self) -> PairFlags {
        self.trigger_flags
    }

    #[must_use]
    pub const fn last_frame_had_contact(&self) -> bool {
        self.last_frame_had_contact
    }

    pub(crate) fn set_trigger_flags(&mut self, trigger_flags: PairFlags) {
        self.trigger_flags = trigger_flags;
    }
}
