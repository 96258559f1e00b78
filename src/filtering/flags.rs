use crate::consts::FILTER_OBJECT_TYPE_BITS;
use bitflags::bitflags;

bitflags! {
    /// Outcome of filtering a shape pair.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FilterFlags: u16 {
        /// Discard the pair; it is not tracked until the overlap ends and starts again.
        const KILL = 1 << 0;
        /// Track the pair but generate no contacts or reports for it.
        const SUPPRESS = 1 << 1;
        /// Ask the filter callback for a decision.
        const CALLBACK = 1 << 2;
        /// Register the pair with the filter callback. Implies `CALLBACK`.
        const NOTIFY = (1 << 3) | Self::CALLBACK.bits();
    }
}

impl FilterFlags {
    pub const DEFAULT: Self = Self::empty();

    #[inline]
    pub const fn is_killed(self) -> bool {
        self.contains(Self::KILL)
    }

    #[inline]
    pub const fn is_suppressed(self) -> bool {
        self.contains(Self::SUPPRESS)
    }

    #[inline]
    pub const fn is_notified(self) -> bool {
        self.contains(Self::NOTIFY)
    }

    #[inline]
    pub const fn wants_callback(self) -> bool {
        self.contains(Self::CALLBACK)
    }
}

bitflags! {
    /// Report and resolve behavior requested for a pair.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PairFlags: u16 {
        const SOLVE_CONTACT = 1 << 0;
        const MODIFY_CONTACTS = 1 << 1;
        const NOTIFY_TOUCH_FOUND = 1 << 2;
        const NOTIFY_TOUCH_PERSISTS = 1 << 3;
        const NOTIFY_TOUCH_LOST = 1 << 4;
        const NOTIFY_TOUCH_CCD = 1 << 5;
        const NOTIFY_THRESHOLD_FORCE_FOUND = 1 << 6;
        const NOTIFY_THRESHOLD_FORCE_PERSISTS = 1 << 7;
        const NOTIFY_THRESHOLD_FORCE_LOST = 1 << 8;
        const NOTIFY_CONTACT_POINTS = 1 << 9;
        const DETECT_DISCRETE_CONTACT = 1 << 10;
        const DETECT_CCD_CONTACT = 1 << 11;
        const PRE_SOLVER_VELOCITY = 1 << 12;
        const POST_SOLVER_VELOCITY = 1 << 13;
        const CONTACT_EVENT_POSE = 1 << 14;

        const CONTACT_DEFAULT = Self::SOLVE_CONTACT.bits() | Self::DETECT_DISCRETE_CONTACT.bits();
        const TRIGGER_DEFAULT = Self::NOTIFY_TOUCH_FOUND.bits()
            | Self::NOTIFY_TOUCH_LOST.bits()
            | Self::DETECT_DISCRETE_CONTACT.bits();
    }
}

impl PairFlags {
    pub const CONTACT_FORCE_THRESHOLD_PAIRS: Self = Self::NOTIFY_THRESHOLD_FORCE_FOUND
        .union(Self::NOTIFY_THRESHOLD_FORCE_PERSISTS)
        .union(Self::NOTIFY_THRESHOLD_FORCE_LOST);

    /// Flags that need the shared per-actor-pair report aggregator.
    pub const CONTACT_REPORT_EVENTS: Self = Self::NOTIFY_TOUCH_FOUND
        .union(Self::NOTIFY_TOUCH_PERSISTS)
        .union(Self::NOTIFY_TOUCH_LOST)
        .union(Self::NOTIFY_TOUCH_CCD)
        .union(Self::CONTACT_FORCE_THRESHOLD_PAIRS);

    /// Flags stripped when the scene runs through the direct GPU API.
    pub const DIRECT_GPU_DISABLED_REPORTS: Self =
        Self::CONTACT_REPORT_EVENTS.union(Self::NOTIFY_CONTACT_POINTS);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FilterObjectType {
    RigidStatic = 0,
    RigidDynamic = 1,
    Articulation = 2,
    ParticleSystem = 3,
    DeformableSurface = 4,
    DeformableVolume = 5,
}

impl FilterObjectType {
    const ALL: [Self; 6] = [
        Self::RigidStatic,
        Self::RigidDynamic,
        Self::Articulation,
        Self::ParticleSystem,
        Self::DeformableSurface,
        Self::DeformableVolume,
    ];

    #[must_use]
    pub const fn is_non_rigid(self) -> bool {
        matches!(
            self,
            Self::ParticleSystem | Self::DeformableSurface | Self::DeformableVolume
        )
    }
}

bitflags! {
    /// Upper bits of [`FilterObjectAttributes`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FilterObjectFlags: u32 {
        const KINEMATIC = 1 << 5;
        const TRIGGER = 1 << 6;
        const CUSTOM_GEOMETRY = 1 << 7;
        // Engine-internal classification, never interpreted by user shaders.
        const RIGID_STATIC = 1 << 8;
        /// Set for every actor with a body: rigid dynamics and articulation links.
        const RIGID_DYNAMIC = 1 << 9;
        const NON_RIGID = 1 << 10;
    }
}

/// Filtering-relevant description of one side of a pair, packed into one word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterObjectAttributes(u32);

impl FilterObjectAttributes {
    const TYPE_MASK: u32 = (1 << FILTER_OBJECT_TYPE_BITS) - 1;

    #[must_use]
    pub const fn new(object_type: FilterObjectType, flags: FilterObjectFlags) -> Self {
        Self(object_type as u32 | flags.bits())
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn object_type(self) -> FilterObjectType {
        let raw = self.0 & Self::TYPE_MASK;
        FilterObjectType::ALL
            .into_iter()
            .find(|ty| *ty as u32 == raw)
            .unwrap_or(FilterObjectType::RigidStatic)
    }

    #[must_use]
    pub const fn flags(self) -> FilterObjectFlags {
        FilterObjectFlags::from_bits_truncate(self.0)
    }

    #[must_use]
    pub const fn contains(self, flags: FilterObjectFlags) -> bool {
        self.flags().contains(flags)
    }

    #[must_use]
    pub const fn with(self, flags: FilterObjectFlags) -> Self {
        Self(self.0 | flags.bits())
    }

    #[inline]
    #[must_use]
    pub const fn is_kinematic(self) -> bool {
        self.contains(FilterObjectFlags::KINEMATIC)
    }

    #[inline]
    #[must_use]
    pub const fn is_trigger(self) -> bool {
        self.contains(FilterObjectFlags::TRIGGER)
    }

    #[inline]
    #[must_use]
    pub const fn is_custom_geometry(self) -> bool {
        self.contains(FilterObjectFlags::CUSTOM_GEOMETRY)
    }
}

impl std::fmt::Debug for FilterObjectAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterObjectAttributes")
            .field("object_type", &self.object_type())
            .field("flags", &self.flags())
            .finish()
    }
}

/// User filter tag attached to a shape; opaque to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterData {
    pub word0: u32,
    pub word1: u32,
    pub word2: u32,
    pub word3: u32,
}

impl FilterData {
    #[must_use]
    pub const fn new(word0: u32, word1: u32, word2: u32, word3: u32) -> Self {
        Self {
            word0,
            word1,
            word2,
            word3,
        }
    }

    /// Group in `word0`, mask of groups it collides with in `word1`.
    #[must_use]
    pub const fn group_mask(group: u32, mask: u32) -> Self {
        Self::new(group, mask, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_implies_callback() {
        assert!(FilterFlags::NOTIFY.contains(FilterFlags::CALLBACK));
        assert!(!FilterFlags::CALLBACK.is_notified());

        let mut flags = FilterFlags::NOTIFY | FilterFlags::SUPPRESS;
        flags.remove(FilterFlags::NOTIFY);
        assert_eq!(flags, FilterFlags::SUPPRESS);
    }

    #[test]
    fn attributes_round_trip_type_and_flags() {
        let attr = FilterObjectAttributes::new(
            FilterObjectType::Articulation,
            FilterObjectFlags::RIGID_DYNAMIC | FilterObjectFlags::TRIGGER,
        );
        assert_eq!(attr.object_type(), FilterObjectType::Articulation);
        assert!(attr.is_trigger());
        assert!(!attr.is_kinematic());
        assert!(attr.contains(FilterObjectFlags::RIGID_DYNAMIC));
    }

    #[test]
    fn direct_gpu_set_covers_every_report_flag() {
        let stripped = PairFlags::DIRECT_GPU_DISABLED_REPORTS;
        assert!(stripped.contains(PairFlags::CONTACT_REPORT_EVENTS));
        assert!(stripped.contains(PairFlags::NOTIFY_CONTACT_POINTS));
        assert!(!stripped.contains(PairFlags::SOLVE_CONTACT));
    }
}
