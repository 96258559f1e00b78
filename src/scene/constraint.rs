use super::ActorKey;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ConstraintFlags: u8 {
        /// Let the two jointed actors keep colliding with each other.
        const COLLISION_ENABLED = 1 << 0;
    }
}

pub struct Constraint {
    pub(crate) actors: (ActorKey, ActorKey),
    pub(crate) flags: ConstraintFlags,
}

impl Constraint {
    #[must_use]
    pub const fn actors(&self) -> (ActorKey, ActorKey) {
        self.actors
    }

    #[must_use]
    pub const fn flags(&self) -> ConstraintFlags {
        self.flags
    }

    #[must_use]
    pub const fn disables_collision(&self) -> bool {
        !self.flags.contains(ConstraintFlags::COLLISION_ENABLED)
    }
}
