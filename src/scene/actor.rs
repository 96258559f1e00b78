use super::{ArticulationKey, ShapeKey};
use crate::filtering::{FilterObjectAttributes, FilterObjectFlags, FilterObjectType};
use bitflags::bitflags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    RigidStatic,
    RigidDynamic,
    ArticulationLink,
    ParticleSystem,
    DeformableSurface,
    DeformableVolume,
}

impl ActorKind {
    #[must_use]
    pub const fn filter_object_type(self) -> FilterObjectType {
        match self {
            Self::RigidStatic => FilterObjectType::RigidStatic,
            Self::RigidDynamic => FilterObjectType::RigidDynamic,
            Self::ArticulationLink => FilterObjectType::Articulation,
            Self::ParticleSystem => FilterObjectType::ParticleSystem,
            Self::DeformableSurface => FilterObjectType::DeformableSurface,
            Self::DeformableVolume => FilterObjectType::DeformableVolume,
        }
    }

    /// Dynamic rigid bodies and articulation links carry a body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::RigidDynamic | Self::ArticulationLink)
    }

    #[must_use]
    pub const fn is_non_rigid(self) -> bool {
        self.filter_object_type().is_non_rigid()
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RigidBodyFlags: u8 {
        /// Externally driven; only honored on rigid dynamics.
        const KINEMATIC = 1 << 0;
        /// Keep kinematic-kinematic pairs even when the scene suppresses them.
        const FORCE_KINE_KINE_NOTIFICATIONS = 1 << 1;
        /// Keep static-kinematic pairs even when the scene suppresses them.
        const FORCE_STATIC_KINE_NOTIFICATIONS = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArticulationLinkRef {
    pub articulation: ArticulationKey,
    pub link: u32,
}

pub struct ActorConstructionInfo {
    pub kind: ActorKind,
    pub body_flags: RigidBodyFlags,
}

impl ActorConstructionInfo {
    #[must_use]
    pub const fn new(kind: ActorKind) -> Self {
        Self {
            kind,
            body_flags: RigidBodyFlags::empty(),
        }
    }

    #[must_use]
    pub const fn rigid_static() -> Self {
        Self::new(ActorKind::RigidStatic)
    }

    #[must_use]
    pub const fn rigid_dynamic() -> Self {
        Self::new(ActorKind::RigidDynamic)
    }

    #[must_use]
    pub const fn kinematic() -> Self {
        Self::rigid_dynamic().with_body_flags(RigidBodyFlags::KINEMATIC)
    }

    #[must_use]
    pub const fn with_body_flags(mut self, body_flags: RigidBodyFlags) -> Self {
        self.body_flags = self.body_flags.union(body_flags);
        self
    }
}

pub struct Actor {
    kind: ActorKind,
    pub(crate) body_flags: RigidBodyFlags,
    pub(crate) link: Option<ArticulationLinkRef>,
    pub(crate) shapes: Vec<ShapeKey>,
    /// Joints attached to this actor; only counted on actors with a body.
    pub(crate) constraint_count: u32,
}

impl Actor {
    pub(crate) const fn new(info: ActorConstructionInfo) -> Self {
        Self {
            kind: info.kind,
            body_flags: info.body_flags,
            link: None,
            shapes: Vec::new(),
            constraint_count: 0,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    #[must_use]
    pub const fn body_flags(&self) -> RigidBodyFlags {
        self.body_flags
    }

    #[must_use]
    pub const fn link(&self) -> Option<ArticulationLinkRef> {
        self.link
    }

    #[must_use]
    pub fn shapes(&self) -> &[ShapeKey] {
        &self.shapes
    }

    #[must_use]
    pub const fn is_kinematic(&self) -> bool {
        matches!(self.kind, ActorKind::RigidDynamic)
            && self.body_flags.contains(RigidBodyFlags::KINEMATIC)
    }

    #[must_use]
    pub const fn is_non_rigid(&self) -> bool {
        self.kind.is_non_rigid()
    }

    #[must_use]
    pub const fn has_constraints(&self) -> bool {
        self.constraint_count != 0
    }

    /// Actor-level part of the filter attributes; shapes add trigger and geometry bits.
    #[must_use]
    pub const fn filter_attributes(&self) -> FilterObjectAttributes {
        let mut flags = if self.kind.has_body() {
            FilterObjectFlags::RIGID_DYNAMIC
        } else if self.kind.is_non_rigid() {
            FilterObjectFlags::NON_RIGID
        } else {
            FilterObjectFlags::RIGID_STATIC
        };

        if self.is_kinematic() {
            flags = flags.union(FilterObjectFlags::KINEMATIC);
        }

        FilterObjectAttributes::new(self.kind.filter_object_type(), flags)
    }
}
