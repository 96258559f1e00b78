use super::ActorKey;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ArticulationFlags: u8 {
        /// Weld the root link to the world.
        const FIX_BASE = 1 << 0;
        const DISABLE_SELF_COLLISION = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ArticulationLink {
    pub actor: ActorKey,
    pub parent: Option<u32>,
    pub fixed_base: bool,
}

/// A tree of links; link 0 is the root.
#[derive(Default)]
pub struct Articulation {
    pub(crate) flags: ArticulationFlags,
    pub(crate) links: Vec<ArticulationLink>,
}

impl Articulation {
    pub(crate) const fn new(flags: ArticulationFlags) -> Self {
        Self {
            flags,
            links: Vec::new(),
        }
    }

    #[must_use]
    pub const fn flags(&self) -> ArticulationFlags {
        self.flags
    }

    #[must_use]
    pub fn links(&self) -> &[ArticulationLink] {
        &self.links
    }

    #[must_use]
    pub fn link(&self, link: u32) -> Option<&ArticulationLink> {
        self.links.get(link as usize)
    }

    #[must_use]
    pub const fn is_self_collision_disabled(&self) -> bool {
        self.flags.contains(ArticulationFlags::DISABLE_SELF_COLLISION)
    }

    #[must_use]
    pub fn is_fixed_base_link(&self, link: u32) -> bool {
        self.link(link).is_some_and(|l| l.fixed_base)
    }

    /// Whether one link is the direct parent of the other.
    ///
    /// Parents always precede their children, so only the higher index can be the child.
    #[must_use]
    pub fn are_parent_child(&self, link0: u32, link1: u32) -> bool {
        let (parent, child) = if link1 < link0 {
            (link1, link0)
        } else {
            (link0, link1)
        };

        self.link(child).is_some_and(|l| l.parent == Some(parent))
    }
}
