use super::ActorKey;
use crate::filtering::FilterData;
use bitflags::bitflags;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeometryType {
    #[default]
    Sphere,
    Plane,
    Capsule,
    Box,
    ConvexMesh,
    TriangleMesh,
    HeightField,
    /// User-implemented geometry; never paired with non-rigid actors.
    Custom,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShapeFlags: u8 {
        const SIMULATION_SHAPE = 1 << 0;
        /// Reports overlaps without contact resolution.
        const TRIGGER_SHAPE = 1 << 1;
    }
}

impl Default for ShapeFlags {
    fn default() -> Self {
        Self::SIMULATION_SHAPE
    }
}

pub struct ShapeConstructionInfo {
    pub geometry: GeometryType,
    pub flags: ShapeFlags,
    pub filter_data: FilterData,
}

impl ShapeConstructionInfo {
    #[must_use]
    pub const fn new(geometry: GeometryType) -> Self {
        Self {
            geometry,
            flags: ShapeFlags::SIMULATION_SHAPE,
            filter_data: FilterData::new(0, 0, 0, 0),
        }
    }

    #[must_use]
    pub const fn trigger(geometry: GeometryType) -> Self {
        Self {
            flags: ShapeFlags::TRIGGER_SHAPE,
            ..Self::new(geometry)
        }
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: ShapeFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn with_filter_data(mut self, filter_data: FilterData) -> Self {
        self.filter_data = filter_data;
        self
    }
}

pub struct Shape {
    actor: ActorKey,
    element_id: u32,
    geometry: GeometryType,
    pub(crate) flags: ShapeFlags,
    pub(crate) filter_data: FilterData,
    /// Cleared when the low-level shape data was torn down underneath the broad phase.
    pub(crate) core_valid: bool,
}

impl Shape {
    pub(crate) const fn new(actor: ActorKey, element_id: u32, info: ShapeConstructionInfo) -> Self {
        Self {
            actor,
            element_id,
            geometry: info.geometry,
            flags: info.flags,
            filter_data: info.filter_data,
            core_valid: true,
        }
    }

    #[must_use]
    pub const fn actor(&self) -> ActorKey {
        self.actor
    }

    #[must_use]
    pub const fn element_id(&self) -> u32 {
        self.element_id
    }

    #[must_use]
    pub const fn geometry(&self) -> GeometryType {
        self.geometry
    }

    #[must_use]
    pub const fn flags(&self) -> ShapeFlags {
        self.flags
    }

    #[must_use]
    pub const fn filter_data(&self) -> &FilterData {
        &self.filter_data
    }

    #[must_use]
    pub const fn is_trigger(&self) -> bool {
        self.flags.contains(ShapeFlags::TRIGGER_SHAPE)
    }

    #[must_use]
    pub const fn is_core_valid(&self) -> bool {
        self.core_valid
    }
}
