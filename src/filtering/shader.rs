use super::{FilterData, FilterFlags, FilterObjectAttributes, PairFlags, PairId};
use crate::scene::{ActorKey, ShapeKey};

/// Stateless pair decision supplied by the host.
///
/// Runs on the rayon pool, so it must not touch engine state. `constant_block` is the opaque
/// data blob registered alongside the shader.
pub trait FilterShader: Send + Sync {
    fn filter(
        &self,
        attributes0: FilterObjectAttributes,
        data0: &FilterData,
        attributes1: FilterObjectAttributes,
        data1: &FilterData,
        pair_flags: &mut PairFlags,
        constant_block: &[u8],
    ) -> FilterFlags;
}

impl<F> FilterShader for F
where
    F: Fn(
            FilterObjectAttributes,
            &FilterData,
            FilterObjectAttributes,
            &FilterData,
            &mut PairFlags,
            &[u8],
        ) -> FilterFlags
        + Send
        + Sync,
{
    fn filter(
        &self,
        attributes0: FilterObjectAttributes,
        data0: &FilterData,
        attributes1: FilterObjectAttributes,
        data1: &FilterData,
        pair_flags: &mut PairFlags,
        constant_block: &[u8],
    ) -> FilterFlags {
        self(
            attributes0,
            data0,
            attributes1,
            data1,
            pair_flags,
            constant_block,
        )
    }
}

/// Triggers get the default trigger reports; everything else collides when the group of
/// each side (`word0`) is in the mask of the other (`word1`).
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFilterShader;

impl DefaultFilterShader {
    #[must_use]
    pub const fn groups_collide(data0: &FilterData, data1: &FilterData) -> bool {
        (data0.word0 & data1.word1) != 0 && (data1.word0 & data0.word1) != 0
    }
}

impl FilterShader for DefaultFilterShader {
    fn filter(
        &self,
        attributes0: FilterObjectAttributes,
        data0: &FilterData,
        attributes1: FilterObjectAttributes,
        data1: &FilterData,
        pair_flags: &mut PairFlags,
        _constant_block: &[u8],
    ) -> FilterFlags {
        if attributes0.is_trigger() || attributes1.is_trigger() {
            *pair_flags = PairFlags::TRIGGER_DEFAULT;
            return FilterFlags::DEFAULT;
        }

        if !Self::groups_collide(data0, data1) {
            return FilterFlags::SUPPRESS;
        }

        *pair_flags = PairFlags::CONTACT_DEFAULT;
        FilterFlags::DEFAULT
    }
}

/// One side of a pair as presented to the filter callback.
#[derive(Clone, Copy, Debug)]
pub struct FilterObject {
    pub attributes: FilterObjectAttributes,
    pub data: FilterData,
    pub actor: ActorKey,
    /// `None` for particle systems, which expose no shape.
    pub shape: Option<ShapeKey>,
}

/// A decision change the callback wants applied to a registered pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub pair_id: PairId,
    pub pair_flags: PairFlags,
    pub filter_flags: FilterFlags,
}

/// Optional stateful extension of the shader.
///
/// Only ever called from single-threaded phases.
pub trait FilterCallback: Send {
    /// A pair the shader flagged with `CALLBACK` started overlapping.
    fn pair_found(
        &mut self,
        pair_id: PairId,
        object0: &FilterObject,
        object1: &FilterObject,
        pair_flags: &mut PairFlags,
    ) -> FilterFlags;

    /// A registered pair stopped being tracked.
    ///
    /// `volume_removed` is set when a shape or actor went away.
    fn pair_lost(
        &mut self,
        pair_id: PairId,
        object0: &FilterObject,
        object1: &FilterObject,
        volume_removed: bool,
    );

    /// Polled until it returns `None` once per drain.
    fn status_change(&mut self) -> Option<StatusChange>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{FilterObjectFlags, FilterObjectType};

    fn dynamic() -> FilterObjectAttributes {
        FilterObjectAttributes::new(
            FilterObjectType::RigidDynamic,
            FilterObjectFlags::RIGID_DYNAMIC,
        )
    }

    #[test]
    fn default_shader_group_mask() {
        let shader = DefaultFilterShader;
        let a = FilterData::group_mask(0b01, 0b10);
        let b = FilterData::group_mask(0b10, 0b01);
        let c = FilterData::group_mask(0b100, 0b100);

        let mut flags = PairFlags::empty();
        let result = shader.filter(dynamic(), &a, dynamic(), &b, &mut flags, &[]);
        assert_eq!(result, FilterFlags::DEFAULT);
        assert_eq!(flags, PairFlags::CONTACT_DEFAULT);

        let mut flags = PairFlags::empty();
        let result = shader.filter(dynamic(), &a, dynamic(), &c, &mut flags, &[]);
        assert_eq!(result, FilterFlags::SUPPRESS);
    }

    #[test]
    fn closures_are_shaders() {
        let shader = |_: FilterObjectAttributes,
                      _: &FilterData,
                      _: FilterObjectAttributes,
                      _: &FilterData,
                      pair_flags: &mut PairFlags,
                      block: &[u8]| {
            *pair_flags = PairFlags::SOLVE_CONTACT;
            if block.first() == Some(&1) {
                FilterFlags::KILL
            } else {
                FilterFlags::DEFAULT
            }
        };

        let data = FilterData::default();
        let mut flags = PairFlags::empty();
        assert_eq!(
            FilterShader::filter(&shader, dynamic(), &data, dynamic(), &data, &mut flags, &[1]),
            FilterFlags::KILL
        );
        assert_eq!(flags, PairFlags::SOLVE_CONTACT);
    }
}
