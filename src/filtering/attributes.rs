use super::{FilterObjectAttributes, FilterObjectFlags};
use crate::scene::{Actor, GeometryType, Shape};

/// Filtering bitmask of a shape: actor kind and kinematic bit, plus the trigger bit (when
/// `support_triggers`) and the custom geometry bit.
#[must_use]
pub fn attributes_of(
    shape: &Shape,
    actor: &Actor,
    support_triggers: bool,
) -> FilterObjectAttributes {
    let mut attributes = actor.filter_attributes();

    if support_triggers && shape.is_trigger() {
        attributes = attributes.with(FilterObjectFlags::TRIGGER);
    }

    if shape.geometry() == GeometryType::Custom {
        attributes = attributes.with(FilterObjectFlags::CUSTOM_GEOMETRY);
    }

    attributes
}
