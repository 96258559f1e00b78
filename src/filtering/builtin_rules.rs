use super::{
    FilterFlags, FilterObjectAttributes, FilterObjectFlags, FilterObjectType, FilteringContext,
    ShapePair,
};
use crate::{
    config::PairFilteringMode,
    scene::{Actor, RigidBodyFlags, Scene},
};

/// Result of the engine's own exclusion rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinDecision {
    /// The engine settled the pair; the shader never sees it.
    Decided(FilterFlags),
    /// Hand the pair to the shader.
    Undecided { is_kine_pair: bool, is_non_rigid: bool },
}

impl BuiltinDecision {
    #[must_use]
    pub const fn flags(self) -> Option<FilterFlags> {
        match self {
            Self::Decided(flags) => Some(flags),
            Self::Undecided { .. } => None,
        }
    }
}

fn has_force_notifications(body: Option<&Actor>, flag: RigidBodyFlags) -> bool {
    body.is_some_and(|b| b.body_flags().contains(flag))
}

fn validate_suppress(b0: Option<&Actor>, b1: Option<&Actor>, flag: RigidBodyFlags) -> bool {
    !has_force_notifications(b0, flag) && !has_force_notifications(b1, flag)
}

/// `b0`/`b1` are the bodies of each side, `None` for statics.
fn filter_kinematics(
    b0: Option<&Actor>,
    b1: Option<&Actor>,
    kine0: bool,
    kine1: bool,
    kine_kine_mode: PairFilteringMode,
    static_kine_mode: PairFilteringMode,
) -> bool {
    if !(kine0 || kine1) {
        return false;
    }

    if static_kine_mode.filters_out() && (b0.is_none() || b1.is_none()) {
        return validate_suppress(b0, b1, RigidBodyFlags::FORCE_STATIC_KINE_NOTIFICATIONS);
    }

    if kine_kine_mode.filters_out() && kine0 && kine1 {
        return validate_suppress(b0, b1, RigidBodyFlags::FORCE_KINE_KINE_NOTIFICATIONS);
    }

    false
}

/// Jointed actors whose joint disables collision.
fn filter_jointed_bodies(scene: &Scene, pair: &ShapePair<'_>) -> bool {
    // Statics never carry the marker, so the lookup is only skipped when neither side has it.
    if !pair.actors[0].has_constraints() && !pair.actors[1].has_constraints() {
        return false;
    }

    let [actor0, actor1] = pair.actor_keys();
    scene.joints_disable_collision(actor0, actor1)
}

/// Links of one articulation that must never collide.
fn filter_articulation_links(pair: &ShapePair<'_>) -> bool {
    let (Some(link0), Some(link1)) = (pair.actors[0].link(), pair.actors[1].link()) else {
        return false;
    };

    if link0.articulation != link1.articulation {
        return false;
    }

    let Some(articulation) = pair.scene.articulation(link0.articulation) else {
        return false;
    };

    articulation.is_self_collision_disabled()
        || articulation.are_parent_child(link0.link, link1.link)
}

fn is_fixed_base_link(pair: &ShapePair<'_>, i: usize) -> bool {
    pair.actors[i]
        .link()
        .and_then(|l| {
            pair.scene
                .articulation(l.articulation)
                .map(|a| a.is_fixed_base_link(l.link))
        })
        .unwrap_or(false)
}

/// Engine-mandated exclusions, first match wins.
///
/// `run_all_tests` is set for pairs straight out of the broad phase; trigger and refilter
/// paths skip the particle and fixed-base checks.
#[must_use]
pub fn evaluate_builtin_rules(
    pair: &ShapePair<'_>,
    attributes: [FilterObjectAttributes; 2],
    context: &FilteringContext<'_>,
    run_all_tests: bool,
) -> BuiltinDecision {
    let [attr0, attr1] = attributes;
    let kine0 = attr0.is_kinematic();
    let kine1 = attr1.is_kinematic();

    let mut is_non_rigid = false;
    let mut bodies = [None, None];

    for (i, (this, other)) in [(attr0, attr1), (attr1, attr0)].into_iter().enumerate() {
        if this.contains(FilterObjectFlags::RIGID_DYNAMIC) {
            bodies[i] = Some(pair.actors[i]);
        } else if this.contains(FilterObjectFlags::NON_RIGID) {
            if other.is_custom_geometry() {
                return BuiltinDecision::Decided(FilterFlags::KILL);
            }
            is_non_rigid = true;
        }
    }

    if !is_non_rigid
        && filter_kinematics(
            bodies[0],
            bodies[1],
            kine0,
            kine1,
            context.kine_kine_filtering_mode,
            context.static_kine_filtering_mode,
        )
    {
        return BuiltinDecision::Decided(FilterFlags::SUPPRESS);
    }

    if filter_jointed_bodies(pair.scene, pair) {
        return BuiltinDecision::Decided(FilterFlags::SUPPRESS);
    }

    let type0 = attr0.object_type();
    let type1 = attr1.object_type();

    if run_all_tests
        && type0 == FilterObjectType::ParticleSystem
        && type1 == FilterObjectType::ParticleSystem
    {
        return BuiltinDecision::Decided(FilterFlags::KILL);
    }

    let link0 = type0 == FilterObjectType::Articulation;
    let link1 = type1 == FilterObjectType::Articulation;

    if run_all_tests && (link0 ^ link1) {
        let (link_side, other_type, other_kine) = if link0 {
            (0, type1, kine1)
        } else {
            (1, type0, kine0)
        };
        let other_static_or_kinematic = other_type == FilterObjectType::RigidStatic || other_kine;

        if other_static_or_kinematic && is_fixed_base_link(pair, link_side) {
            return BuiltinDecision::Decided(FilterFlags::SUPPRESS);
        }
    }

    if link0 && link1 {
        if run_all_tests && is_fixed_base_link(pair, 0) && is_fixed_base_link(pair, 1) {
            return BuiltinDecision::Decided(FilterFlags::SUPPRESS);
        }

        if filter_articulation_links(pair) {
            return BuiltinDecision::Decided(FilterFlags::KILL);
        }
    }

    BuiltinDecision::Undecided {
        is_kine_pair: kine0 && kine1,
        is_non_rigid,
    }
}
