use super::{
    BuiltinDecision, FilterCallback, FilterFlags, FilterInfo, FilterObjectAttributes,
    FilteringContext, PairFlags, ShapePair, attributes_of, check_filter_flags,
    evaluate_builtin_rules,
};
use log::{debug, warn};

fn pair_attributes(pair: &ShapePair<'_>, support_triggers: bool) -> [FilterObjectAttributes; 2] {
    [
        attributes_of(pair.shapes[0], pair.actors[0], support_triggers),
        attributes_of(pair.shapes[1], pair.actors[1], support_triggers),
    ]
}

/// Tells the callback that a registered pair is gone.
pub fn call_pair_lost(
    pair: &ShapePair<'_>,
    callback: &mut dyn FilterCallback,
    volume_removed: bool,
) {
    let attributes = pair_attributes(pair, true);
    let object0 = pair.filter_object(0, attributes[0]);
    let object1 = pair.filter_object(1, attributes[1]);

    callback.pair_lost(pair.pair_id(), &object0, &object1, volume_removed);
}

/// Repairs pair flags of a pair that is going to be processed.
///
/// Killed or suppressed pairs are left alone.
pub fn check_pair_flags(
    pair: &ShapePair<'_>,
    is_kine_pair: bool,
    is_non_rigid: bool,
    filter_flags: FilterFlags,
    pair_flags: &mut PairFlags,
    context: &FilteringContext<'_>,
) {
    if filter_flags.intersects(FilterFlags::KILL | FilterFlags::SUPPRESS) {
        return;
    }

    if context.direct_gpu_api {
        pair_flags.remove(PairFlags::DIRECT_GPU_DISABLED_REPORTS);
    }

    if is_kine_pair && pair_flags.contains(PairFlags::SOLVE_CONTACT) {
        warn!(
            "Filtering: contact resolution between kinematic bodies is not supported. \
             SOLVE_CONTACT will be cleared."
        );
        pair_flags.remove(PairFlags::SOLVE_CONTACT);
    }

    if is_non_rigid {
        pair_flags.remove(PairFlags::DETECT_CCD_CONTACT);
    }

    if !pair_flags.intersects(PairFlags::CONTACT_REPORT_EVENTS | PairFlags::SOLVE_CONTACT) {
        debug!(
            "Filtering: pair {:?} requests neither reports nor SOLVE_CONTACT; \
             suppress or kill it instead.",
            pair.pair_id()
        );
    }

    if !pair_flags.intersects(PairFlags::DETECT_DISCRETE_CONTACT | PairFlags::DETECT_CCD_CONTACT) {
        debug!(
            "Filtering: pair {:?} requests neither discrete nor CCD detection; \
             suppress or kill it instead.",
            pair.pair_id()
        );
    }

    if pair.is_trigger_pair()
        && pair_flags.intersects(PairFlags::TRIGGER_DEFAULT)
        && pair_flags.contains(PairFlags::DETECT_CCD_CONTACT)
    {
        warn!("Filtering: CCD is not supported on triggers.");
    }
}

/// Shader, callback and cleanup for a pair the built-in rules left undecided.
///
/// With `callback == None` a pair asking for the callback is returned with `CALLBACK` set and
/// no pair ID, which [`FilterInfo::is_deferred`] picks up.
fn second_stage(
    pair: &ShapePair<'_>,
    attributes: [FilterObjectAttributes; 2],
    is_kine_pair: bool,
    is_non_rigid: bool,
    context: &FilteringContext<'_>,
    mut callback: Option<&mut dyn FilterCallback>,
) -> FilterInfo {
    let [attr0, attr1] = attributes;
    let mut info = FilterInfo::default();

    info.filter_flags = context.shader.filter(
        attr0,
        pair.shapes[0].filter_data(),
        attr1,
        pair.shapes[1].filter_data(),
        &mut info.pair_flags,
        context.shader_data,
    );

    if info.filter_flags.wants_callback() {
        if !context.has_callback {
            warn!("Filtering: the shader requested CALLBACK but no filter callback is installed.");
            info.filter_flags.remove(FilterFlags::NOTIFY);
        } else {
            let Some(cb) = callback.as_deref_mut() else {
                return info;
            };

            let object0 = pair.filter_object(0, attr0);
            let object1 = pair.filter_object(1, attr1);
            info.filter_flags =
                cb.pair_found(pair.pair_id(), &object0, &object1, &mut info.pair_flags);
            info.has_pair_id = true;
        }
    }

    check_filter_flags(&mut info.filter_flags);

    if info.has_pair_id && (info.is_killed() || !info.filter_flags.is_notified()) {
        if info.is_killed()
            && info.filter_flags.is_notified()
            && let Some(cb) = callback.as_deref_mut()
        {
            call_pair_lost(pair, cb, false);
        }

        info.filter_flags.remove(FilterFlags::NOTIFY);
        info.has_pair_id = false;
    }

    check_pair_flags(
        pair,
        is_kine_pair,
        is_non_rigid,
        info.filter_flags,
        &mut info.pair_flags,
        context,
    );

    info
}

/// Full pipeline for a fresh broad-phase pair.
pub fn filter_pair_all_tests(
    pair: &ShapePair<'_>,
    context: &FilteringContext<'_>,
    callback: Option<&mut dyn FilterCallback>,
) -> FilterInfo {
    let attributes = pair_attributes(pair, false);

    match evaluate_builtin_rules(pair, attributes, context, true) {
        BuiltinDecision::Decided(flags) => FilterInfo::new(flags),
        BuiltinDecision::Undecided {
            is_kine_pair,
            is_non_rigid,
        } => second_stage(pair, attributes, is_kine_pair, is_non_rigid, context, callback),
    }
}

/// Pipeline for trigger pairs and refiltering.
///
/// Trigger pairs skip the built-in rules; two triggers never interact.
pub fn filter_pair(
    pair: &ShapePair<'_>,
    context: &FilteringContext<'_>,
    callback: Option<&mut dyn FilterCallback>,
) -> FilterInfo {
    let attributes = pair_attributes(pair, true);
    let [attr0, attr1] = attributes;

    if attr0.is_trigger() || attr1.is_trigger() {
        if attr0.is_trigger() && attr1.is_trigger() {
            return FilterInfo::new(FilterFlags::KILL);
        }

        let is_kine_pair = attr0.is_kinematic() && attr1.is_kinematic();
        return second_stage(pair, attributes, is_kine_pair, false, context, callback);
    }

    match evaluate_builtin_rules(pair, attributes, context, false) {
        BuiltinDecision::Decided(flags) => FilterInfo::new(flags),
        BuiltinDecision::Undecided {
            is_kine_pair,
            is_non_rigid,
        } => second_stage(pair, attributes, is_kine_pair, is_non_rigid, context, callback),
    }
}

/// Applies a decision handed over by the callback for a registered pair.
pub fn apply_external_decision(
    pair: &ShapePair<'_>,
    mut info: FilterInfo,
    context: &FilteringContext<'_>,
    callback: Option<&mut dyn FilterCallback>,
) -> FilterInfo {
    if info.is_killed() && info.filter_flags.is_notified() {
        if let Some(cb) = callback {
            call_pair_lost(pair, cb, false);
        }
        info.filter_flags.remove(FilterFlags::NOTIFY);
        info.has_pair_id = false;
    }

    let is_kine_pair = pair.actors[0].is_kinematic() && pair.actors[1].is_kinematic();
    let is_non_rigid = pair.actors[0].is_non_rigid() || pair.actors[1].is_non_rigid();
    check_pair_flags(
        pair,
        is_kine_pair,
        is_non_rigid,
        info.filter_flags,
        &mut info.pair_flags,
        context,
    );

    info
}
