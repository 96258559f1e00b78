mod common;

use collision_filter::{
    ElementHandle, FilterConfig, FilterData, FilterFlags, FilterInfo, FilteringCore, OverlapPair,
    PairFlags,
    filtering::DefaultFilterShader,
    scene::{ActorConstructionInfo, GeometryType, Scene, ShapeConstructionInfo, ShapeKey},
};
use common::*;

const GROUP_A: FilterData = FilterData::group_mask(1, 1);
const GROUP_B: FilterData = FilterData::group_mask(2, 2);

struct Body {
    shape: ShapeKey,
    group_b: bool,
    killer: bool,
}

/// Dynamic bodies in two groups that only collide within themselves; "killer" bodies make the
/// shader kill every pair they are part of.
fn build_bodies(scene: &mut Scene, n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let group_b = i % 3 == 0;
            let killer = i % 5 == 0;
            let mut data = if group_b { GROUP_B } else { GROUP_A };
            if killer {
                data.word3 = u32::from(FilterFlags::KILL.bits());
            }

            let (_, shape) = add_body_with(
                scene,
                ActorConstructionInfo::rigid_dynamic(),
                ShapeConstructionInfo::new(GeometryType::Sphere).with_filter_data(data),
            );
            Body {
                shape,
                group_b,
                killer,
            }
        })
        .collect()
}

fn expected_flags(b0: &Body, b1: &Body) -> FilterFlags {
    if b0.group_b != b1.group_b {
        FilterFlags::SUPPRESS
    } else if b0.killer || b1.killer {
        FilterFlags::KILL
    } else {
        FilterFlags::DEFAULT
    }
}

fn all_pairs(scene: &Scene, bodies: &[Body]) -> Vec<(OverlapPair, FilterFlags)> {
    let mut pairs = Vec::new();
    for (i, b0) in bodies.iter().enumerate() {
        for b1 in &bodies[i + 1..] {
            pairs.push((overlap(scene, b0.shape, b1.shape), expected_flags(b0, b1)));
        }
    }
    pairs
}

fn run(
    core: &FilteringCore,
    scene: &Scene,
    input: &[OverlapPair],
) -> (Vec<OverlapPair>, Vec<FilterInfo>, usize, usize) {
    let mut pairs = input.to_vec();
    let mut infos = vec![FilterInfo::default(); pairs.len()];
    let counts = core.run_overlap_filters(scene, &mut pairs, &mut infos);

    let n = counts.survivors();
    pairs.truncate(n);
    infos.truncate(n);
    (pairs, infos, counts.n_keep, counts.n_suppress)
}

#[test]
fn survivors_are_compacted_in_order() {
    init_for_test();

    let mut scene = Scene::new();
    let bodies = build_bodies(&mut scene, 12);
    let expected = all_pairs(&scene, &bodies);
    let input: Vec<_> = expected.iter().map(|(pair, _)| *pair).collect();

    let core = scripted_core();
    let (survivors, infos, n_keep, n_suppress) = run(&core, &scene, &input);

    let killed = expected.iter().filter(|(_, f)| f.is_killed()).count();
    assert!(killed > 0);
    assert_eq!(survivors.len(), input.len() - killed);
    assert_eq!(n_keep + n_suppress, input.len() - killed);

    let kept_in_order: Vec<_> = expected
        .iter()
        .filter(|(_, f)| !f.is_killed())
        .collect();
    for ((pair, info), (expected_pair, expected_flags)) in
        survivors.iter().zip(&infos).zip(kept_in_order)
    {
        assert_eq!(pair, expected_pair);
        assert_eq!(info.filter_flags, *expected_flags);
    }

    let suppressed = expected.iter().filter(|(_, f)| f.is_suppressed()).count();
    assert_eq!(n_suppress, suppressed);
}

#[test]
fn parallel_and_inline_paths_agree() {
    let mut scene = Scene::new();
    let bodies = build_bodies(&mut scene, 40);
    let input: Vec<_> = all_pairs(&scene, &bodies).into_iter().map(|(pair, _)| pair).collect();

    let parallel = FilteringCore::new(
        FilterConfig {
            parallel_threshold: 0,
            ..FilterConfig::DEFAULT
        },
        scripted_shader,
    );
    let inline = FilteringCore::new(
        FilterConfig {
            parallel_threshold: usize::MAX,
            ..FilterConfig::DEFAULT
        },
        scripted_shader,
    );

    assert_eq!(run(&parallel, &scene, &input), run(&inline, &scene, &input));
}

#[test]
fn unresolvable_pairs_are_skipped() {
    let mut scene = Scene::new();
    let (actor, s0) = add_body(&mut scene, ActorConstructionInfo::rigid_dynamic());
    let sibling = scene.add_shape(actor, shape_info(GeometryType::Sphere)).unwrap();
    let (_, s1) = add_body(&mut scene, ActorConstructionInfo::rigid_dynamic());
    let (_, broken) = add_body(&mut scene, ActorConstructionInfo::rigid_dynamic());
    let (_, removed) = add_body(&mut scene, ActorConstructionInfo::rigid_dynamic());

    let good = overlap(&scene, s0, s1);
    let stale = overlap(&scene, s1, removed);
    scene.remove_shape(removed);
    scene.invalidate_shape_core(broken);

    let input = [
        OverlapPair::new(ElementHandle::NULL, scene.element_handle(s1)),
        overlap(&scene, s0, broken),
        good,
        stale,
        overlap(&scene, s0, sibling),
    ];

    let core = scripted_core();
    let (survivors, infos, n_keep, n_suppress) = run(&core, &scene, &input);
    assert_eq!(survivors, vec![good]);
    assert_eq!(infos[0].pair_flags, PairFlags::CONTACT_DEFAULT);
    assert_eq!((n_keep, n_suppress), (1, 0));
}

#[test]
fn short_output_buffer_truncates_the_batch() {
    let mut scene = Scene::new();
    let bodies = build_bodies(&mut scene, 4);
    let input: Vec<_> = all_pairs(&scene, &bodies)
        .into_iter()
        .filter(|(_, f)| !f.is_killed())
        .map(|(pair, _)| pair)
        .collect();
    assert!(input.len() >= 2);

    let core = scripted_core();
    let mut pairs = input.clone();
    let mut infos = vec![FilterInfo::default(); 1];
    let counts = core.run_overlap_filters(&scene, &mut pairs, &mut infos);

    assert_eq!(counts.survivors(), 1);
    assert_eq!(pairs[0], input[0]);
}

#[test]
fn step_tracks_survivors() {
    let mut scene = Scene::new();
    let (_, ground) = add_body(&mut scene, ActorConstructionInfo::rigid_static());
    let (_, ball) = add_body(&mut scene, ActorConstructionInfo::rigid_dynamic());
    let (_, lonely) = add_body_with(
        &mut scene,
        ActorConstructionInfo::rigid_dynamic(),
        ShapeConstructionInfo::new(GeometryType::Sphere).with_filter_data(GROUP_B),
    );

    let mut core = FilteringCore::new(FilterConfig::default(), DefaultFilterShader);
    let mut pairs = [overlap(&scene, ground, ball), overlap(&scene, lonely, ball)];
    let counts = core.step(&scene, &mut pairs);

    assert_eq!((counts.n_keep, counts.n_suppress), (1, 1));
    assert_eq!(core.interactions().len(), 2);

    let contact = core.interaction(pair_id(&scene, ball, ground)).unwrap();
    assert_eq!(contact.as_overlap().unwrap().pair_flags(), PairFlags::CONTACT_DEFAULT);
    assert!(contact.is_active());

    let marker = core.interaction(pair_id(&scene, ball, lonely)).unwrap();
    assert_eq!(marker.interaction_type(), collision_filter::InteractionType::Marker);
    assert!(!marker.is_active());
}
