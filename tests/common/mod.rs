#![allow(dead_code)]

use collision_filter::{
    DefaultFilterShader, FilterCallback, FilterConfig, FilterData, FilterFlags, FilterObject,
    FilterObjectAttributes, FilteringCore, OverlapPair, PairFlags, PairId, StatusChange, logging,
    scene::{ActorConstructionInfo, ActorKey, GeometryType, Scene, ShapeConstructionInfo, ShapeKey},
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Group 1, collides with every group.
pub const COLLIDE_ALL: FilterData = FilterData::group_mask(1, u32::MAX);

pub fn init_for_test() {
    let _ = logging::try_init();
}

/// Filter data that collides with everything, requests `extra` pair flags and returns `filter`.
pub const fn scripted_data(extra: PairFlags, filter: FilterFlags) -> FilterData {
    FilterData::new(1, u32::MAX, extra.bits() as u32, filter.bits() as u32)
}

/// Default shader semantics plus two knobs carried in the filter data: `word2` adds pair flags,
/// `word3` is returned as filter flags.
pub fn scripted_shader(
    attributes0: FilterObjectAttributes,
    data0: &FilterData,
    attributes1: FilterObjectAttributes,
    data1: &FilterData,
    pair_flags: &mut PairFlags,
    _constant_block: &[u8],
) -> FilterFlags {
    let extra = PairFlags::from_bits_truncate((data0.word2 | data1.word2) as u16);

    if attributes0.is_trigger() || attributes1.is_trigger() {
        *pair_flags = PairFlags::TRIGGER_DEFAULT | extra;
    } else if !DefaultFilterShader::groups_collide(data0, data1) {
        return FilterFlags::SUPPRESS;
    } else {
        *pair_flags = PairFlags::CONTACT_DEFAULT | extra;
    }

    FilterFlags::from_bits_truncate((data0.word3 | data1.word3) as u16)
}

pub fn scripted_core() -> FilteringCore {
    FilteringCore::new(FilterConfig::DEFAULT, scripted_shader)
}

pub fn shape_info(geometry: GeometryType) -> ShapeConstructionInfo {
    ShapeConstructionInfo::new(geometry).with_filter_data(COLLIDE_ALL)
}

pub fn add_body(scene: &mut Scene, info: ActorConstructionInfo) -> (ActorKey, ShapeKey) {
    add_body_with(scene, info, shape_info(GeometryType::Box))
}

pub fn add_body_with(
    scene: &mut Scene,
    info: ActorConstructionInfo,
    shape: ShapeConstructionInfo,
) -> (ActorKey, ShapeKey) {
    let actor = scene.add_actor(info);
    let shape = scene.add_shape(actor, shape).unwrap();
    (actor, shape)
}

pub fn overlap(scene: &Scene, shape0: ShapeKey, shape1: ShapeKey) -> OverlapPair {
    OverlapPair::new(scene.element_handle(shape0), scene.element_handle(shape1))
}

pub fn pair_id(scene: &Scene, shape0: ShapeKey, shape1: ShapeKey) -> PairId {
    let e0 = scene.element_handle(shape0).id();
    let e1 = scene.element_handle(shape1).id();
    PairId::new(e0, e1)
}

#[derive(Default)]
pub struct CallbackLog {
    pub found: Vec<PairId>,
    pub lost: Vec<(PairId, bool)>,
    /// What `pair_found` answers.
    pub answer: FilterFlags,
    pub status_changes: VecDeque<StatusChange>,
    pub polls: usize,
}

pub type SharedLog = Arc<Mutex<CallbackLog>>;

/// Callback double whose state stays reachable after it was moved into the core.
#[derive(Clone, Default)]
pub struct RecordingCallback(pub SharedLog);

impl RecordingCallback {
    pub fn answering(answer: FilterFlags) -> (Self, SharedLog) {
        let log = Arc::new(Mutex::new(CallbackLog {
            answer,
            ..Default::default()
        }));
        (Self(log.clone()), log)
    }
}

impl FilterCallback for RecordingCallback {
    fn pair_found(
        &mut self,
        pair_id: PairId,
        _object0: &FilterObject,
        _object1: &FilterObject,
        _pair_flags: &mut PairFlags,
    ) -> FilterFlags {
        let mut log = self.0.lock().unwrap();
        log.found.push(pair_id);
        log.answer
    }

    fn pair_lost(
        &mut self,
        pair_id: PairId,
        _object0: &FilterObject,
        _object1: &FilterObject,
        volume_removed: bool,
    ) {
        self.0.lock().unwrap().lost.push((pair_id, volume_removed));
    }

    fn status_change(&mut self) -> Option<StatusChange> {
        let mut log = self.0.lock().unwrap();
        log.polls += 1;
        log.status_changes.pop_front()
    }
}
