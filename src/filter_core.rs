use crate::{
    config::FilterConfig,
    filtering::{
        FilterCallback, FilterInfo, FilterShader, FilteringContext, OverlapFilterCounts,
        OverlapPair, PairId, ShapePair, StatusChange, apply_external_decision, call_pair_lost,
        check_filter_flags, filter_pair, filter_pair_all_tests, run_overlap_filters,
    },
    interaction::{Interaction, InteractionTable, InteractionType, next_type},
    scene::{ActorKey, Scene, ShapeKey},
};
use ahash::AHashSet;
use log::{debug, error, warn};
use std::collections::VecDeque;

/// A pair whose decision waits for the filter callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingPair {
    pair_id: PairId,
    shapes: [ShapeKey; 2],
}

/// FIFO of pairs waiting for the callback, indexed by pair ID.
#[derive(Default)]
struct PendingQueue {
    queue: VecDeque<PendingPair>,
    ids: AHashSet<PairId>,
}

impl PendingQueue {
    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, pair_id: PairId) -> bool {
        self.ids.contains(&pair_id)
    }

    fn push(&mut self, pair: &ShapePair<'_>) {
        let pair_id = pair.pair_id();
        if self.ids.insert(pair_id) {
            debug!("deferring {pair_id:?} until the filter callback can run");
            self.queue.push_back(PendingPair {
                pair_id,
                shapes: pair.keys,
            });
        }
    }

    fn pop_front(&mut self) -> Option<PendingPair> {
        let pending = self.queue.pop_front()?;
        self.ids.remove(&pending.pair_id);
        Some(pending)
    }

    fn remove(&mut self, pair_id: PairId) {
        if self.ids.remove(&pair_id) {
            self.queue.retain(|p| p.pair_id != pair_id);
        }
    }

    fn remove_shape(&mut self, shape: ShapeKey) {
        let ids = &mut self.ids;
        self.queue.retain(|p| {
            let keep = !p.shapes.contains(&shape);
            if !keep {
                ids.remove(&p.pair_id);
            }
            keep
        });
    }
}

fn callback_mut(callback: &mut Option<Box<dyn FilterCallback>>) -> Option<&mut dyn FilterCallback> {
    callback.as_mut().map(|cb| cb.as_mut() as &mut dyn FilterCallback)
}

/// Owns the filter configuration and the live interactions of one scene.
///
/// Every method taking `&mut self` is a single-threaded phase; only
/// [`FilteringCore::run_overlap_filters`] fans out to the rayon pool and it never touches the
/// callback.
pub struct FilteringCore {
    config: FilterConfig,
    shader: Box<dyn FilterShader>,
    shader_data: Vec<u8>,
    callback: Option<Box<dyn FilterCallback>>,
    interactions: InteractionTable,
    pending_callback_pairs: PendingQueue,
    carried_status_change: Option<StatusChange>,
}

impl FilteringCore {
    #[must_use]
    pub fn new(config: FilterConfig, shader: impl FilterShader + 'static) -> Self {
        Self {
            config,
            shader: Box::new(shader),
            shader_data: Vec::new(),
            callback: None,
            interactions: InteractionTable::new(),
            pending_callback_pairs: PendingQueue::default(),
            carried_status_change: None,
        }
    }

    /// Opaque block handed to every shader call.
    #[must_use]
    pub fn with_shader_data(mut self, shader_data: Vec<u8>) -> Self {
        self.shader_data = shader_data;
        self
    }

    #[must_use]
    pub fn with_callback(mut self, callback: impl FilterCallback + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    #[must_use]
    pub const fn interactions(&self) -> &InteractionTable {
        &self.interactions
    }

    #[must_use]
    pub fn interaction(&self, pair_id: PairId) -> Option<&Interaction> {
        self.interactions.get(pair_id)
    }

    #[must_use]
    pub fn num_pending_callback_pairs(&self) -> usize {
        self.pending_callback_pairs.len()
    }

    #[must_use]
    pub fn is_pending(&self, pair_id: PairId) -> bool {
        self.pending_callback_pairs.contains(pair_id)
    }

    #[must_use]
    pub fn context(&self) -> FilteringContext<'_> {
        FilteringContext::new(
            &self.config,
            self.shader.as_ref(),
            &self.shader_data,
            self.callback.is_some(),
        )
    }

    /// Decides a batch of new overlaps, see [`run_overlap_filters`].
    pub fn run_overlap_filters(
        &self,
        scene: &Scene,
        pairs: &mut [OverlapPair],
        infos: &mut [FilterInfo],
    ) -> OverlapFilterCounts {
        run_overlap_filters(
            scene,
            &self.context(),
            pairs,
            infos,
            self.config.parallel_threshold,
        )
    }

    /// Creates interactions for the survivors of [`Self::run_overlap_filters`].
    ///
    /// Pairs that still wait for the callback are queued instead.
    pub fn apply_overlap_filters(
        &mut self,
        scene: &Scene,
        survivors: &[OverlapPair],
        infos: &[FilterInfo],
    ) {
        for (overlap, info) in survivors.iter().zip(infos) {
            let resolved = overlap
                .resolve(scene)
                .and_then(|(s0, s1)| ShapePair::resolve(scene, s0, s1));

            let pair = match resolved {
                Ok(pair) => pair,
                Err(e) => {
                    error!("apply_overlap_filters: {e}, skipping pair {overlap:?}");
                    continue;
                }
            };

            if info.is_deferred() {
                self.pending_callback_pairs.push(&pair);
                continue;
            }

            let pair_id = pair.pair_id();
            if self.interactions.contains(pair_id) {
                error!("apply_overlap_filters: {pair_id:?} is already tracked");
                continue;
            }

            let ty = next_type(pair.shapes[0], pair.shapes[1], info.filter_flags);
            self.interactions.create(&pair, ty, info);
        }
    }

    /// Filters a new pair involving a trigger shape and tracks it unless it was killed.
    pub fn create_trigger_interaction(
        &mut self,
        scene: &Scene,
        shape0: ShapeKey,
        shape1: ShapeKey,
    ) -> Option<&Interaction> {
        let pair = ShapePair::resolve(scene, shape0, shape1)
            .inspect_err(|e| error!("create_trigger_interaction: {e}"))
            .ok()?;

        let info = filter_pair(&pair, &self.context(), None);
        if info.is_killed() {
            return None;
        }

        if info.is_deferred() {
            self.pending_callback_pairs.push(&pair);
            return None;
        }

        let ty = next_type(pair.shapes[0], pair.shapes[1], info.filter_flags);
        self.interactions.create(&pair, ty, &info)
    }

    /// Trigger counterpart of the overlap batch; pairs are handled one by one.
    pub fn on_trigger_overlaps_created(&mut self, scene: &Scene, pairs: &[OverlapPair]) {
        for overlap in pairs {
            match overlap.resolve(scene) {
                Ok((s0, s1)) => {
                    self.create_trigger_interaction(scene, s0, s1);
                }
                Err(e) => error!("on_trigger_overlaps_created: {e}, skipping pair {overlap:?}"),
            }
        }
    }

    /// Re-evaluates a tracked pair and migrates its interaction to the new decision.
    ///
    /// `external` is a decision the callback handed over through a status change; without it the
    /// whole pipeline runs again, preceded by `pair_lost` for pairs registered with the callback.
    /// Returns the interaction now tracking the pair, `None` when the pair was dropped.
    pub fn refilter_interaction(
        &mut self,
        scene: &Scene,
        pair_id: PairId,
        external: Option<FilterInfo>,
    ) -> Option<&Interaction> {
        let Self {
            config,
            shader,
            shader_data,
            callback,
            interactions,
            ..
        } = self;

        let Some(existing) = interactions.get(pair_id) else {
            warn!("refilter_interaction: {pair_id:?} is not tracked");
            return None;
        };
        let old_type = existing.interaction_type();
        let was_filter_pair = existing.is_filter_pair();
        let [shape0, shape1] = existing.shapes();

        let Some(pair) = ShapePair::new(scene, shape0, shape1) else {
            error!("refilter_interaction: shapes of {pair_id:?} are gone, dropping it");
            interactions.destroy(pair_id);
            return None;
        };

        let context =
            FilteringContext::new(config, shader.as_ref(), shader_data, callback.is_some());

        let mut info = match external {
            Some(info) => apply_external_decision(&pair, info, &context, callback_mut(callback)),
            None => {
                if was_filter_pair && let Some(cb) = callback_mut(callback) {
                    call_pair_lost(&pair, cb, false);
                }
                filter_pair(&pair, &context, callback_mut(callback))
            }
        };

        if was_filter_pair && !info.filter_flags.is_notified() {
            info.has_pair_id = false;
        }

        let new_type = next_type(pair.shapes[0], pair.shapes[1], info.filter_flags);
        if new_type == old_type {
            interactions.refresh(pair_id, &info)
        } else {
            debug!("refilter_interaction: {pair_id:?} {old_type:?} -> {new_type:?}");
            interactions.convert(&pair, new_type, &info)
        }
    }

    /// Single-threaded retry of the pairs that needed the callback during the batch pass.
    pub fn drain_pending_callback_pairs(&mut self, scene: &Scene) {
        while let Some(pending) = self.pending_callback_pairs.pop_front() {
            if self.interactions.contains(pending.pair_id) {
                continue;
            }

            let Some(pair) = ShapePair::new(scene, pending.shapes[0], pending.shapes[1]) else {
                debug!("drain_pending_callback_pairs: {:?} went away", pending.pair_id);
                continue;
            };

            let Self {
                config,
                shader,
                shader_data,
                callback,
                interactions,
                ..
            } = self;
            let context =
                FilteringContext::new(config, shader.as_ref(), shader_data, callback.is_some());

            let info = if pair.is_trigger_pair() {
                filter_pair(&pair, &context, callback_mut(callback))
            } else {
                filter_pair_all_tests(&pair, &context, callback_mut(callback))
            };

            let ty = next_type(pair.shapes[0], pair.shapes[1], info.filter_flags);
            interactions.create(&pair, ty, &info);
        }
    }

    /// Polls the callback for decision changes and applies them.
    ///
    /// Applies at most [`FilterConfig::max_status_changes`] changes. A change polled past that
    /// bound is kept and applied first by the next drain.
    pub fn drain_callback_status_changes(&mut self, scene: &Scene) {
        if self.callback.is_none() {
            return;
        }

        for _ in 0..self.config.max_status_changes {
            let Some(change) = self
                .carried_status_change
                .take()
                .or_else(|| self.poll_status_change())
            else {
                return;
            };
            self.apply_status_change(scene, change);
        }

        if self.carried_status_change.is_none()
            && let Some(change) = self.poll_status_change()
        {
            warn!(
                "status_change: stopped after {} changes, the rest is handled next drain",
                self.config.max_status_changes
            );
            self.carried_status_change = Some(change);
        }
    }

    /// Whether a status change is waiting for the next drain.
    #[must_use]
    pub const fn has_carried_status_change(&self) -> bool {
        self.carried_status_change.is_some()
    }

    fn poll_status_change(&mut self) -> Option<StatusChange> {
        self.callback.as_mut().and_then(|cb| cb.status_change())
    }

    fn apply_status_change(&mut self, scene: &Scene, change: StatusChange) {
        let pair_id = change.pair_id;
        let Some(interaction) = self.interactions.get(pair_id) else {
            warn!("status_change: {pair_id:?} is not tracked, was it lost earlier this step?");
            return;
        };

        if !interaction.is_filter_pair() {
            warn!("status_change: {pair_id:?} is not registered with the filter callback");
            return;
        }
        let old_type = interaction.interaction_type();

        let mut filter_flags = change.filter_flags;
        check_filter_flags(&mut filter_flags);
        let info = FilterInfo {
            filter_flags,
            pair_flags: change.pair_flags,
            has_pair_id: true,
        };

        let same_overlap = self
            .refilter_interaction(scene, pair_id, Some(info))
            .is_some_and(|i| {
                old_type == InteractionType::Overlap && i.interaction_type() == old_type
            });

        if same_overlap {
            self.interactions.mark_filter_state_dirty(pair_id);
        }
    }

    fn lose_pair(&mut self, scene: &Scene, pair_id: PairId, volume_removed: bool) {
        self.pending_callback_pairs.remove(pair_id);

        let Some(interaction) = self.interactions.destroy(pair_id) else {
            return;
        };

        if !interaction.is_filter_pair() {
            return;
        }

        let [shape0, shape1] = interaction.shapes();
        match (ShapePair::new(scene, shape0, shape1), callback_mut(&mut self.callback)) {
            (Some(pair), Some(cb)) => call_pair_lost(&pair, cb, volume_removed),
            (None, Some(_)) => {
                error!("pair_lost for {pair_id:?} skipped, its shapes were removed first");
            }
            (_, None) => {}
        }
    }

    /// The broad phase stopped reporting an overlap.
    pub fn on_overlap_lost(&mut self, scene: &Scene, overlap: OverlapPair, volume_removed: bool) {
        if overlap.element0.is_null() || overlap.element1.is_null() {
            error!("on_overlap_lost: found null elements");
            return;
        }

        let pair_id = PairId::new(overlap.element0.id(), overlap.element1.id());
        self.lose_pair(scene, pair_id, volume_removed);
    }

    /// Tears down everything involving `shape`. Call before removing it from the scene.
    pub fn on_shape_removed(&mut self, scene: &Scene, shape: ShapeKey) {
        self.pending_callback_pairs.remove_shape(shape);

        for pair_id in self.interactions.pairs_of_shape(shape) {
            self.lose_pair(scene, pair_id, true);
        }
    }

    /// Tears down everything involving the shapes of `actor`.
    ///
    /// Call before removing it from the scene.
    pub fn on_actor_removed(&mut self, scene: &Scene, actor: ActorKey) {
        let Some(actor) = scene.actor(actor) else {
            return;
        };

        for shape in actor.shapes() {
            self.on_shape_removed(scene, *shape);
        }
    }

    pub fn report_touch(&mut self, pair_id: PairId, has_touch: bool) -> bool {
        self.interactions.report_touch(pair_id, has_touch)
    }

    pub fn set_active(&mut self, pair_id: PairId, active: bool) -> bool {
        self.interactions.set_active(pair_id, active)
    }

    pub fn mark_force_threshold_exceeded(&mut self, pair_id: PairId, exceeded: bool) -> bool {
        self.interactions.mark_force_threshold_exceeded(pair_id, exceeded)
    }

    /// Filters `pairs`, tracks the survivors and runs both callback drains.
    ///
    /// On return the survivors occupy the front of `pairs`.
    pub fn step(&mut self, scene: &Scene, pairs: &mut [OverlapPair]) -> OverlapFilterCounts {
        let mut infos = vec![FilterInfo::default(); pairs.len()];
        let counts = self.run_overlap_filters(scene, pairs, &mut infos);

        let survivors = counts.survivors();
        self.apply_overlap_filters(scene, &pairs[..survivors], &infos[..survivors]);
        self.drain_pending_callback_pairs(scene);
        self.drain_callback_status_changes(scene);

        counts
    }
}
