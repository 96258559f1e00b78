use super::{FilterInfo, FilteringContext, ShapePair, filter_pair, filter_pair_all_tests};
use crate::{
    error::ResolveError,
    scene::{ElementHandle, Scene, ShapeKey},
};
use log::error;
use rayon::prelude::*;

/// A new overlap reported by the broad phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OverlapPair {
    pub element0: ElementHandle,
    pub element1: ElementHandle,
}

impl OverlapPair {
    #[must_use]
    pub const fn new(element0: ElementHandle, element1: ElementHandle) -> Self {
        Self { element0, element1 }
    }

    /// Both shapes behind the handles.
    pub fn resolve(&self, scene: &Scene) -> Result<(ShapeKey, ShapeKey), ResolveError> {
        if self.element0.is_null() || self.element1.is_null() {
            return Err(ResolveError::NullElement);
        }

        Ok((scene.resolve(self.element0)?, scene.resolve(self.element1)?))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlapFilterCounts {
    /// Survivors that become regular interactions.
    pub n_keep: usize,
    /// Survivors that become markers.
    pub n_suppress: usize,
}

impl OverlapFilterCounts {
    #[must_use]
    pub const fn survivors(&self) -> usize {
        self.n_keep + self.n_suppress
    }
}

fn decide(
    scene: &Scene,
    pair: OverlapPair,
    context: &FilteringContext<'_>,
) -> Result<FilterInfo, ResolveError> {
    let (shape0, shape1) = pair.resolve(scene)?;
    let shapes = ShapePair::resolve(scene, shape0, shape1)?;

    // The callback is never borrowed here; pairs needing it come back deferred.
    Ok(if shapes.is_trigger_pair() {
        filter_pair(&shapes, context, None)
    } else {
        filter_pair_all_tests(&shapes, context, None)
    })
}

fn decide_logged(
    scene: &Scene,
    pair: OverlapPair,
    context: &FilteringContext<'_>,
) -> Option<FilterInfo> {
    decide(scene, pair, context)
        .inspect_err(|e| error!("run_overlap_filters: {e}, skipping pair {pair:?}"))
        .ok()
}

/// Filters a batch of new overlaps and compacts the survivors to the front of `pairs`.
///
/// `infos[i]` receives the decision for the surviving `pairs[i]`. Killed pairs and pairs whose
/// handles do not resolve are dropped, the rest keep their relative order. Batches of at least
/// `parallel_threshold` pairs are decided on the rayon pool.
pub fn run_overlap_filters(
    scene: &Scene,
    context: &FilteringContext<'_>,
    pairs: &mut [OverlapPair],
    infos: &mut [FilterInfo],
    parallel_threshold: usize,
) -> OverlapFilterCounts {
    let mut n = pairs.len();
    if infos.len() < n {
        error!(
            "run_overlap_filters: output buffer holds {} entries for {n} pairs, truncating",
            infos.len()
        );
        n = infos.len();
    }
    let pairs = &mut pairs[..n];

    let decisions: Vec<Option<FilterInfo>> = if n >= parallel_threshold {
        pairs
            .par_iter()
            .map(|pair| decide_logged(scene, *pair, context))
            .collect()
    } else {
        pairs
            .iter()
            .map(|pair| decide_logged(scene, *pair, context))
            .collect()
    };

    let mut counts = OverlapFilterCounts::default();
    let mut offset = 0;

    for (i, decision) in decisions.into_iter().enumerate() {
        let Some(info) = decision else {
            continue;
        };

        if info.is_killed() {
            continue;
        }

        if info.is_suppressed() {
            counts.n_suppress += 1;
        } else {
            counts.n_keep += 1;
        }

        pairs[offset] = pairs[i];
        infos[offset] = info;
        offset += 1;
    }

    counts
}
