use crate::consts::{MAX_STATUS_CHANGES_PER_DRAIN, PARALLEL_FILTER_THRESHOLD};

/// How pairs involving kinematic bodies are treated before the user shader runs.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum PairFilteringMode {
    /// Hand the pair to the shader like any other.
    Keep,
    /// Track the pair without generating contacts.
    #[default]
    Suppress,
    /// Accepted for compatibility, behaves like `Suppress`.
    Kill,
}

impl PairFilteringMode {
    #[must_use]
    pub const fn filters_out(self) -> bool {
        !matches!(self, Self::Keep)
    }
}

#[derive(Clone, Debug)]
pub struct FilterConfig {
    pub kine_kine_filtering_mode: PairFilteringMode,
    pub static_kine_filtering_mode: PairFilteringMode,
    /// Contact reports are unavailable through the direct GPU API and get stripped.
    pub direct_gpu_api: bool,
    /// Batches at least this large are filtered on the rayon pool.
    pub parallel_threshold: usize,
    /// Upper bound on status changes applied per drain.
    pub max_status_changes: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FilterConfig {
    pub const DEFAULT: Self = Self {
        kine_kine_filtering_mode: PairFilteringMode::Suppress,
        static_kine_filtering_mode: PairFilteringMode::Suppress,
        direct_gpu_api: false,
        parallel_threshold: PARALLEL_FILTER_THRESHOLD,
        max_status_changes: MAX_STATUS_CHANGES_PER_DRAIN,
    };
}
