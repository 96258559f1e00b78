use super::FilterShader;
use crate::config::{FilterConfig, PairFilteringMode};

/// Immutable snapshot of everything filtering reads besides the scene.
///
/// Shared by every worker of the parallel pass. Only records whether a callback is installed;
/// the callback itself is borrowed by single-threaded phases.
#[derive(Clone, Copy)]
pub struct FilteringContext<'a> {
    pub shader: &'a dyn FilterShader,
    pub shader_data: &'a [u8],
    pub has_callback: bool,
    pub kine_kine_filtering_mode: PairFilteringMode,
    pub static_kine_filtering_mode: PairFilteringMode,
    pub direct_gpu_api: bool,
}

impl<'a> FilteringContext<'a> {
    #[must_use]
    pub fn new(
        config: &FilterConfig,
        shader: &'a dyn FilterShader,
        shader_data: &'a [u8],
        has_callback: bool,
    ) -> Self {
        Self {
            shader,
            shader_data,
            has_callback,
            kine_kine_filtering_mode: config.kine_kine_filtering_mode,
            static_kine_filtering_mode: config.static_kine_filtering_mode,
            direct_gpu_api: config.direct_gpu_api,
        }
    }
}
