mod attributes;
mod builtin_rules;
mod context;
mod filter_info;
mod flags;
mod overlap_filter;
mod pair_id;
mod pair_view;
mod pipeline;
mod shader;

pub use attributes::attributes_of;
pub use builtin_rules::{BuiltinDecision, evaluate_builtin_rules};
pub use context::FilteringContext;
pub use filter_info::{FilterInfo, check_filter_flags};
pub use flags::*;
pub use overlap_filter::{OverlapFilterCounts, OverlapPair, run_overlap_filters};
pub use pair_id::PairId;
pub use pair_view::ShapePair;
pub use pipeline::{
    apply_external_decision, call_pair_lost, check_pair_flags, filter_pair, filter_pair_all_tests,
};
pub use shader::{DefaultFilterShader, FilterCallback, FilterObject, FilterShader, StatusChange};
