/// Batches with at least this many candidate pairs are filtered on the rayon pool.
pub const PARALLEL_FILTER_THRESHOLD: usize = 256;

/// Upper bound on `status_change` polls during one drain.
pub const MAX_STATUS_CHANGES_PER_DRAIN: usize = 1 << 16;

/// Element ID that never resolves to a shape.
pub const NULL_ELEMENT_ID: u32 = u32::MAX;

/// Number of low bits of a filter attribute word holding the object type.
pub const FILTER_OBJECT_TYPE_BITS: u32 = 5;
