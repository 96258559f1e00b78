use super::{FilterFlags, PairFlags};
use log::warn;

/// Decision for one shape pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterInfo {
    pub filter_flags: FilterFlags,
    pub pair_flags: PairFlags,
    /// The pair is registered with the filter callback.
    pub has_pair_id: bool,
}

impl FilterInfo {
    #[must_use]
    pub const fn new(filter_flags: FilterFlags) -> Self {
        Self {
            filter_flags,
            pair_flags: PairFlags::empty(),
            has_pair_id: false,
        }
    }

    #[must_use]
    pub const fn with_pair_flags(mut self, pair_flags: PairFlags) -> Self {
        self.pair_flags = pair_flags;
        self
    }

    /// Asked for the callback, which could not run yet.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        self.filter_flags.wants_callback() && !self.has_pair_id
    }

    #[must_use]
    pub const fn is_killed(&self) -> bool {
        self.filter_flags.is_killed()
    }

    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.filter_flags.is_suppressed()
    }

    /// Repairs flag combinations that cannot coexist. Idempotent.
    pub fn sanitize(&mut self) {
        check_filter_flags(&mut self.filter_flags);

        if !self.filter_flags.is_notified() {
            self.has_pair_id = false;
        }
    }
}

/// `KILL` and `SUPPRESS` must not be set together; `SUPPRESS` wins.
pub fn check_filter_flags(filter_flags: &mut FilterFlags) {
    if filter_flags.contains(FilterFlags::KILL | FilterFlags::SUPPRESS) {
        warn!(
            "Filtering: KILL and SUPPRESS must not be set simultaneously. SUPPRESS will be used."
        );
        filter_flags.remove(FilterFlags::KILL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_filter_flag_combinations() -> impl Iterator<Item = FilterFlags> {
        (0..16u16).map(FilterFlags::from_bits_truncate)
    }

    #[test]
    fn sanitize_is_idempotent() {
        for flags in all_filter_flag_combinations() {
            for has_pair_id in [false, true] {
                let mut once = FilterInfo {
                    filter_flags: flags,
                    pair_flags: PairFlags::CONTACT_DEFAULT,
                    has_pair_id,
                };
                once.sanitize();

                let mut twice = once;
                twice.sanitize();
                assert_eq!(once, twice, "flags {flags:?}");
            }
        }
    }

    #[test]
    fn sanitize_never_leaves_kill_and_suppress() {
        for flags in all_filter_flag_combinations() {
            let mut info = FilterInfo::new(flags);
            info.sanitize();
            assert!(!(info.is_killed() && info.is_suppressed()));
        }
    }

    #[test]
    fn suppress_wins_over_kill() {
        let mut flags = FilterFlags::KILL | FilterFlags::SUPPRESS;
        check_filter_flags(&mut flags);
        assert_eq!(flags, FilterFlags::SUPPRESS);
    }

    #[test]
    fn pair_id_requires_notify() {
        let mut info = FilterInfo {
            filter_flags: FilterFlags::SUPPRESS,
            pair_flags: PairFlags::empty(),
            has_pair_id: true,
        };
        info.sanitize();
        assert!(!info.has_pair_id);
    }
}
