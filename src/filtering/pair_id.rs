use std::{fmt, mem};

/// Identity of an unordered shape pair, built from the two element IDs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(u64);

impl PairId {
    #[must_use]
    pub const fn new(mut element0: u32, mut element1: u32) -> Self {
        if element1 < element0 {
            mem::swap(&mut element0, &mut element1);
        }

        Self(((element0 as u64) << 32) | element1 as u64)
    }

    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Element IDs as `(low, high)`.
    #[must_use]
    pub const fn elements(self) -> (u32, u32) {
        ((self.0 >> 32) as u32, self.0 as u32)
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = self.elements();
        write!(f, "PairId({lo}, {hi})")
    }
}
