use crate::consts::NULL_ELEMENT_ID;

/// Opaque element handle as reported by the broad phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementHandle(u32);

impl ElementHandle {
    pub const NULL: Self = Self(NULL_ELEMENT_ID);

    #[must_use]
    pub const fn new(element_id: u32) -> Self {
        Self(element_id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == NULL_ELEMENT_ID
    }
}

impl Default for ElementHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// Hands out element IDs, reusing released ones first.
#[derive(Default)]
pub(crate) struct ElementIdPool {
    next_id: u32,
    free_ids: Vec<u32>,
}

impl ElementIdPool {
    pub fn acquire(&mut self) -> u32 {
        if let Some(id) = self.free_ids.pop() {
            return id;
        }

        let id = self.next_id;
        self.next_id += 1;
        debug_assert_ne!(id, NULL_ELEMENT_ID);
        id
    }

    pub fn release(&mut self, id: u32) {
        self.free_ids.push(id);
    }
}
