//! Return-address stack shared by all threads.
//!
//! Fixed depth, no per-thread frames: a thread that calls and then yields
//! leaves its return address for whichever thread executes `ret` next.

pub const STACK_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_DEPTH],
    len: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStack {
    pub fn new() -> Self {
        Self {
            slots: [0; STACK_DEPTH],
            len: 0,
        }
    }

    /// Push a return address. Returns `None` when all slots are used.
    #[must_use]
    pub fn push(&mut self, return_addr: u16) -> Option<()> {
        let slot = self.slots.get_mut(self.len)?;
        *slot = return_addr;
        self.len += 1;
        Some(())
    }

    /// Pop the most recent return address, or `None` when empty.
    pub fn pop(&mut self) -> Option<u16> {
        self.len = self.len.checked_sub(1)?;
        Some(self.slots[self.len])
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots = [0; STACK_DEPTH];
        self.len = 0;
    }
}
