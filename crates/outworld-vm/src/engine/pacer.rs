//! Frame pacing.
//!
//! Bytecode sets `PAUSE_SLICES` to the number of 20 ms slices the current
//! frame should stay on screen. The pacer turns that into the deadline of
//! the next pass.

/// Length of one pause slice in milliseconds.
pub const SLICE_MS: u32 = 20;

/// Back-off applied while stopped or paused.
pub const IDLE_MS: u32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pacer {
    prev: u32,
    next: u32,
}

impl Pacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pass is due at `now`.
    ///
    /// While `idle`, the deadline keeps sliding forward so that resuming does
    /// not trigger a burst of catch-up passes.
    pub fn is_ready(&mut self, now: u32, idle: bool) -> bool {
        if idle {
            self.next = now.wrapping_add(IDLE_MS);
            return false;
        }
        if now >= self.next {
            self.prev = self.next;
            return true;
        }
        false
    }

    /// Compute the next deadline after a pass that requested `pause_slices`.
    ///
    /// Deadlines chain from the previous deadline rather than from `now`, and
    /// are always strictly in the future.
    pub fn schedule(&mut self, now: u32, pause_slices: u16) {
        let delay = u32::from(pause_slices) * SLICE_MS;
        self.next = self.prev.wrapping_add(delay);
        if self.next <= now {
            self.next = now.wrapping_add(1);
        }
    }

    pub fn next_deadline(&self) -> u32 {
        self.next
    }
}
