//! Thread control blocks.
//!
//! Every change a thread makes to another thread (or itself) through `init`
//! and `reset` lands in the `requested_*` fields and only takes effect when
//! the next pass commits them.

use serde::Serialize;

pub const THREAD_COUNT: usize = 64;

/// Program counter of a thread that is not running.
pub const NO_PC: u16 = 0xffff;

/// `requested_pc` value asking for the thread to be halted.
pub const HALT_REQUEST: u16 = 0xfffe;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    #[default]
    Running,
    Paused,
}

/// Observable lifecycle of a thread, derived from its control block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    Halted,
    Runnable,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thread {
    pub current_pc: u16,
    /// [`NO_PC`] when nothing is pending, [`HALT_REQUEST`] to halt.
    pub requested_pc: u16,
    pub current_state: ThreadState,
    pub requested_state: ThreadState,
}

impl Default for Thread {
    fn default() -> Self {
        Self::halted()
    }
}

impl Thread {
    pub const fn halted() -> Self {
        Self {
            current_pc: NO_PC,
            requested_pc: NO_PC,
            current_state: ThreadState::Running,
            requested_state: ThreadState::Running,
        }
    }

    pub const fn starting_at(pc: u16) -> Self {
        Self {
            current_pc: pc,
            ..Self::halted()
        }
    }

    /// Apply pending requests; called for every thread at the start of a pass.
    pub(crate) fn commit(&mut self) {
        self.current_state = self.requested_state;
        match self.requested_pc {
            NO_PC => {}
            HALT_REQUEST => {
                self.current_pc = NO_PC;
                self.requested_pc = NO_PC;
            }
            pc => {
                self.current_pc = pc;
                self.requested_pc = NO_PC;
            }
        }
    }

    pub fn is_runnable(&self) -> bool {
        self.current_pc != NO_PC && self.current_state == ThreadState::Running
    }

    pub fn status(&self) -> ThreadStatus {
        if self.current_pc == NO_PC {
            ThreadStatus::Halted
        } else if self.current_state == ThreadState::Paused {
            ThreadStatus::Paused
        } else {
            ThreadStatus::Runnable
        }
    }
}
