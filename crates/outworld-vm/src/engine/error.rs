//! Errors that stop bytecode execution.

use outworld_bytecode::StreamError;

use super::host::ResourceError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("stack overflow in 'call' at {pc:#06x} (thread {thread})")]
    StackOverflow { thread: u8, pc: u16 },

    #[error("stack underflow in 'ret' at {pc:#06x} (thread {thread})")]
    StackUnderflow { thread: u8, pc: u16 },

    #[error("invalid opcode {opcode:#04x} at {pc:#06x} (thread {thread})")]
    InvalidOpcode { thread: u8, pc: u16, opcode: u8 },

    #[error("invalid conditional jump {condition} at {pc:#06x} (thread {thread})")]
    InvalidCondition { thread: u8, pc: u16, condition: u8 },

    #[error("invalid reset mode {mode:#04x} at {pc:#06x} (thread {thread})")]
    InvalidResetMode { thread: u8, pc: u16, mode: u8 },

    /// `init` or `reset` addressed a thread outside the 64-entry table.
    #[error("thread index {index} out of range at {pc:#06x} (thread {thread})")]
    InvalidThread { thread: u8, pc: u16, index: u8 },

    /// Too many instructions in one pass: some thread never yields.
    #[error("execution limit exceeded at {pc:#06x} (thread {thread})")]
    ExecFuelExhausted { thread: u8, pc: u16 },

    #[error("bytecode error in thread {thread}: {source}")]
    Bytecode {
        thread: u8,
        #[source]
        source: StreamError,
    },

    #[error("cannot load resource {id:#06x}: {source}")]
    Resource {
        id: u16,
        #[source]
        source: ResourceError,
    },
}
