//! Runtime engine for executing outworld bytecode.
//!
//! The machine runs one scheduling pass per frame: inputs are copied into
//! reserved registers, deferred thread changes are committed, then every
//! runnable thread executes until it yields.

mod error;
mod exec;
mod host;
mod input;
mod machine;
mod pacer;
mod recorder;
mod registers;
mod stack;
mod thread;
mod trace;

#[cfg(test)]
mod machine_tests;
#[cfg(test)]
mod stack_tests;
#[cfg(test)]
mod test_host;

pub use error::RuntimeError;
pub use host::{AudioSink, Clock, Host, ResourceError, ResourceProvider, VideoSink};
pub use input::Controls;
pub use machine::{
    FuelLimits, Machine, MachineBuilder, MachineConfig, Snapshot, ThreadSnapshot, Variant,
};
pub use pacer::Pacer;
pub use recorder::{HostCall, Recorder};
pub use registers::Registers;
pub use stack::CallStack;
pub use thread::{THREAD_COUNT, Thread, ThreadState, ThreadStatus};
pub use trace::{LogTracer, NoopTracer, PrintTracer, Tracer};
