//! Runtime VM for executing outworld bytecode.
//!
//! This crate provides the cooperative scheduler that runs up to 64 bytecode
//! threads against one shared register bank, forwarding drawing, audio and
//! resource requests to host-provided sinks.

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    AudioSink, CallStack, Clock, Controls, FuelLimits, Host, HostCall, LogTracer, Machine,
    MachineBuilder, MachineConfig, NoopTracer, Pacer, PrintTracer, Recorder, Registers,
    ResourceError, ResourceProvider, RuntimeError, Snapshot, Thread, ThreadSnapshot,
    ThreadState, ThreadStatus, Tracer, Variant, VideoSink,
};
