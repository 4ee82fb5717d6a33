//! Tracing infrastructure for debugging machine execution.
//!
//! # Design: Zero-Cost Abstraction
//!
//! When `NoopTracer` is used every hook is an `#[inline(always)]` empty
//! function and the compiler removes the calls together with their
//! arguments. No tracing state lives in the machine itself.
//!
//! `LogTracer` forwards every hook to the `tracing` facade at TRACE level;
//! `PrintTracer` collects colored lines for the CLI.

use outworld_bytecode::{Instruction, format_instruction};
use outworld_core::Colors;

/// Hooks invoked by the scheduler while a pass runs.
pub trait Tracer {
    /// Called once at the start of each pass, before threads are committed.
    fn trace_pass(&mut self, pass: u64);

    /// Called when a thread starts its slice at `pc`.
    fn trace_slice(&mut self, thread: u8, pc: u16);

    /// Called before executing an instruction that starts at `pc`.
    fn trace_instruction(&mut self, thread: u8, pc: u16, instr: &Instruction);

    /// Called when a thread's slice ends; `pc` is where it will resume.
    fn trace_yield(&mut self, thread: u8, pc: u16);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_pass(&mut self, _pass: u64) {}

    #[inline(always)]
    fn trace_slice(&mut self, _thread: u8, _pc: u16) {}

    #[inline(always)]
    fn trace_instruction(&mut self, _thread: u8, _pc: u16, _instr: &Instruction) {}

    #[inline(always)]
    fn trace_yield(&mut self, _thread: u8, _pc: u16) {}
}

/// Emits one `tracing` event per hook.
#[derive(Default)]
pub struct LogTracer {
    line: String,
}

impl LogTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracer for LogTracer {
    fn trace_pass(&mut self, pass: u64) {
        tracing::trace!(pass, "begin pass");
    }

    fn trace_slice(&mut self, thread: u8, pc: u16) {
        tracing::trace!(thread, pc = format_args!("{pc:#06x}"), "slice");
    }

    fn trace_instruction(&mut self, thread: u8, pc: u16, instr: &Instruction) {
        self.line.clear();
        if format_instruction(&mut self.line, instr, Colors::OFF).is_ok() {
            tracing::trace!(
                thread,
                pc = format_args!("{pc:#06x}"),
                "{}",
                self.line.trim_end()
            );
        }
    }

    fn trace_yield(&mut self, thread: u8, pc: u16) {
        tracing::trace!(thread, pc = format_args!("{pc:#06x}"), "yield");
    }
}

/// Collects human-readable trace lines.
///
/// ```text
/// pass 0
///   #00 0000  movi    [00], 0x0005
///   #00 0004  djnz    [00], @0004
///   #00 ---- -> ffff
/// ```
pub struct PrintTracer {
    lines: Vec<String>,
    colors: Colors,
    /// Stop recording after this many lines.
    limit: usize,
    truncated: bool,
}

impl PrintTracer {
    pub fn new(colors: Colors) -> Self {
        Self {
            lines: Vec::new(),
            colors,
            limit: usize::MAX,
            truncated: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
        if self.truncated {
            let c = self.colors;
            println!(
                "{}",
                c.paint(c.offset, format_args!("... trace truncated after {} lines", self.limit))
            );
        }
    }

    fn push(&mut self, line: String) {
        if self.lines.len() >= self.limit {
            self.truncated = true;
            return;
        }
        self.lines.push(line);
    }
}

impl Tracer for PrintTracer {
    fn trace_pass(&mut self, pass: u64) {
        let c = self.colors;
        self.push(c.paint(c.mnemonic, format_args!("pass {pass}")));
    }

    fn trace_slice(&mut self, _thread: u8, _pc: u16) {}

    fn trace_instruction(&mut self, thread: u8, pc: u16, instr: &Instruction) {
        let c = self.colors;
        let mut body = String::new();
        if format_instruction(&mut body, instr, c).is_err() {
            return;
        }
        let at = c.paint(c.offset, format_args!("#{thread:02} {pc:04x}"));
        self.push(format!("  {at}  {}", body.trim_end()));
    }

    fn trace_yield(&mut self, thread: u8, pc: u16) {
        let c = self.colors;
        self.push(format!(
            "  {}",
            c.paint(c.offset, format_args!("#{thread:02} ---- -> {pc:04x}"))
        ));
    }
}
