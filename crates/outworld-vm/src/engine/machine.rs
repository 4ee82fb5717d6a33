//! The machine: threads, registers and stack, plus the scheduling pass.

use std::sync::Arc;

use outworld_bytecode::{ByteCodeStream, Instruction};
use outworld_core::{GamePart, vars};
use serde::Serialize;

use super::error::RuntimeError;
use super::exec::Flow;
use super::host::{Clock, Host};
use super::input::Controls;
use super::pacer::Pacer;
use super::registers::Registers;
use super::stack::CallStack;
use super::thread::{NO_PC, THREAD_COUNT, Thread, ThreadStatus};
use super::trace::{NoopTracer, Tracer};

/// Runtime limits for one scheduling pass.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum instructions executed across all threads in one pass
    /// (default: 1,000,000).
    pub(crate) exec_fuel: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }
}

/// Which release of the game the bytecode comes from.
///
/// Bytecode reads register 0x54 to pick the title shown in the intro.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    AnotherWorld,
    OutOfThisWorld,
}

impl Variant {
    pub fn language_marker(self) -> u16 {
        match self {
            Self::AnotherWorld => 0x0001,
            Self::OutOfThisWorld => 0x0081,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MachineConfig {
    /// Fixed random seed; `None` derives one from the wall clock.
    pub random_seed: Option<u16>,
    pub variant: Variant,
    /// Skip the code-wheel check of the protection part.
    pub bypass_protection: bool,
    /// Keep register values when a new segment is installed.
    pub carry_registers: bool,
    pub limits: FuelLimits,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            variant: Variant::default(),
            bypass_protection: true,
            carry_registers: false,
            limits: FuelLimits::default(),
        }
    }
}

/// Builder for [`Machine`] instances.
#[derive(Default)]
pub struct MachineBuilder {
    config: MachineConfig,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn random_seed(mut self, seed: u16) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    pub fn bypass_protection(mut self, enabled: bool) -> Self {
        self.config.bypass_protection = enabled;
        self
    }

    pub fn carry_registers(mut self, enabled: bool) -> Self {
        self.config.carry_registers = enabled;
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.config.limits = self.config.limits.exec_fuel(fuel);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Machine {
        let seed = self.config.random_seed.unwrap_or_else(clock_seed);
        let mut machine = Machine {
            segment: Arc::from(Vec::new()),
            threads: [Thread::halted(); THREAD_COUNT],
            registers: Registers::new(),
            stack: CallStack::new(),
            part: None,
            config: self.config,
            seed,
            pacer: Pacer::new(),
            passes: 0,
        };
        machine.power_on();
        machine.reset_threads();
        machine
    }
}

fn clock_seed() -> u16 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as u16)
}

/// Cooperative interpreter for one bytecode segment.
pub struct Machine {
    pub(crate) segment: Arc<[u8]>,
    pub(crate) threads: [Thread; THREAD_COUNT],
    pub(crate) registers: Registers,
    pub(crate) stack: CallStack,
    /// Game part the current segment belongs to, if known.
    pub(crate) part: Option<u16>,
    pub(crate) config: MachineConfig,
    seed: u16,
    pacer: Pacer,
    passes: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Machine {
    pub fn builder() -> MachineBuilder {
        MachineBuilder::new()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn random_seed(&self) -> u16 {
        self.seed
    }

    /// Install a new bytecode segment.
    ///
    /// Every thread halts except thread 0, which restarts at offset 0. The
    /// call stack empties and, unless `carry_registers` is set, the register
    /// bank returns to its power-on image.
    pub fn set_bytecode(&mut self, segment: impl Into<Arc<[u8]>>) {
        self.segment = segment.into();
        self.reset_threads();
        self.stack.clear();
        if !self.config.carry_registers {
            self.power_on();
        }
        tracing::debug!(size = self.segment.len(), "installed bytecode segment");
    }

    /// Install the bytecode of `part`.
    pub fn enter_part(&mut self, part: &GamePart, segment: impl Into<Arc<[u8]>>) {
        tracing::info!(part = part.name, id = format_args!("{:#06x}", part.id), "entering part");
        self.part = Some(part.id);
        self.set_bytecode(segment);
    }

    pub fn part(&self) -> Option<u16> {
        self.part
    }

    pub fn segment(&self) -> &[u8] {
        &self.segment
    }

    pub fn register(&self, reg: u8) -> u16 {
        self.registers.get(reg)
    }

    /// Write a register from outside the bytecode (the music player's mark).
    pub fn set_register(&mut self, reg: u8, value: u16) {
        self.registers.set(reg, value);
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn thread(&self, index: usize) -> Option<&Thread> {
        self.threads.get(index)
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Number of completed or attempted scheduling passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one scheduling pass immediately.
    ///
    /// This is a convenience method that uses `NoopTracer`, which gets
    /// completely optimized away at compile time.
    pub fn step<H: Host + ?Sized>(
        &mut self,
        controls: &mut Controls,
        host: &mut H,
    ) -> Result<(), RuntimeError> {
        self.step_with(controls, host, &mut NoopTracer)
    }

    /// Run one scheduling pass with a tracer for debugging.
    pub fn step_with<H: Host + ?Sized, T: Tracer>(
        &mut self,
        controls: &mut Controls,
        host: &mut H,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        tracer.trace_pass(self.passes);
        self.passes += 1;

        controls.apply(&mut self.registers);
        for thread in &mut self.threads {
            thread.commit();
        }

        // Host callbacks never replace the segment mid-pass; part switches
        // are applied by the embedder afterwards.
        let segment = Arc::clone(&self.segment);
        let mut fuel = self.config.limits.exec_fuel;

        for index in 0..THREAD_COUNT {
            if !self.threads[index].is_runnable() {
                continue;
            }
            let thread = index as u8;
            let start = self.threads[index].current_pc;
            let mut stream = ByteCodeStream::new(&segment);
            stream.seek(start);
            tracer.trace_slice(thread, start);

            loop {
                let pc = stream.offset();
                if fuel == 0 {
                    return Err(RuntimeError::ExecFuelExhausted { thread, pc });
                }
                fuel -= 1;

                let instr = Instruction::decode(&mut stream)
                    .map_err(|source| RuntimeError::Bytecode { thread, source })?;
                tracer.trace_instruction(thread, pc, &instr);

                let flow = self.execute(thread, pc, instr, &mut stream, host)?;
                self.threads[index].current_pc = stream.offset();
                if flow == Flow::Yield {
                    break;
                }
            }
            tracer.trace_yield(thread, self.threads[index].current_pc);
        }
        Ok(())
    }

    /// Run a pass if the frame deadline has passed.
    ///
    /// Returns whether a pass ran. Nothing runs while `controls` asks to quit
    /// or pause.
    pub fn run<H: Host + Clock + ?Sized>(
        &mut self,
        controls: &mut Controls,
        host: &mut H,
    ) -> Result<bool, RuntimeError> {
        self.run_with(controls, host, &mut NoopTracer)
    }

    pub fn run_with<H: Host + Clock + ?Sized, T: Tracer>(
        &mut self,
        controls: &mut Controls,
        host: &mut H,
        tracer: &mut T,
    ) -> Result<bool, RuntimeError> {
        let idle = controls.quit || controls.pause;
        if !self.pacer.is_ready(host.ticks(), idle) {
            return Ok(false);
        }
        self.step_with(controls, host, tracer)?;
        let pause = self.registers.get(vars::PAUSE_SLICES);
        self.pacer.schedule(host.ticks(), pause);
        Ok(true)
    }

    /// Tick at which the next paced pass becomes due.
    pub fn next_deadline(&self) -> u32 {
        self.pacer.next_deadline()
    }

    /// Capture the observable state for comparison or serialization.
    pub fn snapshot(&self) -> Snapshot {
        let threads = self
            .threads
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status() != ThreadStatus::Halted || t.requested_pc != NO_PC)
            .map(|(i, t)| ThreadSnapshot {
                index: i as u8,
                status: t.status(),
                pc: t.current_pc,
                requested_pc: t.requested_pc,
            })
            .collect();
        Snapshot {
            part: self.part,
            registers: self.registers.clone(),
            stack_depth: self.stack.depth(),
            threads,
        }
    }

    fn reset_threads(&mut self) {
        self.threads = [Thread::halted(); THREAD_COUNT];
        self.threads[0] = Thread::starting_at(0);
    }

    fn power_on(&mut self) {
        let regs = &mut self.registers;
        regs.clear();
        regs.set(vars::RANDOM_SEED, self.seed);
        regs.set(vars::DOS_MARKER, 0x0014);
        regs.set(vars::LANGUAGE, self.config.variant.language_marker());
        if self.config.bypass_protection {
            for (reg, value) in vars::PROTECTION_PRESETS {
                regs.set(reg, value);
            }
        }
    }
}

/// Threads that are running, paused or have a pending request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThreadSnapshot {
    pub index: u8,
    pub status: ThreadStatus,
    pub pc: u16,
    pub requested_pc: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub part: Option<u16>,
    pub registers: Registers,
    pub stack_depth: usize,
    pub threads: Vec<ThreadSnapshot>,
}
