//! Shared logic for run and trace commands.
//!
//! A [`Session`] drives a [`Machine`] against the game banks with no screen
//! or speakers: host calls are recorded, time is virtual, and part switches
//! requested by bytecode are honoured between passes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use outworld_bank::{BankError, Resources};
use outworld_bytecode::PolyBuffer;
use outworld_core::{GamePart, ResourceEntry};
use outworld_vm::{
    AudioSink, Clock, Controls, Machine, MachineConfig, NoopTracer, Recorder, ResourceError,
    ResourceProvider, RuntimeError, Snapshot, Tracer, VideoSink,
};
use serde::Serialize;

pub struct SessionArgs {
    pub datadir: PathBuf,
    pub dumpdir: Option<PathBuf>,
    pub part: u16,
    pub config: MachineConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Host with a recorder for video and audio and a virtual millisecond clock.
pub struct HeadlessHost {
    pub resources: Resources,
    pub recorder: Recorder,
    pub now: u32,
}

impl VideoSink for HeadlessHost {
    fn select_palette(&mut self, palette: u8) {
        self.recorder.select_palette(palette);
    }

    fn select_page(&mut self, page: u8) {
        self.recorder.select_page(page);
    }

    fn fill_page(&mut self, page: u8, color: u8) {
        self.recorder.fill_page(page, color);
    }

    fn copy_page(&mut self, dst: u8, src: u8, scroll_y: i16) {
        self.recorder.copy_page(dst, src, scroll_y);
    }

    fn blit_page(&mut self, page: u8) {
        self.recorder.blit_page(page);
    }

    fn draw_string(&mut self, string: u16, x: u8, y: u8, color: u8) {
        self.recorder.draw_string(string, x, y, color);
    }

    fn draw_polygons(&mut self, buffer: PolyBuffer, offset: u16, x: i16, y: i16, zoom: u16) {
        self.recorder.draw_polygons(buffer, offset, x, y, zoom);
    }

    fn draw_bitmap(&mut self, resource: u16) {
        self.recorder.draw_bitmap(resource);
    }
}

impl AudioSink for HeadlessHost {
    fn play_sound(&mut self, id: u16, channel: u8, volume: u8, frequency: u8) {
        self.recorder.play_sound(id, channel, volume, frequency);
    }

    fn play_music(&mut self, id: u16, position: u8, delay: u16) {
        self.recorder.play_music(id, position, delay);
    }

    fn adjust_music(&mut self, position: u8, delay: u16) {
        self.recorder.adjust_music(position, delay);
    }

    fn stop_music(&mut self) {
        self.recorder.stop_music();
    }
}

impl ResourceProvider for HeadlessHost {
    fn resource(&self, id: u16) -> Option<ResourceEntry> {
        self.resources.resource(id)
    }

    fn load_resource(&mut self, id: u16) -> Result<(), ResourceError> {
        self.resources.load_resource(id)
    }
}

impl Clock for HeadlessHost {
    fn ticks(&self) -> u32 {
        self.now
    }
}

pub struct Session {
    machine: Machine,
    host: HeadlessHost,
    controls: Controls,
    passes: u32,
    parts: Vec<&'static str>,
}

impl Session {
    /// Open the banks and enter the starting part.
    pub fn open(args: &SessionArgs) -> Result<Self, SessionError> {
        let mut resources = Resources::open(&args.datadir)?;
        if let Some(dir) = &args.dumpdir {
            resources.dump_to(dir)?;
        }
        Self::start(resources, args.config, args.part)
    }

    pub fn start(
        resources: Resources,
        config: MachineConfig,
        part: u16,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            machine: Machine::builder().config(config).build(),
            host: HeadlessHost {
                resources,
                recorder: Recorder::new(),
                now: 0,
            },
            controls: Controls::default(),
            passes: 0,
            parts: Vec::new(),
        };
        session.enter_part(part)?;
        Ok(session)
    }

    pub fn frame(&mut self) -> Result<(), SessionError> {
        self.frame_with(&mut NoopTracer)
    }

    /// Advance the clock to the next deadline and run one pass, then switch
    /// parts if the pass asked for it.
    pub fn frame_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<(), SessionError> {
        self.host.now = self.host.now.max(self.machine.next_deadline());
        if self
            .machine
            .run_with(&mut self.controls, &mut self.host, tracer)?
        {
            self.passes += 1;
        }
        if let Some(part) = self.host.resources.take_requested_part() {
            tracing::debug!(
                part = format_args!("{part:#06x}"),
                passes = self.passes,
                "switching part"
            );
            self.enter_part(part)?;
        }
        Ok(())
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn summary(&self) -> Summary {
        let mut calls = BTreeMap::new();
        for call in &self.host.recorder.calls {
            *calls.entry(call.name()).or_insert(0) += 1;
        }
        Summary {
            passes: self.passes,
            elapsed_ms: self.host.now,
            frames: self.host.recorder.frames,
            parts: self.parts.clone(),
            calls,
            state: self.machine.snapshot(),
        }
    }

    fn enter_part(&mut self, id: u16) -> Result<(), SessionError> {
        let loaded = self.host.resources.load_part(id)?;
        self.machine.enter_part(loaded.part, loaded.bytecode);
        self.parts.push(loaded.part.name);
        Ok(())
    }
}

/// What a session did, for humans or as JSON.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub passes: u32,
    pub elapsed_ms: u32,
    /// Pages presented on screen.
    pub frames: u64,
    /// Every part entered, in order.
    pub parts: Vec<&'static str>,
    pub calls: BTreeMap<&'static str, usize>,
    pub state: Snapshot,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "parts    {}", self.parts.join(" -> "))?;
        if let Some(part) = self.state.part.and_then(GamePart::lookup) {
            writeln!(f, "current  {} ({:#06x})", part.name, part.id)?;
        }
        writeln!(f, "passes   {}", self.passes)?;
        writeln!(f, "elapsed  {} ms", self.elapsed_ms)?;
        writeln!(f, "frames   {}", self.frames)?;
        writeln!(f, "threads  {}", self.state.threads.len())?;
        writeln!(f, "calls")?;
        for (name, count) in &self.calls {
            writeln!(f, "  {name:<15} {count:>6}")?;
        }
        Ok(())
    }
}
