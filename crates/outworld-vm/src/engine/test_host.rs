//! In-memory host and a tiny assembler for machine tests.

use std::collections::HashMap;

use outworld_bytecode::PolyBuffer;
use outworld_core::{ResourceEntry, ResourceKind, ResourceState, is_part_id};

use super::host::{AudioSink, Clock, ResourceError, ResourceProvider, VideoSink};
use super::recorder::{HostCall, Recorder};

#[derive(Default)]
pub(crate) struct TestHost {
    pub rec: Recorder,
    pub resources: HashMap<u16, ResourceEntry>,
    /// Every id passed to `load_resource`, parts included.
    pub loads: Vec<u16>,
    pub now: u32,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, id: u16, kind: ResourceKind, state: ResourceState) -> Self {
        self.resources.insert(
            id,
            ResourceEntry {
                kind,
                state,
                size: 0x100,
            },
        );
        self
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.rec.calls
    }
}

impl VideoSink for TestHost {
    fn select_palette(&mut self, palette: u8) {
        self.rec.select_palette(palette);
    }

    fn select_page(&mut self, page: u8) {
        self.rec.select_page(page);
    }

    fn fill_page(&mut self, page: u8, color: u8) {
        self.rec.fill_page(page, color);
    }

    fn copy_page(&mut self, dst: u8, src: u8, scroll_y: i16) {
        self.rec.copy_page(dst, src, scroll_y);
    }

    fn blit_page(&mut self, page: u8) {
        self.rec.blit_page(page);
    }

    fn draw_string(&mut self, string: u16, x: u8, y: u8, color: u8) {
        self.rec.draw_string(string, x, y, color);
    }

    fn draw_polygons(&mut self, buffer: PolyBuffer, offset: u16, x: i16, y: i16, zoom: u16) {
        self.rec.draw_polygons(buffer, offset, x, y, zoom);
    }

    fn draw_bitmap(&mut self, resource: u16) {
        self.rec.draw_bitmap(resource);
    }
}

impl AudioSink for TestHost {
    fn play_sound(&mut self, id: u16, channel: u8, volume: u8, frequency: u8) {
        self.rec.play_sound(id, channel, volume, frequency);
    }

    fn play_music(&mut self, id: u16, position: u8, delay: u16) {
        self.rec.play_music(id, position, delay);
    }

    fn adjust_music(&mut self, position: u8, delay: u16) {
        self.rec.adjust_music(position, delay);
    }

    fn stop_music(&mut self) {
        self.rec.stop_music();
    }
}

impl ResourceProvider for TestHost {
    fn resource(&self, id: u16) -> Option<ResourceEntry> {
        self.resources.get(&id).copied()
    }

    fn load_resource(&mut self, id: u16) -> Result<(), ResourceError> {
        self.loads.push(id);
        if is_part_id(id) {
            return Ok(());
        }
        let entry = self
            .resources
            .get_mut(&id)
            .ok_or_else(|| format!("no resource {id:#04x}"))?;
        entry.state = ResourceState::Loaded;
        Ok(())
    }
}

impl Clock for TestHost {
    fn ticks(&self) -> u32 {
        self.now
    }
}

/// Byte emitters for hand-written test programs.
pub(crate) mod asm {
    pub fn movi(dst: u8, imm: u16) -> Vec<u8> {
        let [hi, lo] = imm.to_be_bytes();
        vec![0x00, dst, hi, lo]
    }

    pub fn movr(dst: u8, src: u8) -> Vec<u8> {
        vec![0x01, dst, src]
    }

    pub fn addi(dst: u8, imm: u16) -> Vec<u8> {
        let [hi, lo] = imm.to_be_bytes();
        vec![0x03, dst, hi, lo]
    }

    pub fn call(target: u16) -> Vec<u8> {
        let [hi, lo] = target.to_be_bytes();
        vec![0x04, hi, lo]
    }

    pub fn ret() -> Vec<u8> {
        vec![0x05]
    }

    pub fn yld() -> Vec<u8> {
        vec![0x06]
    }

    pub fn jump(target: u16) -> Vec<u8> {
        let [hi, lo] = target.to_be_bytes();
        vec![0x07, hi, lo]
    }

    pub fn init(thread: u8, target: u16) -> Vec<u8> {
        let [hi, lo] = target.to_be_bytes();
        vec![0x08, thread, hi, lo]
    }

    pub fn djnz(reg: u8, target: u16) -> Vec<u8> {
        let [hi, lo] = target.to_be_bytes();
        vec![0x09, reg, hi, lo]
    }

    /// `cjmp` comparing two registers.
    pub fn cjmp_reg(cond: u8, lhs: u8, rhs: u8, target: u16) -> Vec<u8> {
        let [hi, lo] = target.to_be_bytes();
        vec![0x0a, 0x80 | cond, lhs, rhs, hi, lo]
    }

    /// `cjmp` against a 16-bit immediate.
    pub fn cjmp_word(cond: u8, lhs: u8, imm: u16, target: u16) -> Vec<u8> {
        let [ih, il] = imm.to_be_bytes();
        let [hi, lo] = target.to_be_bytes();
        vec![0x0a, 0x40 | cond, lhs, ih, il, hi, lo]
    }

    /// `cjmp` against an 8-bit immediate.
    pub fn cjmp_byte(cond: u8, lhs: u8, imm: u8, target: u16) -> Vec<u8> {
        let [hi, lo] = target.to_be_bytes();
        vec![0x0a, cond, lhs, imm, hi, lo]
    }

    pub fn reset(first: u8, last: u8, mode: u8) -> Vec<u8> {
        vec![0x0c, first, last, mode]
    }

    pub fn kill() -> Vec<u8> {
        vec![0x11]
    }

    pub fn shli(dst: u8, imm: u16) -> Vec<u8> {
        let [hi, lo] = imm.to_be_bytes();
        vec![0x16, dst, hi, lo]
    }

    pub fn shri(dst: u8, imm: u16) -> Vec<u8> {
        let [hi, lo] = imm.to_be_bytes();
        vec![0x17, dst, hi, lo]
    }

    pub fn sound(id: u16, frequency: u8, volume: u8, channel: u8) -> Vec<u8> {
        let [hi, lo] = id.to_be_bytes();
        vec![0x18, hi, lo, frequency, volume, channel]
    }

    pub fn loadres(id: u16) -> Vec<u8> {
        let [hi, lo] = id.to_be_bytes();
        vec![0x19, hi, lo]
    }

    pub fn music(id: u16, delay: u16, position: u8) -> Vec<u8> {
        let [ih, il] = id.to_be_bytes();
        let [dh, dl] = delay.to_be_bytes();
        vec![0x1a, ih, il, dh, dl, position]
    }

    pub fn program(parts: &[Vec<u8>]) -> Vec<u8> {
        parts.concat()
    }
}
