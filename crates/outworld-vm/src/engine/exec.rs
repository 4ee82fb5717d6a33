//! Instruction semantics.

use outworld_bytecode::{
    ByteCodeStream, CmpOperand, Condition, Coord, Instruction, ResetMode, Zoom,
};
use outworld_core::{PART_PROTECTION, ResourceEntry, ResourceKind, is_part_id, vars};

use super::error::RuntimeError;
use super::host::Host;
use super::machine::Machine;
use super::thread::{HALT_REQUEST, NO_PC, THREAD_COUNT, ThreadState};

/// What the scheduler does after an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// End the current thread's slice.
    Yield,
}

/// Symbol registers the protection screen compares against.
const CODE_WHEEL_INPUT: u8 = 0x29;
const CODE_WHEEL_ANSWER: u8 = 0x1e;

impl Machine {
    /// Execute one decoded instruction for `thread`. `pc` is where it started;
    /// `stream` is positioned just past its operands.
    pub(crate) fn execute<H: Host + ?Sized>(
        &mut self,
        thread: u8,
        pc: u16,
        instr: Instruction,
        stream: &mut ByteCodeStream<'_>,
        host: &mut H,
    ) -> Result<Flow, RuntimeError> {
        let flow = if instr.opcode().yields() {
            Flow::Yield
        } else {
            Flow::Continue
        };
        let regs = &mut self.registers;
        match instr {
            Instruction::Movi { dst, imm } => regs.set(dst, imm),
            Instruction::Movr { dst, src } => {
                let v = regs.get(src);
                regs.set(dst, v);
            }
            Instruction::Addr { dst, src } => {
                let v = regs.get(src);
                regs.update(dst, |d| d.wrapping_add(v));
            }
            Instruction::Addi { dst, imm } => {
                regs.update(dst, |d| d.wrapping_add(imm));
            }
            Instruction::Subr { dst, src } => {
                let v = regs.get(src);
                regs.update(dst, |d| d.wrapping_sub(v));
            }
            Instruction::Andi { dst, imm } => {
                regs.update(dst, |d| d & imm);
            }
            Instruction::Iori { dst, imm } => {
                regs.update(dst, |d| d | imm);
            }
            Instruction::Shli { dst, imm } => {
                regs.update(dst, |d| d.checked_shl(u32::from(imm)).unwrap_or(0));
            }
            Instruction::Shri { dst, imm } => {
                regs.update(dst, |d| d.checked_shr(u32::from(imm)).unwrap_or(0));
            }

            Instruction::Call { target } => {
                self.stack
                    .push(stream.offset())
                    .ok_or(RuntimeError::StackOverflow { thread, pc })?;
                stream.seek(target);
            }
            Instruction::Ret => {
                let addr = self
                    .stack
                    .pop()
                    .ok_or(RuntimeError::StackUnderflow { thread, pc })?;
                stream.seek(addr);
            }
            Instruction::Jump { target } => stream.seek(target),
            Instruction::Djnz { reg, target } => {
                if regs.update(reg, |v| v.wrapping_sub(1)) != 0 {
                    stream.seek(target);
                }
            }
            Instruction::Cjmp {
                cond,
                reg,
                operand,
                target,
            } => {
                if self.bypasses_protection(cond, reg, operand) {
                    self.skip_code_wheel();
                    stream.seek(target);
                    return Ok(Flow::Continue);
                }
                let regs = &self.registers;
                let lhs = regs.get_signed(reg);
                let rhs = match operand {
                    CmpOperand::Reg(r) => regs.get_signed(r),
                    CmpOperand::Word(w) => w as i16,
                    CmpOperand::Byte(b) => i16::from(b),
                };
                if let Condition::Invalid(condition) = cond {
                    return Err(RuntimeError::InvalidCondition {
                        thread,
                        pc,
                        condition,
                    });
                }
                if cond.holds(lhs, rhs) == Some(true) {
                    stream.seek(target);
                }
            }

            Instruction::Yield => {}
            Instruction::Kill => stream.seek(NO_PC),
            Instruction::Init {
                thread: index,
                target,
            } => {
                let slot = self
                    .threads
                    .get_mut(usize::from(index))
                    .ok_or(RuntimeError::InvalidThread { thread, pc, index })?;
                slot.requested_pc = target;
            }
            Instruction::Reset { first, last, mode } => {
                self.reset_range(thread, pc, first, last, mode)?;
            }

            Instruction::Palette { palette } => host.select_palette((palette >> 8) as u8),
            Instruction::Page { page } => host.select_page(page),
            Instruction::Fill { page, color } => host.fill_page(page, color),
            Instruction::Copy { src, dst } => {
                host.copy_page(dst, src, regs.get_signed(vars::SCROLL_Y));
            }
            Instruction::Blit { page } => host.blit_page(page),
            Instruction::Print {
                string,
                x,
                y,
                color,
            } => host.draw_string(string, x, y, color),
            Instruction::Poly {
                offset,
                x,
                y,
                zoom,
                buffer,
                ..
            } => {
                let x = match x {
                    Coord::Imm(v) => v,
                    Coord::Reg(r) => regs.get_signed(r),
                };
                let y = match y {
                    Coord::Imm(v) => v,
                    Coord::Reg(r) => regs.get_signed(r),
                };
                let zoom = match zoom {
                    Zoom::Imm(v) => v,
                    Zoom::Reg(r) => regs.get(r),
                };
                host.draw_polygons(buffer, offset, x, y, zoom);
            }

            Instruction::Sound {
                id,
                frequency,
                volume,
                channel,
            } => {
                if playable(host.resource(id), ResourceKind::Sound, id) {
                    host.play_sound(id, channel, volume, frequency);
                }
            }
            Instruction::Music {
                id,
                delay,
                position,
            } => play_music(id, delay, position, host),
            Instruction::LoadRes { id } => {
                host.load_resource(id)
                    .map_err(|source| RuntimeError::Resource { id, source })?;
                if is_part_id(id) {
                    tracing::debug!(id = format_args!("{id:#06x}"), "part requested");
                } else if host
                    .resource(id)
                    .is_some_and(|e| e.kind == ResourceKind::Bitmap && e.is_loaded())
                {
                    host.draw_bitmap(id);
                }
            }

            Instruction::Invalid { opcode } => {
                return Err(RuntimeError::InvalidOpcode { thread, pc, opcode });
            }
        }
        Ok(flow)
    }

    fn reset_range(
        &mut self,
        thread: u8,
        pc: u16,
        first: u8,
        last: u8,
        mode: ResetMode,
    ) -> Result<(), RuntimeError> {
        if let ResetMode::Invalid(mode) = mode {
            return Err(RuntimeError::InvalidResetMode { thread, pc, mode });
        }
        if first > last {
            return Ok(());
        }
        for index in [first, last] {
            if usize::from(index) >= THREAD_COUNT {
                return Err(RuntimeError::InvalidThread { thread, pc, index });
            }
        }
        for slot in &mut self.threads[usize::from(first)..=usize::from(last)] {
            match mode {
                ResetMode::Resume => slot.requested_state = ThreadState::Running,
                ResetMode::Pause => slot.requested_state = ThreadState::Paused,
                ResetMode::Halt => slot.requested_pc = HALT_REQUEST,
                ResetMode::Invalid(_) => {}
            }
        }
        Ok(())
    }

    fn bypasses_protection(&self, cond: Condition, reg: u8, operand: CmpOperand) -> bool {
        self.config.bypass_protection
            && self.part == Some(PART_PROTECTION)
            && cond == Condition::Eq
            && reg == CODE_WHEEL_INPUT
            && operand == CmpOperand::Reg(CODE_WHEEL_ANSWER)
    }

    fn skip_code_wheel(&mut self) {
        tracing::debug!("bypassing protection");
        let regs = &mut self.registers;
        for i in 0..4 {
            let v = regs.get(CODE_WHEEL_ANSWER + i);
            regs.set(CODE_WHEEL_INPUT + i, v);
        }
        regs.set(0x32, 0x06);
        regs.set(0x64, 0x14);
    }
}

fn play_music<H: Host + ?Sized>(id: u16, delay: u16, position: u8, host: &mut H) {
    // Id 0 is an alias of 0xffff: adjust or stop the running module.
    let id = if id == 0 { 0xffff } else { id };
    if id != 0xffff {
        if playable(host.resource(id), ResourceKind::Music, id) {
            host.play_music(id, position, delay);
        }
    } else if position != 0 || delay != 0 {
        host.adjust_music(position, delay);
    } else {
        host.stop_music();
    }
}

/// Check a sound or music resource before handing it to the audio sink.
fn playable(entry: Option<ResourceEntry>, kind: ResourceKind, id: u16) -> bool {
    match entry {
        None => {
            tracing::warn!(id = format_args!("{id:#04x}"), "resource not found");
            false
        }
        Some(e) if e.kind != kind => {
            tracing::warn!(id = format_args!("{id:#04x}"), kind = %e.kind, "resource is not {}", kind);
            false
        }
        Some(e) if !e.is_loaded() => {
            tracing::warn!(id = format_args!("{id:#04x}"), "resource not loaded");
            false
        }
        Some(_) => true,
    }
}
