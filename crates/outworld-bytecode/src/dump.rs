//! Human-readable disassembly of a bytecode segment.
//!
//! A linear sweep from offset zero: every instruction is decoded in turn,
//! invalid opcodes are listed and skipped, and a truncated trailing
//! instruction ends the listing.
//!
//! ```text
//! [segment]
//! size = 9
//!
//! [code]
//!   0000  movi    [00], 0x0005
//!   0004  djnz    [00], @0004
//!   0008  kill
//! ```

use std::fmt::{self, Write as _};

use outworld_core::{Colors, vars};

use super::instruction::{CmpOperand, Coord, Instruction, PolyBuffer, ResetMode, Zoom};
use super::stream::ByteCodeStream;

/// Generate a listing of `segment`.
pub fn dump(segment: &[u8], colors: Colors) -> String {
    Disassembly::new(segment, colors).to_string()
}

/// Lazily formatted listing; see [`dump`].
pub struct Disassembly<'a> {
    segment: &'a [u8],
    colors: Colors,
}

impl<'a> Disassembly<'a> {
    pub fn new(segment: &'a [u8], colors: Colors) -> Self {
        Self { segment, colors }
    }
}

impl fmt::Display for Disassembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.colors;
        writeln!(f, "[segment]")?;
        writeln!(f, "size = {}", self.segment.len())?;
        writeln!(f)?;
        writeln!(f, "[code]")?;

        let mut stream = ByteCodeStream::new(self.segment);
        while !stream.is_at_end() {
            let offset = stream.offset();
            write!(f, "  {}  ", c.paint(c.offset, format_args!("{offset:04x}")))?;
            match Instruction::decode(&mut stream) {
                Ok(instr) => {
                    let mut line = String::new();
                    format_instruction(&mut line, &instr, c)?;
                    writeln!(f, "{}", line.trim_end())?;
                }
                Err(e) => {
                    writeln!(f, "{}", c.paint(c.error, format_args!("; {e}")))?;
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Format one instruction as `mnemonic operands`, without offset or newline.
pub fn format_instruction(out: &mut String, instr: &Instruction, c: Colors) -> fmt::Result {
    let mnemonic = instr.opcode().mnemonic();
    write!(out, "{} ", c.paint(c.mnemonic, format_args!("{mnemonic:<7}")))?;

    let reg = |r: u8| match vars::name(r) {
        Some(name) => format!("[{name}]"),
        None => format!("[{r:02x}]"),
    };
    let imm = |v: u16| c.paint(c.value, format_args!("{v:#06x}"));
    let byte = |v: u8| c.paint(c.value, v);
    let target = |t: u16| c.paint(c.target, format_args!("@{t:04x}"));

    match *instr {
        Instruction::Movi { dst, imm: v }
        | Instruction::Addi { dst, imm: v }
        | Instruction::Andi { dst, imm: v }
        | Instruction::Iori { dst, imm: v } => write!(out, "{}, {}", reg(dst), imm(v)),
        Instruction::Shli { dst, imm: v } | Instruction::Shri { dst, imm: v } => {
            write!(out, "{}, {}", reg(dst), c.paint(c.value, v))
        }
        Instruction::Movr { dst, src }
        | Instruction::Addr { dst, src }
        | Instruction::Subr { dst, src } => write!(out, "{}, {}", reg(dst), reg(src)),
        Instruction::Call { target: t } | Instruction::Jump { target: t } => {
            write!(out, "{}", target(t))
        }
        Instruction::Ret | Instruction::Yield | Instruction::Kill => Ok(()),
        Instruction::Init { thread, target: t } => {
            write!(out, "{}, {}", byte(thread), target(t))
        }
        Instruction::Djnz { reg: r, target: t } => write!(out, "{}, {}", reg(r), target(t)),
        Instruction::Cjmp {
            cond,
            reg: r,
            operand,
            target: t,
        } => {
            let rhs = match operand {
                CmpOperand::Reg(r2) => reg(r2),
                CmpOperand::Word(v) => imm(v),
                CmpOperand::Byte(v) => byte(v),
            };
            write!(out, "{} {}, {}, {}", cond.mnemonic(), reg(r), rhs, target(t))
        }
        Instruction::Palette { palette } => write!(out, "{}", byte((palette >> 8) as u8)),
        Instruction::Reset { first, last, mode } => {
            let mode = match mode {
                ResetMode::Resume => "resume".to_string(),
                ResetMode::Pause => "pause".to_string(),
                ResetMode::Halt => "halt".to_string(),
                ResetMode::Invalid(v) => format!("mode({v})"),
            };
            write!(out, "{}..{} {}", byte(first), byte(last), mode)
        }
        Instruction::Page { page } | Instruction::Blit { page } => write!(out, "{}", byte(page)),
        Instruction::Fill { page, color } => write!(out, "{}, {}", byte(page), byte(color)),
        Instruction::Copy { src, dst } => write!(out, "{} -> {}", byte(src), byte(dst)),
        Instruction::Print {
            string,
            x,
            y,
            color,
        } => write!(
            out,
            "{}, {}, {}, {}",
            imm(string),
            byte(x),
            byte(y),
            byte(color)
        ),
        Instruction::Sound {
            id,
            frequency,
            volume,
            channel,
        } => write!(
            out,
            "{}, freq={}, vol={}, chan={}",
            imm(id),
            byte(frequency),
            byte(volume),
            byte(channel)
        ),
        Instruction::LoadRes { id } => write!(out, "{}", imm(id)),
        Instruction::Music {
            id,
            delay,
            position,
        } => write!(
            out,
            "{}, delay={}, pos={}",
            imm(id),
            c.paint(c.value, delay),
            byte(position)
        ),
        Instruction::Invalid { opcode } => {
            write!(out, "{}", c.paint(c.error, format_args!("{opcode:#04x}")))
        }
        Instruction::Poly {
            offset,
            x,
            y,
            zoom,
            buffer,
            ..
        } => {
            let coord = |v: Coord| match v {
                Coord::Imm(n) => c.paint(c.value, n),
                Coord::Reg(r) => reg(r),
            };
            let zoom = match zoom {
                Zoom::Imm(z) => c.paint(c.value, z),
                Zoom::Reg(r) => reg(r),
            };
            write!(
                out,
                "{}, x={}, y={}, zoom={}",
                imm(offset),
                coord(x),
                coord(y),
                zoom
            )?;
            if buffer == PolyBuffer::Characters {
                out.push_str(" (characters)");
            }
            Ok(())
        }
    }
}
