//! Instruction decoding.
//!
//! Decoding reads an opcode and all of its operands from a [`ByteCodeStream`],
//! leaving register-sourced operands unresolved. The interpreter resolves
//! them against its register bank; the disassembler prints them as-is.

use super::opcode::Opcode;
use super::stream::{ByteCodeStream, StreamError};

/// Zoom factor meaning "draw at native size".
pub const DEFAULT_ZOOM: u16 = 0x40;

/// Lowest row a short-form polygon can be anchored on.
pub const POLY_MAX_Y: i16 = 199;

/// Which polygon bank a draw reads from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PolyBuffer {
    /// Cinematic polygons, loaded from the part's first polygon resource.
    Cinematic,
    /// Character polygons, loaded from the part's second polygon resource.
    Characters,
}

/// A polygon coordinate: immediate or read from a register.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Coord {
    Imm(i16),
    Reg(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Zoom {
    Imm(u16),
    Reg(u8),
}

/// Second operand of a conditional jump.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CmpOperand {
    Reg(u8),
    Word(u16),
    /// Zero-extended before comparing.
    Byte(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Condition {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Invalid(u8),
}

impl Condition {
    /// Decode the low three bits of a `cjmp` variant byte.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Eq,
            1 => Self::Ne,
            2 => Self::Gt,
            3 => Self::Ge,
            4 => Self::Lt,
            5 => Self::Le,
            other => Self::Invalid(other),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Invalid(_) => "??",
        }
    }

    /// Evaluate the condition on signed 16-bit operands.
    ///
    /// Returns `None` for the two undefined condition codes.
    pub fn holds(self, lhs: i16, rhs: i16) -> Option<bool> {
        let result = match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Invalid(_) => return None,
        };
        Some(result)
    }
}

/// What `reset` does to its thread range.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResetMode {
    Resume,
    Pause,
    /// Halt the range at the next dispatch.
    Halt,
    Invalid(u8),
}

impl ResetMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Resume,
            1 => Self::Pause,
            2 => Self::Halt,
            other => Self::Invalid(other),
        }
    }
}

/// A fully decoded instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    Movi { dst: u8, imm: u16 },
    Movr { dst: u8, src: u8 },
    Addr { dst: u8, src: u8 },
    Addi { dst: u8, imm: u16 },
    Call { target: u16 },
    Ret,
    Yield,
    Jump { target: u16 },
    Init { thread: u8, target: u16 },
    Djnz { reg: u8, target: u16 },
    Cjmp {
        cond: Condition,
        reg: u8,
        operand: CmpOperand,
        target: u16,
    },
    /// Palette number is the high byte of the operand.
    Palette { palette: u16 },
    Reset { first: u8, last: u8, mode: ResetMode },
    Page { page: u8 },
    Fill { page: u8, color: u8 },
    Copy { src: u8, dst: u8 },
    Blit { page: u8 },
    Kill,
    Print { string: u16, x: u8, y: u8, color: u8 },
    Subr { dst: u8, src: u8 },
    Andi { dst: u8, imm: u16 },
    Iori { dst: u8, imm: u16 },
    Shli { dst: u8, imm: u16 },
    Shri { dst: u8, imm: u16 },
    Sound {
        id: u16,
        frequency: u8,
        volume: u8,
        channel: u8,
    },
    LoadRes { id: u16 },
    Music { id: u16, delay: u16, position: u8 },
    Invalid { opcode: u8 },
    Poly {
        opcode: u8,
        offset: u16,
        x: Coord,
        y: Coord,
        zoom: Zoom,
        buffer: PolyBuffer,
    },
}

impl Instruction {
    /// Decode the instruction at the stream's current offset.
    ///
    /// On success the stream is left just past the last operand.
    pub fn decode(stream: &mut ByteCodeStream<'_>) -> Result<Self, StreamError> {
        let opcode = Opcode::from_u8(stream.fetch_byte()?);
        Self::decode_operands(opcode, stream)
    }

    fn decode_operands(opcode: Opcode, s: &mut ByteCodeStream<'_>) -> Result<Self, StreamError> {
        let instr = match opcode {
            Opcode::Movi => Self::Movi {
                dst: s.fetch_byte()?,
                imm: s.fetch_word()?,
            },
            Opcode::Movr => Self::Movr {
                dst: s.fetch_byte()?,
                src: s.fetch_byte()?,
            },
            Opcode::Addr => Self::Addr {
                dst: s.fetch_byte()?,
                src: s.fetch_byte()?,
            },
            Opcode::Addi => Self::Addi {
                dst: s.fetch_byte()?,
                imm: s.fetch_word()?,
            },
            Opcode::Call => Self::Call {
                target: s.fetch_word()?,
            },
            Opcode::Ret => Self::Ret,
            Opcode::Yield => Self::Yield,
            Opcode::Jump => Self::Jump {
                target: s.fetch_word()?,
            },
            Opcode::Init => Self::Init {
                thread: s.fetch_byte()?,
                target: s.fetch_word()?,
            },
            Opcode::Djnz => Self::Djnz {
                reg: s.fetch_byte()?,
                target: s.fetch_word()?,
            },
            Opcode::Cjmp => decode_cjmp(s)?,
            Opcode::Palette => Self::Palette {
                palette: s.fetch_word()?,
            },
            Opcode::Reset => Self::Reset {
                first: s.fetch_byte()?,
                last: s.fetch_byte()?,
                mode: ResetMode::from_u8(s.fetch_byte()?),
            },
            Opcode::Page => Self::Page {
                page: s.fetch_byte()?,
            },
            Opcode::Fill => Self::Fill {
                page: s.fetch_byte()?,
                color: s.fetch_byte()?,
            },
            Opcode::Copy => Self::Copy {
                src: s.fetch_byte()?,
                dst: s.fetch_byte()?,
            },
            Opcode::Blit => Self::Blit {
                page: s.fetch_byte()?,
            },
            Opcode::Kill => Self::Kill,
            Opcode::Print => Self::Print {
                string: s.fetch_word()?,
                x: s.fetch_byte()?,
                y: s.fetch_byte()?,
                color: s.fetch_byte()?,
            },
            Opcode::Subr => Self::Subr {
                dst: s.fetch_byte()?,
                src: s.fetch_byte()?,
            },
            Opcode::Andi => Self::Andi {
                dst: s.fetch_byte()?,
                imm: s.fetch_word()?,
            },
            Opcode::Iori => Self::Iori {
                dst: s.fetch_byte()?,
                imm: s.fetch_word()?,
            },
            Opcode::Shli => Self::Shli {
                dst: s.fetch_byte()?,
                imm: s.fetch_word()?,
            },
            Opcode::Shri => Self::Shri {
                dst: s.fetch_byte()?,
                imm: s.fetch_word()?,
            },
            Opcode::Sound => Self::Sound {
                id: s.fetch_word()?,
                frequency: s.fetch_byte()?,
                volume: s.fetch_byte()?,
                channel: s.fetch_byte()?,
            },
            Opcode::LoadRes => Self::LoadRes {
                id: s.fetch_word()?,
            },
            Opcode::Music => Self::Music {
                id: s.fetch_word()?,
                delay: s.fetch_word()?,
                position: s.fetch_byte()?,
            },
            Opcode::Invalid(opcode) => Self::Invalid { opcode },
            Opcode::PolyLong(op) => decode_poly_long(op, s)?,
            Opcode::PolyShort(op) => decode_poly_short(op, s)?,
        };
        Ok(instr)
    }

    pub fn opcode(&self) -> Opcode {
        match *self {
            Self::Movi { .. } => Opcode::Movi,
            Self::Movr { .. } => Opcode::Movr,
            Self::Addr { .. } => Opcode::Addr,
            Self::Addi { .. } => Opcode::Addi,
            Self::Call { .. } => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Yield => Opcode::Yield,
            Self::Jump { .. } => Opcode::Jump,
            Self::Init { .. } => Opcode::Init,
            Self::Djnz { .. } => Opcode::Djnz,
            Self::Cjmp { .. } => Opcode::Cjmp,
            Self::Palette { .. } => Opcode::Palette,
            Self::Reset { .. } => Opcode::Reset,
            Self::Page { .. } => Opcode::Page,
            Self::Fill { .. } => Opcode::Fill,
            Self::Copy { .. } => Opcode::Copy,
            Self::Blit { .. } => Opcode::Blit,
            Self::Kill => Opcode::Kill,
            Self::Print { .. } => Opcode::Print,
            Self::Subr { .. } => Opcode::Subr,
            Self::Andi { .. } => Opcode::Andi,
            Self::Iori { .. } => Opcode::Iori,
            Self::Shli { .. } => Opcode::Shli,
            Self::Shri { .. } => Opcode::Shri,
            Self::Sound { .. } => Opcode::Sound,
            Self::LoadRes { .. } => Opcode::LoadRes,
            Self::Music { .. } => Opcode::Music,
            Self::Invalid { opcode } | Self::Poly { opcode, .. } => Opcode::from_u8(opcode),
        }
    }
}

fn decode_cjmp(s: &mut ByteCodeStream<'_>) -> Result<Instruction, StreamError> {
    let variant = s.fetch_byte()?;
    let reg = s.fetch_byte()?;
    let operand = if variant & 0x80 != 0 {
        CmpOperand::Reg(s.fetch_byte()?)
    } else if variant & 0x40 != 0 {
        CmpOperand::Word(s.fetch_word()?)
    } else {
        CmpOperand::Byte(s.fetch_byte()?)
    };
    Ok(Instruction::Cjmp {
        cond: Condition::from_bits(variant),
        reg,
        operand,
        target: s.fetch_word()?,
    })
}

/// Opcode bits (0x40..=0x7f): `01xx yyzz`.
///
/// - x: `1?` byte (+0x100 when the low x bit is set), `01` register, `00` word
/// - y: `1?` byte, `01` register, `00` word
/// - zoom: `11` default zoom from the character bank, `10` byte,
///   `01` register, `00` default zoom
fn decode_poly_long(op: u8, s: &mut ByteCodeStream<'_>) -> Result<Instruction, StreamError> {
    let offset = s.fetch_word()?.wrapping_mul(2);

    let x = if op & 0x20 != 0 {
        let base = i16::from(s.fetch_byte()?);
        Coord::Imm(if op & 0x10 != 0 { base + 0x100 } else { base })
    } else if op & 0x10 != 0 {
        Coord::Reg(s.fetch_byte()?)
    } else {
        Coord::Imm(s.fetch_word()? as i16)
    };

    let y = if op & 0x08 != 0 {
        Coord::Imm(i16::from(s.fetch_byte()?))
    } else if op & 0x04 != 0 {
        Coord::Reg(s.fetch_byte()?)
    } else {
        Coord::Imm(s.fetch_word()? as i16)
    };

    let mut buffer = PolyBuffer::Cinematic;
    let zoom = match op & 0x03 {
        0x03 => {
            buffer = PolyBuffer::Characters;
            Zoom::Imm(DEFAULT_ZOOM)
        }
        0x02 => Zoom::Imm(u16::from(s.fetch_byte()?)),
        0x01 => Zoom::Reg(s.fetch_byte()?),
        _ => Zoom::Imm(DEFAULT_ZOOM),
    };

    Ok(Instruction::Poly {
        opcode: op,
        offset,
        x,
        y,
        zoom,
        buffer,
    })
}

fn decode_poly_short(op: u8, s: &mut ByteCodeStream<'_>) -> Result<Instruction, StreamError> {
    let raw = (u16::from(op) << 8) | u16::from(s.fetch_byte()?);
    let offset = raw.wrapping_mul(2);
    let mut x = i16::from(s.fetch_byte()?);
    let mut y = i16::from(s.fetch_byte()?);
    let overflow = y - POLY_MAX_Y;
    if overflow > 0 {
        y = POLY_MAX_Y;
        x += overflow;
    }
    Ok(Instruction::Poly {
        opcode: op,
        offset,
        x: Coord::Imm(x),
        y: Coord::Imm(y),
        zoom: Zoom::Imm(DEFAULT_ZOOM),
        buffer: PolyBuffer::Cinematic,
    })
}
