//! Opcode table covering the full byte range.

/// One opcode byte, decoded.
///
/// Every byte value maps to exactly one variant: 0x00..=0x1a are the named
/// instructions, 0x1b..=0x3f are invalid, 0x40..=0x7f draw polygons with
/// operand flags in the low bits, and 0x80..=0xff draw polygons with the low
/// seven bits as the high part of the offset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Opcode {
    Movi,
    Movr,
    Addr,
    Addi,
    Call,
    Ret,
    Yield,
    Jump,
    Init,
    Djnz,
    Cjmp,
    Palette,
    Reset,
    Page,
    Fill,
    Copy,
    Blit,
    Kill,
    Print,
    Subr,
    Andi,
    Iori,
    Shli,
    Shri,
    Sound,
    LoadRes,
    Music,
    Invalid(u8),
    PolyLong(u8),
    PolyShort(u8),
}

impl Opcode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Self::Movi,
            0x01 => Self::Movr,
            0x02 => Self::Addr,
            0x03 => Self::Addi,
            0x04 => Self::Call,
            0x05 => Self::Ret,
            0x06 => Self::Yield,
            0x07 => Self::Jump,
            0x08 => Self::Init,
            0x09 => Self::Djnz,
            0x0a => Self::Cjmp,
            0x0b => Self::Palette,
            0x0c => Self::Reset,
            0x0d => Self::Page,
            0x0e => Self::Fill,
            0x0f => Self::Copy,
            0x10 => Self::Blit,
            0x11 => Self::Kill,
            0x12 => Self::Print,
            0x13 => Self::Subr,
            0x14 => Self::Andi,
            0x15 => Self::Iori,
            0x16 => Self::Shli,
            0x17 => Self::Shri,
            0x18 => Self::Sound,
            0x19 => Self::LoadRes,
            0x1a => Self::Music,
            0x1b..=0x3f => Self::Invalid(v),
            0x40..=0x7f => Self::PolyLong(v),
            0x80..=0xff => Self::PolyShort(v),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Movi => 0x00,
            Self::Movr => 0x01,
            Self::Addr => 0x02,
            Self::Addi => 0x03,
            Self::Call => 0x04,
            Self::Ret => 0x05,
            Self::Yield => 0x06,
            Self::Jump => 0x07,
            Self::Init => 0x08,
            Self::Djnz => 0x09,
            Self::Cjmp => 0x0a,
            Self::Palette => 0x0b,
            Self::Reset => 0x0c,
            Self::Page => 0x0d,
            Self::Fill => 0x0e,
            Self::Copy => 0x0f,
            Self::Blit => 0x10,
            Self::Kill => 0x11,
            Self::Print => 0x12,
            Self::Subr => 0x13,
            Self::Andi => 0x14,
            Self::Iori => 0x15,
            Self::Shli => 0x16,
            Self::Shri => 0x17,
            Self::Sound => 0x18,
            Self::LoadRes => 0x19,
            Self::Music => 0x1a,
            Self::Invalid(v) | Self::PolyLong(v) | Self::PolyShort(v) => v,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Movi => "movi",
            Self::Movr => "movr",
            Self::Addr => "addr",
            Self::Addi => "addi",
            Self::Call => "call",
            Self::Ret => "ret",
            Self::Yield => "yield",
            Self::Jump => "jump",
            Self::Init => "init",
            Self::Djnz => "djnz",
            Self::Cjmp => "cjmp",
            Self::Palette => "palette",
            Self::Reset => "reset",
            Self::Page => "page",
            Self::Fill => "fill",
            Self::Copy => "copy",
            Self::Blit => "blit",
            Self::Kill => "kill",
            Self::Print => "print",
            Self::Subr => "subr",
            Self::Andi => "andi",
            Self::Iori => "iori",
            Self::Shli => "shli",
            Self::Shri => "shri",
            Self::Sound => "sound",
            Self::LoadRes => "loadres",
            Self::Music => "music",
            Self::Invalid(_) => "invalid",
            Self::PolyLong(_) => "poly1",
            Self::PolyShort(_) => "poly2",
        }
    }

    /// Whether executing this opcode ends the thread's slice.
    pub fn yields(self) -> bool {
        matches!(self, Self::Yield | Self::Kill)
    }
}
