//! Bytecode format for the outworld engine.
//!
//! This crate contains:
//! - The big-endian stream cursor the interpreter fetches through
//! - The dense opcode table and instruction decoder
//! - A disassembler for inspecting segments

pub mod dump;
mod instruction;
mod opcode;
mod stream;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod instruction_tests;

pub use dump::{Disassembly, dump, format_instruction};
pub use instruction::{
    CmpOperand, Condition, Coord, DEFAULT_ZOOM, Instruction, POLY_MAX_Y, PolyBuffer, ResetMode,
    Zoom,
};
pub use opcode::Opcode;
pub use stream::{ByteCodeStream, StreamError};
