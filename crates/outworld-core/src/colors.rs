//! Terminal colors for disassembly and trace listings.

use std::fmt::Display;

const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Escape codes for each part of a listing line.
///
/// With color off every field is empty, so formatting code never branches
/// on whether color is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    /// Mnemonics and pass headers.
    pub mnemonic: &'static str,
    /// Immediate operands.
    pub value: &'static str,
    /// Jump, call and thread entry targets.
    pub target: &'static str,
    /// Segment offsets and thread numbers.
    pub offset: &'static str,
    /// Invalid opcodes and truncated instructions.
    pub error: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        mnemonic: BLUE,
        value: GREEN,
        target: YELLOW,
        offset: DIM,
        error: RED,
        reset: RESET,
    };

    pub const OFF: Self = Self {
        mnemonic: "",
        value: "",
        target: "",
        offset: "",
        error: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    /// `text` wrapped in `color` and a reset.
    pub fn paint(&self, color: &str, text: impl Display) -> String {
        format!("{color}{text}{}", self.reset)
    }
}
