//! The shared register bank.

use serde::{Serialize, Serializer};

pub const REGISTER_COUNT: usize = 256;

/// 256 16-bit registers shared by every thread.
///
/// Indexed by a byte, so every access is in bounds. Values are stored
/// unsigned; opcodes that compare or position reinterpret them as signed.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers {
    values: [u16; REGISTER_COUNT],
}

impl Serialize for Registers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values.iter())
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Non-zero registers only.
        let mut map = f.debug_map();
        for (i, v) in self.values.iter().enumerate() {
            if *v != 0 {
                map.entry(&format_args!("{i:#04x}"), &format_args!("{v:#06x}"));
            }
        }
        map.finish()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            values: [0; REGISTER_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, reg: u8) -> u16 {
        self.values[usize::from(reg)]
    }

    #[inline]
    pub fn get_signed(&self, reg: u8) -> i16 {
        self.get(reg) as i16
    }

    #[inline]
    pub fn set(&mut self, reg: u8, value: u16) {
        self.values[usize::from(reg)] = value;
    }

    #[inline]
    pub fn set_signed(&mut self, reg: u8, value: i16) {
        self.set(reg, value as u16);
    }

    /// Apply `f` to a register in place.
    #[inline]
    pub fn update(&mut self, reg: u8, f: impl FnOnce(u16) -> u16) -> u16 {
        let slot = &mut self.values[usize::from(reg)];
        *slot = f(*slot);
        *slot
    }

    pub fn clear(&mut self) {
        self.values = [0; REGISTER_COUNT];
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.values
    }
}
