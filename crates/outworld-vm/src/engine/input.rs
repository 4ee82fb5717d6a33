//! Player input snapshot.

use outworld_core::vars;

use super::registers::Registers;

/// Input state handed to the machine before each pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    /// Direction and button bits (`DPAD_*`).
    pub mask: u16,
    /// -1 left, 1 right, 0 neither.
    pub horz: i16,
    /// -1 up, 1 down, 0 neither.
    pub vert: i16,
    /// 1 while the action button is held.
    pub btns: i16,
    /// Typed character, consumed by the next pass; 0 for none.
    pub input: u8,
    pub quit: bool,
    pub pause: bool,
}

impl Controls {
    pub const DPAD_RIGHT: u16 = 1 << 0;
    pub const DPAD_LEFT: u16 = 1 << 1;
    pub const DPAD_DOWN: u16 = 1 << 2;
    pub const DPAD_UP: u16 = 1 << 3;
    pub const DPAD_BUTTON: u16 = 1 << 7;

    /// Write this snapshot into the reserved input registers.
    ///
    /// A pending typed character is moved into `INPUT_KEY` and cleared, so
    /// each key press is seen by exactly one pass.
    pub(crate) fn apply(&mut self, regs: &mut Registers) {
        regs.set(vars::INPUT_KEY, 0);
        regs.set_signed(vars::HERO_POS_LEFT_RIGHT, self.horz);
        regs.set_signed(vars::HERO_POS_UP_DOWN, self.vert);
        regs.set_signed(vars::HERO_POS_JUMP_DOWN, self.vert);
        regs.set(vars::HERO_POS_MASK, self.mask);
        regs.set_signed(vars::HERO_ACTION, self.btns);
        regs.set(vars::HERO_ACTION_POS_MASK, self.mask);

        if self.input != 0 {
            regs.set(vars::INPUT_KEY, u16::from(self.input));
            self.input = 0;
        }
    }
}
