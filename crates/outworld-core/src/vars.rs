//! Register slots with a fixed meaning to the engine.
//!
//! The bytecode treats all 256 registers alike; the host writes input state
//! into some of them before every frame and reads pacing back from others.

pub const RANDOM_SEED: u8 = 0x3c;
pub const LANGUAGE: u8 = 0x54;
pub const INPUT_KEY: u8 = 0xda;
pub const HERO_POS_UP_DOWN: u8 = 0xe5;
pub const MUSIC_MARK: u8 = 0xf4;
pub const SCROLL_Y: u8 = 0xf9;
pub const HERO_ACTION: u8 = 0xfa;
pub const HERO_POS_JUMP_DOWN: u8 = 0xfb;
pub const HERO_POS_LEFT_RIGHT: u8 = 0xfc;
pub const HERO_POS_MASK: u8 = 0xfd;
pub const HERO_ACTION_POS_MASK: u8 = 0xfe;
pub const PAUSE_SLICES: u8 = 0xff;

/// Set to 0x14 by the DOS release; checked by the intro bytecode.
pub const DOS_MARKER: u8 = 0xe4;

/// Registers pre-seeded so the copy protection screen accepts any answer.
pub const PROTECTION_PRESETS: [(u8, u16); 4] =
    [(0xbc, 0x10), (0xc6, 0x80), (0xdc, 0x21), (0xf2, 0x0fa0)];

/// Symbolic name of a register, if it has one.
pub fn name(reg: u8) -> Option<&'static str> {
    let name = match reg {
        RANDOM_SEED => "random_seed",
        LANGUAGE => "language",
        INPUT_KEY => "input_key",
        DOS_MARKER => "dos_marker",
        HERO_POS_UP_DOWN => "hero_pos_up_down",
        MUSIC_MARK => "music_mark",
        SCROLL_Y => "scroll_y",
        HERO_ACTION => "hero_action",
        HERO_POS_JUMP_DOWN => "hero_pos_jump_down",
        HERO_POS_LEFT_RIGHT => "hero_pos_left_right",
        HERO_POS_MASK => "hero_pos_mask",
        HERO_ACTION_POS_MASK => "hero_action_pos_mask",
        PAUSE_SLICES => "pause_slices",
        _ => return None,
    };
    Some(name)
}
