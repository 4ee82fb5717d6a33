//! Game parts: the resource sets that make up each chapter of the game.
//!
//! A part bundles four resources: a palette set, a bytecode segment and up
//! to two polygon banks. Bytecode requests a part switch by asking to load a
//! resource id in the part range.

use serde::Serialize;

pub const FIRST_PART: u16 = 0x3e80;
pub const LAST_PART: u16 = 0x3e89;

pub const PART_PROTECTION: u16 = 0x3e80;
pub const PART_INTRODUCTION: u16 = 0x3e81;
pub const PART_WATER: u16 = 0x3e82;
pub const PART_JAIL: u16 = 0x3e83;
pub const PART_CITE: u16 = 0x3e84;
pub const PART_ARENA: u16 = 0x3e85;
pub const PART_LUXE: u16 = 0x3e86;
pub const PART_FINAL: u16 = 0x3e87;
pub const PART_PASSWORD: u16 = 0x3e88;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GamePart {
    pub id: u16,
    pub name: &'static str,
    pub palettes: u8,
    pub bytecode: u8,
    pub cinematic: u8,
    /// Zero when the part has no character polygons.
    pub characters: u8,
}

const fn part(
    id: u16,
    name: &'static str,
    palettes: u8,
    bytecode: u8,
    cinematic: u8,
    characters: u8,
) -> GamePart {
    GamePart {
        id,
        name,
        palettes,
        bytecode,
        cinematic,
        characters,
    }
}

pub const PARTS: [GamePart; 10] = [
    part(0x3e80, "protection", 0x14, 0x15, 0x16, 0x00),
    part(0x3e81, "introduction", 0x17, 0x18, 0x19, 0x00),
    part(0x3e82, "water", 0x1a, 0x1b, 0x1c, 0x11),
    part(0x3e83, "jail", 0x1d, 0x1e, 0x1f, 0x11),
    part(0x3e84, "cite", 0x20, 0x21, 0x22, 0x11),
    part(0x3e85, "arena", 0x23, 0x24, 0x25, 0x00),
    part(0x3e86, "luxe", 0x26, 0x27, 0x28, 0x11),
    part(0x3e87, "final", 0x29, 0x2a, 0x2b, 0x11),
    part(0x3e88, "password", 0x7d, 0x7e, 0x7f, 0x00),
    part(0x3e89, "password", 0x7d, 0x7e, 0x7f, 0x00),
];

impl GamePart {
    pub fn lookup(id: u16) -> Option<&'static GamePart> {
        if !(FIRST_PART..=LAST_PART).contains(&id) {
            return None;
        }
        PARTS.get(usize::from(id - FIRST_PART))
    }

    /// Find a part by name or hex id (`water`, `0x3e82`, `3e82`).
    ///
    /// Names resolve to the first matching part.
    pub fn parse(s: &str) -> Option<&'static GamePart> {
        let lower = s.to_ascii_lowercase();
        if let Some(part) = PARTS.iter().find(|p| p.name == lower) {
            return Some(part);
        }
        let digits = lower.strip_prefix("0x").unwrap_or(&lower);
        let id = u16::from_str_radix(digits, 16).ok()?;
        Self::lookup(id)
    }

    /// Resource ids to load, in load order, skipping absent slots.
    pub fn resources(&self) -> impl Iterator<Item = u8> + '_ {
        [self.palettes, self.bytecode, self.cinematic, self.characters]
            .into_iter()
            .filter(|&id| id != 0)
    }
}

/// Whether a `loadres` argument names a part rather than a resource.
pub fn is_part_id(id: u16) -> bool {
    (FIRST_PART..=LAST_PART).contains(&id)
}
