//! Resource descriptors as stored in the memory list.

use std::fmt;

use serde::Serialize;

/// What a resource contains.
///
/// Kinds beyond the known set are preserved as `Unknown` so a damaged or
/// foreign memory list can still be listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Sound,
    Music,
    Bitmap,
    Palette,
    Bytecode,
    /// Polygon data for cinematics (the first polygon buffer).
    PolyCinematic,
    /// Polygon data for characters and objects (the second polygon buffer).
    PolyCharacters,
    Unknown(u8),
}

impl ResourceKind {
    /// Marks the end of the memory list.
    pub const END: u8 = 0xff;

    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Self::Sound,
            0x01 => Self::Music,
            0x02 => Self::Bitmap,
            0x03 => Self::Palette,
            0x04 => Self::Bytecode,
            0x05 => Self::PolyCinematic,
            0x06 => Self::PolyCharacters,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Sound => 0x00,
            Self::Music => 0x01,
            Self::Bitmap => 0x02,
            Self::Palette => 0x03,
            Self::Bytecode => 0x04,
            Self::PolyCinematic => 0x05,
            Self::PolyCharacters => 0x06,
            Self::Unknown(v) => v,
        }
    }

    /// Short name used in listings and dump file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sound => "sound",
            Self::Music => "music",
            Self::Bitmap => "bitmap",
            Self::Palette => "palette",
            Self::Bytecode => "bytecode",
            Self::PolyCinematic => "polygon1",
            Self::PolyCharacters => "polygon2",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load state of a resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    #[default]
    NotNeeded,
    Needed,
    Loaded,
}

impl ResourceState {
    /// Decode the on-disk state byte. Values other than needed/loaded read as
    /// not needed, matching how the loader resets every entry at startup.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x01 => Self::Needed,
            0x02 => Self::Loaded,
            _ => Self::NotNeeded,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::NotNeeded => 0x00,
            Self::Needed => 0x01,
            Self::Loaded => 0x02,
        }
    }
}

/// What the interpreter may ask about a resource before using it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub kind: ResourceKind,
    pub state: ResourceState,
    /// Unpacked size in bytes.
    pub size: u16,
}

impl ResourceEntry {
    pub fn is_loaded(&self) -> bool {
        self.state == ResourceState::Loaded
    }
}
