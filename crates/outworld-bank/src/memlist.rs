//! The resource table stored in `MEMLIST.BIN`.
//!
//! Each resource is a 20-byte big-endian record. The table ends with a
//! record whose type byte is 0xff.

use std::fmt;

use outworld_core::{ResourceKind, ResourceState};

pub const RECORD_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemListError {
    #[error("memory list truncated after {entries} entries")]
    Truncated { entries: usize },
    #[error("memory list has more than 65536 entries")]
    TooManyEntries,
}

/// One record of the memory list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemEntry {
    /// Position in the list; the id bytecode uses to load it.
    pub id: u16,
    pub state: ResourceState,
    pub kind: ResourceKind,
    pub rank: u8,
    pub bank: u8,
    pub bank_offset: u32,
    pub packed_size: u16,
    pub unpacked_size: u16,
}

impl MemEntry {
    pub fn is_packed(&self) -> bool {
        self.packed_size != self.unpacked_size
    }

    /// Name of the bank file holding this resource.
    pub fn bank_file(&self) -> String {
        format!("BANK{:02X}", self.bank)
    }

    /// File name used when dumping the unpacked resource.
    pub fn dump_name(&self) -> String {
        format!("{:02x}_{}.data", self.id, self.kind)
    }

    fn decode(id: u16, r: &[u8]) -> Self {
        Self {
            id,
            state: ResourceState::from_u8(r[0]),
            kind: ResourceKind::from_u8(r[1]),
            rank: r[6],
            bank: r[7],
            bank_offset: u32::from_be_bytes([r[8], r[9], r[10], r[11]]),
            packed_size: u16::from_be_bytes([r[14], r[15]]),
            unpacked_size: u16::from_be_bytes([r[18], r[19]]),
        }
    }

    fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut r = [0; RECORD_SIZE];
        r[0] = self.state.to_u8();
        r[1] = self.kind.to_u8();
        r[6] = self.rank;
        r[7] = self.bank;
        r[8..12].copy_from_slice(&self.bank_offset.to_be_bytes());
        r[14..16].copy_from_slice(&self.packed_size.to_be_bytes());
        r[18..20].copy_from_slice(&self.unpacked_size.to_be_bytes());
        r
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemList {
    entries: Vec<MemEntry>,
}

impl MemList {
    pub fn new(entries: Vec<MemEntry>) -> Self {
        Self { entries }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, MemListError> {
        let mut entries = Vec::new();
        let mut records = bytes.chunks(RECORD_SIZE);
        loop {
            let Some(record) = records.next().filter(|r| r.len() == RECORD_SIZE) else {
                return Err(MemListError::Truncated {
                    entries: entries.len(),
                });
            };
            if record[1] == ResourceKind::END {
                break;
            }
            let id = u16::try_from(entries.len()).map_err(|_| MemListError::TooManyEntries)?;
            entries.push(MemEntry::decode(id, record));
        }
        Ok(Self { entries })
    }

    /// Serialize back to the on-disk layout, end marker included.
    ///
    /// Unused record fields are written as zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.entries.len() + 1) * RECORD_SIZE);
        for entry in &self.entries {
            out.extend_from_slice(&entry.encode());
        }
        let mut end = [0; RECORD_SIZE];
        end[1] = ResourceKind::END;
        out.extend_from_slice(&end);
        out
    }

    pub fn entries(&self) -> &[MemEntry] {
        &self.entries
    }

    pub fn get(&self, id: u16) -> Option<&MemEntry> {
        self.entries.get(usize::from(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size totals per resource kind, then unknown kinds, then everything.
    pub fn stats(&self) -> Vec<(&'static str, KindStats)> {
        let mut rows: Vec<(&'static str, KindStats)> = KNOWN_KINDS
            .iter()
            .map(|k| (k.name(), KindStats::default()))
            .chain([("unknown", KindStats::default())])
            .collect();
        let mut total = KindStats::default();

        for entry in &self.entries {
            let slot = KNOWN_KINDS
                .iter()
                .position(|&k| k == entry.kind)
                .unwrap_or(KNOWN_KINDS.len());
            rows[slot].1.add(entry);
            total.add(entry);
        }
        rows.push(("total", total));
        rows
    }
}

const KNOWN_KINDS: [ResourceKind; 7] = [
    ResourceKind::Sound,
    ResourceKind::Music,
    ResourceKind::Bitmap,
    ResourceKind::Palette,
    ResourceKind::Bytecode,
    ResourceKind::PolyCinematic,
    ResourceKind::PolyCharacters,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindStats {
    pub count: u32,
    pub packed: u32,
    pub unpacked: u32,
}

impl KindStats {
    fn add(&mut self, entry: &MemEntry) {
        self.count += 1;
        self.packed += u32::from(entry.packed_size);
        self.unpacked += u32::from(entry.unpacked_size);
    }

    /// Space saved by packing, in percent.
    pub fn gain(&self) -> f32 {
        gain(self.packed, self.unpacked)
    }
}

fn gain(packed: u32, unpacked: u32) -> f32 {
    if unpacked == 0 {
        return 0.0;
    }
    100.0 * (1.0 - packed as f32 / unpacked as f32)
}

fn percent(part: u32, whole: u32) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    100.0 * part as f32 / whole as f32
}

const ENTRY_RULE: &str = "+------+----------+---------------+---------------+---------+";
const STATS_RULE: &str =
    "+----------+-------+---------------+---------------+---------+---------+";

/// Two tables: every entry with its gain, then totals per kind.
impl fmt::Display for MemList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{ENTRY_RULE}")?;
        writeln!(f, "| id   | type     |   packed-size | unpacked-size |  gain % |")?;
        writeln!(f, "{ENTRY_RULE}")?;
        for e in &self.entries {
            writeln!(
                f,
                "| 0x{:02x} | {:<8} | {:>7} bytes | {:>7} bytes | {:>6.2}% |",
                e.id,
                e.kind.name(),
                e.packed_size,
                e.unpacked_size,
                gain(u32::from(e.packed_size), u32::from(e.unpacked_size)),
            )?;
        }
        writeln!(f, "{ENTRY_RULE}")?;

        let stats = self.stats();
        let total = stats.last().map_or(0, |(_, s)| s.unpacked);
        writeln!(f, "{STATS_RULE}")?;
        writeln!(
            f,
            "| type     | count |   packed-size | unpacked-size |  gain % | total % |"
        )?;
        writeln!(f, "{STATS_RULE}")?;
        for (name, s) in &stats {
            writeln!(
                f,
                "| {:<8} | {:>5} | {:>7} bytes | {:>7} bytes | {:>6.2}% | {:>6.2}% |",
                name,
                s.count,
                s.packed,
                s.unpacked,
                s.gain(),
                percent(s.unpacked, total),
            )?;
        }
        writeln!(f, "{STATS_RULE}")
    }
}
