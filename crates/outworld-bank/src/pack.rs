//! ByteKiller compression.
//!
//! A greedy LZ encoder producing blocks [`unpack`](crate::unpack) accepts.
//! The decoder emits the last byte first, so matching runs over the data
//! reversed: a back-reference points at bytes that sit above the write
//! position in the unreversed layout.

use crate::unpack::unpack_in_place;

/// Largest distance a back-reference can encode (12 bits).
const MAX_DISTANCE: usize = 4095;
/// Longest back-reference (8-bit count plus one).
const MAX_MATCH: usize = 256;
/// Longest literal run (8-bit count plus nine).
const MAX_LITERALS: usize = 264;
/// Candidates examined per position.
const MAX_CHAIN: usize = 256;

const NONE: usize = usize::MAX;

/// Pack `data` into a ByteKiller block.
///
/// The block is guaranteed to expand in place, the way banks are loaded.
/// When packing does not save space, or the output would overtake unread
/// input during an in-place expansion, the data is returned unchanged; a
/// block as long as its unpacked size is read back as stored.
pub fn pack(data: &[u8]) -> Vec<u8> {
    let Ok(length) = u32::try_from(data.len()) else {
        return data.to_vec();
    };
    if data.is_empty() {
        return Vec::new();
    }

    let reversed: Vec<u8> = data.iter().rev().copied().collect();
    let mut encoder = Encoder::new(&reversed);
    encoder.encode();
    let packed = encoder.out.finish(length);

    tracing::trace!(unpacked = data.len(), packed = packed.len(), "packed block");
    if packed.len() >= data.len() {
        return data.to_vec();
    }
    if !expands_in_place(&packed, data.len()) {
        tracing::debug!(
            unpacked = data.len(),
            packed = packed.len(),
            "block overruns in place, storing"
        );
        return data.to_vec();
    }
    packed
}

fn expands_in_place(packed: &[u8], unpacked_size: usize) -> bool {
    let mut buf = packed.to_vec();
    buf.resize(unpacked_size, 0);
    unpack_in_place(&mut buf, packed.len(), unpacked_size).is_ok()
}

struct Encoder<'a> {
    data: &'a [u8],
    /// Most recent position for each two-byte key.
    head: Vec<usize>,
    /// Previous position with the same key.
    prev: Vec<usize>,
    literals: Vec<u8>,
    out: BitWriter,
}

impl<'a> Encoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            head: vec![NONE; 1 << 16],
            prev: vec![NONE; data.len()],
            literals: Vec::new(),
            out: BitWriter::new(),
        }
    }

    fn encode(&mut self) {
        let mut pos = 0;
        while pos < self.data.len() {
            let (len, distance) = self.longest_match(pos);
            if len >= 3 || (len == 2 && distance <= 0xff) {
                self.flush_literals();
                self.emit_match(len, distance);
                for p in pos..pos + len {
                    self.insert(p);
                }
                pos += len;
            } else {
                self.literals.push(self.data[pos]);
                self.insert(pos);
                pos += 1;
            }
        }
        self.flush_literals();
    }

    fn key(&self, pos: usize) -> Option<usize> {
        let pair = self.data.get(pos..pos + 2)?;
        Some(usize::from(pair[0]) << 8 | usize::from(pair[1]))
    }

    fn insert(&mut self, pos: usize) {
        if let Some(key) = self.key(pos) {
            self.prev[pos] = self.head[key];
            self.head[key] = pos;
        }
    }

    /// Longest earlier occurrence of the bytes at `pos`, as (length, distance).
    fn longest_match(&self, pos: usize) -> (usize, usize) {
        let Some(key) = self.key(pos) else {
            return (0, 0);
        };
        let limit = MAX_MATCH.min(self.data.len() - pos);
        let mut best = (0, 0);
        let mut candidate = self.head[key];
        let mut tries = 0;

        while candidate != NONE && pos - candidate <= MAX_DISTANCE && tries < MAX_CHAIN {
            let len = self.data[candidate..]
                .iter()
                .zip(&self.data[pos..pos + limit])
                .take_while(|(a, b)| a == b)
                .count();
            if len > best.0 {
                best = (len, pos - candidate);
                if len == limit {
                    break;
                }
            }
            candidate = self.prev[candidate];
            tries += 1;
        }
        best
    }

    fn emit_match(&mut self, len: usize, distance: usize) {
        let distance = distance as u32;
        match len {
            2 => {
                self.out.push(2, 0b01);
                self.out.push(8, distance);
            }
            3 if distance <= 0x1ff => {
                self.out.push(3, 0b100);
                self.out.push(9, distance);
            }
            4 if distance <= 0x3ff => {
                self.out.push(3, 0b101);
                self.out.push(10, distance);
            }
            _ => {
                self.out.push(3, 0b110);
                self.out.push(8, len as u32 - 1);
                self.out.push(12, distance);
            }
        }
    }

    fn flush_literals(&mut self) {
        for run in self.literals.chunks(MAX_LITERALS) {
            let count = run.len() as u32;
            if count <= 8 {
                self.out.push(2, 0b00);
                self.out.push(3, count - 1);
            } else {
                self.out.push(3, 0b111);
                self.out.push(8, count - 9);
            }
            for &byte in run {
                self.out.push(8, u32::from(byte));
            }
        }
        self.literals.clear();
    }
}

/// Bits in the order the decoder reads them.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    bits: Vec<bool>,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`, most significant first.
    pub(crate) fn push(&mut self, count: u32, value: u32) {
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 != 0);
        }
    }

    /// Lay the bits out as words below a trailer announcing `length` bytes.
    ///
    /// The leftover `len % 32` bits go into the trailer's chunk under its
    /// marker bit. Each following word is read least significant bit first.
    pub(crate) fn finish(&self, length: u32) -> Vec<u8> {
        let (head, rest) = self.bits.split_at(self.bits.len() % 32);
        let chunk = head
            .iter()
            .enumerate()
            .fold(1 << head.len(), |acc, (i, &bit)| acc | u32::from(bit) << i);
        let words: Vec<u32> = rest
            .chunks(32)
            .map(|word| {
                word.iter()
                    .enumerate()
                    .fold(0, |acc, (i, &bit)| acc | u32::from(bit) << i)
            })
            .collect();
        let check = words.iter().fold(chunk, |acc, w| acc ^ w);

        let mut out = Vec::with_capacity(words.len() * 4 + 12);
        for word in words.iter().rev() {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out.extend_from_slice(&chunk.to_be_bytes());
        out.extend_from_slice(&check.to_be_bytes());
        out.extend_from_slice(&length.to_be_bytes());
        out
    }
}
