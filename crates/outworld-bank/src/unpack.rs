//! ByteKiller decompression.
//!
//! A packed block ends with three big-endian words. Read from the top down
//! they hold the unpacked length, a checksum seed and the first bit chunk.
//! Everything below is a stream of 32-bit words consumed from the highest
//! address downward, and output is written from the end of the buffer
//! toward its start. That ordering lets a block expand inside the buffer it
//! was loaded into.

/// Size of the length/checksum/chunk trailer.
pub const TRAILER_SIZE: usize = 12;

/// Decompression error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnpackError {
    #[error("packed block too small: {packed} bytes (minimum {TRAILER_SIZE})")]
    Truncated { packed: usize },
    #[error("buffer too small: {len} bytes, need {needed}")]
    BufferTooSmall { len: usize, needed: usize },
    #[error("packed size {packed} exceeds unpacked size {unpacked}")]
    Oversized { packed: usize, unpacked: usize },
    #[error("already unpacked")]
    AlreadyUnpacked,
    #[error("length mismatch: trailer says {header} bytes, expected {expected}")]
    LengthMismatch { header: u32, expected: usize },
    #[error("packed stream ended early")]
    SourceExhausted,
    #[error("output overruns the buffer")]
    OutputOverrun,
    #[error("bad back-reference at {position}: offset {offset}")]
    BadReference { position: usize, offset: u32 },
    #[error("unknown code {0:#05b}")]
    UnknownCode(u32),
    #[error("checksum mismatch: {check:#010x}")]
    Checksum { check: u32 },
}

/// Unpack a block in place.
///
/// `buf[..packed_size]` holds the packed block; on success
/// `buf[..unpacked_size]` holds the data. The stream must not write over
/// packed words it has yet to read, which is reported as
/// [`UnpackError::OutputOverrun`] rather than corrupting the output.
pub fn unpack_in_place(
    buf: &mut [u8],
    packed_size: usize,
    unpacked_size: usize,
) -> Result<(), UnpackError> {
    if packed_size < TRAILER_SIZE {
        return Err(UnpackError::Truncated {
            packed: packed_size,
        });
    }
    if buf.len() < unpacked_size {
        return Err(UnpackError::BufferTooSmall {
            len: buf.len(),
            needed: unpacked_size,
        });
    }
    if packed_size > unpacked_size {
        return Err(UnpackError::Oversized {
            packed: packed_size,
            unpacked: unpacked_size,
        });
    }
    Unpacker::new(&mut buf[..unpacked_size], packed_size, 0)?.run()
}

/// Unpack `packed` into a fresh buffer of `unpacked_size` bytes.
///
/// A block whose size equals `unpacked_size` is stored, not packed, and is
/// returned as is.
pub fn unpack(packed: &[u8], unpacked_size: usize) -> Result<Vec<u8>, UnpackError> {
    if packed.len() == unpacked_size {
        return Ok(packed.to_vec());
    }
    if packed.len() < TRAILER_SIZE {
        return Err(UnpackError::Truncated {
            packed: packed.len(),
        });
    }
    if packed.len() > unpacked_size {
        return Err(UnpackError::Oversized {
            packed: packed.len(),
            unpacked: unpacked_size,
        });
    }

    // Output goes above the packed copy, so it can never catch up with
    // unread input.
    let mut buf = vec![0; packed.len() + unpacked_size];
    buf[..packed.len()].copy_from_slice(packed);
    Unpacker::new(&mut buf, packed.len(), packed.len())?.run()?;
    Ok(buf.split_off(packed.len()))
}

struct Unpacker<'a> {
    buf: &'a mut [u8],
    /// One past the next unread source byte.
    src: usize,
    /// One past the next byte to write.
    dst: usize,
    /// First byte of the output region.
    start: usize,
    length: u32,
    check: u32,
    chunk: u32,
}

impl<'a> Unpacker<'a> {
    /// Read the trailer. The output region is `buf[start..]`.
    fn new(buf: &'a mut [u8], packed_size: usize, start: usize) -> Result<Self, UnpackError> {
        let dst = buf.len();
        let mut unpacker = Self {
            buf,
            src: packed_size,
            dst,
            start,
            length: 0,
            check: 0,
            chunk: 0,
        };
        let length = unpacker.fetch_long()?;
        let check = unpacker.fetch_long()?;
        let chunk = unpacker.fetch_long()?;

        if length == 0 {
            return Err(UnpackError::AlreadyUnpacked);
        }
        let expected = dst - start;
        if length as usize != expected {
            return Err(UnpackError::LengthMismatch {
                header: length,
                expected,
            });
        }

        unpacker.length = length;
        unpacker.check = check ^ chunk;
        unpacker.chunk = chunk;
        Ok(unpacker)
    }

    fn run(mut self) -> Result<(), UnpackError> {
        while self.length != 0 {
            let code = if self.bit()? == 0 {
                self.bits(1)?
            } else {
                0b100 | self.bits(2)?
            };
            match code {
                0b00 => {
                    let count = self.bits(3)? + 1;
                    self.literals(count)?;
                }
                0b111 => {
                    let count = self.bits(8)? + 9;
                    self.literals(count)?;
                }
                0b01 => {
                    let offset = self.bits(8)?;
                    self.copy(offset, 2)?;
                }
                0b100 => {
                    let offset = self.bits(9)?;
                    self.copy(offset, 3)?;
                }
                0b101 => {
                    let offset = self.bits(10)?;
                    self.copy(offset, 4)?;
                }
                0b110 => {
                    let count = self.bits(8)? + 1;
                    let offset = self.bits(12)?;
                    self.copy(offset, count)?;
                }
                other => return Err(UnpackError::UnknownCode(other)),
            }
        }

        if self.check != 0 {
            return Err(UnpackError::Checksum { check: self.check });
        }
        tracing::trace!(unpacked = self.buf.len() - self.start, "unpacked block");
        Ok(())
    }

    fn fetch_long(&mut self) -> Result<u32, UnpackError> {
        let at = self
            .src
            .checked_sub(4)
            .ok_or(UnpackError::SourceExhausted)?;
        let b = &self.buf[at..self.src];
        self.src = at;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Next bit of the stream. The chunk carries a marker bit above its
    /// payload; once only the marker is left, the next word is loaded.
    fn bit(&mut self) -> Result<u32, UnpackError> {
        let mut bit = self.chunk & 1;
        self.chunk >>= 1;
        if self.chunk == 0 {
            let word = self.fetch_long()?;
            self.check ^= word;
            bit = word & 1;
            self.chunk = (word >> 1) | 0x8000_0000;
        }
        Ok(bit)
    }

    /// `count` bits, first bit most significant.
    fn bits(&mut self, count: u32) -> Result<u32, UnpackError> {
        let mut value = 0;
        for _ in 0..count {
            value = (value << 1) | self.bit()?;
        }
        Ok(value)
    }

    /// Position of the next output byte.
    fn next_position(&self) -> Result<usize, UnpackError> {
        if self.length == 0 {
            return Err(UnpackError::OutputOverrun);
        }
        match self.dst.checked_sub(1) {
            Some(pos) if pos >= self.src && pos >= self.start => Ok(pos),
            _ => Err(UnpackError::OutputOverrun),
        }
    }

    fn write(&mut self, pos: usize, byte: u8) {
        self.buf[pos] = byte;
        self.dst = pos;
        self.length -= 1;
    }

    fn literals(&mut self, count: u32) -> Result<(), UnpackError> {
        for _ in 0..count {
            let byte = self.bits(8)? as u8;
            let pos = self.next_position()?;
            self.write(pos, byte);
        }
        Ok(())
    }

    /// Copy `count` bytes from `offset` bytes above the write position.
    fn copy(&mut self, offset: u32, count: u32) -> Result<(), UnpackError> {
        for _ in 0..count {
            let pos = self.next_position()?;
            let from = pos + offset as usize;
            // Offset zero names the byte about to be written, which holds
            // stale packed input in place and zero in a fresh buffer.
            if offset == 0 || from >= self.buf.len() {
                return Err(UnpackError::BadReference {
                    position: pos - self.start,
                    offset,
                });
            }
            let byte = self.buf[from];
            self.write(pos, byte);
        }
        Ok(())
    }
}
