//! Seekable big-endian cursor over a bytecode segment.

/// Errors from reading a bytecode segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("read of {width} byte(s) at {offset:#06x} runs past end of segment ({len} bytes)")]
    EndOfSegment { offset: u16, width: u8, len: usize },
}

/// Forward cursor over an immutable byte buffer.
///
/// All multi-byte reads are big-endian. Seeking anywhere is allowed, including
/// past the end; only reads are bounds-checked.
#[derive(Clone, Debug)]
pub struct ByteCodeStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCodeStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset, as a 16-bit program counter.
    #[inline]
    pub fn offset(&self) -> u16 {
        self.pos as u16
    }

    #[inline]
    pub fn seek(&mut self, offset: u16) {
        self.pos = usize::from(offset);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True once the cursor sits at or beyond the last byte.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let end = self.pos + N;
        let Some(bytes) = self.data.get(self.pos..end) else {
            return Err(StreamError::EndOfSegment {
                offset: self.offset(),
                width: N as u8,
                len: self.data.len(),
            });
        };
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    pub fn fetch_byte(&mut self) -> Result<u8, StreamError> {
        self.take::<1>().map(|[b]| b)
    }

    pub fn fetch_word(&mut self) -> Result<u16, StreamError> {
        self.take::<2>().map(u16::from_be_bytes)
    }

    pub fn fetch_long(&mut self) -> Result<u32, StreamError> {
        self.take::<4>().map(u32::from_be_bytes)
    }
}
