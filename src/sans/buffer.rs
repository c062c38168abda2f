//! Cursor over the bytes of a record.

use super::ReadError;

/// A read cursor over an immutable byte slice.
///
/// The buffer tracks two positions: `cursor`, the start of the most recently
/// prepared region, and `prepared`, the end of it. Preparing `n` bytes moves
/// `cursor` up to `prepared` and validates that `n` more bytes exist before
/// extending `prepared` over them. [`position`](Self::position) is therefore
/// the offset of the next unread byte.
#[derive(Debug, Clone)]
pub struct ContentBuffer<'a> {
    content: &'a [u8],
    cursor: usize,
    prepared: usize,
}

impl<'a> ContentBuffer<'a> {
    pub fn new(content: &'a [u8]) -> Self {
        Self {
            content,
            cursor: 0,
            prepared: 0,
        }
    }

    /// The underlying bytes.
    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    /// The offset where the most recently prepared region starts.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.prepared
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.content.len() - self.prepared
    }

    /// Validate the next `n` bytes and advance over them.
    ///
    /// Returns the prepared region.
    pub fn prepare(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        let remaining = self.remaining();

        if n > remaining {
            Err(ReadError::Truncated {
                needed: n,
                remaining,
            })?;
        }

        self.cursor = self.prepared;
        self.prepared += n;

        Ok(&self.content[self.cursor..self.prepared])
    }

    /// Take an exact number of bytes, advancing over them.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.prepare(N)?);
        Ok(buf)
    }

    /// Relocate the cursor to an absolute offset.
    ///
    /// Offsets come from the record itself, so they are bounds-checked
    /// before the jump. An offset equal to the buffer length is accepted;
    /// any read from there fails as truncated.
    pub fn force_cursor(&mut self, position: i64) -> Result<(), ReadError> {
        let position = usize::try_from(position)
            .ok()
            .filter(|p| *p <= self.content.len())
            .ok_or(ReadError::InvalidOffset(position))?;

        self.cursor = position;
        self.prepared = position;

        Ok(())
    }
}
