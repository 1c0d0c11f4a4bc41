use core::ops::Range;

use thiserror::Error;

/// A read or write ran past the end of the underlying packet buffer.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("Access of {requested} bytes at offset {offset} overruns a {len} byte buffer.")]
pub struct OutOfBounds {
    /// Cursor position when the access was attempted.
    pub offset: usize,
    /// Number of bytes the access needed.
    pub requested: usize,
    /// Length of the buffer.
    pub len: usize,
}

/// Sequential reader/writer over a fixed-size packet buffer.
///
/// The cursor starts at offset 0 and advances by the number of bytes
/// consumed or produced by each call. The buffer is never grown; any access
/// that would run past its end fails with [`OutOfBounds`] and leaves the
/// offset untouched.
///
/// Reads are available for any `B: AsRef<[u8]>`. Writes additionally need
/// `B: AsMut<[u8]>`, so a cursor over a borrowed reply slice is read-only.
#[derive(Debug, Clone)]
pub struct PacketCursor<B> {
    buf: B,
    offset: usize,
}

impl<B: AsRef<[u8]>> PacketCursor<B> {
    /// Creates a cursor positioned at the start of `buf`.
    pub const fn new(buf: B) -> Self {
        Self { buf, offset: 0 }
    }

    /// Current position in the buffer.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// Returns `true` if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.offset)
    }

    /// Moves the cursor back to the start of the buffer.
    pub fn rewind(&mut self) {
        self.offset = 0;
    }

    /// Returns a reference to the underlying buffer.
    pub const fn get_ref(&self) -> &B {
        &self.buf
    }

    /// Consumes the cursor, returning the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Reserves the next `n` bytes, advancing the cursor.
    fn advance(&mut self, n: usize) -> Result<Range<usize>, OutOfBounds> {
        let len = self.len();
        let end = self
            .offset
            .checked_add(n)
            .filter(|&end| end <= len)
            .ok_or(OutOfBounds {
                offset: self.offset,
                requested: n,
                len,
            })?;

        let span = self.offset..end;
        self.offset = end;
        Ok(span)
    }

    /// Reads one byte.
    pub fn read_byte(&mut self) -> Result<u8, OutOfBounds> {
        let span = self.advance(1)?;
        Ok(self.buf.as_ref()[span.start])
    }

    /// Reads the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], OutOfBounds> {
        let span = self.advance(n)?;
        Ok(&self.buf.as_ref()[span])
    }

    /// Reads the next `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, OutOfBounds> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PacketCursor<B> {
    /// Writes one byte.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), OutOfBounds> {
        let span = self.advance(1)?;
        self.buf.as_mut()[span.start] = byte;
        Ok(())
    }

    /// Writes all of `bytes`.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), OutOfBounds> {
        let span = self.advance(bytes.len())?;
        self.buf.as_mut()[span].copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{OutOfBounds, PacketCursor};

    #[test]
    fn reads_advance_offset() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut cursor = PacketCursor::new(data.as_slice());

        assert_eq!(cursor.read_byte().unwrap(), 0x01);
        assert_eq!(cursor.read_bytes(2).unwrap(), &[0x02, 0x03]);
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0504);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn overrun_fails_without_moving() {
        let data = [0xAA; 4];
        let mut cursor = PacketCursor::new(data.as_slice());
        cursor.read_bytes(3).unwrap();

        assert_eq!(
            cursor.read_bytes(2),
            Err(OutOfBounds {
                offset: 3,
                requested: 2,
                len: 4,
            })
        );

        // The failed read must not have consumed anything
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.read_byte().unwrap(), 0xAA);
    }

    #[test]
    fn writes_and_rewind() {
        let mut cursor = PacketCursor::new([0u8; 4]);
        cursor.write_byte(2).unwrap();
        cursor.write_bytes(&[7, 8, 9]).unwrap();
        assert!(cursor.write_byte(0).is_err());

        cursor.rewind();
        assert_eq!(cursor.read_array::<4>().unwrap(), [2, 7, 8, 9]);
        assert_eq!(cursor.into_inner(), [2, 7, 8, 9]);
    }

    #[test]
    fn huge_request_does_not_overflow() {
        let data = [0u8; 2];
        let mut cursor = PacketCursor::new(data.as_slice());
        cursor.read_byte().unwrap();

        assert!(cursor.read_bytes(usize::MAX).is_err());
    }
}
