#![doc = r#"
Reading Standard MIDI Files.

[`Reader`] is a cursor over a byte slice that knows the primitive encodings
of the format: big-endian integers, four byte chunk tags and variable-length
quantities. [`decode`] drives it through the chunk structure:

```text
ExpectHeaderTag -> ExpectHeaderBody -> ExpectTrackTag -> ExpectTrackBody
                                             ^                  |
                                             |__________________|  (once per declared track)
                                                                |
                                                               Done
```
"#]

mod error;
pub use error::*;

mod decoder;
pub use decoder::*;

use crate::vlq::decode_vlq;

/// A cursor over the bytes of a MIDI file.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Read from a byte slice
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next unread byte
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True when every byte has been read
    pub const fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn truncated(&self, needed: usize) -> ReaderError {
        ReaderError::malformed(
            self.position,
            StreamError::Truncated {
                needed,
                available: self.remaining(),
            },
        )
    }

    /// Read the next `len` bytes.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// A reader over only the next `len` bytes, which this reader skips.
    ///
    /// Positions stay relative to the whole input, so errors from the
    /// sub-reader point at the right byte.
    pub fn split_off(&mut self, len: usize) -> ReadResult<Reader<'a>> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let end = self.position + len;
        let sub = Reader {
            data: &self.data[..end],
            position: self.position,
        };
        self.position = end;
        Ok(sub)
    }

    /// Read exactly `N` bytes.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [b] = self.read_exact_size()?;
        Ok(b)
    }

    /// Read a big-endian u16
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian u32
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read a variable-length quantity.
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let (value, len) = decode_vlq(&self.data[self.position..]).map_err(|e| match e {
            StreamError::Truncated { .. } => self.truncated(self.remaining() + 1),
            other => ReaderError::malformed(self.position, other),
        })?;
        self.position += len;
        Ok(value)
    }
}

#[test]
fn primitive_reads() {
    let bytes = [0x12, 0x34, 0x00, 0x00, 0x00, 0x06, 0x81, 0x00, 0xAB];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_u16(), Ok(0x1234));
    assert_eq!(reader.read_u32(), Ok(6));
    assert_eq!(reader.read_vlq(), Ok(0x80));
    assert_eq!(reader.peek_u8(), Ok(0xAB));
    assert_eq!(reader.read_u8(), Ok(0xAB));
    assert!(reader.is_at_end());

    let err = reader.read_u16().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 9);
}

#[test]
fn split_off_keeps_absolute_positions() {
    let bytes = [0x01, 0x02, 0x03, 0x04, 0x05];
    let mut reader = Reader::from_byte_slice(&bytes);
    reader.read_u8().unwrap();

    let mut chunk = reader.split_off(2).unwrap();
    assert_eq!(reader.buffer_position(), 3);
    assert_eq!(chunk.read_u8(), Ok(0x02));
    assert_eq!(chunk.buffer_position(), 2);

    let err = chunk.read_u16().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 2);

    assert!(reader.split_off(3).unwrap_err().is_truncated());
}
