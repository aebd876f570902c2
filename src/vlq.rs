#![doc = r#"
Variable-length quantities.

Delta times and meta/sysex lengths are stored seven bits per byte, most
significant group first. Every byte except the last has its leading bit set.

```text
        0 => 00
      127 => 7F
      128 => 81 00
    16383 => FF 7F
0x0FFFFFFF => FF FF FF 7F
```

Standard MIDI Files cap these at four bytes, so [`decode_vlq`] rejects
anything longer. [`encode_vlq`] accepts any `u32` and will produce a fifth
byte above [`MAX_VLQ`]; the writer refuses such values before encoding.
"#]

use std::io::{self, Write};

use crate::StreamError;

/// The largest value that fits in four VLQ bytes.
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

const MAX_DECODE_LEN: usize = 4;

/// An encoded variable-length quantity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VarLen {
    buf: [u8; 5],
    len: u8,
}

impl VarLen {
    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[5 - self.len as usize..]
    }

    /// Number of encoded bytes.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl AsRef<[u8]> for VarLen {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Encode `value` as the shortest variable-length quantity.
pub const fn encode_vlq(mut value: u32) -> VarLen {
    // filled from the back, least significant group first
    let mut buf = [0u8; 5];
    let mut i = 4;
    buf[i] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        i -= 1;
        buf[i] = (value & 0x7F) as u8 | 0x80;
        value >>= 7;
    }
    VarLen {
        buf,
        len: (5 - i) as u8,
    }
}

/// Decode a variable-length quantity from the front of `bytes`.
///
/// Returns the value and how many bytes it occupied.
///
/// # Errors
/// - [`StreamError::Truncated`] if `bytes` ends before a byte without the
///   continuation bit.
/// - [`StreamError::VlqOverflow`] if four bytes all carry the continuation bit.
pub fn decode_vlq(bytes: &[u8]) -> Result<(u32, usize), StreamError> {
    let mut value: u32 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        if i == MAX_DECODE_LEN {
            return Err(StreamError::VlqOverflow);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_DECODE_LEN {
        return Err(StreamError::VlqOverflow);
    }
    Err(StreamError::Truncated {
        needed: 1,
        available: 0,
    })
}

/// Write `value` as a variable-length quantity, returning the bytes written.
pub fn write_vlq<W: Write>(writer: &mut W, value: u32) -> io::Result<usize> {
    let encoded = encode_vlq(value);
    writer.write_all(encoded.as_bytes())?;
    Ok(encoded.len())
}

#[test]
fn known_encodings() {
    let cases: [(u32, &[u8]); 8] = [
        (0, &[0x00]),
        (0x40, &[0x40]),
        (0x7F, &[0x7F]),
        (0x80, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (0x3FFF, &[0xFF, 0x7F]),
        (0x10_0000, &[0xC0, 0x80, 0x00]),
        (MAX_VLQ, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, bytes) in cases {
        assert_eq!(encode_vlq(value).as_bytes(), bytes, "encoding {value:#X}");
        assert_eq!(decode_vlq(bytes), Ok((value, bytes.len())));
    }
}

#[test]
fn decode_stops_at_terminator() {
    assert_eq!(decode_vlq(&[0x87, 0x68, 0x90, 0x3C]), Ok((1000, 2)));
}

#[test]
fn decode_truncated() {
    assert!(matches!(decode_vlq(&[]), Err(StreamError::Truncated { .. })));
    assert!(matches!(
        decode_vlq(&[0x81, 0x80]),
        Err(StreamError::Truncated { .. })
    ));
}

#[test]
fn decode_overlong() {
    assert_eq!(
        decode_vlq(&[0x81, 0x80, 0x80, 0x80, 0x00]),
        Err(StreamError::VlqOverflow)
    );
    assert_eq!(
        decode_vlq(&[0xFF, 0xFF, 0xFF, 0xFF]),
        Err(StreamError::VlqOverflow)
    );
}

#[test]
fn five_byte_encoding_above_cap() {
    assert_eq!(
        encode_vlq(u32::MAX).as_bytes(),
        &[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]
    );
}
