use std::io::Write;

use crate::{Division, Format, FormatError, ReadResult, ReaderError, reader::Reader};

/// Size of the header chunk body
pub const HEADER_LENGTH: u32 = 6;

#[doc = r#"
The contents of the `MThd` chunk.

```text
"MThd" | u32 length = 6 | u16 format | u16 track count | u16 division
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    format: Format,
    track_count: u16,
    division: Division,
}

impl Header {
    /// Create a new header
    pub const fn new(format: Format, track_count: u16, division: Division) -> Self {
        Self {
            format,
            track_count,
            division,
        }
    }

    /// Reads everything after the `MThd` tag.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let position = reader.buffer_position();
        let length = reader.read_u32()?;
        if length != HEADER_LENGTH {
            return Err(ReaderError::format_error(
                position,
                FormatError::InvalidHeaderLength(length),
            ));
        }

        let position = reader.buffer_position();
        let format = Format::from_raw(reader.read_u16()?)
            .map_err(|e| ReaderError::format_error(position, e))?;

        let position = reader.buffer_position();
        let track_count = reader.read_u16()?;
        if format.is_single_track() && track_count != 1 {
            return Err(ReaderError::format_error(
                position,
                FormatError::SingleTrackCount(track_count),
            ));
        }

        let position = reader.buffer_position();
        let division = Division::from_raw(reader.read_u16()?)
            .map_err(|e| ReaderError::format_error(position, e))?;

        Ok(Self::new(format, track_count, division))
    }

    /// Writes the complete chunk, tag included.
    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(b"MThd")?;
        writer.write_all(&HEADER_LENGTH.to_be_bytes())?;
        writer.write_all(&self.format.to_raw().to_be_bytes())?;
        writer.write_all(&self.track_count.to_be_bytes())?;
        writer.write_all(&self.division.to_raw().to_be_bytes())?;
        Ok(())
    }

    /// File format
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Number of track chunks that follow
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Time division
    pub const fn division(&self) -> Division {
        self.division
    }
}

#[test]
fn header_bytes() {
    let header = Header::new(Format::Simultaneous, 2, Division::TicksPerQuarterNote(96));
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    assert_eq!(
        bytes,
        [
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0, 96
        ]
    );

    let mut reader = Reader::from_byte_slice(&bytes[4..]);
    assert_eq!(Header::read(&mut reader), Ok(header));
}

#[test]
fn header_length_must_be_six() {
    let bytes = [0, 0, 0, 7, 0, 1, 0, 1, 0, 96, 0];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err,
        ReaderError::format_error(0, FormatError::InvalidHeaderLength(7))
    );
}

#[test]
fn single_track_format_with_two_tracks() {
    let bytes = [0, 0, 0, 6, 0, 0, 0, 2, 0, 96];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err,
        ReaderError::format_error(6, FormatError::SingleTrackCount(2))
    );
}
