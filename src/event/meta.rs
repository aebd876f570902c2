#![doc = r#"
Meta and system exclusive events.

The crate only gives meaning to the few meta events it writes itself; all
others are kept as their raw type byte and payload.
"#]

use crate::Bpm;

/// `FF 03`: sequence or track name.
pub const TRACK_NAME: u8 = 0x03;
/// `FF 2F`: end of track.
pub const END_OF_TRACK: u8 = 0x2F;
/// `FF 51`: set tempo, microseconds per quarter note.
pub const SET_TEMPO: u8 = 0x51;

#[doc = r#"
A meta event: `FF <type> <length> <data>`.

The data is carried verbatim. Only the constructors below know what any
type means; reading never interprets the payload.
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    kind: u8,
    data: Vec<u8>,
}

impl MetaEvent {
    /// Create a meta event from a type byte and payload
    pub fn new(kind: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// `FF 2F 00`
    pub fn end_of_track() -> Self {
        Self::new(END_OF_TRACK, Vec::new())
    }

    /// `FF 03 len text`
    pub fn track_name(name: &str) -> Self {
        Self::new(TRACK_NAME, name.as_bytes())
    }

    /// `FF 51 03 tttttt`, the tempo as microseconds per quarter note.
    pub fn tempo(bpm: Bpm) -> Self {
        let micros = bpm.micros_per_quarter_note().min(0xFF_FFFF);
        let bytes = micros.to_be_bytes();
        Self::new(SET_TEMPO, &bytes[1..])
    }

    /// The meta type byte
    pub const fn kind(&self) -> u8 {
        self.kind
    }

    /// The raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True for `FF 2F`
    pub const fn is_end_of_track(&self) -> bool {
        self.kind == END_OF_TRACK
    }
}

#[doc = r#"
A system exclusive event, `F0 <length> <data>` or the `F7` escape form.
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent {
    escape: bool,
    data: Vec<u8>,
}

impl SysExEvent {
    /// An `F0` event. The payload normally ends with `F7`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            escape: false,
            data: data.into(),
        }
    }

    /// An `F7` escape event, carrying arbitrary bytes.
    pub fn escape(data: impl Into<Vec<u8>>) -> Self {
        Self {
            escape: true,
            data: data.into(),
        }
    }

    /// `0xF0` or `0xF7`
    pub const fn status(&self) -> u8 {
        if self.escape { 0xF7 } else { 0xF0 }
    }

    /// The raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[test]
fn tempo_payload() {
    let meta = MetaEvent::tempo(Bpm::default());
    assert_eq!(meta.kind(), SET_TEMPO);
    // 120 bpm = 500_000 us per quarter note
    assert_eq!(meta.data(), &[0x07, 0xA1, 0x20]);
}
