#![warn(missing_docs)]
#![doc = r#"
Encode and decode Standard MIDI Files.

The crate turns plain musical notes (a frequency or a name such as `C#4`, a
duration, a channel and an instrument) into the chunks of an SMF byte stream,
and parses such a stream back into tracks of timed events.

# Writing
```rust
use smf_codec::prelude::*;
use std::time::Duration;

let mut file = MidiFile::new(
    Format::Simultaneous,
    Division::ticks_per_quarter_note(480).unwrap(),
);
let notes: Vec<Note> = ["C4", "D4", "E4"]
    .iter()
    .map(|name| {
        Note::from_name(name)
            .unwrap()
            .with_duration(Duration::from_millis(100))
            .with_velocity(127)
    })
    .collect();
file.add_notes(&notes).unwrap();

let bytes = smf_codec::encode_file(&file).unwrap();
assert_eq!(&bytes[..4], b"MThd");
```

# Reading
```rust
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 8,
    0x00, 0x90, 0x3C, 0x40,
    0x60, 0x80, 0x3C, 0x00,
];
let file = smf_codec::decode_file(&bytes).unwrap();
assert_eq!(file.tracks()[0].len(), 2);
```

Errors are split by concern: [`ReaderError`] when decoding, [`WriteError`]
when encoding, [`FileError`] when building, [`NoteNameError`] for note names,
and [`Error`] when a single type is wanted.

The crate logs through [`log`] and never installs a logger.
"#]

mod byte;
pub use byte::*;

mod channel;
pub use channel::*;

mod error;
pub use error::*;

pub mod event;
pub use event::{
    ChannelEvent, ChannelMessage, EventKind, MetaEvent, StatusKind, SysExEvent, TrackEvent,
};

pub mod file;
pub use file::{
    Bpm, Division, Format, MidiFile, SmpteFps, Track, builder::*, duration_to_ticks,
    ticks_to_duration,
};

mod key;
pub use key::{NoteNumber, Octave, PitchClass};

mod pitch;
pub use pitch::*;

pub mod reader;
pub use reader::{FormatError, ReadResult, ReaderError, ReaderErrorKind, StreamError};

pub mod vlq;
pub use vlq::{MAX_VLQ, VarLen, decode_vlq, encode_vlq};

pub mod writer;
pub use writer::{WriteError, WriteResult};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        Channel, DataByte, Error, FileError, FormatError, MidiFile, NoteNameError, NoteNumber,
        Octave, PitchBend, PitchClass, ReadResult, ReaderError, ReaderErrorKind, StreamError,
        WriteError, WriteResult,
        event::*,
        file::{
            Division, Format, Track,
            builder::{ChannelPrograms, Note, NoteStart, TrackBuilder, TrackOptions},
            timing::{Bpm, SmpteFps, duration_to_ticks, ticks_to_duration},
        },
        frequency_to_midi_note, midi_to_frequency, note_name_to_frequency,
    };
}

/// Serialize a file into SMF bytes.
///
/// # Errors
/// Files a Standard MIDI File cannot represent, see [`WriteError`].
pub fn encode_file(file: &MidiFile) -> Result<Vec<u8>, WriteError> {
    file.to_bytes()
}

/// Parse SMF bytes into a file.
///
/// # Errors
/// [`FormatError`]s for structurally invalid files, [`StreamError`]s for
/// truncated input, both with the byte position they were found at.
pub fn decode_file(bytes: &[u8]) -> ReadResult<MidiFile> {
    MidiFile::parse(bytes)
}
