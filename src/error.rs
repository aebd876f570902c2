use std::io;

use thiserror::Error;

use crate::{ReaderError, WriteError};

/// A note name that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NoteNameError {
    /// Nothing to parse.
    #[error("Note name is empty")]
    Empty,
    /// Names are two or three characters, e.g. `A4` or `C#3`.
    #[error("Note name must be 2 or 3 characters, found {0}")]
    InvalidLength(usize),
    /// Letters other than `A`-`H`.
    #[error("Unknown note letter {0:?}")]
    UnknownLetter(char),
    /// Accidentals other than `#` and `b`.
    #[error("Unknown accidental {0:?}")]
    InvalidAccidental(char),
    /// The octave must be a single ASCII digit.
    #[error("Octave must be a digit 0-9, found {0:?}")]
    InvalidOctave(char),
    /// A valid name without a MIDI note number (above `G9`).
    #[error("Note {0} is outside of the MIDI range 0-127")]
    OutOfRange(i16),
}

/// Errors while configuring a file or appending notes to it.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FileError {
    /// Ticks per quarter note must be within `1..=32767`.
    #[error("Ticks per quarter note must be within 1..=32767, found {0}")]
    InvalidDivision(u16),
    /// Tempo must be finite and positive.
    #[error("Tempo must be a positive number of beats per minute")]
    InvalidTempo,
    /// A format 0 file already has its one track.
    #[error("A single track file cannot hold another track")]
    SingleTrackFormat,
    /// Notes are placed with ticks per quarter note, not SMPTE frames.
    #[error("Notes can only be placed in files timed by ticks per quarter note")]
    RequiresTicksPerQuarterNote,
    /// The gap between two events does not fit a variable-length quantity.
    #[error("Delta time of {0} ticks exceeds the largest variable-length quantity")]
    DeltaOverflow(u64),
}

#[doc = r#"
Any error the crate can produce.

Each operation returns its narrow error type; this enum lets callers that
chain several operations use `?` throughout.
"#]
#[derive(Debug, Error)]
pub enum Error {
    /// Decoding failed
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// Encoding failed
    #[error(transparent)]
    Write(#[from] WriteError),
    /// Building a file failed
    #[error(transparent)]
    File(#[from] FileError),
    /// A note name was invalid
    #[error(transparent)]
    NoteName(#[from] NoteNameError),
    /// Reading the input stream failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
