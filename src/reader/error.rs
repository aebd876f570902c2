use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading data into the midi representation
"#]
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ReaderErrorKind {
    /// The bytes are well formed but do not describe a valid SMF structure.
    #[error("Invalid format: {0}")]
    Format(#[from] FormatError),
    /// The bytes end early or contain an impossible encoding.
    #[error("Malformed stream: {0}")]
    Malformed(#[from] StreamError),
}

/// Structural problems with a Standard MIDI File.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormatError {
    /// The first chunk was not tagged `MThd`.
    #[error("Expected header tag MThd, found {0:?}")]
    InvalidHeaderTag([u8; 4]),
    /// The header chunk did not declare 6 bytes.
    #[error("Header chunk length must be 6, found {0}")]
    InvalidHeaderLength(u32),
    /// Formats other than 0, 1 and 2.
    #[error("Unknown file format {0}")]
    UnknownFormat(u16),
    /// A division of zero ticks per quarter note.
    #[error("Division must be greater than zero")]
    ZeroDivision,
    /// SMPTE division with a frame rate other than -24, -25, -29, -30.
    #[error("Invalid SMPTE frame rate {0}")]
    InvalidSmpteFps(i8),
    /// Format 0 declaring a track count other than 1.
    #[error("A single track file must have exactly one track, found {0}")]
    SingleTrackCount(u16),
    /// A track chunk not tagged `MTrk`.
    #[error("Expected track tag MTrk, found {0:?}")]
    InvalidTrackTag([u8; 4]),
    /// The events of a track did not end on its declared boundary.
    #[error("Track declared {declared} bytes but its events consumed {consumed}")]
    TrackLengthMismatch {
        /// length from the chunk header
        declared: u32,
        /// bytes consumed when the last event finished
        consumed: u64,
    },
    /// A track declared more bytes than the input holds.
    #[error("Track declared {declared} bytes but only {available} remain")]
    TrackExceedsInput {
        /// length from the chunk header
        declared: u32,
        /// bytes left in the input
        available: usize,
    },
    /// A status byte with no defined meaning inside a track.
    #[error("Unsupported status byte {0:#04X}")]
    UnsupportedStatus(u8),
    /// A data byte with its leading bit set.
    #[error("Data byte {0:#04X} has its leading bit set")]
    InvalidDataByte(u8),
    /// A data byte appeared where a status was expected, with nothing to repeat.
    #[error("Running status used before any channel status")]
    MissingRunningStatus,
}

/// Streams that end early or hold impossible encodings.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StreamError {
    /// Fewer bytes remained than the next field needs.
    #[error("Needed {needed} more bytes, only {available} remain")]
    Truncated {
        /// bytes the field needs
        needed: usize,
        /// bytes left in the input
        available: usize,
    },
    /// A variable-length quantity longer than four bytes.
    #[error("Variable-length quantity exceeds four bytes")]
    VlqOverflow,
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// True if the input ended before the declared structure did
    pub const fn is_truncated(&self) -> bool {
        matches!(
            self.kind,
            ReaderErrorKind::Malformed(StreamError::Truncated { .. })
        )
    }

    /// True for structural errors
    pub const fn is_format_error(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Format(_))
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new format error
    pub const fn format_error(position: usize, error: FormatError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Format(error),
        }
    }

    /// Create a new malformed stream error
    pub const fn malformed(position: usize, error: StreamError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Malformed(error),
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
