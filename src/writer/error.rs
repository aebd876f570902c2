use std::io;

use thiserror::Error;

/// Errors that can occur while writing a file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The underlying writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Format 0 files are written with exactly one track.
    #[error("A single track file must have exactly one track, found {0}")]
    SingleTrackFormat(usize),
    /// The header counts tracks with 16 bits.
    #[error("Cannot write {0} tracks, the maximum is 65535")]
    TooManyTracks(usize),
    /// The track chunk length is 32 bits.
    #[error("Track of {0} bytes exceeds the chunk length limit")]
    TrackTooLong(usize),
    /// A delta time or length does not fit in four VLQ bytes.
    #[error("{0} does not fit in a variable-length quantity")]
    VlqOverflow(u64),
}

/// The Write Result type (see [`WriteError`])
pub type WriteResult<T> = Result<T, WriteError>;
