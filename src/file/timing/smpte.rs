#![doc = r#"
SMPTE time code divisions.

A header division with its leading bit set counts time in frames instead of
quarter notes. The upper byte is a negative frame rate and the lower byte the
ticks per frame.
"#]

use crate::FormatError;

/// The possible FPS (Frames Per Second) of an SMPTE division
///
/// The MIDI specification defines only four possible frame types:
/// - 24 fps: Standard film rate
/// - 25 fps: PAL/SECAM television standard
/// - 29.97 fps: NTSC color television (drop-frame timecode)
/// - 30 fps: NTSC black & white, some digital video formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour,
    /// 25 frames per second
    TwentyFive,
    /// 29.97 frames per second, drop frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// Parses the signed upper byte of a division.
    pub const fn from_division_byte(byte: i8) -> Result<Self, FormatError> {
        match byte {
            -24 => Ok(Self::TwentyFour),
            -25 => Ok(Self::TwentyFive),
            -29 => Ok(Self::TwentyNine),
            -30 => Ok(Self::Thirty),
            other => Err(FormatError::InvalidSmpteFps(other)),
        }
    }

    /// The signed upper byte of a division.
    pub const fn as_division_byte(&self) -> i8 {
        match self {
            Self::TwentyFour => -24,
            Self::TwentyFive => -25,
            Self::TwentyNine => -29,
            Self::Thirty => -30,
        }
    }

    /// Get the actual frame rate, 30000/1001 for drop frame.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// The precise value for NTSC drop-frame rate: 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;

#[test]
fn division_bytes() {
    for fps in [
        SmpteFps::TwentyFour,
        SmpteFps::TwentyFive,
        SmpteFps::TwentyNine,
        SmpteFps::Thirty,
    ] {
        assert_eq!(SmpteFps::from_division_byte(fps.as_division_byte()), Ok(fps));
    }
    assert_eq!(
        SmpteFps::from_division_byte(-28),
        Err(FormatError::InvalidSmpteFps(-28))
    );
}
