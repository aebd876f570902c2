mod smpte;
pub use smpte::*;

use core::time::Duration;

use crate::{FileError, FormatError};

/// The header division.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// Delta times count fractions of a quarter note, `1..=32767` per quarter.
    TicksPerQuarterNote(u16),

    /// Delta times count fractions of an SMPTE frame
    Smpte {
        /// frame rate
        fps: SmpteFps,
        /// subdivisions of a frame
        ticks_per_frame: u8,
    },
}

impl Division {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// # Errors
    /// Zero, and values using the leading bit, are rejected.
    pub const fn ticks_per_quarter_note(tpqn: u16) -> Result<Self, FileError> {
        if tpqn == 0 || tpqn > 0x7FFF {
            return Err(FileError::InvalidDivision(tpqn));
        }
        Ok(Self::TicksPerQuarterNote(tpqn))
    }

    /// Parses the raw 16 bit header field.
    pub const fn from_raw(raw: u16) -> Result<Self, FormatError> {
        let [hi, lo] = raw.to_be_bytes();
        if hi & 0x80 == 0 {
            if raw == 0 {
                return Err(FormatError::ZeroDivision);
            }
            return Ok(Self::TicksPerQuarterNote(raw));
        }
        match SmpteFps::from_division_byte(hi as i8) {
            Ok(fps) => {
                if lo == 0 {
                    return Err(FormatError::ZeroDivision);
                }
                Ok(Self::Smpte {
                    fps,
                    ticks_per_frame: lo,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// The raw 16 bit header field.
    pub const fn to_raw(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => *tpqn,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => u16::from_be_bytes([fps.as_division_byte() as u8, *ticks_per_frame]),
        }
    }

    /// Returns Some if the timing is defined as ticks per quarter note
    pub const fn tpqn(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            Self::Smpte { .. } => None,
        }
    }
}

impl Default for Division {
    fn default() -> Self {
        Self::TicksPerQuarterNote(480)
    }
}

/// Beats (quarter notes) per minute.
///
/// SMF files do not store this in the header; it is only used to turn note
/// durations into ticks.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bpm(f64);

impl Bpm {
    /// Must be finite and positive.
    pub fn new(bpm: f64) -> Result<Self, FileError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(FileError::InvalidTempo);
        }
        Ok(Self(bpm))
    }

    /// The tempo
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// The tempo as a set-tempo meta event stores it.
    pub fn micros_per_quarter_note(&self) -> u32 {
        (60_000_000.0 / self.0).round() as u32
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self(120.0)
    }
}

/// `round(seconds * tpqn * bpm / 60)`
pub fn duration_to_ticks(duration: Duration, tpqn: u16, bpm: Bpm) -> u64 {
    (duration.as_secs_f64() * tpqn as f64 * bpm.value() / 60.0).round() as u64
}

/// The inverse of [`duration_to_ticks`], exact up to the rounding of one tick.
pub fn ticks_to_duration(ticks: u64, tpqn: u16, bpm: Bpm) -> Duration {
    Duration::from_secs_f64(ticks as f64 * 60.0 / (tpqn as f64 * bpm.value()))
}

#[test]
fn ticks_at_120_bpm() {
    let bpm = Bpm::default();
    assert_eq!(duration_to_ticks(Duration::from_millis(500), 480, bpm), 480);
    assert_eq!(duration_to_ticks(Duration::from_millis(100), 480, bpm), 96);
    assert_eq!(duration_to_ticks(Duration::ZERO, 480, bpm), 0);
    assert_eq!(ticks_to_duration(96, 480, bpm), Duration::from_millis(100));
}

#[test]
fn ticks_round_trip_within_a_tick() {
    let bpm = Bpm::new(97.0).unwrap();
    for millis in [1, 7, 33, 250, 1001, 12_345] {
        let d = Duration::from_millis(millis);
        let back = ticks_to_duration(duration_to_ticks(d, 96, bpm), 96, bpm);
        let one_tick = ticks_to_duration(1, 96, bpm);
        let diff = if back > d { back - d } else { d - back };
        assert!(diff <= one_tick, "{d:?} came back as {back:?}");
    }
}

#[test]
fn raw_divisions() {
    assert_eq!(Division::from_raw(96), Ok(Division::TicksPerQuarterNote(96)));
    assert_eq!(Division::from_raw(0), Err(FormatError::ZeroDivision));
    let smpte = Division::from_raw(0xE728).unwrap();
    assert_eq!(
        smpte,
        Division::Smpte {
            fps: SmpteFps::TwentyFive,
            ticks_per_frame: 40
        }
    );
    assert_eq!(smpte.to_raw(), 0xE728);
    assert_eq!(
        Division::ticks_per_quarter_note(0x8000),
        Err(FileError::InvalidDivision(0x8000))
    );
    assert!(Bpm::new(0.0).is_err());
    assert!(Bpm::new(f64::NAN).is_err());
}
