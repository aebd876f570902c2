#![doc = r#"
Conversions between frequencies, note names and MIDI note numbers.

Everything here assumes 12-tone equal temperament tuned to `A4 = 440 Hz`.
"#]

use crate::{DataByte, NoteNameError, NoteNumber, key::parse_note_name};

/// The reference pitch, A4.
pub const A4_FREQUENCY: f64 = 440.0;

#[doc = r#"
A 14-bit pitch bend value as it appears on the wire.

[`PitchBend::CENTER`] (`8192`) means no bend. The range assumed when
quantizing frequencies is one semitone in either direction, so `0` is a full
semitone down and `16383` is just short of a semitone up.
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend(u16);

impl Default for PitchBend {
    fn default() -> Self {
        Self::CENTER
    }
}

impl PitchBend {
    /// No bend.
    pub const CENTER: Self = Self(8192);
    /// Largest representable bend.
    pub const MAX: Self = Self(0x3FFF);

    /// Clamps `value` into `0..=16383`.
    pub const fn new(value: u16) -> Self {
        if value > 0x3FFF { Self::MAX } else { Self(value) }
    }

    /// Create a bend from a signed offset around the center, clamped.
    pub const fn from_offset(offset: i32) -> Self {
        let value = 8192 + offset;
        if value < 0 {
            Self(0)
        } else if value > 0x3FFF {
            Self::MAX
        } else {
            Self(value as u16)
        }
    }

    /// Reassembles a bend from its two wire data bytes.
    pub const fn from_data_bytes(lsb: DataByte, msb: DataByte) -> Self {
        Self(((msb.value() as u16) << 7) | lsb.value() as u16)
    }

    /// The unsigned 14-bit value.
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// The signed offset from [`PitchBend::CENTER`].
    pub const fn offset(&self) -> i32 {
        self.0 as i32 - 8192
    }

    /// The wire bytes, least significant 7 bits first.
    pub const fn data_bytes(&self) -> [DataByte; 2] {
        [
            DataByte::new_unchecked((self.0 & 0x7F) as u8),
            DataByte::new_unchecked((self.0 >> 7) as u8),
        ]
    }
}

/// Quantize a frequency to the nearest MIDI note and the bend needed to reach it.
///
/// Notes outside of `0..=127` clamp to the edge. Frequencies that are not
/// finite and positive map to note `0` without bend.
///
/// # Example
/// ```rust
/// # use smf_codec::prelude::*;
/// let (note, bend) = frequency_to_midi_note(440.0);
/// assert_eq!(note, NoteNumber::A4);
/// assert_eq!(bend, PitchBend::CENTER);
/// ```
pub fn frequency_to_midi_note(frequency: f64) -> (NoteNumber, PitchBend) {
    if !frequency.is_finite() || frequency <= 0.0 {
        return (NoteNumber::saturating(0), PitchBend::CENTER);
    }
    let exact = 69.0 + 12.0 * (frequency / A4_FREQUENCY).log2();
    let rounded = exact.round().clamp(0.0, 127.0);

    let offset = (8192.0 * (exact - rounded)).round();
    let offset = offset.clamp(-8192.0, 8191.0) as i32;

    (NoteNumber::saturating(rounded as u8), PitchBend::from_offset(offset))
}

/// The frequency of a MIDI note number.
pub fn midi_to_frequency(note: NoteNumber) -> f64 {
    semitones_to_frequency(note.value() as f64)
}

/// Parses a note name such as `A4`, `C#3`, `Bb2` or `H5` into a frequency.
///
/// Names above `G9` still produce a frequency even though they have no MIDI
/// note number.
///
/// # Errors
/// Fails with a [`NoteNameError`] when the name is not a letter `A`-`H`
/// (`H` being `B`), an optional `#`/`b`, and a single octave digit.
pub fn note_name_to_frequency(name: &str) -> Result<f64, NoteNameError> {
    let midi = parse_note_name(name)?;
    Ok(semitones_to_frequency(midi as f64))
}

fn semitones_to_frequency(midi: f64) -> f64 {
    A4_FREQUENCY * 2f64.powf((midi - 69.0) / 12.0)
}

#[test]
fn bend_wire_bytes() {
    let bend = PitchBend::new(0x2345);
    let [lsb, msb] = bend.data_bytes();
    assert_eq!(lsb.value(), 0x45);
    assert_eq!(msb.value(), 0x46);
    assert_eq!(PitchBend::from_data_bytes(lsb, msb), bend);
    assert_eq!(PitchBend::CENTER.data_bytes(), [DataByte(0x00), DataByte(0x40)]);
}

#[test]
fn bend_offsets_clamp() {
    assert_eq!(PitchBend::from_offset(0), PitchBend::CENTER);
    assert_eq!(PitchBend::from_offset(-9000).value(), 0);
    assert_eq!(PitchBend::from_offset(9000), PitchBend::MAX);
    assert_eq!(PitchBend::new(20_000), PitchBend::MAX);
    assert_eq!(PitchBend::new(100).offset(), -8092);
}

#[test]
fn eighth_tone_bends_a_quarter_of_the_range() {
    // a quarter of a semitone above A4
    let (note, bend) = frequency_to_midi_note(440.0 * 2f64.powf(0.25 / 12.0));
    assert_eq!(note.value(), 69);
    assert_eq!(bend.offset(), 2048);
}

#[test]
fn degenerate_frequencies() {
    assert_eq!(
        frequency_to_midi_note(0.0),
        (NoteNumber::saturating(0), PitchBend::CENTER)
    );
    assert_eq!(frequency_to_midi_note(f64::NAN).0.value(), 0);
    assert_eq!(frequency_to_midi_note(1.0e9).0.value(), 127);
}
