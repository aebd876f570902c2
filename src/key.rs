use core::fmt;
use core::ops::{Add, Sub};
use core::str::FromStr;

use crate::{DataByte, FormatError, NoteNameError};

#[doc = r#"
A MIDI note number, `0..=127`.

Each value corresponds to some [`PitchClass`] and [`Octave`].
[`NoteNumber`] `0` is `C-1`, `60` is `C4` and `127` is `G9`.

# Example
```rust
# use smf_codec::prelude::*;
let note: NoteNumber = "D#4".parse().unwrap();

assert_eq!(note.value(), 63);
assert_eq!(note.pitch_class(), PitchClass::DSharp);
assert_eq!(note.octave(), Octave::new(4));
assert_eq!(note.to_string(), "D#4");
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteNumber(DataByte);

impl NoteNumber {
    /// A4, the 440 Hz reference.
    pub const A4: Self = Self(DataByte(69));
    /// Middle C.
    pub const C4: Self = Self(DataByte(60));

    /// Create a new note number.
    ///
    /// Checks for correctness (leading 0 bit).
    pub const fn from_byte(byte: u8) -> Result<Self, FormatError> {
        match DataByte::new(byte) {
            Ok(b) => Ok(Self(b)),
            Err(e) => Err(e),
        }
    }

    /// Clamps the value into `0..=127`.
    pub const fn saturating(byte: u8) -> Self {
        Self(DataByte::saturating(byte))
    }

    /// Create a note number from a pitch class and octave.
    ///
    /// Returns `None` for `G#9` and above, which MIDI cannot represent.
    pub const fn new(class: PitchClass, octave: Octave) -> Option<Self> {
        let value = (octave.value() as i16 + 1) * 12 + class.semitone() as i16;
        if value > 127 {
            return None;
        }
        Some(Self(DataByte(value as u8)))
    }

    /// Identifies the pitch class of the note
    #[inline]
    pub const fn pitch_class(&self) -> PitchClass {
        PitchClass::from_semitone(self.0.0 % 12)
    }

    /// Identifies the octave of the note
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave((self.0.0 / 12) as i8 - 1)
    }

    /// Returns the underlying byte of the note
    pub const fn value(&self) -> u8 {
        self.0.0
    }
}

impl From<DataByte> for NoteNumber {
    fn from(value: DataByte) -> Self {
        Self(value)
    }
}

impl fmt::Display for NoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class(), self.octave())
    }
}

impl FromStr for NoteNumber {
    type Err = NoteNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_note_name(s)?;
        if !(0..=127).contains(&value) {
            return Err(NoteNameError::OutOfRange(value));
        }
        Ok(Self(DataByte(value as u8)))
    }
}

impl Add<u8> for NoteNumber {
    type Output = NoteNumber;
    fn add(self, rhs: u8) -> Self::Output {
        Self::saturating(self.0.0.saturating_add(rhs))
    }
}

impl Sub<u8> for NoteNumber {
    type Output = NoteNumber;
    fn sub(self, rhs: u8) -> Self::Output {
        Self(DataByte(self.0.0.saturating_sub(rhs)))
    }
}

/// Parses `[A-H][#b]?[0-9]` into an unclamped MIDI number.
///
/// `H` is the German name for `B`. Accidentals are applied arithmetically,
/// so `Cb4` is `B3` and `B#4` is `C5`.
pub(crate) fn parse_note_name(name: &str) -> Result<i16, NoteNameError> {
    let mut chars = name.chars();
    let Some(letter) = chars.next() else {
        return Err(NoteNameError::Empty);
    };
    let rest = chars.as_str();

    let class = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' | 'H' => 11,
        other => return Err(NoteNameError::UnknownLetter(other)),
    };

    let (accidental, octave) = match rest.as_bytes() {
        [octave] => (0, *octave),
        [b'#', octave] => (1, *octave),
        [b'b', octave] => (-1, *octave),
        [accidental, _] => return Err(NoteNameError::InvalidAccidental(*accidental as char)),
        _ => return Err(NoteNameError::InvalidLength(name.len())),
    };

    if !octave.is_ascii_digit() {
        return Err(NoteNameError::InvalidOctave(octave as char));
    }
    let octave = (octave - b'0') as i16;

    Ok(12 * (octave + 1) + class + accidental)
}

#[doc = r#"
The twelve pitch classes of equal temperament, spelled with sharps.
"#]
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// Returns an array beginning with [`PitchClass::C`] to [`PitchClass::B`]
    pub const fn all() -> [PitchClass; 12] {
        use PitchClass::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Returns true if the pitch class is sharp (or flat).
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use PitchClass::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    const fn from_semitone(semitone: u8) -> Self {
        Self::all()[(semitone % 12) as usize]
    }

    /// Semitones above C.
    pub const fn semitone(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PitchClass::*;
        let name = match self {
            C => "C",
            CSharp => "C#",
            D => "D",
            DSharp => "D#",
            E => "E",
            F => "F",
            FSharp => "F#",
            G => "G",
            GSharp => "G#",
            A => "A",
            ASharp => "A#",
            B => "B",
        };
        f.write_str(name)
    }
}

#[doc = r#"
Identifies the octave of a [`NoteNumber`]. Values range from -1 to 9.

# Example

```rust
# use smf_codec::prelude::*;
let octave = Octave::new(12); // clamps to 9

assert_eq!(octave.value(), 9);
```
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(i8);

impl Octave {
    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(octave: i8) -> Self {
        if octave < -1 {
            Self(-1)
        } else if octave > 9 {
            Self(9)
        } else {
            Self(octave)
        }
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn note_from_class_octave_pairs() {
    for byte in 0..128 {
        let note = NoteNumber::from_byte(byte).unwrap();
        let made = NoteNumber::new(note.pitch_class(), note.octave()).unwrap();
        assert_eq!(note, made);
    }
    assert!(NoteNumber::new(PitchClass::GSharp, Octave::new(9)).is_none());
}

#[test]
fn parse_names() {
    assert_eq!(parse_note_name("C4"), Ok(60));
    assert_eq!(parse_note_name("A4"), Ok(69));
    assert_eq!(parse_note_name("Db4"), Ok(61));
    assert_eq!(parse_note_name("H3"), Ok(59));
    assert_eq!(parse_note_name("Cb4"), Ok(59));
    assert_eq!(parse_note_name("C-1"), Err(NoteNameError::InvalidAccidental('-')));
    assert_eq!(parse_note_name(""), Err(NoteNameError::Empty));
    assert_eq!(parse_note_name("Zz9"), Err(NoteNameError::UnknownLetter('Z')));
    assert_eq!(parse_note_name("Cx4"), Err(NoteNameError::InvalidAccidental('x')));
    assert_eq!(parse_note_name("C#"), Err(NoteNameError::InvalidOctave('#')));
    assert_eq!(parse_note_name("C#10"), Err(NoteNameError::InvalidLength(4)));
}

#[test]
fn out_of_range_name() {
    assert_eq!(
        "A9".parse::<NoteNumber>(),
        Err(NoteNameError::OutOfRange(129))
    );
    assert_eq!("G9".parse::<NoteNumber>().map(|n| n.value()), Ok(127));
}
