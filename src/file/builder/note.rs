use core::time::Duration;

use crate::{Channel, DataByte, NoteNameError, note_name_to_frequency};

/// When a [`Note`] begins, relative to the notes appended before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteStart {
    /// This long after the latest end of any note appended so far.
    ///
    /// `After(Duration::ZERO)` plays notes one after another.
    After(Duration),
    /// At a fixed offset from the start of the track.
    At(Duration),
    /// Together with the previously appended note, forming a chord.
    WithPrevious,
}

impl Default for NoteStart {
    fn default() -> Self {
        Self::After(Duration::ZERO)
    }
}

#[doc = r#"
A musical note, as a caller describes it.

Notes are not part of the wire format. A track builder turns each one into
a note-on and a note-off event, preceded by a program change or pitch bend
when needed.

# Example
```rust
# use smf_codec::prelude::*;
# use std::time::Duration;
let note = Note::from_name("C#4")
    .unwrap()
    .with_duration(Duration::from_millis(250))
    .with_velocity(100)
    .with_channel(Channel::Two);

assert_eq!(note.channel(), Channel::Two);
assert_eq!(note.velocity(), 100);
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    frequency: f64,
    duration: Duration,
    velocity: DataByte,
    channel: Channel,
    program: DataByte,
    slur: bool,
    bend: bool,
    start: NoteStart,
}

impl Note {
    /// A quarter second at velocity 100 on channel one, program 0, following
    /// the previous note.
    pub const fn new(frequency: f64) -> Self {
        Self {
            frequency,
            duration: Duration::from_millis(250),
            velocity: DataByte(100),
            channel: Channel::One,
            program: DataByte(0),
            slur: false,
            bend: false,
            start: NoteStart::After(Duration::ZERO),
        }
    }

    /// A note from a name such as `A4` or `Bb3`.
    pub fn from_name(name: &str) -> Result<Self, NoteNameError> {
        note_name_to_frequency(name).map(Self::new)
    }

    /// How long the note sounds
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Strike velocity, clamped to 127
    pub const fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = DataByte::saturating(velocity);
        self
    }

    /// The channel to play on
    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// The instrument, clamped to 127
    pub const fn with_program(mut self, program: u8) -> Self {
        self.program = DataByte::saturating(program);
        self
    }

    /// Tie this note into the next note on its channel.
    ///
    /// A slurred note is also bent to its exact frequency.
    pub const fn slurred(mut self, slur: bool) -> Self {
        self.slur = slur;
        self
    }

    /// Bend to the exact frequency instead of the nearest semitone.
    pub const fn bent(mut self, bend: bool) -> Self {
        self.bend = bend;
        self
    }

    /// When the note starts
    pub const fn with_start(mut self, start: NoteStart) -> Self {
        self.start = start;
        self
    }

    /// Start at a fixed offset from the beginning of the track
    pub const fn at(self, offset: Duration) -> Self {
        self.with_start(NoteStart::At(offset))
    }

    /// Start after a pause following the previous note
    pub const fn after(self, delay: Duration) -> Self {
        self.with_start(NoteStart::After(delay))
    }

    /// Sound together with the previous note
    pub const fn with_previous(self) -> Self {
        self.with_start(NoteStart::WithPrevious)
    }

    /// Frequency in Hz
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Duration
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Velocity
    pub const fn velocity(&self) -> u8 {
        self.velocity.value()
    }

    /// Channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Program
    pub const fn program(&self) -> u8 {
        self.program.value()
    }

    /// Tied into the next note
    pub const fn is_slurred(&self) -> bool {
        self.slur
    }

    /// True when a pitch bend precedes the note
    pub const fn needs_bend(&self) -> bool {
        self.slur || self.bend
    }

    /// Start
    pub const fn start(&self) -> NoteStart {
        self.start
    }

    pub(crate) const fn velocity_byte(&self) -> DataByte {
        self.velocity
    }

    pub(crate) const fn program_byte(&self) -> DataByte {
        self.program
    }
}

#[test]
fn clamped_setters() {
    let note = Note::new(440.0).with_velocity(200).with_program(255);
    assert_eq!(note.velocity(), 127);
    assert_eq!(note.program(), 127);
    assert!(!note.needs_bend());
    assert!(note.slurred(true).needs_bend());
}

#[test]
fn unknown_name() {
    assert_eq!(
        Note::from_name("Zz9"),
        Err(NoteNameError::UnknownLetter('Z'))
    );
}
