#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

/// Turning [`Note`]s into track events.
pub mod builder;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod track;
pub use track::*;

/// Ticks, tempo and time divisions.
pub mod timing;
pub use timing::*;

use std::io::{Read, Write};

use crate::{
    Error,
    prelude::*,
    reader::{self, ReadResult},
    writer::{self, WriteResult},
};

#[doc = r#"
A Standard MIDI File: format, time division and an ordered list of tracks.

The file also carries the tempo used to place notes in time and the program
each channel was last set to, so that tracks built one after the other only
emit program changes when an instrument actually changes.

# Example
```rust
# use smf_codec::prelude::*;
# use std::time::Duration;
let mut file = MidiFile::new(Format::Simultaneous, Division::default());
file.add_notes(&[
    Note::from_name("C4").unwrap(),
    Note::from_name("D4").unwrap(),
])
.unwrap();

let bytes = file.to_bytes().unwrap();
let decoded = MidiFile::parse(&bytes).unwrap();
assert_eq!(decoded.tracks(), file.tracks());
```
"#]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    format: Format,
    division: Division,
    tempo: Bpm,
    tracks: Vec<Track>,
    programs: ChannelPrograms,
}

impl Default for MidiFile {
    fn default() -> Self {
        Self::new(Format::default(), Division::default())
    }
}

impl MidiFile {
    /// An empty file at 120 beats per minute
    pub fn new(format: Format, division: Division) -> Self {
        Self {
            format,
            division,
            tempo: Bpm::default(),
            tracks: Vec::new(),
            programs: ChannelPrograms::default(),
        }
    }

    /// Set the tempo notes are placed against
    pub fn with_tempo(mut self, tempo: Bpm) -> Self {
        self.tempo = tempo;
        self
    }

    pub(crate) fn from_parts(format: Format, division: Division, tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            ..Self::new(format, division)
        }
    }

    /// Parse a complete file from bytes.
    ///
    /// Nothing is returned unless the header and every declared track decode.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        reader::decode(bytes)
    }

    /// Read a stream to its end and parse it
    pub fn read_from<R: Read>(mut source: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Ok(Self::parse(&bytes)?)
    }

    /// Serialize the file into `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> WriteResult<()> {
        writer::encode(self, &mut writer)
    }

    /// Serialize the file into a new buffer
    pub fn to_bytes(&self) -> WriteResult<Vec<u8>> {
        let mut bytes = Vec::new();
        writer::encode(self, &mut bytes)?;
        Ok(bytes)
    }

    /// File format
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Time division
    pub const fn division(&self) -> Division {
        self.division
    }

    /// Tempo used when converting note durations to ticks
    pub const fn tempo(&self) -> Bpm {
        self.tempo
    }

    /// The tracks of the file
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The program each channel is set to after the tracks built so far
    pub const fn programs(&self) -> &ChannelPrograms {
        &self.programs
    }

    /// The program a channel is set to
    pub const fn program(&self, channel: Channel) -> u8 {
        self.programs.get(channel)
    }

    fn check_room_for_track(&self) -> Result<(), FileError> {
        if self.format.is_single_track() && !self.tracks.is_empty() {
            return Err(FileError::SingleTrackFormat);
        }
        Ok(())
    }

    /// Append a track.
    ///
    /// # Errors
    /// A single track file refuses a second track.
    pub fn push_track(&mut self, track: Track) -> Result<(), FileError> {
        self.check_room_for_track()?;
        self.tracks.push(track);
        Ok(())
    }

    /// A builder sharing this file's division, tempo and program state.
    ///
    /// The built track still has to be added with [`MidiFile::push_track`].
    pub fn track_builder(&mut self) -> Result<TrackBuilder<'_>, FileError> {
        TrackBuilder::new(self.division, self.tempo, &mut self.programs)
    }

    /// Build a track from `notes` and append it
    pub fn add_notes(&mut self, notes: &[Note]) -> Result<&Track, FileError> {
        self.add_notes_with(notes, TrackOptions::default())
    }

    /// Build a track from `notes` with extra meta events and append it.
    pub fn add_notes_with(
        &mut self,
        notes: &[Note],
        options: TrackOptions,
    ) -> Result<&Track, FileError> {
        self.check_room_for_track()?;
        let mut builder = self.track_builder()?.with_options(options);
        builder.extend(notes);
        let track = builder.build()?;

        let index = self.tracks.len();
        self.tracks.push(track);
        Ok(&self.tracks[index])
    }
}

#[test]
fn single_track_format_holds_one_track() {
    let mut file = MidiFile::new(Format::SingleMultiChannel, Division::default());
    file.add_notes(&[Note::new(440.0)]).unwrap();
    assert_eq!(
        file.add_notes(&[Note::new(440.0)]),
        Err(FileError::SingleTrackFormat)
    );
    assert_eq!(
        file.push_track(Track::default()),
        Err(FileError::SingleTrackFormat)
    );
    assert_eq!(file.track_count(), 1);
}

#[test]
fn programs_carry_over_between_tracks() {
    let mut file = MidiFile::default();
    let organ = Note::new(440.0).with_program(19);

    let first = file.add_notes(&[organ.clone()]).unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(file.program(Channel::One), 19);

    let second = file.add_notes(&[organ]).unwrap();
    assert_eq!(second.len(), 2);
}

#[test]
fn smpte_division_cannot_place_notes() {
    let mut file = MidiFile::new(
        Format::Simultaneous,
        Division::Smpte {
            fps: SmpteFps::TwentyFive,
            ticks_per_frame: 40,
        },
    );
    assert_eq!(
        file.add_notes(&[Note::new(440.0)]),
        Err(FileError::RequiresTicksPerQuarterNote)
    );
}
