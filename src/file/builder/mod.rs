#![doc = r#"
Turning [`Note`]s into track events.

Notes are placed on an absolute timeline first and converted to delta times
last, so chords, overlapping notes and slurs all come out in the right order.

At a single tick the events are ordered as:

1. note-offs of notes ending there, including slurred notes whose key is
   struck again there
2. for each note starting there, in start order: program change, pitch bend, note-on
3. note-offs of slurred notes that were waiting for that note-on, and of
   notes too short to last a tick

Notes with the same start keep the order they were appended in.
"#]

mod note;
pub use note::*;

mod programs;
pub use programs::*;

use core::time::Duration;

use log::debug;

use crate::{
    file::timing::duration_to_ticks,
    prelude::*,
    vlq::MAX_VLQ,
};

/// Extra events a builder can place around the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackOptions {
    /// A track name meta event at tick 0
    pub name: Option<String>,
    /// A set-tempo meta event at tick 0 holding the file's tempo
    pub tempo_event: bool,
    /// An end-of-track meta event after the last note
    pub end_of_track: bool,
}

impl TrackOptions {
    /// Name the track
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Store the tempo in the track
    pub fn with_tempo_event(mut self) -> Self {
        self.tempo_event = true;
        self
    }

    /// Terminate the track
    pub fn with_end_of_track(mut self) -> Self {
        self.end_of_track = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Release,
    Start,
    Tied,
}

struct Scheduled {
    tick: u64,
    slot: Slot,
    order: usize,
    sub: u8,
    event: TrackEvent,
}

#[derive(Clone, Copy)]
struct PendingOff {
    key: NoteNumber,
    start: u64,
    natural_end: u64,
    order: usize,
}

impl PendingOff {
    /// Where a note's own release goes: a note that takes no time still
    /// ends after it starts.
    const fn release_slot(&self) -> Slot {
        if self.natural_end > self.start {
            Slot::Release
        } else {
            Slot::Tied
        }
    }
}

/// A note resolved to ticks and a key.
struct Placed {
    start: u64,
    end: u64,
    key: NoteNumber,
    bend: PitchBend,
    channel: Channel,
}

/// True if some note starting at `tick` on `channel` strikes `key`.
///
/// `placed` is sorted by start tick.
fn struck_at(placed: &[Placed], tick: u64, channel: Channel, key: NoteNumber) -> bool {
    let from = placed.partition_point(|p| p.start < tick);
    placed[from..]
        .iter()
        .take_while(|p| p.start == tick)
        .any(|p| p.channel == channel && p.key == key)
}

#[doc = r#"
Collects notes for one track and converts them into events.

Program state is borrowed from the owning [`MidiFile`], so consecutive
tracks only change programs when they need to.

# Example
```rust
# use smf_codec::prelude::*;
# use std::time::Duration;
let mut programs = ChannelPrograms::default();
let mut builder = TrackBuilder::new(
    Division::ticks_per_quarter_note(480).unwrap(),
    Bpm::default(),
    &mut programs,
).unwrap();

let quarter = Duration::from_millis(500);
builder.push(&Note::from_name("C4").unwrap().with_duration(quarter));
builder.push(&Note::from_name("E4").unwrap().with_duration(quarter).with_previous());

let track = builder.build().unwrap();
let deltas: Vec<u32> = track.events().iter().map(|e| e.delta_ticks()).collect();
assert_eq!(deltas, vec![0, 0, 480, 0]);
```
"#]
pub struct TrackBuilder<'p> {
    tpqn: u16,
    tempo: Bpm,
    programs: &'p mut ChannelPrograms,
    options: TrackOptions,
    notes: Vec<(Duration, Note)>,
    latest_end: Duration,
    previous_start: Duration,
}

impl<'p> TrackBuilder<'p> {
    /// Create a builder for a file with the given division and tempo.
    ///
    /// # Errors
    /// SMPTE divisions have no quarter notes to place notes against.
    pub fn new(
        division: Division,
        tempo: Bpm,
        programs: &'p mut ChannelPrograms,
    ) -> Result<Self, FileError> {
        let Some(tpqn) = division.tpqn() else {
            return Err(FileError::RequiresTicksPerQuarterNote);
        };
        Ok(Self {
            tpqn,
            tempo,
            programs,
            options: TrackOptions::default(),
            notes: Vec::new(),
            latest_end: Duration::ZERO,
            previous_start: Duration::ZERO,
        })
    }

    /// Set the extra events placed around the notes
    pub fn with_options(mut self, options: TrackOptions) -> Self {
        self.options = options;
        self
    }

    /// Append a note, resolving its start against the notes before it.
    pub fn push(&mut self, note: &Note) -> &mut Self {
        let start = match note.start() {
            NoteStart::After(delay) => self.latest_end.saturating_add(delay),
            NoteStart::At(offset) => offset,
            NoteStart::WithPrevious => self.previous_start,
        };
        self.previous_start = start;
        self.latest_end = self
            .latest_end
            .max(start.saturating_add(note.duration()));
        self.notes.push((start, note.clone()));
        self
    }

    /// Append several notes in order
    pub fn extend<'n>(&mut self, notes: impl IntoIterator<Item = &'n Note>) -> &mut Self {
        for note in notes {
            self.push(note);
        }
        self
    }

    fn ticks(&self, duration: Duration) -> u64 {
        duration_to_ticks(duration, self.tpqn, self.tempo)
    }

    /// Produce the track.
    ///
    /// Program state is only updated when the whole track builds.
    ///
    /// # Errors
    /// [`FileError::DeltaOverflow`] if two consecutive events are further apart
    /// than a variable-length quantity can express.
    pub fn build(mut self) -> Result<Track, FileError> {
        let mut programs = *self.programs;
        let mut notes = core::mem::take(&mut self.notes);
        notes.sort_by_key(|(start, _)| *start);

        let mut placed = Vec::with_capacity(notes.len());
        for (start, note) in &notes {
            let start = self.ticks(*start);
            let length = self.ticks(note.duration());
            let end = start
                .checked_add(length)
                .ok_or(FileError::DeltaOverflow(length))?;
            let (key, bend) = frequency_to_midi_note(note.frequency());
            placed.push(Placed {
                start,
                end,
                key,
                bend,
                channel: note.channel(),
            });
        }

        let mut scheduled = Vec::with_capacity(notes.len() * 2);
        let mut pending: [Option<PendingOff>; 16] = [None; 16];

        for (order, ((_, note), p)) in notes.iter().zip(&placed).enumerate() {
            let channel = p.channel;

            if let Some(tied) = pending[channel.index()].take() {
                // a key struck again at this tick must be released before it
                let slot = if tied.start < p.start && struck_at(&placed, p.start, channel, tied.key)
                {
                    Slot::Release
                } else {
                    Slot::Tied
                };
                scheduled.push(Scheduled {
                    tick: p.start,
                    slot,
                    order: tied.order,
                    sub: 0,
                    event: TrackEvent::note_off(0, channel, tied.key),
                });
            }

            let mut start_event = |sub, event| {
                scheduled.push(Scheduled {
                    tick: p.start,
                    slot: Slot::Start,
                    order,
                    sub,
                    event,
                })
            };
            if programs.set(channel, note.program_byte()) {
                start_event(0, TrackEvent::program_change(0, channel, note.program_byte()));
            }
            if note.needs_bend() {
                start_event(1, TrackEvent::pitch_bend(0, channel, p.bend));
            }
            start_event(2, TrackEvent::note_on(0, channel, p.key, note.velocity_byte()));

            let off = PendingOff {
                key: p.key,
                start: p.start,
                natural_end: p.end,
                order,
            };
            if note.is_slurred() {
                pending[channel.index()] = Some(off);
            } else {
                scheduled.push(Scheduled {
                    tick: p.end,
                    slot: off.release_slot(),
                    order,
                    sub: 0,
                    event: TrackEvent::note_off(0, channel, p.key),
                });
            }
        }

        // the last note of each slurred run ends on its own
        for (channel, tied) in Channel::all().into_iter().zip(pending) {
            if let Some(tied) = tied {
                scheduled.push(Scheduled {
                    tick: tied.natural_end,
                    slot: tied.release_slot(),
                    order: tied.order,
                    sub: 0,
                    event: TrackEvent::note_off(0, channel, tied.key),
                });
            }
        }

        scheduled.sort_by_key(|s| (s.tick, s.slot, s.order, s.sub));

        let mut events = Vec::with_capacity(scheduled.len() + 3);
        if let Some(name) = &self.options.name {
            events.push(TrackEvent::meta(0, MetaEvent::track_name(name)));
        }
        if self.options.tempo_event {
            events.push(TrackEvent::meta(0, MetaEvent::tempo(self.tempo)));
        }

        let mut previous = 0;
        for s in scheduled {
            let delta = s.tick - previous;
            let delta = u32::try_from(delta)
                .ok()
                .filter(|d| *d <= MAX_VLQ)
                .ok_or(FileError::DeltaOverflow(delta))?;
            previous = s.tick;
            events.push(s.event.with_delta(delta));
        }

        if self.options.end_of_track {
            events.push(TrackEvent::meta(0, MetaEvent::end_of_track()));
        }

        debug!(
            "built track of {} notes into {} events ending at tick {previous}",
            notes.len(),
            events.len()
        );
        *self.programs = programs;
        Ok(Track::new(events))
    }
}

#[cfg(test)]
fn played(notes: &[Note]) -> Vec<(u64, StatusKind, Option<u8>)> {
    let mut programs = ChannelPrograms::default();
    let mut builder = TrackBuilder::new(Division::default(), Bpm::default(), &mut programs).unwrap();
    builder.extend(notes);
    builder
        .build()
        .unwrap()
        .ticked()
        .filter_map(|(tick, event)| {
            event
                .channel_message()
                .map(|m| (tick, m.kind(), m.key().map(|k| k.value())))
        })
        .collect()
}

#[test]
fn zero_length_note_starts_before_it_ends() {
    let c4 = Note::from_name("C4").unwrap();
    let d4 = Note::from_name("D4").unwrap();

    assert_eq!(
        played(&[c4.clone().with_duration(Duration::ZERO)]),
        vec![(0, StatusKind::NoteOn, Some(60)), (0, StatusKind::NoteOff, Some(60))]
    );

    // under half a tick rounds to nothing
    assert_eq!(
        played(&[
            c4.clone().with_duration(Duration::from_micros(100)),
            d4.with_duration(Duration::from_millis(250)),
        ]),
        vec![
            (0, StatusKind::NoteOn, Some(60)),
            (0, StatusKind::NoteOn, Some(62)),
            (0, StatusKind::NoteOff, Some(60)),
            (240, StatusKind::NoteOff, Some(62)),
        ]
    );

    let slurred = played(&[c4.with_duration(Duration::ZERO).slurred(true)]);
    assert_eq!(
        slurred,
        vec![
            (0, StatusKind::PitchBend, None),
            (0, StatusKind::NoteOn, Some(60)),
            (0, StatusKind::NoteOff, Some(60)),
        ]
    );
}

#[test]
fn slurred_key_struck_again_inside_a_chord() {
    let half = Duration::from_millis(500);
    let c4 = Note::from_name("C4").unwrap().with_duration(half);
    let e4 = Note::from_name("E4").unwrap().with_duration(half);

    assert_eq!(
        played(&[c4.clone().slurred(true), e4, c4.with_previous()]),
        vec![
            (0, StatusKind::PitchBend, None),
            (0, StatusKind::NoteOn, Some(60)),
            (480, StatusKind::NoteOff, Some(60)),
            (480, StatusKind::NoteOn, Some(64)),
            (480, StatusKind::NoteOn, Some(60)),
            (960, StatusKind::NoteOff, Some(64)),
            (960, StatusKind::NoteOff, Some(60)),
        ]
    );
}

#[test]
fn huge_durations_overflow_instead_of_panicking() {
    let mut programs = ChannelPrograms::default();
    let mut builder = TrackBuilder::new(Division::default(), Bpm::default(), &mut programs).unwrap();
    let endless = Note::new(440.0)
        .with_duration(Duration::from_secs(u64::MAX / 2))
        .with_program(5);
    builder.push(&endless).push(&endless).push(&endless);

    assert!(matches!(builder.build(), Err(FileError::DeltaOverflow(_))));
    assert_eq!(programs.get(Channel::One), 0);
}
