#![doc = r#"
Events as they are stored in a track chunk.

# Hierarchy
```text
            |------------|
            | TrackEvent |  delta ticks + kind
            |------------|
           /      |       \
|--------------| |-----------| |------------|
| ChannelEvent | | MetaEvent | | SysExEvent |
|--------------| |-----------| |------------|
```
"#]
mod message;
pub use message::*;

pub mod meta;
pub use meta::{MetaEvent, SysExEvent};

use crate::{Channel, DataByte, NoteNumber, PitchBend, vlq::encode_vlq};

/// What happens at an event's point in time.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A channel voice message
    Channel(ChannelEvent),
    /// A meta event
    Meta(MetaEvent),
    /// A system exclusive event
    SysEx(SysExEvent),
}

impl EventKind {
    /// The status byte written for this event.
    pub fn status(&self) -> u8 {
        match self {
            Self::Channel(c) => c.status(),
            Self::Meta(_) => 0xFF,
            Self::SysEx(s) => s.status(),
        }
    }

    /// The channel, for channel events
    pub const fn channel(&self) -> Option<Channel> {
        match self {
            Self::Channel(c) => Some(c.channel()),
            _ => None,
        }
    }
}

#[doc = r#"
An event and the ticks elapsed since the previous event in its track.
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_ticks: u32,
    kind: EventKind,
}

impl TrackEvent {
    /// Create a new track event
    pub const fn new(delta_ticks: u32, kind: EventKind) -> Self {
        Self { delta_ticks, kind }
    }

    /// A channel event
    pub const fn channel(delta_ticks: u32, channel: Channel, message: ChannelMessage) -> Self {
        Self::new(
            delta_ticks,
            EventKind::Channel(ChannelEvent::new(channel, message)),
        )
    }

    /// Note on with the given velocity
    pub const fn note_on(
        delta_ticks: u32,
        channel: Channel,
        key: NoteNumber,
        velocity: DataByte,
    ) -> Self {
        Self::channel(delta_ticks, channel, ChannelMessage::NoteOn { key, velocity })
    }

    /// Note off with a release velocity of 0
    pub const fn note_off(delta_ticks: u32, channel: Channel, key: NoteNumber) -> Self {
        Self::channel(
            delta_ticks,
            channel,
            ChannelMessage::NoteOff {
                key,
                velocity: DataByte(0),
            },
        )
    }

    /// Program change
    pub const fn program_change(delta_ticks: u32, channel: Channel, program: DataByte) -> Self {
        Self::channel(delta_ticks, channel, ChannelMessage::ProgramChange { program })
    }

    /// Pitch bend
    pub const fn pitch_bend(delta_ticks: u32, channel: Channel, bend: PitchBend) -> Self {
        Self::channel(delta_ticks, channel, ChannelMessage::PitchBend(bend))
    }

    /// A meta event
    pub const fn meta(delta_ticks: u32, meta: MetaEvent) -> Self {
        Self::new(delta_ticks, EventKind::Meta(meta))
    }

    /// The same event at a different delta time
    pub fn with_delta(mut self, delta_ticks: u32) -> Self {
        self.delta_ticks = delta_ticks;
        self
    }

    /// Ticks since the previous event in the track
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// The event
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The channel message, if this is a channel event
    pub const fn channel_message(&self) -> Option<&ChannelMessage> {
        match &self.kind {
            EventKind::Channel(c) => Some(c.message()),
            _ => None,
        }
    }

    /// Exact number of bytes this event occupies in a track chunk.
    pub fn wire_len(&self) -> usize {
        let delta = encode_vlq(self.delta_ticks).len();
        let body = match &self.kind {
            EventKind::Channel(c) => c.wire_len(),
            EventKind::Meta(m) => 2 + encode_vlq(m.data().len() as u32).len() + m.data().len(),
            EventKind::SysEx(s) => 1 + encode_vlq(s.data().len() as u32).len() + s.data().len(),
        };
        delta + body
    }
}

#[test]
fn wire_lengths() {
    let on = TrackEvent::note_on(0, Channel::One, NoteNumber::C4, DataByte(100));
    assert_eq!(on.wire_len(), 4);

    let late_off = TrackEvent::note_off(480, Channel::One, NoteNumber::C4);
    assert_eq!(late_off.wire_len(), 5);

    let program = TrackEvent::program_change(0, Channel::Two, DataByte(40));
    assert_eq!(program.wire_len(), 3);

    let eot = TrackEvent::meta(0, MetaEvent::end_of_track());
    assert_eq!(eot.wire_len(), 4);

    let sysex = TrackEvent::new(0, EventKind::SysEx(SysExEvent::new(vec![0x7E, 0xF7])));
    assert_eq!(sysex.wire_len(), 5);
}
