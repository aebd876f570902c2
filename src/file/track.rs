use crate::prelude::*;

#[doc = r#"
An ordered list of events, serialized as one `MTrk` chunk.
"#]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    /// Create a new track
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }

    /// Get the events of the track
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Consume the track, returning its events
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }

    /// Append an event
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when there are no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Exact size of the chunk body, excluding the 8 byte chunk header.
    pub fn byte_len(&self) -> usize {
        self.events.iter().map(TrackEvent::wire_len).sum()
    }

    /// Iterates events paired with their absolute tick.
    pub fn ticked(&self) -> impl Iterator<Item = (u64, &TrackEvent)> {
        self.events.iter().scan(0u64, |tick, event| {
            *tick += event.delta_ticks() as u64;
            Some((*tick, event))
        })
    }

    /// The channel messages of the track, in order.
    pub fn channel_messages(&self) -> impl Iterator<Item = (Channel, &ChannelMessage)> {
        self.events.iter().filter_map(|e| match e.kind() {
            EventKind::Channel(c) => Some((c.channel(), c.message())),
            _ => None,
        })
    }

    /// True if the last event is an end-of-track meta event.
    pub fn is_terminated(&self) -> bool {
        matches!(
            self.events.last().map(TrackEvent::kind),
            Some(EventKind::Meta(m)) if m.is_end_of_track()
        )
    }
}

#[test]
fn absolute_ticks() {
    let track = Track::new(vec![
        TrackEvent::note_on(10, Channel::One, NoteNumber::C4, DataByte(90)),
        TrackEvent::note_off(20, Channel::One, NoteNumber::C4),
        TrackEvent::meta(0, MetaEvent::end_of_track()),
    ]);
    let ticks: Vec<u64> = track.ticked().map(|(t, _)| t).collect();
    assert_eq!(ticks, vec![10, 30, 30]);
    assert!(track.is_terminated());
    assert_eq!(track.byte_len(), 4 + 4 + 4);
}
