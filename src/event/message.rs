use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{Channel, DataByte, NoteNumber, PitchBend};

#[doc = r#"
The upper nibble of a channel status byte.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// `0x8n`
    NoteOff = 0x80,
    /// `0x9n`
    NoteOn = 0x90,
    /// `0xAn`
    PolyphonicKeyPressure = 0xA0,
    /// `0xBn`
    ControlChange = 0xB0,
    /// `0xCn`
    ProgramChange = 0xC0,
    /// `0xDn`
    ChannelPressure = 0xD0,
    /// `0xEn`
    PitchBend = 0xE0,
}

impl StatusKind {
    /// Number of data bytes following the status byte.
    ///
    /// Program change and channel pressure carry one, everything else two.
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// The kind of a channel status byte, ignoring its channel.
    ///
    /// Returns `None` for data bytes and system statuses.
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status & 0xF0).ok()
    }
}

#[doc = r#"
The body of a channel voice message.
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMessage {
    /// Release a key
    NoteOff {
        /// the key
        key: NoteNumber,
        /// release velocity
        velocity: DataByte,
    },
    /// Strike a key. A velocity of 0 is treated as a release by most devices.
    NoteOn {
        /// the key
        key: NoteNumber,
        /// strike velocity
        velocity: DataByte,
    },
    /// Aftertouch for a single key
    PolyphonicKeyPressure {
        /// the key
        key: NoteNumber,
        /// pressure amount
        pressure: DataByte,
    },
    /// Set a controller
    ControlChange {
        /// controller number
        controller: DataByte,
        /// controller value
        value: DataByte,
    },
    /// Select the instrument for the channel
    ProgramChange {
        /// the program
        program: DataByte,
    },
    /// Aftertouch for the whole channel
    ChannelPressure {
        /// pressure amount
        pressure: DataByte,
    },
    /// Bend every sounding note on the channel
    PitchBend(PitchBend),
}

impl ChannelMessage {
    /// The status kind of this message.
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::NoteOff { .. } => StatusKind::NoteOff,
            Self::NoteOn { .. } => StatusKind::NoteOn,
            Self::PolyphonicKeyPressure { .. } => StatusKind::PolyphonicKeyPressure,
            Self::ControlChange { .. } => StatusKind::ControlChange,
            Self::ProgramChange { .. } => StatusKind::ProgramChange,
            Self::ChannelPressure { .. } => StatusKind::ChannelPressure,
            Self::PitchBend(_) => StatusKind::PitchBend,
        }
    }

    /// Build a message from its kind and raw data bytes.
    ///
    /// `second` is ignored for one-byte messages.
    pub fn from_parts(kind: StatusKind, first: DataByte, second: DataByte) -> Self {
        match kind {
            StatusKind::NoteOff => Self::NoteOff {
                key: first.into(),
                velocity: second,
            },
            StatusKind::NoteOn => Self::NoteOn {
                key: first.into(),
                velocity: second,
            },
            StatusKind::PolyphonicKeyPressure => Self::PolyphonicKeyPressure {
                key: first.into(),
                pressure: second,
            },
            StatusKind::ControlChange => Self::ControlChange {
                controller: first,
                value: second,
            },
            StatusKind::ProgramChange => Self::ProgramChange { program: first },
            StatusKind::ChannelPressure => Self::ChannelPressure { pressure: first },
            StatusKind::PitchBend => Self::PitchBend(PitchBend::from_data_bytes(first, second)),
        }
    }

    /// The data bytes as written. Only the first [`StatusKind::data_len`] are meaningful.
    pub const fn data(&self) -> [u8; 2] {
        match self {
            Self::NoteOff { key, velocity } | Self::NoteOn { key, velocity } => {
                [key.value(), velocity.value()]
            }
            Self::PolyphonicKeyPressure { key, pressure } => [key.value(), pressure.value()],
            Self::ControlChange { controller, value } => [controller.value(), value.value()],
            Self::ProgramChange { program } => [program.value(), 0],
            Self::ChannelPressure { pressure } => [pressure.value(), 0],
            Self::PitchBend(bend) => {
                let [lsb, msb] = bend.data_bytes();
                [lsb.value(), msb.value()]
            }
        }
    }

    /// The key, for messages that address one.
    pub const fn key(&self) -> Option<NoteNumber> {
        match self {
            Self::NoteOff { key, .. }
            | Self::NoteOn { key, .. }
            | Self::PolyphonicKeyPressure { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// True for note-off messages and note-on messages with zero velocity.
    pub const fn is_release(&self) -> bool {
        match self {
            Self::NoteOff { .. } => true,
            Self::NoteOn { velocity, .. } => velocity.value() == 0,
            _ => false,
        }
    }
}

/// A channel message addressed to a channel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    channel: Channel,
    message: ChannelMessage,
}

impl ChannelEvent {
    /// Create a new channel event
    pub const fn new(channel: Channel, message: ChannelMessage) -> Self {
        Self { channel, message }
    }

    /// The channel of the event
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The message
    pub const fn message(&self) -> &ChannelMessage {
        &self.message
    }

    /// The full status byte, kind in the upper nibble and channel in the lower.
    pub fn status(&self) -> u8 {
        u8::from(self.message.kind()) | self.channel.nibble()
    }

    /// Size of the event after its delta time: status plus data bytes.
    pub const fn wire_len(&self) -> usize {
        1 + self.message.kind().data_len()
    }
}

#[test]
fn one_byte_messages() {
    let program = ChannelMessage::ProgramChange {
        program: DataByte(5),
    };
    assert_eq!(program.kind().data_len(), 1);
    assert_eq!(program.data(), [5, 0]);

    let event = ChannelEvent::new(Channel::Ten, program);
    assert_eq!(event.status(), 0xC9);
    assert_eq!(event.wire_len(), 2);
}

#[test]
fn status_kinds() {
    assert_eq!(StatusKind::from_status(0x9F), Some(StatusKind::NoteOn));
    assert_eq!(StatusKind::from_status(0xE3), Some(StatusKind::PitchBend));
    assert_eq!(StatusKind::from_status(0x45), None);
    assert_eq!(StatusKind::from_status(0xFF), None);
}

#[test]
fn zero_velocity_note_on_is_release() {
    let on = ChannelMessage::from_parts(StatusKind::NoteOn, DataByte(60), DataByte(0));
    assert!(on.is_release());
    assert_eq!(on.key(), Some(NoteNumber::C4));
}
