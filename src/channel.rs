use core::fmt;

#[doc = r#"
One of the sixteen MIDI channels.

Channels are named the way musicians count them, `One` through `Sixteen`.
On the wire a channel is the low nibble of a status byte, so
[`Channel::One`] is nibble `0` and [`Channel::Sixteen`] is nibble `15`.

# Example
```rust
# use smf_codec::prelude::*;
let channel = Channel::from_nibble(0x93);
assert_eq!(channel, Channel::Four);
assert_eq!(channel.number(), 4);
assert_eq!(channel.nibble(), 3);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Channel {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// All channels in wire order.
    pub const fn all() -> [Channel; 16] {
        use Channel::*;
        [
            One, Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Eleven, Twelve, Thirteen,
            Fourteen, Fifteen, Sixteen,
        ]
    }

    /// Identify the channel from the low nibble of a byte.
    ///
    /// The upper nibble is ignored, so a full status byte may be passed.
    pub const fn from_nibble(byte: u8) -> Self {
        Self::all()[(byte & 0x0F) as usize]
    }

    /// Identify the channel from its 1-based number.
    ///
    /// Returns `None` outside of `1..=16`.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=16 => Some(Self::from_nibble(number - 1)),
            _ => None,
        }
    }

    /// The wire value, `0..=15`.
    pub const fn nibble(&self) -> u8 {
        *self as u8
    }

    /// The 1-based channel number, `1..=16`.
    pub const fn number(&self) -> u8 {
        self.nibble() + 1
    }

    pub(crate) const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel {}", self.number())
    }
}

#[test]
fn channel_numbering() {
    for (i, channel) in Channel::all().into_iter().enumerate() {
        assert_eq!(channel.nibble() as usize, i);
        assert_eq!(Channel::from_number(i as u8 + 1), Some(channel));
        assert_eq!(Channel::from_nibble(0xB0 | i as u8), channel);
    }
    assert_eq!(Channel::from_number(0), None);
    assert_eq!(Channel::from_number(17), None);
}
