use crate::{Channel, DataByte};

/// The program each channel is currently set to.
///
/// Every channel starts at program 0, the General MIDI power-on default, so
/// a note using program 0 does not need a program change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelPrograms([DataByte; 16]);

impl ChannelPrograms {
    /// The program of a channel
    pub const fn get(&self, channel: Channel) -> u8 {
        self.0[channel.index()].value()
    }

    /// Records `program` for `channel`, returning true if it changed.
    pub(crate) fn set(&mut self, channel: Channel, program: DataByte) -> bool {
        let slot = &mut self.0[channel.index()];
        let changed = *slot != program;
        *slot = program;
        changed
    }
}

#[test]
fn tracks_changes() {
    let mut programs = ChannelPrograms::default();
    assert!(!programs.set(Channel::Three, DataByte(0)));
    assert!(programs.set(Channel::Three, DataByte(41)));
    assert!(!programs.set(Channel::Three, DataByte(41)));
    assert_eq!(programs.get(Channel::Three), 41);
    assert_eq!(programs.get(Channel::Four), 0);
}
