use core::fmt;

use crate::FormatError;

/// A MIDI data byte: 7 bits, leading bit always 0.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Largest value a data byte can hold.
    pub const MAX: Self = Self(0x7F);

    /// Checks for correctness (leading 0 bit).
    pub const fn new(byte: u8) -> Result<Self, FormatError> {
        if byte > 0x7F {
            return Err(FormatError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Clamps the value into `0..=127`.
    pub const fn saturating(byte: u8) -> Self {
        if byte > 0x7F { Self(0x7F) } else { Self(byte) }
    }

    /// Creates a data byte without checking the leading bit.
    ///
    /// The leading bit is masked off.
    pub const fn new_unchecked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// The inner value
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = FormatError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn data_byte_rejects_leading_bit() {
    assert!(DataByte::new(0x7F).is_ok());
    assert!(matches!(
        DataByte::new(0x80),
        Err(FormatError::InvalidDataByte(0x80))
    ));
    assert_eq!(DataByte::saturating(200), DataByte::MAX);
    assert_eq!(DataByte::new_unchecked(0x90).value(), 0x10);
}
