use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::FormatError;

#[doc = r#"
How the tracks of a file relate to each other.

```text
0: one track holding every channel
1: several tracks played simultaneously
2: several independent single-track sequences
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    #[default]
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl Format {
    /// Parses the header's format field.
    pub fn from_raw(raw: u16) -> Result<Self, FormatError> {
        Self::try_from(raw).map_err(|e| FormatError::UnknownFormat(e.number))
    }

    /// The header's format field.
    pub fn to_raw(self) -> u16 {
        self.into()
    }

    /// True for format 0
    pub const fn is_single_track(&self) -> bool {
        matches!(self, Self::SingleMultiChannel)
    }
}

#[test]
fn raw_formats() {
    assert_eq!(Format::from_raw(0), Ok(Format::SingleMultiChannel));
    assert_eq!(Format::from_raw(2), Ok(Format::SequentiallyIndependent));
    assert_eq!(Format::from_raw(3), Err(FormatError::UnknownFormat(3)));
    assert_eq!(Format::Simultaneous.to_raw(), 1);
}
