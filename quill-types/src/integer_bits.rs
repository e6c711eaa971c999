use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("integer width must be a multiple of 8 between 8 and 256, found {0}")]
pub struct InvalidIntegerBits(pub u16);

/// Width of a fixed-size integer type: 8 to 256 bits in steps of 8.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntegerBits(u16);

impl IntegerBits {
    pub const EIGHT: IntegerBits = IntegerBits(8);
    pub const SIXTEEN: IntegerBits = IntegerBits(16);
    pub const THIRTY_TWO: IntegerBits = IntegerBits(32);
    pub const SIXTY_FOUR: IntegerBits = IntegerBits(64);
    pub const V256: IntegerBits = IntegerBits(256);

    pub fn new(bits: u16) -> Result<Self, InvalidIntegerBits> {
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(InvalidIntegerBits(bits));
        }
        Ok(IntegerBits(bits))
    }

    pub fn bits(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for IntegerBits {
    type Error = InvalidIntegerBits;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        IntegerBits::new(bits)
    }
}

impl fmt::Display for IntegerBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
