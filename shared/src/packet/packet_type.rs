// The tag identifying which kind of packet a buffer holds. A Connection is
// configured with exactly one tag and discards everything else.

use std::fmt;

use tandem_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PacketType(u32);

impl PacketType {
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    pub const fn tag(&self) -> u32 {
        self.0
    }
}

impl From<u32> for PacketType {
    fn from(tag: u32) -> Self {
        Self(tag)
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Written as a full u32 so the tag doubles as a protocol id on the wire
impl Serde for PacketType {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for PacketType {
    fn const_bit_length() -> u32 {
        <u32 as ConstBitLength>::const_bit_length()
    }
}
