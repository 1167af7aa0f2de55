use tandem_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::ChannelData;

/// One payload handed to a block channel, tagged with the channel's own id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: u16,
    pub payload: Vec<u8>,
}

impl Block {
    pub fn new(id: u16, payload: Vec<u8>) -> Self {
        Self { id, payload }
    }
}

impl Serde for Block {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let id = u16::de(reader)?;
        let payload = Vec::<u8>::de(reader)?;
        Ok(Self { id, payload })
    }

    fn bit_length(&self) -> u32 {
        self.id.bit_length() + self.payload.bit_length()
    }
}

/// The generic block of channel data: a list of opaque byte payloads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockData {
    blocks: Vec<Block>,
}

impl BlockData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn pop(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Bits taken by the length prefix of a [`BlockData`] holding `count` blocks
pub(crate) fn block_count_bits(count: usize) -> u32 {
    UnsignedVariableInteger::<5>::new(count as u64).bit_length()
}

impl From<Vec<Block>> for BlockData {
    fn from(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

impl ChannelData for BlockData {
    fn write(&self, writer: &mut dyn BitWrite) {
        self.blocks.ser(writer);
    }

    fn read(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        self.blocks = Vec::<Block>::de(reader)?;
        Ok(())
    }

    fn bit_length(&self) -> u32 {
        self.blocks.bit_length()
    }

    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Data factory for channels that carry [`BlockData`]
pub fn block_data_factory() -> Option<Box<dyn ChannelData>> {
    Some(Box::new(BlockData::new()))
}
