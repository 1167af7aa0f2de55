use std::fmt;

use tandem_serde::{BitCounter, BitReader, BitWrite, Serde};

use crate::{
    AckedSequences, Allocation, ChannelData, ChannelIndex, ChannelStructure, PacketError,
    PacketFactory, PacketType,
};

/// A packet as seen by a Connection: sequence, acks, and one optional data
/// slot per registered channel.
///
/// Holds an [`Allocation`] from the factory's arena for as long as it lives.
pub struct ConnectionPacket {
    packet_type: PacketType,
    sequence: u16,
    ack: Option<u16>,
    ack_bits: u32,
    channel_data: Vec<Option<Box<dyn ChannelData>>>,
    _allocation: Allocation,
}

impl ConnectionPacket {
    pub(crate) fn new(packet_type: PacketType, channel_count: usize, allocation: Allocation) -> Self {
        let mut channel_data = Vec::with_capacity(channel_count);
        channel_data.resize_with(channel_count, || None);

        Self {
            packet_type,
            sequence: 0,
            ack: None,
            ack_bits: 0,
            channel_data,
            _allocation: allocation,
        }
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u16) {
        self.sequence = sequence;
    }

    /// Highest sequence the sender had accepted, `None` if it had accepted nothing
    pub fn ack(&self) -> Option<u16> {
        self.ack
    }

    pub fn ack_bits(&self) -> u32 {
        self.ack_bits
    }

    pub fn set_acks(&mut self, ack: Option<u16>, ack_bits: u32) {
        self.ack = ack;
        self.ack_bits = if ack.is_some() { ack_bits } else { 0 };
    }

    /// Every sequence this packet confirms, `ack` first
    pub fn acked_sequences(&self) -> AckedSequences {
        AckedSequences::new(self.ack, self.ack_bits)
    }

    pub fn channel_count(&self) -> usize {
        self.channel_data.len()
    }

    pub fn channel_data(&self, index: ChannelIndex) -> Option<&dyn ChannelData> {
        self.channel_data.get(index)?.as_deref()
    }

    pub fn set_channel_data(
        &mut self,
        index: ChannelIndex,
        data: Box<dyn ChannelData>,
    ) -> Result<(), PacketError> {
        let channel_count = self.channel_data.len();
        let slot = self
            .channel_data
            .get_mut(index)
            .ok_or(PacketError::ChannelIndexOutOfRange {
                index,
                channel_count,
            })?;
        *slot = Some(data);
        Ok(())
    }

    pub fn take_channel_data(&mut self, index: ChannelIndex) -> Option<Box<dyn ChannelData>> {
        self.channel_data.get_mut(index)?.take()
    }

    /// Occupied slots only, with their channel index
    pub fn channel_data_iter(&self) -> impl Iterator<Item = (ChannelIndex, &dyn ChannelData)> {
        self.channel_data
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref().map(|data| (index, data)))
    }

    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.packet_type.ser(writer);
        self.sequence.ser(writer);
        self.ack.ser(writer);
        self.ack_bits.ser(writer);

        for slot in &self.channel_data {
            match slot {
                Some(data) => {
                    true.ser(writer);
                    data.write(writer);
                }
                None => false.ser(writer),
            }
        }
    }

    pub fn bit_length(&self) -> u32 {
        let mut counter = BitCounter::new();
        self.write(&mut counter);
        counter.bits_needed()
    }

    /// Reads a packet written by [`ConnectionPacket::write`], allocating it
    /// through `factory` and filling its slots with data from `structure`'s
    /// data factories.
    pub fn read(
        reader: &mut BitReader,
        factory: &PacketFactory,
        structure: &ChannelStructure,
    ) -> Result<Self, PacketError> {
        let packet_type = PacketType::de(reader)?;
        if !factory.is_registered(packet_type) {
            return Err(PacketError::UnregisteredPacketType {
                packet_type: packet_type.tag(),
            });
        }

        let mut packet = factory.allocate_packet(packet_type)?;
        packet.sequence = u16::de(reader)?;
        let ack = Option::<u16>::de(reader)?;
        let ack_bits = u32::de(reader)?;
        packet.set_acks(ack, ack_bits);

        for channel in 0..structure.channel_count() {
            if !bool::de(reader)? {
                continue;
            }
            let mut data = structure
                .create_data(channel)
                .ok_or(PacketError::MissingDataFactory { channel })?;
            data.read(reader)?;
            packet.set_channel_data(channel, data)?;
        }

        Ok(packet)
    }
}

impl fmt::Debug for ConnectionPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied: Vec<ChannelIndex> = self.channel_data_iter().map(|(index, _)| index).collect();
        f.debug_struct("ConnectionPacket")
            .field("packet_type", &self.packet_type)
            .field("sequence", &self.sequence)
            .field("ack", &self.ack)
            .field("ack_bits", &format_args!("{:#034b}", self.ack_bits))
            .field("channels", &self.channel_data.len())
            .field("occupied", &occupied)
            .finish()
    }
}
