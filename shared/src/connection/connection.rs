use std::sync::Arc;

use log::{debug, trace, warn};
use tandem_serde::{BitReader, BitWriter};

use crate::{
    constants::{PACKET_HEADER_MAX_BITS, RECEIVED_PACKETS_WINDOW, SENT_PACKETS_WINDOW},
    generate_ack_bits, sequence_greater_than, Allocation, ChannelAdapter, ChannelIndex,
    ConfigurationError, ConnectionConfig, ConnectionCounter, ConnectionCounters, ConnectionError,
    ConnectionPacket, PacketError, PacketType, ProtocolError, SequenceBuffer,
};

/// What [`Connection::read_packet`] did with a packet of the right type
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The packet was new: its channel data was dispatched and its acks processed
    Accepted,
    /// Stale or duplicate, nothing but the discard counter changed
    Discarded,
}

struct SentPacket {
    acked: bool,
}

/// Sequences, acknowledges and multiplexes packets for one remote peer.
///
/// Every written packet gets the next 16-bit sequence number and carries the
/// highest sequence accepted so far plus a bitfield of the 32 before it. Every
/// read packet that is newer than anything accepted before has its channel
/// data dispatched, and each sequence it confirms for the first time is
/// reported to every channel exactly once.
///
/// Not synchronized: one Connection is driven from one place at a time.
pub struct Connection {
    config: ConnectionConfig,
    channels: Vec<Box<dyn ChannelAdapter>>,
    _channel_allocations: Vec<Allocation>,
    sent_packets: SequenceBuffer<SentPacket>,
    received_packets: SequenceBuffer<()>,
    next_sequence: u16,
    highest_accepted: Option<u16>,
    counters: ConnectionCounters,
}

impl Connection {
    /// Creates a Connection, building one adapter per registered channel.
    /// Each adapter takes an allocation from the factory's arena for the
    /// lifetime of the Connection.
    pub fn new(config: ConnectionConfig) -> Result<Self, ConnectionError> {
        let factory = &config.packet_factory;
        if !factory.is_registered(config.packet_type) {
            return Err(ConfigurationError::UnregisteredPacketType {
                packet_type: config.packet_type.tag(),
            }
            .into());
        }
        if !Arc::ptr_eq(factory.channel_structure(), &config.channel_structure) {
            return Err(ConfigurationError::ChannelStructureMismatch.into());
        }

        let channel_count = config.channel_structure.channel_count();
        let required = Self::min_packet_size(channel_count);
        if config.max_packet_size < required {
            return Err(ConfigurationError::MaxPacketSizeTooSmall {
                max_packet_size: config.max_packet_size,
                required,
            }
            .into());
        }

        let mut channels = Vec::with_capacity(channel_count);
        let mut channel_allocations = Vec::with_capacity(channel_count);
        for descriptor in config.channel_structure.descriptors() {
            channel_allocations.push(factory.arena().allocate()?);
            channels.push(descriptor.create_adapter());
        }

        debug!(
            "Connection created for packet type {} with {} channels",
            config.packet_type, channel_count
        );

        Ok(Self {
            config,
            channels,
            _channel_allocations: channel_allocations,
            sent_packets: SequenceBuffer::try_new(SENT_PACKETS_WINDOW)?,
            received_packets: SequenceBuffer::try_new(RECEIVED_PACKETS_WINDOW)?,
            next_sequence: 0,
            highest_accepted: None,
            counters: ConnectionCounters::default(),
        })
    }

    // Header plus one presence bit per channel, in bytes
    fn min_packet_size(channel_count: usize) -> usize {
        (PACKET_HEADER_MAX_BITS as usize + channel_count).div_ceil(8)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn packet_type(&self) -> PacketType {
        self.config.packet_type
    }

    // Writing

    /// Produces the next outgoing packet. On an allocation failure no
    /// sequence is used up and no counter changes.
    pub fn write_packet(&mut self) -> Result<ConnectionPacket, ConnectionError> {
        let mut packet = self
            .config
            .packet_factory
            .allocate_packet(self.config.packet_type)?;

        let sequence = self.next_sequence;
        self.next_sequence = sequence.wrapping_add(1);
        packet.set_sequence(sequence);

        let ack_bits = match self.highest_accepted {
            Some(ack) => generate_ack_bits(&self.received_packets, ack),
            None => 0,
        };
        packet.set_acks(self.highest_accepted, ack_bits);

        let max_bits = u32::try_from(self.config.max_packet_size.saturating_mul(8)).unwrap_or(u32::MAX);
        let mut available_bits = max_bits.saturating_sub(packet.bit_length());
        for (index, channel) in self.channels.iter_mut().enumerate() {
            let Some(data) = channel.write_data(sequence, available_bits) else {
                continue;
            };
            if data.is_empty() {
                continue;
            }
            available_bits = available_bits.saturating_sub(data.bit_length());
            packet.set_channel_data(index, data)?;
        }

        self.sent_packets.insert(sequence, SentPacket { acked: false });
        self.counters.increment(ConnectionCounter::PacketsWritten);

        trace!(
            "Wrote packet {} (ack {:?}, ack bits {:#034b})",
            sequence,
            self.highest_accepted,
            ack_bits
        );

        Ok(packet)
    }

    // Reading

    /// Takes in a packet from the remote side. Stale and duplicate packets
    /// are counted and reported as [`ReadOutcome::Discarded`]; packets of the
    /// wrong type or shape are counted as discards and reported as errors.
    pub fn read_packet(&mut self, packet: &ConnectionPacket) -> Result<ReadOutcome, ProtocolError> {
        if packet.packet_type() != self.config.packet_type {
            self.counters.increment(ConnectionCounter::PacketsDiscarded);
            warn!(
                "Discarding packet of type {}, expected {}",
                packet.packet_type(),
                self.config.packet_type
            );
            return Err(ProtocolError::PacketTypeMismatch {
                expected: self.config.packet_type.tag(),
                received: packet.packet_type().tag(),
            });
        }
        if packet.channel_count() != self.channels.len() {
            self.counters.increment(ConnectionCounter::PacketsDiscarded);
            warn!(
                "Discarding packet with {} channel slots, expected {}",
                packet.channel_count(),
                self.channels.len()
            );
            return Err(ProtocolError::ChannelCountMismatch {
                expected: self.channels.len(),
                received: packet.channel_count(),
            });
        }

        let sequence = packet.sequence();
        if self.is_stale(sequence) {
            self.counters.increment(ConnectionCounter::PacketsDiscarded);
            debug!(
                "Discarding packet {}, highest accepted is {:?}",
                sequence, self.highest_accepted
            );
            return Ok(ReadOutcome::Discarded);
        }

        self.highest_accepted = Some(sequence);
        self.received_packets.insert(sequence, ());
        self.counters.increment(ConnectionCounter::PacketsRead);

        for (index, data) in packet.channel_data_iter() {
            if data.is_empty() {
                continue;
            }
            if let Some(channel) = self.channels.get_mut(index) {
                if !channel.process_data(sequence, data) {
                    trace!("Channel {} rejected data in packet {}", index, sequence);
                }
            }
        }

        let mut newly_acked = 0;
        for acked in packet.acked_sequences() {
            let Some(sent) = self.sent_packets.get_mut(acked) else {
                continue;
            };
            if sent.acked {
                continue;
            }
            sent.acked = true;
            newly_acked += 1;

            trace!("Packet {} acked", acked);
            for channel in self.channels.iter_mut() {
                channel.process_ack(acked);
            }
        }
        self.counters
            .add(ConnectionCounter::PacketsAcked, newly_acked);

        Ok(ReadOutcome::Accepted)
    }

    // Equal to the highest accepted is a duplicate, not newer
    fn is_stale(&self, sequence: u16) -> bool {
        if self.received_packets.exists(sequence) {
            return true;
        }
        match self.highest_accepted {
            Some(highest) => !sequence_greater_than(sequence, highest),
            None => false,
        }
    }

    // Bytes

    /// Serializes a packet, refusing anything over the max packet size
    pub fn encode(&self, packet: &ConnectionPacket) -> Result<Vec<u8>, PacketError> {
        let size = packet.bit_length().div_ceil(8) as usize;
        if size > self.config.max_packet_size {
            return Err(PacketError::TooLarge {
                size,
                max: self.config.max_packet_size,
            });
        }

        let mut writer = BitWriter::with_capacity(size);
        packet.write(&mut writer);
        Ok(writer.to_bytes())
    }

    /// Rebuilds a packet from bytes produced by [`Connection::encode`] on
    /// the remote side. The result still has to go through
    /// [`Connection::read_packet`].
    pub fn decode(&self, bytes: &[u8]) -> Result<ConnectionPacket, PacketError> {
        if bytes.len() > self.config.max_packet_size {
            return Err(PacketError::TooLarge {
                size: bytes.len(),
                max: self.config.max_packet_size,
            });
        }

        let mut reader = BitReader::new(bytes);
        let packet = ConnectionPacket::read(
            &mut reader,
            &self.config.packet_factory,
            &self.config.channel_structure,
        )?;

        // Only padding of the final byte may be left over
        let bits = reader.bits_remaining();
        if bits >= 8 {
            return Err(PacketError::TrailingData { bits });
        }

        Ok(packet)
    }

    // Channels

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: ChannelIndex) -> Option<&dyn ChannelAdapter> {
        match self.channels.get(index) {
            Some(channel) => Some(channel.as_ref()),
            None => None,
        }
    }

    pub fn channel_mut(&mut self, index: ChannelIndex) -> Option<&mut dyn ChannelAdapter> {
        match self.channels.get_mut(index) {
            Some(channel) => Some(channel.as_mut()),
            None => None,
        }
    }

    pub fn channel_as<T: ChannelAdapter>(&self, index: ChannelIndex) -> Option<&T> {
        self.channels.get(index)?.downcast_ref::<T>()
    }

    pub fn channel_as_mut<T: ChannelAdapter>(&mut self, index: ChannelIndex) -> Option<&mut T> {
        self.channels.get_mut(index)?.downcast_mut::<T>()
    }

    // State

    /// Sequence the next written packet will carry
    pub fn next_sequence(&self) -> u16 {
        self.next_sequence
    }

    pub fn highest_accepted(&self) -> Option<u16> {
        self.highest_accepted
    }

    pub fn counter(&self, counter: ConnectionCounter) -> u64 {
        self.counters.get(counter)
    }

    pub fn counters(&self) -> ConnectionCounters {
        self.counters
    }

    /// Forgets both histories and restarts sequencing at 0. Counters and
    /// channel state are kept.
    pub fn reset(&mut self) {
        debug!("Connection reset, counters: {}", self.counters);
        self.sent_packets.reset();
        self.received_packets.reset();
        self.next_sequence = 0;
        self.highest_accepted = None;
    }
}
