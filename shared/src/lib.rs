//! # Tandem Shared
//! Reliability and multiplexing layer for a lossy, unordered packet stream.
//!
//! A [`Connection`] stamps every outgoing packet with a 16-bit sequence number
//! and with selective acknowledgment of what it has received so far, and
//! multiplexes the channels of a locked [`ChannelStructure`] onto that single
//! packet stream. When the remote side confirms a packet, every channel hears
//! about it exactly once.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod ack_bitfield;
mod address;
mod channel;
mod connection;
mod constants;
mod memory;
mod packet;
mod sequence_buffer;
mod types;
mod wrapping_number;

pub use tandem_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr,
    UnsignedInteger, UnsignedVariableInteger,
};

pub use ack_bitfield::{generate_ack_bits, is_acked, AckedSequences};
pub use address::{Address, AddressParseError, AddressType};
pub use channel::{
    block_data::{block_data_factory, Block, BlockData},
    channel_adapter::ChannelAdapter,
    channel_data::{AsAny, ChannelData},
    channel_structure::{
        AdapterFactory, ChannelDescriptor, ChannelStructure, ChannelStructureBuilder, DataFactory,
    },
    reliable_block_channel::ReliableBlockChannel,
    unreliable_block_channel::UnreliableBlockChannel,
};
pub use connection::{
    connection::{Connection, ReadOutcome},
    connection_config::ConnectionConfig,
    counters::{ConnectionCounter, ConnectionCounters},
    error::{ConfigurationError, ConnectionError, ProtocolError},
};
pub use constants::{
    ACK_BITFIELD_BITS, DEFAULT_MAX_PACKET_SIZE, PACKET_HEADER_MAX_BITS, RECEIVED_PACKETS_WINDOW,
    RELIABLE_RECEIVE_WINDOW, SENT_PACKETS_WINDOW,
};
pub use memory::{
    arena::{Allocation, Arena},
    error::AllocationError,
};
pub use packet::{
    connection_packet::ConnectionPacket, error::PacketError, packet_factory::PacketFactory,
    packet_type::PacketType,
};
pub use sequence_buffer::{SequenceBuffer, SequenceBufferError, MAX_SEQUENCE_BUFFER_SIZE};
pub use types::ChannelIndex;
pub use wrapping_number::{sequence_greater_than, sequence_less_than, wrapping_diff};
