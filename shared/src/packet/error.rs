use thiserror::Error;

use crate::{AllocationError, SerdeErr};

/// Errors that can occur while creating, encoding or decoding packets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Packet type tag was never registered with the PacketFactory
    #[error("Packet type {packet_type} is not registered with the PacketFactory (SECURITY: decoded packets with unknown tags may be malicious)")]
    UnregisteredPacketType { packet_type: u32 },

    /// Allocation error
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Encoded packet would not fit the configured max packet size
    #[error("Packet of {size} bytes exceeds the max packet size of {max} bytes")]
    TooLarge { size: usize, max: usize },

    /// A packet carried data for a channel that has no data factory
    #[error("Packet carries data for channel {channel}, which has no data factory to decode it into")]
    MissingDataFactory { channel: usize },

    /// Channel index outside of the packet's slots
    #[error("Channel index {index} is out of range for a packet with {channel_count} channel slots")]
    ChannelIndexOutOfRange { index: usize, channel_count: usize },

    /// Bytes left over after the packet was fully decoded
    #[error("{bits} bits of trailing data after decoding packet (possible malformed or malicious data)")]
    TrailingData { bits: usize },

    /// Malformed or truncated packet bits
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeErr),
}
