use thiserror::Error;

use crate::{AllocationError, PacketError, SequenceBufferError, SerdeErr};

/// Programming errors in how a ChannelStructure, PacketFactory or Connection
/// was put together. These are not runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The channel structure is locked and cannot be modified
    #[error("ChannelStructure is already locked and cannot be modified. ChannelStructureBuilder::lock() has been called and no further changes are allowed")]
    ChannelStructureLocked,

    /// Packet type tag was never registered with the PacketFactory
    #[error("Packet type {packet_type} is not registered with the PacketFactory. Register it via register_packet_type() before building a Connection")]
    UnregisteredPacketType { packet_type: u32 },

    /// Packet type tag registered twice
    #[error("Packet type {packet_type} is already registered with the PacketFactory")]
    DuplicatePacketType { packet_type: u32 },

    /// The PacketFactory was built for a different channel structure
    #[error("PacketFactory was built for a different ChannelStructure than the one given to the Connection")]
    ChannelStructureMismatch,

    /// Max packet size can't even hold a packet header
    #[error("Max packet size of {max_packet_size} bytes is too small, packets on this channel structure need at least {required} bytes")]
    MaxPacketSizeTooSmall {
        max_packet_size: usize,
        required: usize,
    },
}

/// An incoming packet doesn't belong to this Connection. Counted as a discard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Packet carries a different type tag than the Connection was configured with
    #[error("Received packet of type {received}, this connection only accepts type {expected}")]
    PacketTypeMismatch { expected: u32, received: u32 },

    /// Packet was built for a channel structure with a different number of channels
    #[error("Received packet with {received} channel slots, this connection has {expected} channels")]
    ChannelCountMismatch { expected: usize, received: usize },
}

/// General connection-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Allocation error
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Packet error
    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),

    /// Serde error
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeErr),

    /// Sequence buffer error
    #[error("Sequence buffer error: {0}")]
    SequenceBuffer(#[from] SequenceBufferError),
}
