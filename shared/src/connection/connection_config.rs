use std::sync::Arc;

use crate::{constants::DEFAULT_MAX_PACKET_SIZE, ChannelStructure, PacketFactory, PacketType};

/// Contains Config properties which will be used by a Connection
#[derive(Clone)]
pub struct ConnectionConfig {
    /// The only packet type this Connection writes or accepts
    pub packet_type: PacketType,
    /// Largest encoded packet in bytes, checked by `Connection::encode` and `Connection::decode`
    pub max_packet_size: usize,
    pub packet_factory: Arc<PacketFactory>,
    /// Must be the structure `packet_factory` was built with
    pub channel_structure: Arc<ChannelStructure>,
}

impl ConnectionConfig {
    /// Creates a new ConnectionConfig, using the factory's channel structure
    /// and [`DEFAULT_MAX_PACKET_SIZE`]
    pub fn new(packet_type: PacketType, packet_factory: Arc<PacketFactory>) -> Self {
        let channel_structure = Arc::clone(packet_factory.channel_structure());
        Self {
            packet_type,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            packet_factory,
            channel_structure,
        }
    }

    pub fn max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    pub fn channel_structure(mut self, channel_structure: Arc<ChannelStructure>) -> Self {
        self.channel_structure = channel_structure;
        self
    }
}
