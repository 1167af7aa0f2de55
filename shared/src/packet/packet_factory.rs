use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::{
    AllocationError, Arena, ChannelStructure, ConfigurationError, ConnectionPacket, PacketError,
    PacketType,
};

/// Creates packets of registered types for one channel structure.
///
/// The factory keeps no record of the packets it hands out: each one owns an
/// allocation from the arena and gives it back when dropped.
pub struct PacketFactory {
    arena: Arc<Arena>,
    channel_structure: Arc<ChannelStructure>,
    packet_types: HashMap<PacketType, String>,
}

impl PacketFactory {
    pub fn new(arena: Arc<Arena>, channel_structure: Arc<ChannelStructure>) -> Self {
        Self {
            arena,
            channel_structure,
            packet_types: HashMap::new(),
        }
    }

    /// Registers a packet type
    ///
    /// # Panics
    ///
    /// If `packet_type` is already registered. Use
    /// [`PacketFactory::try_register_packet_type`] for a fallible version.
    pub fn register_packet_type(&mut self, packet_type: PacketType, name: &str) -> &mut Self {
        if let Err(error) = self.try_register_packet_type(packet_type, name) {
            panic!("{}", error);
        }
        self
    }

    pub fn try_register_packet_type(
        &mut self,
        packet_type: PacketType,
        name: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        if self.packet_types.contains_key(&packet_type) {
            return Err(ConfigurationError::DuplicatePacketType {
                packet_type: packet_type.tag(),
            });
        }
        debug!("Registered packet type {} as '{}'", packet_type, name);
        self.packet_types.insert(packet_type, name.to_string());
        Ok(self)
    }

    pub fn is_registered(&self, packet_type: PacketType) -> bool {
        self.packet_types.contains_key(&packet_type)
    }

    pub fn packet_type_name(&self, packet_type: PacketType) -> Option<&str> {
        self.packet_types.get(&packet_type).map(String::as_str)
    }

    /// A zeroed packet of `packet_type` with one empty slot per channel
    pub fn create(&self, packet_type: PacketType) -> Result<ConnectionPacket, PacketError> {
        if !self.is_registered(packet_type) {
            return Err(PacketError::UnregisteredPacketType {
                packet_type: packet_type.tag(),
            });
        }
        Ok(self.allocate_packet(packet_type)?)
    }

    // Registration is checked by callers
    pub(crate) fn allocate_packet(
        &self,
        packet_type: PacketType,
    ) -> Result<ConnectionPacket, AllocationError> {
        let allocation = self.arena.allocate()?;
        Ok(ConnectionPacket::new(
            packet_type,
            self.channel_structure.channel_count(),
            allocation,
        ))
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    pub fn channel_structure(&self) -> &Arc<ChannelStructure> {
        &self.channel_structure
    }
}
