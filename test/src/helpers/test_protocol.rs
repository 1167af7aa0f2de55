use std::sync::Arc;

use tandem_shared::{
    block_data_factory, Arena, ChannelStructure, Connection, ConnectionConfig, PacketFactory,
    PacketType, ReliableBlockChannel,
};

use super::{AckChannel, FakeChannel, SharedAckLog};

pub const TEST_PACKET: PacketType = PacketType::new(0x7a6e);
pub const OTHER_PACKET: PacketType = PacketType::new(0x6f74);

pub const FAKE_CHANNEL: usize = 0;
pub const ACK_CHANNEL: usize = 1;
pub const RELIABLE_CHANNEL: usize = 2;

/// Arena, channels and packet factory for one side of a test
pub struct TestProtocol {
    pub arena: Arc<Arena>,
    pub factory: Arc<PacketFactory>,
    pub ack_log: SharedAckLog,
}

impl TestProtocol {
    /// Channels: a [`FakeChannel`], an [`AckChannel`] turning down
    /// `reject_percent` of its data, and a [`ReliableBlockChannel`]
    pub fn new(seed: u64, reject_percent: u32) -> Self {
        Self::with_arena_capacity(seed, reject_percent, 1024)
    }

    pub fn with_arena_capacity(seed: u64, reject_percent: u32, arena_capacity: usize) -> Self {
        let ack_log = SharedAckLog::new();
        let adapter_log = ack_log.clone();

        let structure = ChannelStructure::builder()
            .add_channel("fake", FakeChannel::new, || None)
            .add_channel(
                "acks",
                move || AckChannel::new(adapter_log.clone(), seed, reject_percent),
                block_data_factory,
            )
            .add_channel("reliable", ReliableBlockChannel::new, block_data_factory)
            .lock();

        let arena = Arc::new(Arena::new(arena_capacity));
        let mut factory = PacketFactory::new(Arc::clone(&arena), structure);
        factory
            .register_packet_type(TEST_PACKET, "test")
            .register_packet_type(OTHER_PACKET, "other");

        Self {
            arena,
            factory: Arc::new(factory),
            ack_log,
        }
    }

    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new(TEST_PACKET, Arc::clone(&self.factory))
    }

    pub fn connection(&self) -> Connection {
        match Connection::new(self.config()) {
            Ok(connection) => connection,
            Err(error) => panic!("test connection failed to build: {}", error),
        }
    }
}

/// Routes `log` output through the test harness, safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
