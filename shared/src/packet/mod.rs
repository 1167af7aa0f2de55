pub mod connection_packet;
pub mod error;
pub mod packet_factory;
pub mod packet_type;
