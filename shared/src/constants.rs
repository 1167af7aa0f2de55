/// Width of the ack bitfield carried by every packet. Together with the ack
/// field itself, one packet can confirm up to `ACK_BITFIELD_BITS + 1` receptions.
pub const ACK_BITFIELD_BITS: u32 = 32;

/// How many recently sent packets are remembered for ack accounting
pub const SENT_PACKETS_WINDOW: usize = 256;

/// How many recently received packets are remembered for building ack bitfields
pub const RECEIVED_PACKETS_WINDOW: usize = 256;

/// How far ahead of the next expected message a reliable channel will buffer
pub const RELIABLE_RECEIVE_WINDOW: u16 = 1024;

/// Used when a `ConnectionConfig` doesn't set its own limit
pub const DEFAULT_MAX_PACKET_SIZE: usize = 4 * 1024;

/// Largest possible packet header: type tag, sequence, ack presence bit, ack,
/// ack bitfield. Channel presence bits come on top of this.
pub const PACKET_HEADER_MAX_BITS: u32 = 32 + 16 + 1 + 16 + ACK_BITFIELD_BITS;
