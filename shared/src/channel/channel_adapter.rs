use crate::{AsAny, ChannelData};

/// The hooks a channel gives its Connection.
///
/// Every Connection creates its own adapter per registered channel and is the
/// only caller of these methods.
pub trait ChannelAdapter: AsAny + Send {
    /// Called once per accepted packet that carries data for this channel.
    /// Returning false only means this channel ignored the data: the packet
    /// stays accepted and will still be acked.
    fn process_data(&mut self, sequence: u16, data: &dyn ChannelData) -> bool;

    /// Called exactly once when a sent packet is first confirmed by the
    /// remote side, on every channel, whether or not it had data in that packet.
    fn process_ack(&mut self, sequence: u16);

    /// Data to attach to the packet being written, at most `available_bits`
    /// long. Channels with nothing to send leave their slot empty.
    fn write_data(&mut self, _sequence: u16, _available_bits: u32) -> Option<Box<dyn ChannelData>> {
        None
    }
}

impl dyn ChannelAdapter {
    pub fn downcast_ref<T: ChannelAdapter>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: ChannelAdapter>(&mut self) -> Option<&mut T> {
        AsAny::as_any_mut(self).downcast_mut::<T>()
    }
}
