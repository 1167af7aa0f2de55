use std::any::Any;

use tandem_serde::{BitReader, BitWrite, SerdeErr};

/// Gives trait objects access to `Any`, so channel data and adapters can be
/// downcast back to their concrete types
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One channel's share of a packet
pub trait ChannelData: AsAny + Send + Sync {
    /// Write this data into an outgoing packet
    fn write(&self, writer: &mut dyn BitWrite);

    /// Fill this (empty) container from an incoming packet
    fn read(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr>;

    /// Number of bits `write` will produce
    fn bit_length(&self) -> u32;

    /// Nothing for the channel to act on. Empty data is neither attached to
    /// outgoing packets nor handed to `process_data`.
    fn is_empty(&self) -> bool {
        false
    }
}

impl dyn ChannelData {
    pub fn downcast_ref<T: ChannelData>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: ChannelData>(&mut self) -> Option<&mut T> {
        AsAny::as_any_mut(self).downcast_mut::<T>()
    }
}
