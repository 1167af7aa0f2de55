pub type ChannelIndex = usize;
