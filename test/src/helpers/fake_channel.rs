use tandem_shared::{ChannelAdapter, ChannelData};

/// Accepts everything, sends nothing, and counts what it was told
#[derive(Default)]
pub struct FakeChannel {
    pub data_count: usize,
    pub ack_count: usize,
}

impl FakeChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelAdapter for FakeChannel {
    fn process_data(&mut self, _sequence: u16, _data: &dyn ChannelData) -> bool {
        self.data_count += 1;
        true
    }

    fn process_ack(&mut self, _sequence: u16) {
        self.ack_count += 1;
    }
}
