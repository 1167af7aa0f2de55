use std::{collections::VecDeque, mem};

use log::{trace, warn};

use tandem_serde::Serde;

use crate::{
    channel::block_data::block_count_bits, sequence_greater_than, Block, BlockData,
    ChannelAdapter, ChannelData,
};

/// Fire-and-forget channel. Queued payloads go out in the next packet with
/// room for them and are never resent. On the receiving side, a payload older
/// than the newest one already delivered is dropped.
pub struct UnreliableBlockChannel {
    outgoing: VecDeque<Vec<u8>>,
    next_send_id: u16,
    last_received_id: Option<u16>,
    incoming: VecDeque<Vec<u8>>,
    rejected: u64,
}

impl UnreliableBlockChannel {
    pub fn new() -> Self {
        Self {
            outgoing: VecDeque::new(),
            next_send_id: 0,
            last_received_id: None,
            incoming: VecDeque::new(),
            rejected: 0,
        }
    }

    pub fn send(&mut self, payload: Vec<u8>) {
        self.outgoing.push_back(payload);
    }

    /// Payloads delivered since the last call, in arrival order
    pub fn receive(&mut self) -> Vec<Vec<u8>> {
        Vec::from(mem::take(&mut self.incoming))
    }

    pub fn pending_count(&self) -> usize {
        self.outgoing.len()
    }

    /// How many incoming blocks of data were ignored as stale
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}

impl Default for UnreliableBlockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelAdapter for UnreliableBlockChannel {
    fn process_data(&mut self, sequence: u16, data: &dyn ChannelData) -> bool {
        let Some(data) = data.downcast_ref::<BlockData>() else {
            warn!("Unreliable channel got foreign data in packet {}", sequence);
            self.rejected += 1;
            return false;
        };

        let mut accepted = false;
        for block in data.blocks() {
            let newer = match self.last_received_id {
                Some(last) => sequence_greater_than(block.id, last),
                None => true,
            };
            if !newer {
                continue;
            }
            self.last_received_id = Some(block.id);
            self.incoming.push_back(block.payload.clone());
            accepted = true;
        }

        if !accepted {
            trace!("Unreliable channel dropped stale data in packet {}", sequence);
            self.rejected += 1;
        }
        accepted
    }

    fn process_ack(&mut self, _sequence: u16) {
        // nothing is ever resent
    }

    fn write_data(&mut self, sequence: u16, available_bits: u32) -> Option<Box<dyn ChannelData>> {
        let mut data = BlockData::new();
        let mut block_bits = 0;

        while let Some(payload) = self.outgoing.pop_front() {
            let block = Block::new(self.next_send_id, payload);
            let bits = block.bit_length();
            if block_count_bits(data.len() + 1) + block_bits + bits <= available_bits {
                data.push(block);
                block_bits += bits;
                self.next_send_id = self.next_send_id.wrapping_add(1);
                continue;
            }

            // doesn't fit, put it back for the next packet
            if data.is_empty() {
                warn!(
                    "Dropping {} byte payload that can't fit in packet {}",
                    block.payload.len(),
                    sequence
                );
            } else {
                self.outgoing.push_front(block.payload);
            }
            break;
        }

        if data.is_empty() {
            return None;
        }
        Some(Box::new(data))
    }
}
