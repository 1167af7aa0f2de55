use std::{
    collections::{HashMap, HashSet, VecDeque},
    mem,
};

use log::{trace, warn};

use tandem_serde::Serde;

use crate::{
    channel::block_data::block_count_bits,
    constants::{RELIABLE_RECEIVE_WINDOW, SENT_PACKETS_WINDOW},
    wrapping_diff, Block, BlockData, ChannelAdapter, ChannelData, SequenceBuffer,
};

/// Guaranteed, ordered channel.
///
/// Every payload is repeated in each outgoing packet until a packet carrying
/// it is acked. The receiver buffers payloads that arrive early and hands
/// them out strictly in send order, each exactly once.
pub struct ReliableBlockChannel {
    next_send_id: u16,
    unacked: VecDeque<Block>,
    in_flight: SequenceBuffer<Vec<u16>>,
    next_receive_id: u16,
    buffered: HashMap<u16, Vec<u8>>,
    incoming: VecDeque<Vec<u8>>,
    duplicates: u64,
}

impl ReliableBlockChannel {
    pub fn new() -> Self {
        Self {
            next_send_id: 0,
            unacked: VecDeque::new(),
            in_flight: SequenceBuffer::new(SENT_PACKETS_WINDOW),
            next_receive_id: 0,
            buffered: HashMap::new(),
            incoming: VecDeque::new(),
            duplicates: 0,
        }
    }

    pub fn send(&mut self, payload: Vec<u8>) {
        self.unacked.push_back(Block::new(self.next_send_id, payload));
        self.next_send_id = self.next_send_id.wrapping_add(1);
    }

    /// Payloads delivered since the last call, in send order
    pub fn receive(&mut self) -> Vec<Vec<u8>> {
        Vec::from(mem::take(&mut self.incoming))
    }

    /// Payloads sent but not yet confirmed
    pub fn unacked_count(&self) -> usize {
        self.unacked.len()
    }

    /// Incoming blocks that had already been received
    pub fn duplicate_count(&self) -> u64 {
        self.duplicates
    }

    fn deliver_ready(&mut self) {
        while let Some(payload) = self.buffered.remove(&self.next_receive_id) {
            self.incoming.push_back(payload);
            self.next_receive_id = self.next_receive_id.wrapping_add(1);
        }
    }
}

impl Default for ReliableBlockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelAdapter for ReliableBlockChannel {
    fn process_data(&mut self, sequence: u16, data: &dyn ChannelData) -> bool {
        let Some(data) = data.downcast_ref::<BlockData>() else {
            warn!("Reliable channel got foreign data in packet {}", sequence);
            return false;
        };

        let mut accepted = false;
        for block in data.blocks() {
            let offset = wrapping_diff(self.next_receive_id, block.id);
            if offset < 0 || self.buffered.contains_key(&block.id) {
                self.duplicates += 1;
                continue;
            }
            if offset >= RELIABLE_RECEIVE_WINDOW as i16 {
                warn!(
                    "Reliable block {} is too far ahead of {}, dropping",
                    block.id, self.next_receive_id
                );
                continue;
            }
            self.buffered.insert(block.id, block.payload.clone());
            accepted = true;
        }

        if accepted {
            self.deliver_ready();
        }
        accepted
    }

    fn process_ack(&mut self, sequence: u16) {
        let Some(ids) = self.in_flight.remove(sequence) else {
            return;
        };
        trace!("Packet {} confirmed {} reliable blocks", sequence, ids.len());
        let ids: HashSet<u16> = ids.into_iter().collect();
        self.unacked.retain(|block| !ids.contains(&block.id));
    }

    fn write_data(&mut self, sequence: u16, available_bits: u32) -> Option<Box<dyn ChannelData>> {
        // the receiver only buffers this far past the oldest message it lacks
        let oldest_id = self.unacked.front()?.id;

        let mut data = BlockData::new();
        let mut block_bits = 0;

        for block in self.unacked.iter() {
            if wrapping_diff(oldest_id, block.id) >= RELIABLE_RECEIVE_WINDOW as i16 {
                break;
            }

            let bits = block.bit_length();
            if block_count_bits(data.len() + 1) + block_bits + bits > available_bits {
                if data.is_empty() {
                    warn!(
                        "Reliable block {} ({} bytes) can't fit in packet {}",
                        block.id,
                        block.payload.len(),
                        sequence
                    );
                }
                continue;
            }

            data.push(block.clone());
            block_bits += bits;
        }

        if data.is_empty() {
            return None;
        }

        let ids = data.blocks().iter().map(|block| block.id).collect();
        self.in_flight.insert(sequence, ids);
        Some(Box::new(data))
    }
}
