use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::trace;
use tandem_shared::{Block, BlockData, ChannelAdapter, ChannelData};

/// Everything an [`AckChannel`] observed, kept outside the Connection so
/// tests can inspect it while the adapter is owned by the Connection
#[derive(Debug, Default)]
pub struct AckLog {
    /// How many times each sequence was reported acked
    pub acks: HashMap<u16, u32>,
    /// Sequences whose data the channel took
    pub accepted: Vec<u16>,
    /// Sequences whose data the channel turned down
    pub rejected: Vec<u16>,
}

impl AckLog {
    pub fn acked_count(&self) -> usize {
        self.acks.len()
    }

    pub fn was_acked(&self, sequence: u16) -> bool {
        self.acks.contains_key(&sequence)
    }

    /// True when no sequence was reported more than once
    pub fn acked_exactly_once(&self) -> bool {
        self.acks.values().all(|count| *count == 1)
    }
}

#[derive(Clone, Default)]
pub struct SharedAckLog(Arc<Mutex<AckLog>>);

impl SharedAckLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, AckLog> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sends a small block with every packet and randomly turns down a share of
/// incoming data, recording every call into a [`SharedAckLog`]
pub struct AckChannel {
    log: SharedAckLog,
    rng: fastrand::Rng,
    reject_percent: u32,
}

impl AckChannel {
    pub fn new(log: SharedAckLog, seed: u64, reject_percent: u32) -> Self {
        Self {
            log,
            rng: fastrand::Rng::with_seed(seed),
            reject_percent,
        }
    }
}

impl ChannelAdapter for AckChannel {
    fn process_data(&mut self, sequence: u16, data: &dyn ChannelData) -> bool {
        let rejected = data.downcast_ref::<BlockData>().is_none()
            || self.rng.u32(0..100) < self.reject_percent;

        let mut log = self.log.lock();
        if rejected {
            trace!("AckChannel rejecting data in packet {}", sequence);
            log.rejected.push(sequence);
        } else {
            log.accepted.push(sequence);
        }
        !rejected
    }

    fn process_ack(&mut self, sequence: u16) {
        *self.log.lock().acks.entry(sequence).or_insert(0) += 1;
    }

    fn write_data(&mut self, sequence: u16, _available_bits: u32) -> Option<Box<dyn ChannelData>> {
        let block = Block::new(sequence, sequence.to_le_bytes().to_vec());
        Some(Box::new(BlockData::from(vec![block])))
    }
}
