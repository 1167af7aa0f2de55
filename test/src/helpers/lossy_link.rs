/// One direction of a simulated network: drops a share of what is sent
/// and hands the rest over in shuffled order
pub struct LossyLink {
    rng: fastrand::Rng,
    loss_percent: u32,
    in_flight: Vec<Vec<u8>>,
}

impl LossyLink {
    pub fn new(seed: u64, loss_percent: u32) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            loss_percent,
            in_flight: Vec::new(),
        }
    }

    pub fn send(&mut self, bytes: Vec<u8>) {
        if self.rng.u32(0..100) < self.loss_percent {
            return;
        }
        self.in_flight.push(bytes);
    }

    /// Everything that survived, in random order
    pub fn receive_all(&mut self) -> Vec<Vec<u8>> {
        let mut delivered = std::mem::take(&mut self.in_flight);
        self.rng.shuffle(&mut delivered);
        delivered
    }
}
