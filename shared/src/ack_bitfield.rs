use crate::{constants::ACK_BITFIELD_BITS, SequenceBuffer};

/// Builds the bitfield that accompanies `ack`: bit `i` is set when
/// `ack - 1 - i` is present in `received`.
pub fn generate_ack_bits<T>(received: &SequenceBuffer<T>, ack: u16) -> u32 {
    let mut ack_bits: u32 = 0;
    for bit in 0..ACK_BITFIELD_BITS {
        let sequence = ack.wrapping_sub(1).wrapping_sub(bit as u16);
        if received.exists(sequence) {
            ack_bits |= 1 << bit;
        }
    }
    ack_bits
}

/// Whether an `(ack, ack_bits)` pair confirms `sequence`
pub fn is_acked(sequence: u16, ack: u16, ack_bits: u32) -> bool {
    if sequence == ack {
        return true;
    }
    let distance = u32::from(ack.wrapping_sub(sequence));
    if distance > ACK_BITFIELD_BITS {
        return false;
    }
    (ack_bits >> (distance - 1)) & 1 == 1
}

/// Every sequence confirmed by an `(ack, ack_bits)` pair: the ack itself
/// first, then each sequence whose bit is set, newest to oldest.
#[derive(Debug, Clone)]
pub struct AckedSequences {
    ack: Option<u16>,
    ack_bits: u32,
    yielded_ack: bool,
}

impl AckedSequences {
    /// A `None` ack confirms nothing, whatever the bits say
    pub fn new(ack: Option<u16>, ack_bits: u32) -> Self {
        Self {
            ack,
            ack_bits: if ack.is_some() { ack_bits } else { 0 },
            yielded_ack: false,
        }
    }
}

impl Iterator for AckedSequences {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        let ack = self.ack?;

        if !self.yielded_ack {
            self.yielded_ack = true;
            return Some(ack);
        }

        if self.ack_bits == 0 {
            return None;
        }

        let bit = self.ack_bits.trailing_zeros();
        self.ack_bits &= self.ack_bits - 1;
        Some(ack.wrapping_sub(1).wrapping_sub(bit as u16))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.ack {
            None => 0,
            Some(_) => self.ack_bits.count_ones() as usize + usize::from(!self.yielded_ack),
        };
        (remaining, Some(remaining))
    }
}
