use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<true, BITS>;

/// Unsigned integer written with a chosen number of bits.
///
/// Fixed integers always take `BITS` bits. Variable integers are written in
/// `BITS`-sized chunks, each preceded by a bit saying whether another chunk
/// follows, so small values stay small on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const VARIABLE: bool, const BITS: u8> {
    value: u64,
}

impl<const VARIABLE: bool, const BITS: u8> SerdeInteger<VARIABLE, BITS> {
    /// # Panics
    ///
    /// Panics if `BITS` is zero or above 64, or if a fixed integer can't hold `value`.
    pub fn new<T: Into<u64>>(value: T) -> Self {
        match Self::try_new(value) {
            Ok(integer) => integer,
            Err(_) => panic!("with {} bits, can't encode this value", BITS),
        }
    }

    pub fn try_new<T: Into<u64>>(value: T) -> Result<Self, SerdeErr> {
        let value = value.into();
        if BITS == 0 || BITS > 64 {
            return Err(SerdeErr);
        }
        if !VARIABLE && BITS < 64 && value >> BITS != 0 {
            return Err(SerdeErr);
        }
        Ok(Self { value })
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    fn chunk_count(&self) -> u32 {
        if !VARIABLE {
            return 1;
        }
        let significant_bits = u64::BITS - self.value.leading_zeros();
        significant_bits.div_ceil(u32::from(BITS)).max(1)
    }
}

impl<const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value = self.value;

        if !VARIABLE {
            for _ in 0..BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
            return;
        }

        let chunks = self.chunk_count();
        for chunk in 0..chunks {
            let proceed = chunk + 1 < chunks;
            writer.write_bit(proceed);
            for _ in 0..BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let proceed = if VARIABLE { reader.read_bit()? } else { false };

            for _ in 0..BITS {
                let bit = reader.read_bit()?;
                if bit {
                    if shift >= u64::BITS {
                        return Err(SerdeErr);
                    }
                    output |= 1 << shift;
                }
                shift += 1;
            }

            if !proceed {
                return Ok(Self { value: output });
            }
        }
    }

    fn bit_length(&self) -> u32 {
        let per_chunk = u32::from(BITS) + u32::from(VARIABLE);
        per_chunk * self.chunk_count()
    }
}

impl<const BITS: u8> ConstBitLength for SerdeInteger<false, BITS> {
    fn const_bit_length() -> u32 {
        u32::from(BITS)
    }
}
