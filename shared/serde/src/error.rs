use thiserror::Error;

/// The reader ran out of bits, or the bits it found don't describe a valid value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to deserialize value: the buffer was truncated or held malformed data")]
pub struct SerdeErr;
