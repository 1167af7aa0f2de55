use thiserror::Error;

/// Errors that can occur when allocating packets or channels from an Arena
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Every slot in the arena is held by a live allocation
    #[error("Arena exhausted: all {capacity} allocations are in use. Release packets before writing more, or build the Arena with a larger capacity")]
    ArenaExhausted { capacity: usize },

    /// The arena was shut down and no longer hands out allocations
    #[error("Arena has been shut down and can no longer allocate")]
    ArenaShutdown,

    /// Shutdown found allocations that were never released
    #[error("Arena shut down with {live} allocations still live. Every packet and connection must be dropped before shutdown")]
    OutstandingAllocations { live: usize },
}
