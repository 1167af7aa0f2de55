use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use log::{debug, warn};

use crate::AllocationError;

/// Bounded allocation budget shared by everything that creates packets or
/// channel adapters.
///
/// Constructing an Arena is its initialization and [`Arena::shutdown`] ends
/// it. In between, [`Arena::allocate`] hands out [`Allocation`] guards which
/// give their slot back when dropped, so a slot is returned on every exit path.
pub struct Arena {
    capacity: usize,
    live: AtomicUsize,
    active: AtomicBool,
}

impl Arena {
    pub fn new(capacity: usize) -> Self {
        debug!("Arena initialized with capacity {}", capacity);
        Self {
            capacity,
            live: AtomicUsize::new(0),
            active: AtomicBool::new(true),
        }
    }

    pub fn allocate(self: &Arc<Self>) -> Result<Allocation, AllocationError> {
        if !self.is_active() {
            return Err(AllocationError::ArenaShutdown);
        }

        let capacity = self.capacity;
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < capacity).then_some(live + 1)
            })
            .map_err(|_| AllocationError::ArenaExhausted { capacity })?;

        Ok(Allocation {
            arena: Arc::clone(self),
        })
    }

    /// Stops all further allocation. Reports an error if anything allocated
    /// from this arena is still alive.
    pub fn shutdown(&self) -> Result<(), AllocationError> {
        self.active.store(false, Ordering::Release);

        let live = self.live();
        if live > 0 {
            warn!("Arena shut down with {} live allocations", live);
            return Err(AllocationError::OutstandingAllocations { live });
        }

        debug!("Arena shut down cleanly");
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("live", &self.live())
            .field("active", &self.is_active())
            .finish()
    }
}

/// One slot of an [`Arena`], released when dropped
pub struct Allocation {
    arena: Arc<Arena>,
}

impl Allocation {
    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.arena.release();
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation").finish_non_exhaustive()
    }
}
