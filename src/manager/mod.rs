//! Qubit allocation and release-with-safety-check (C7).

use crate::error::{Error, Result};
use crate::simulator::Simulator;
use crate::types::QubitHandle;

/// A per-scope set of live qubit handles (Design Notes §9: a process-wide
/// manager is explicitly flagged as needing re-architecture; `qscope`
/// confines one manager to each [`scope::run`](crate::scope::run) call).
///
/// Live slots are tracked with a bitset plus a per-slot generation counter,
/// so a released slot can be reused by a later `allocate()` without an old,
/// already-released handle comparing equal to the new one.
pub struct QubitManager {
    live: Vec<bool>,
    generations: Vec<u64>,
    freelist: Vec<u32>,
}

impl QubitManager {
    pub fn new() -> Self {
        QubitManager {
            live: Vec::new(),
            generations: Vec::new(),
            freelist: Vec::new(),
        }
    }

    /// Mints a fresh opaque identity, reusing a released slot's index when
    /// one is available and bumping its generation so the old handle can
    /// never compare equal to the new one.
    pub fn allocate(&mut self) -> QubitHandle {
        if let Some(slot) = self.freelist.pop() {
            self.live[slot as usize] = true;
            self.generations[slot as usize] += 1;
            return QubitHandle {
                slot,
                generation: self.generations[slot as usize],
            };
        }
        let slot = self.live.len() as u32;
        self.live.push(true);
        self.generations.push(1);
        QubitHandle {
            slot,
            generation: 1,
        }
    }

    /// Allocates `count` handles in order, e.g. for a scope's initial `N`.
    pub fn allocate_many(&mut self, count: usize) -> Vec<QubitHandle> {
        (0..count).map(|_| self.allocate()).collect()
    }

    /// `IsAllocated(h)` — a foreign identity (never minted by this manager,
    /// or already released) always answers false.
    pub fn is_allocated(&self, handle: QubitHandle) -> bool {
        let slot = handle.slot as usize;
        slot < self.live.len() && self.live[slot] && self.generations[slot] == handle.generation
    }

    /// `Release(h, simulator)`. Fails unless `simulator.is_zero(h)`; only a
    /// successful release removes `h` from the live set.
    pub fn release(&mut self, handle: QubitHandle, simulator: &Simulator) -> Result<()> {
        if !self.is_allocated(handle) {
            return Err(Error::UsageError(handle));
        }
        if !simulator.is_zero(handle) {
            return Err(Error::ReleaseError(handle));
        }
        self.live[handle.slot as usize] = false;
        self.freelist.push(handle.slot);
        Ok(())
    }

    pub fn validate(&self, handle: QubitHandle) -> Result<()> {
        if self.is_allocated(handle) {
            Ok(())
        } else {
            Err(Error::UsageError(handle))
        }
    }
}

impl Default for QubitManager {
    fn default() -> Self {
        Self::new()
    }
}
