//! # Chunk Pool Module
//!
//! Fixed-capacity contiguous storage for the active chunk set. Capacity is
//! `(2R+1)³` for render distance `R`, and in steady state every slot is live.
//!
//! Removal is O(1) via swap-with-last: the removed slot is backfilled by the
//! final live entry rather than shifting the tail. The cost of that choice is
//! that the moved chunk's pool index changes, so the caller must re-publish
//! it to the spatial index. [`ChunkPool::swap_remove`] hands back the moved
//! chunk for exactly that purpose. Slots hold reference-counted handles, so a
//! swap can never invalidate a handle held elsewhere.

use crate::core::MtResource;
use crate::voxels::chunk::Chunk;

/// Fixed-capacity swap-remove pool of active chunks.
pub struct ChunkPool {
    slots: Vec<MtResource<Chunk>>,
    capacity: usize,
}

impl ChunkPool {
    /// Creates an empty pool that will hold at most `capacity` chunks.
    pub fn new(capacity: usize) -> Self {
        ChunkPool {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// The number of live chunks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when no chunks are resident.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The fixed slot capacity, `(2R+1)³`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts a chunk into the first free slot and returns its index, or
    /// `None` when the pool is full.
    ///
    /// A full pool is a capacity violation of the steady-state invariant;
    /// callers treat `None` as fatal rather than recoverable.
    pub fn insert(&mut self, chunk: MtResource<Chunk>) -> Option<usize> {
        if self.slots.len() == self.capacity {
            return None;
        }
        self.slots.push(chunk);
        Some(self.slots.len() - 1)
    }

    /// Removes the chunk at `index`, backfilling with the last live entry.
    ///
    /// Returns the removed chunk and, when a different chunk was moved into
    /// `index` by the swap, a handle to that chunk (`None` when the last slot
    /// itself was removed). The caller must rewrite the moved chunk's entry
    /// in the spatial index or every later lookup for it goes stale.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn swap_remove(&mut self, index: usize) -> (MtResource<Chunk>, Option<MtResource<Chunk>>) {
        assert!(
            index < self.slots.len(),
            "pool slot {} out of bounds (len {})",
            index,
            self.slots.len()
        );
        let removed = self.slots.swap_remove(index);
        let moved = self.slots.get(index).cloned();
        (removed, moved)
    }

    /// Bounds-checked slot access.
    pub fn get(&self, index: usize) -> Option<MtResource<Chunk>> {
        self.slots.get(index).cloned()
    }

    /// A copy-on-read list of every live chunk handle, taken in slot order.
    ///
    /// This is the per-frame enumeration surface for the rendering
    /// collaborator: one clone of each handle, no borrow of pool storage.
    pub fn snapshot(&self) -> Vec<MtResource<Chunk>> {
        self.slots.to_vec()
    }
}
