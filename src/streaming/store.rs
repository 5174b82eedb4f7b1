//! # Chunk Store Module
//!
//! Couples the swap-remove pool with the spatial index so the two can never
//! disagree. Every residency mutation (load or evict) runs through this type,
//! and callers hold a single write guard on the store for the whole mutation,
//! which is what keeps the pool/index pair consistent under the concurrent
//! bulk-initialization inserts and the streaming thread's updates.

use cgmath::Point3;
use log::warn;

use crate::core::MtResource;
use crate::voxels::chunk::Chunk;

use super::index::SpatialIndex;
use super::pool::ChunkPool;

/// The pool and index of the active chunk set, mutated as a unit.
pub struct ChunkStore {
    pool: ChunkPool,
    index: SpatialIndex,
}

impl ChunkStore {
    /// Creates an empty store with room for `capacity` chunks.
    pub fn new(capacity: usize) -> Self {
        ChunkStore {
            pool: ChunkPool::new(capacity),
            index: SpatialIndex::new(),
        }
    }

    /// The number of resident chunks.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// `true` when nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// The fixed chunk capacity, `(2R+1)³`.
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Makes a freshly generated chunk resident: inserts it into the pool and
    /// registers it in the index under the slot the pool assigned.
    ///
    /// Returns a handle to the now-resident chunk.
    ///
    /// # Panics
    /// Panics on pool capacity overflow or on loading an already-resident
    /// coordinate. Both are violations of the steady-state invariant, not
    /// recoverable conditions.
    pub fn load(&mut self, chunk: Chunk) -> MtResource<Chunk> {
        let coordinate = chunk.position();
        let handle = MtResource::new(chunk);

        let slot = self
            .pool
            .insert(handle.clone())
            .unwrap_or_else(|| panic!("chunk pool capacity exceeded loading {:?}", coordinate));
        self.index.put(coordinate, handle.clone(), slot);

        handle
    }

    /// Evicts the chunk at `coordinate`, if resident.
    ///
    /// Removes both index entries, swap-removes the pool slot, and, when the
    /// swap moved a different chunk into the vacated slot, rewrites that
    /// chunk's slot entry in the index. Skipping that last step would corrupt
    /// every subsequent indexed lookup for the moved chunk.
    ///
    /// Evicting a non-resident coordinate is a benign no-op (an edge slice
    /// can be targeted by two axis shifts in the same cycle); it is logged
    /// and `false` is returned.
    pub fn evict(&mut self, coordinate: Point3<i32>) -> bool {
        let Some(slot) = self.index.slot_of(coordinate) else {
            warn!("skipped eviction of non-resident chunk at {:?}", coordinate);
            return false;
        };

        let indexed = self
            .index
            .remove(coordinate)
            .expect("index slot and chunk maps out of sync");

        let (removed, moved) = self.pool.swap_remove(slot);
        assert!(
            MtResource::ptr_eq(&indexed, &removed),
            "index and pool disagree about the chunk at {:?}",
            coordinate
        );

        if let Some(moved) = moved {
            let moved_coordinate = moved.read().position();
            self.index.update_slot(moved_coordinate, slot);
        }

        true
    }

    /// Looks up the resident chunk at `coordinate`.
    pub fn chunk_at(&self, coordinate: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.index.chunk_at(coordinate)
    }

    /// Bounds-checked access to the chunk in pool slot `index`.
    pub fn chunk_at_index(&self, index: usize) -> Option<MtResource<Chunk>> {
        self.pool.get(index)
    }

    /// The pool slot currently recorded for `coordinate`.
    pub fn slot_of(&self, coordinate: Point3<i32>) -> Option<usize> {
        self.index.slot_of(coordinate)
    }

    /// Copy-on-read list of every resident chunk handle in slot order.
    pub fn snapshot(&self) -> Vec<MtResource<Chunk>> {
        self.pool.snapshot()
    }
}
