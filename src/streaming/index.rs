//! # Spatial Index Module
//!
//! Coordinate-keyed lookup for resident chunks: two synchronized maps from a
//! packed coordinate hash to (a) the chunk handle and (b) its current pool
//! slot. Both maps must be mutated together with every pool mutation, under
//! the same store write guard. A swap-remove that moves another chunk's slot
//! must also rewrite that chunk's slot entry here, or every subsequent
//! indexed lookup for the moved chunk is silently wrong.

use std::collections::HashMap;

use cgmath::Point3;

use crate::core::MtResource;
use crate::voxels::chunk::Chunk;

/// Bits of each axis packed into the 64-bit spatial key.
const HASH_AXIS_BITS: u64 = 21;
const HASH_AXIS_MASK: u64 = (1 << HASH_AXIS_BITS) - 1;

/// Packs a chunk coordinate into a collision-free 64-bit key.
///
/// Each axis contributes its low 21 bits (two's complement), which is
/// injective for coordinates in `-2^20 .. 2^20`, far beyond any reachable
/// streaming volume at realistic render distances.
pub fn spatial_hash(coordinate: Point3<i32>) -> u64 {
    let x = (coordinate.x as u64) & HASH_AXIS_MASK;
    let y = (coordinate.y as u64) & HASH_AXIS_MASK;
    let z = (coordinate.z as u64) & HASH_AXIS_MASK;
    x | (y << HASH_AXIS_BITS) | (z << (2 * HASH_AXIS_BITS))
}

/// The two synchronized residency maps.
pub struct SpatialIndex {
    /// Coordinate key → chunk handle.
    chunks: HashMap<u64, MtResource<Chunk>>,
    /// Coordinate key → current pool slot of that chunk.
    slots: HashMap<u64, usize>,
}

impl SpatialIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        SpatialIndex {
            chunks: HashMap::new(),
            slots: HashMap::new(),
        }
    }

    /// The number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// `true` when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Registers a freshly loaded chunk under its coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate is already indexed; loading a resident
    /// coordinate is a duplicate-load programming error, never silently
    /// overwritten.
    pub fn put(&mut self, coordinate: Point3<i32>, chunk: MtResource<Chunk>, slot: usize) {
        let key = spatial_hash(coordinate);
        assert!(
            !self.chunks.contains_key(&key),
            "duplicate chunk load at {:?}",
            coordinate
        );
        self.chunks.insert(key, chunk);
        self.slots.insert(key, slot);
    }

    /// Removes both entries for `coordinate`, returning the chunk handle if
    /// one was resident.
    pub fn remove(&mut self, coordinate: Point3<i32>) -> Option<MtResource<Chunk>> {
        let key = spatial_hash(coordinate);
        self.slots.remove(&key);
        self.chunks.remove(&key)
    }

    /// Looks up the resident chunk at `coordinate`.
    pub fn chunk_at(&self, coordinate: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&spatial_hash(coordinate)).cloned()
    }

    /// Looks up the pool slot of the chunk at `coordinate`.
    pub fn slot_of(&self, coordinate: Point3<i32>) -> Option<usize> {
        self.slots.get(&spatial_hash(coordinate)).copied()
    }

    /// Rewrites the pool slot recorded for `coordinate` after a swap-remove
    /// moved its chunk.
    ///
    /// # Panics
    /// Panics if the coordinate is not indexed; only chunks the pool just
    /// moved can legitimately change slots.
    pub fn update_slot(&mut self, coordinate: Point3<i32>, slot: usize) {
        let key = spatial_hash(coordinate);
        let entry = self
            .slots
            .get_mut(&key)
            .unwrap_or_else(|| panic!("slot update for unindexed chunk at {:?}", coordinate));
        *entry = slot;
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
