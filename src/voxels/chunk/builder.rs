//! # Chunk Builder Module
//!
//! Builds chunks while maintaining the relationship between the padded
//! solidity bit vector and the dense non-air block vector. Content factories
//! push exactly `CHUNK_SIZE` block types in storage order (x fastest, then y,
//! then z) and then call [`ChunkBuilder::finish`].

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::voxels::block::{block_type::BlockType, Block};

use super::{
    Chunk, CHUNK_DIMENSION, CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED, CHUNK_SIZE,
    CHUNK_SIZE_WRAPPED,
};

/// Incremental builder for a chunk's content.
///
/// Keeps the two content structures consistent as blocks are pushed: every
/// position gets a solidity bit at its padded location, and only non-air
/// blocks are appended to the block vector. The per-plane block offsets used
/// to accelerate point lookups are recorded as each z-plane begins.
pub struct ChunkBuilder {
    position: Point3<i32>,
    solid_array: BitVec,
    offsets_at_plane: Vec<u32>,
    blocks: Vec<Block>,
    /// Linear local position of the next push, x fastest, then y, then z.
    cursor: usize,
}

impl ChunkBuilder {
    /// Starts building the chunk at `position` (chunk coordinates).
    pub fn new(position: Point3<i32>) -> Self {
        ChunkBuilder {
            position,
            solid_array: BitVec::repeat(false, CHUNK_SIZE_WRAPPED),
            offsets_at_plane: Vec::with_capacity(CHUNK_DIMENSION as usize),
            blocks: Vec::new(),
            cursor: 0,
        }
    }

    /// Adds the block at the current position and advances.
    ///
    /// # Panics
    /// Panics if more than `CHUNK_SIZE` blocks are pushed.
    pub fn push(&mut self, block_type: BlockType) {
        assert!(
            self.cursor < CHUNK_SIZE as usize,
            "chunk builder overfilled at {:?}",
            self.position
        );

        let dim = CHUNK_DIMENSION as usize;
        let x = self.cursor % dim;
        let y = (self.cursor / dim) % dim;
        let z = self.cursor / (dim * dim);

        // First block of a z-plane: remember how many solid blocks precede it.
        if x == 0 && y == 0 {
            self.offsets_at_plane.push(self.blocks.len() as u32);
        }

        if block_type != BlockType::AIR {
            let wrapped =
                (x + 1) + CHUNK_DIMENSION_WRAPPED * (y + 1) + CHUNK_PLANE_SIZE_WRAPPED * (z + 1);
            self.solid_array.set(wrapped, true);
            self.blocks.push(Block::new(block_type));
        }

        self.cursor += 1;
    }

    /// Finalizes the build and returns the chunk, with no render
    /// representation materialized yet.
    ///
    /// # Panics
    /// Panics unless exactly `CHUNK_SIZE` blocks were pushed; the content
    /// factory contract is total, partial chunks are a programming error.
    pub fn finish(self) -> Chunk {
        assert_eq!(
            self.cursor, CHUNK_SIZE as usize,
            "chunk builder finished early at {:?}",
            self.position
        );
        Chunk::from_parts(
            self.position,
            self.solid_array,
            self.offsets_at_plane,
            self.blocks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_fill_produces_half_solid_chunk() {
        let dim = CHUNK_DIMENSION as usize;
        let mut builder = ChunkBuilder::new(Point3::new(2, -3, 4));
        for z in 0..dim {
            for y in 0..dim {
                for x in 0..dim {
                    if (x + y + z) % 2 == 0 {
                        builder.push(BlockType::DIRT);
                    } else {
                        builder.push(BlockType::AIR);
                    }
                }
            }
        }

        let chunk = builder.finish();
        assert_eq!(chunk.position(), Point3::new(2, -3, 4));
        assert_eq!(chunk.block_count(), (CHUNK_SIZE as usize) / 2);
        assert!(chunk.is_block_solid(0, 0, 0));
        assert!(!chunk.is_block_solid(1, 0, 0));
        assert!(chunk.is_block_solid(1, 1, 0));
    }

    #[test]
    #[should_panic(expected = "overfilled")]
    fn rejects_overfull_content() {
        let mut builder = ChunkBuilder::new(Point3::new(0, 0, 0));
        for _ in 0..=CHUNK_SIZE {
            builder.push(BlockType::AIR);
        }
    }

    #[test]
    #[should_panic(expected = "finished early")]
    fn rejects_partial_content() {
        let mut builder = ChunkBuilder::new(Point3::new(0, 0, 0));
        builder.push(BlockType::DIRT);
        let _ = builder.finish();
    }
}
