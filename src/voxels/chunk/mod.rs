//! # Chunk Module
//!
//! The `Chunk` struct: a 16x16x16 cell of voxel content plus its lazily built
//! render representation. Chunks are the unit of residency for the streaming
//! system: one chunk per coordinate of the `(2R+1)³` volume around the
//! viewer.
//!
//! ## Memory Optimization
//!
//! Chunk content uses a two-part storage strategy:
//! - `solid_array`: a bit vector (1 bit per block) indicating which blocks are
//!   solid, padded by one block on every side so in-chunk neighbor lookups
//!   never branch on bounds
//! - `blocks`: a vector containing only the non-air blocks, in the order they
//!   appear in the chunk (x fastest, then y, then z)
//!
//! Air blocks therefore cost a single bit, and the index of a block in
//! `blocks` equals the number of set bits before its position in
//! `solid_array`. `offsets_at_plane` caches that running count at the start
//! of each z-plane to keep point lookups cheap.

use cgmath::Point3;

use super::block::block_side::BlockSide;
use super::block::Block;
use mesh::{BoundaryPlane, ChunkMesh, NeighborPlanes};

pub mod builder;
pub mod mesh;

/// The dimension (width, height, depth) of a chunk in blocks. One chunk-space
/// unit corresponds to this many world-space units.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single z-plane of a chunk.
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk.
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;
/// Chunk dimension including the one-block padding layer on each side.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// Blocks in a padded 2D plane.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// Blocks in a fully padded chunk.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// `usize` twin of [`CHUNK_PLANE_SIZE`], used to size boundary planes.
pub const CHUNK_PLANE_AREA: usize = (CHUNK_PLANE_SIZE) as usize;

/// A 16x16x16 cell of voxel content resident in the streaming volume.
///
/// The spatial coordinate is fixed at construction; content is built once by
/// the content factory; the render representation is rebuilt whenever a
/// face-adjacent neighbor's residency changes so boundary faces stay correct.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates. Never mutated.
    position: Point3<i32>,

    /// Padded solidity bits, one per (wrapped) block position. Padding bits
    /// are always zero, so an in-chunk lookup one block past the boundary
    /// reads as air.
    solid_array: bitvec::vec::BitVec,

    /// Running non-air block count at the start of each z-plane.
    offsets_at_plane: Vec<u32>,

    /// The non-air blocks of this chunk, in storage order.
    blocks: Vec<Block>,

    /// The render representation, absent until first materialized.
    mesh: Option<ChunkMesh>,
}

impl Chunk {
    /// The chunk-space coordinate this chunk was constructed at.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// The number of non-air blocks in this chunk.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The current render representation, if one has been materialized.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Rebuilds the render representation from the chunk's content and the
    /// solidity of the boundary layers of its face-adjacent neighbors.
    ///
    /// Idempotent: materializing twice with identical content and neighbor
    /// planes produces an identical representation. Must be re-invoked
    /// whenever a neighbor is loaded or evicted.
    pub fn materialize_mesh(&mut self, neighbors: &NeighborPlanes) {
        self.mesh = Some(mesh::build_mesh(self, neighbors));
    }

    /// Checks whether the block at chunk-local coordinates is solid.
    ///
    /// Local coordinates run `0..CHUNK_DIMENSION` per axis.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    pub fn is_block_solid(&self, cx: usize, cy: usize, cz: usize) -> bool {
        let dim = CHUNK_DIMENSION as usize;
        assert!(cx < dim && cy < dim && cz < dim);
        self.solid_wrapped(cx + 1, cy + 1, cz + 1)
    }

    /// Returns the block at chunk-local coordinates, or `None` for air.
    pub fn block_at(&self, cx: usize, cy: usize, cz: usize) -> Option<Block> {
        if !self.is_block_solid(cx, cy, cz) {
            return None;
        }

        let dim = CHUNK_DIMENSION as usize;
        let mut offset = self.offsets_at_plane[cz] as usize;
        for y in 0..cy {
            for x in 0..dim {
                if self.is_block_solid(x, y, cz) {
                    offset += 1;
                }
            }
        }
        for x in 0..cx {
            if self.is_block_solid(x, cy, cz) {
                offset += 1;
            }
        }
        Some(self.blocks[offset])
    }

    /// Extracts the solidity of the outermost block layer on `side`.
    ///
    /// A neighbor chunk on side `s` of this one touches it with its
    /// `s.opposite()` boundary plane; the mesh builder consults that plane to
    /// suppress faces against solid blocks across the chunk boundary.
    pub fn boundary_plane(&self, side: BlockSide) -> BoundaryPlane {
        let dim = CHUNK_DIMENSION as usize;
        let edge = dim - 1;
        let mut plane = [false; CHUNK_PLANE_AREA];
        for b in 0..dim {
            for a in 0..dim {
                let solid = match side {
                    BlockSide::FRONT => self.is_block_solid(0, a, b),
                    BlockSide::BACK => self.is_block_solid(edge, a, b),
                    BlockSide::BOTTOM => self.is_block_solid(a, 0, b),
                    BlockSide::TOP => self.is_block_solid(a, edge, b),
                    BlockSide::LEFT => self.is_block_solid(a, b, 0),
                    BlockSide::RIGHT => self.is_block_solid(a, b, edge),
                };
                plane[a + dim * b] = solid;
            }
        }
        plane
    }

    /// Raw padded-solidity lookup. Wrapped coordinates run
    /// `0..CHUNK_DIMENSION_WRAPPED`; the outermost layer is always air.
    pub(crate) fn solid_wrapped(&self, wx: usize, wy: usize, wz: usize) -> bool {
        self.solid_array[wx + CHUNK_DIMENSION_WRAPPED * wy + CHUNK_PLANE_SIZE_WRAPPED * wz]
    }

    pub(crate) fn from_parts(
        position: Point3<i32>,
        solid_array: bitvec::vec::BitVec,
        offsets_at_plane: Vec<u32>,
        blocks: Vec<Block>,
    ) -> Self {
        Chunk {
            position,
            solid_array,
            offsets_at_plane,
            blocks,
            mesh: None,
        }
    }

    /// The block in storage order at `index`, for callers that walk the
    /// dense block vector alongside the solidity bits.
    pub(crate) fn block_in_storage_order(&self, index: usize) -> Block {
        self.blocks[index]
    }
}

#[cfg(test)]
mod tests {
    use super::builder::ChunkBuilder;
    use super::*;
    use crate::voxels::block::block_type::BlockType;

    fn single_block_chunk() -> Chunk {
        let mut builder = ChunkBuilder::new(Point3::new(0, 0, 0));
        for i in 0..CHUNK_SIZE {
            if i == 0 {
                builder.push(BlockType::STONE);
            } else {
                builder.push(BlockType::AIR);
            }
        }
        builder.finish()
    }

    #[test]
    fn solidity_matches_pushed_content() {
        let chunk = single_block_chunk();
        assert!(chunk.is_block_solid(0, 0, 0));
        assert!(!chunk.is_block_solid(1, 0, 0));
        assert!(!chunk.is_block_solid(15, 15, 15));
        assert_eq!(chunk.block_count(), 1);
    }

    #[test]
    fn block_lookup_returns_typed_payload() {
        let chunk = single_block_chunk();
        let block = chunk.block_at(0, 0, 0).unwrap();
        assert_eq!(block.block_type, BlockType::STONE as u8);
        assert!(chunk.block_at(5, 5, 5).is_none());
    }

    #[test]
    fn boundary_planes_reflect_edge_layers() {
        let chunk = single_block_chunk();
        // The single block sits at (0, 0, 0): it shows up on the FRONT (x=0),
        // BOTTOM (y=0) and LEFT (z=0) planes and nowhere else.
        assert!(chunk.boundary_plane(BlockSide::FRONT)[0]);
        assert!(chunk.boundary_plane(BlockSide::BOTTOM)[0]);
        assert!(chunk.boundary_plane(BlockSide::LEFT)[0]);
        assert!(!chunk.boundary_plane(BlockSide::BACK).iter().any(|s| *s));
        assert!(!chunk.boundary_plane(BlockSide::TOP).iter().any(|s| *s));
        assert!(!chunk.boundary_plane(BlockSide::RIGHT).iter().any(|s| *s));
    }
}
