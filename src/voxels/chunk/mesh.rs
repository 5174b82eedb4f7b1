//! # Chunk Mesh Module
//!
//! The render representation of a chunk: the list of block faces visible from
//! outside the solid volume. Geometry and vertex-buffer construction belong
//! to the rendering collaborator; this module only decides *which* faces
//! exist, which is the part that depends on streaming state (a face on a
//! chunk boundary is suppressed when the neighbor chunk's adjacent block is
//! solid, so the representation must be rebuilt when neighbors come and go).

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;

use super::{Chunk, CHUNK_DIMENSION, CHUNK_PLANE_AREA};

/// Solidity of one chunk-boundary layer, indexed `a + CHUNK_DIMENSION * b`
/// where `(a, b)` are the two axes perpendicular to the face.
pub type BoundaryPlane = [bool; CHUNK_PLANE_AREA];

/// Boundary planes of the six face-adjacent neighbors, indexed by
/// `BlockSide as usize`. `None` means the neighbor is not resident, in which
/// case boundary faces on that side are emitted.
pub type NeighborPlanes = [Option<BoundaryPlane>; 6];

/// A single visible block face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockFace {
    /// Chunk-local position of the owning block.
    pub local: Point3<u8>,
    /// Which face of the block is visible.
    pub side: BlockSide,
    /// Texture index the rendering collaborator should apply.
    pub texture_index: u32,
}

/// The render representation of a chunk: its visible faces in deterministic
/// storage order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ChunkMesh {
    /// Visible faces, ordered by block storage order then face index.
    pub faces: Vec<BlockFace>,
}

/// Gathers the boundary planes of the resident face-adjacent neighbors.
///
/// `lookup` resolves a neighbor's plane facing this chunk, or `None` when the
/// neighbor is not resident.
pub fn gather_neighbor_planes<F>(mut lookup: F) -> NeighborPlanes
where
    F: FnMut(BlockSide) -> Option<BoundaryPlane>,
{
    let mut planes: NeighborPlanes = [None; 6];
    for side in BlockSide::all() {
        planes[side as usize] = lookup(side);
    }
    planes
}

/// Builds the visible-face list for `chunk` given its neighbors' boundary
/// solidity.
///
/// Pure and deterministic: identical content and identical neighbor planes
/// always produce an identical mesh, which is what makes materialization
/// idempotent.
pub fn build_mesh(chunk: &Chunk, neighbors: &NeighborPlanes) -> ChunkMesh {
    let dim = CHUNK_DIMENSION as usize;
    let mut faces = Vec::new();
    let mut block_index = 0usize;

    for z in 0..dim {
        for y in 0..dim {
            for x in 0..dim {
                if !chunk.is_block_solid(x, y, z) {
                    continue;
                }
                let block = chunk.block_in_storage_order(block_index);
                block_index += 1;

                for side in BlockSide::all() {
                    if face_visible(chunk, neighbors, x, y, z, side) {
                        faces.push(BlockFace {
                            local: Point3::new(x as u8, y as u8, z as u8),
                            side,
                            texture_index: block.texture_index(side),
                        });
                    }
                }
            }
        }
    }

    ChunkMesh { faces }
}

/// A face is visible when the block it faces is air: inside the chunk via
/// the padded solidity array, across a chunk boundary via the neighbor's
/// boundary plane (missing neighbor counts as air).
fn face_visible(
    chunk: &Chunk,
    neighbors: &NeighborPlanes,
    x: usize,
    y: usize,
    z: usize,
    side: BlockSide,
) -> bool {
    let dim = CHUNK_DIMENSION as usize;
    let edge = dim - 1;

    let crosses_boundary = match side {
        BlockSide::FRONT => x == 0,
        BlockSide::BACK => x == edge,
        BlockSide::BOTTOM => y == 0,
        BlockSide::TOP => y == edge,
        BlockSide::LEFT => z == 0,
        BlockSide::RIGHT => z == edge,
    };

    if crosses_boundary {
        return match &neighbors[side as usize] {
            Some(plane) => !plane[plane_index(side, x, y, z)],
            None => true,
        };
    }

    let offset = side.offset();
    let wx = (x as i32 + 1 + offset.x) as usize;
    let wy = (y as i32 + 1 + offset.y) as usize;
    let wz = (z as i32 + 1 + offset.z) as usize;
    !chunk.solid_wrapped(wx, wy, wz)
}

/// Index into a boundary plane for the block at chunk-local `(x, y, z)`
/// facing `side`. The two in-plane axes keep their chunk-local values on both
/// sides of the boundary.
fn plane_index(side: BlockSide, x: usize, y: usize, z: usize) -> usize {
    let dim = CHUNK_DIMENSION as usize;
    match side {
        BlockSide::FRONT | BlockSide::BACK => y + dim * z,
        BlockSide::BOTTOM | BlockSide::TOP => x + dim * z,
        BlockSide::LEFT | BlockSide::RIGHT => x + dim * y,
    }
}
