//! # Block Module
//!
//! The block-level data model: block type definitions, the six block faces,
//! and the compact per-block payload stored inside a chunk.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Maps each block type to its texture index for each face.
///
/// The outer array is indexed by `BlockType as usize`, the inner array by
/// `BlockSide as usize`. The rendering collaborator consumes these indices
/// straight out of the chunk's render representation.
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u32; 6]; 5] = [
    [0, 0, 0, 0, 0, 0], // AIR (never rendered)
    [1, 1, 1, 1, 1, 1], // DIRT
    [2, 2, 1, 3, 2, 2], // GRASS (bottom: dirt, top: grass, sides: grass-on-dirt)
    [4, 4, 4, 4, 4, 4], // STONE
    [5, 5, 5, 5, 5, 5], // WOOD
];

/// A single voxel block inside a chunk's content array.
///
/// Lightweight by design: only the block type is stored, and block properties
/// are looked up from it. `#[repr(C)]` plus the `Pod` derive keep the layout
/// stable so the rendering collaborator can upload block data unchanged.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Block {
    /// The type of this block, encoded compactly.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// The texture index used when rendering the given face of this block.
    pub fn texture_index(&self, side: block_side::BlockSide) -> u32 {
        BLOCK_TYPE_TO_TEXTURE_INDICES[self.block_type as usize][side as usize]
    }
}
