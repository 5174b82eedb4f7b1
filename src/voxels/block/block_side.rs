//! # Block Side Module
//!
//! Defines the six faces of a voxel block and the face-adjacency offsets the
//! streaming system uses when a chunk's neighbors change residency.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block (and, equivalently, the
/// six face-adjacent neighbor directions of a chunk).
///
/// Each variant is assigned a stable integer value so it can index per-face
/// tables such as the texture-index map.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative X).
    FRONT = 0,

    /// The back face (facing positive X).
    BACK = 1,

    /// The bottom face (facing negative Y).
    BOTTOM = 2,

    /// The top face (facing positive Y).
    TOP = 3,

    /// The left face (facing negative Z).
    LEFT = 4,

    /// The right face (facing positive Z).
    RIGHT = 5,
}

impl BlockSide {
    /// All six faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The unit offset from a cell to its face-adjacent neighbor on this side.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(0, 0, 1),
        }
    }

    /// The face on the opposite side of the block.
    ///
    /// A neighbor chunk on side `s` touches this chunk with its
    /// `s.opposite()` boundary layer.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }
}
