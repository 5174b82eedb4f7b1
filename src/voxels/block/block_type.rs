//! # Block Type Module
//!
//! Defines the different kinds of blocks a chunk's interior can contain and
//! the conversions between the rich enum and its compact storage form.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all block types a generated chunk can contain.
///
/// The `FromPrimitive` derive allows recovering the enum from the compact
/// `BlockTypeSize` form a [`super::Block`] stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block: non-solid, never stored, never rendered.
    AIR,

    /// A basic dirt block.
    DIRT,

    /// A grass block with distinct top, side and bottom textures.
    GRASS,

    /// A plain stone block, the bulk of generated terrain.
    STONE,

    /// A wooden block with a bark texture on all sides.
    WOOD,
}

impl BlockType {
    /// Recovers a `BlockType` from its compact storage form.
    ///
    /// # Panics
    /// Panics if `btype` does not correspond to a valid `BlockType`.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        let btype_option: Option<Self> = num::FromPrimitive::from_u8(btype);
        btype_option.unwrap()
    }

    /// Picks a random non-air block type.
    ///
    /// Used by the random content factory to vary solid terrain.
    pub fn random_solid() -> Self {
        num::FromPrimitive::from_u8(fastrand::u8(1..5)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_compact_form() {
        for btype in [
            BlockType::AIR,
            BlockType::DIRT,
            BlockType::GRASS,
            BlockType::STONE,
            BlockType::WOOD,
        ] {
            assert_eq!(BlockType::from_int(btype as BlockTypeSize), btype);
        }
    }

    #[test]
    fn random_solid_never_yields_air() {
        for _ in 0..64 {
            assert_ne!(BlockType::random_solid(), BlockType::AIR);
        }
    }
}
