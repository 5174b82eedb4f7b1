//! # Chunk Generation Module
//!
//! The content-factory seam: a [`ChunkGenerator`] produces a chunk's interior
//! content from its spatial coordinate. The streaming driver never knows how
//! content is made: it hands the factory a coordinate during bulk
//! initialization and on every load, and receives a fully built chunk.
//!
//! Generators are total functions: every well-formed coordinate yields a
//! chunk, there is no failure path.
//!
//! Available strategies:
//! - Perlin noise for natural-looking terrain (the default)
//! - checkerboard, solid and empty chunks for testing and diagnostics
//! - random fill, kept for stress tests (not selectable from configuration,
//!   since streamed reloads of the same coordinate must be deterministic)

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::Deserialize;
use std::sync::Arc;

use super::block::block_type::BlockType;
use super::chunk::builder::ChunkBuilder;
use super::chunk::{Chunk, CHUNK_DIMENSION};

/// Threshold above which Perlin noise is considered solid.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// A content factory that builds a chunk's interior from its coordinate.
///
/// Implementations must be deterministic per coordinate: the streaming loop
/// may evict a chunk and later regenerate it, and the regenerated content
/// must match what any retained handles saw before.
pub trait ChunkGenerator: Send + Sync {
    /// Builds the content for the chunk at `coordinate` (chunk space).
    fn generate(&self, coordinate: Point3<i32>) -> Chunk;
}

/// Walks every local block position in storage order, pushing the block type
/// `f` chooses for its world-space block position.
fn fill_chunk(
    coordinate: Point3<i32>,
    mut f: impl FnMut(Point3<i32>, Point3<i32>) -> BlockType,
) -> Chunk {
    let dim = CHUNK_DIMENSION as usize;
    let mut builder = ChunkBuilder::new(coordinate);
    for z in 0..dim {
        for y in 0..dim {
            for x in 0..dim {
                let local = Point3::new(x as i32, y as i32, z as i32);
                let world = Point3::new(
                    coordinate.x * CHUNK_DIMENSION + local.x,
                    coordinate.y * CHUNK_DIMENSION + local.y,
                    coordinate.z * CHUNK_DIMENSION + local.z,
                );
                builder.push(f(local, world));
            }
        }
    }
    builder.finish()
}

/// Generates natural-looking terrain by thresholding 3D Perlin noise.
///
/// Blocks whose noise sample falls outside the
/// `[PERLIN_NEGATIVE_THRESHOLD, PERLIN_POSITIVE_THRESHOLD]` band are solid;
/// the sample value also picks the block type, so content is fully
/// deterministic for a given seed.
pub struct PerlinGenerator {
    perlin: Perlin,
}

impl PerlinGenerator {
    /// Creates a Perlin content factory with the given world seed.
    pub fn new(seed: u32) -> Self {
        PerlinGenerator {
            perlin: Perlin::new(seed),
        }
    }
}

impl ChunkGenerator for PerlinGenerator {
    fn generate(&self, coordinate: Point3<i32>) -> Chunk {
        fill_chunk(coordinate, |_, world| {
            let sample = self.perlin.get([
                world.x as f64 * PERLIN_SCALE_FACTOR,
                world.y as f64 * PERLIN_SCALE_FACTOR,
                world.z as f64 * PERLIN_SCALE_FACTOR,
            ]);
            if sample > PERLIN_POSITIVE_THRESHOLD {
                if sample > 0.5 {
                    BlockType::STONE
                } else {
                    BlockType::GRASS
                }
            } else if sample < PERLIN_NEGATIVE_THRESHOLD {
                if sample < -0.5 {
                    BlockType::STONE
                } else {
                    BlockType::DIRT
                }
            } else {
                BlockType::AIR
            }
        })
    }
}

/// Generates completely solid chunks of a single block type.
pub struct SolidGenerator {
    block_type: BlockType,
}

impl SolidGenerator {
    /// Creates a factory producing chunks made entirely of `block_type`.
    pub fn new(block_type: BlockType) -> Self {
        SolidGenerator { block_type }
    }
}

impl ChunkGenerator for SolidGenerator {
    fn generate(&self, coordinate: Point3<i32>) -> Chunk {
        fill_chunk(coordinate, |_, _| self.block_type)
    }
}

/// Generates completely empty (all air) chunks.
pub struct EmptyGenerator;

impl ChunkGenerator for EmptyGenerator {
    fn generate(&self, coordinate: Point3<i32>) -> Chunk {
        fill_chunk(coordinate, |_, _| BlockType::AIR)
    }
}

/// Generates a 3D checkerboard of dirt and air.
pub struct CheckerboardGenerator;

impl ChunkGenerator for CheckerboardGenerator {
    fn generate(&self, coordinate: Point3<i32>) -> Chunk {
        fill_chunk(coordinate, |local, _| {
            if (local.x + local.y + local.z) % 2 == 0 {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        })
    }
}

/// Generates sparse random blocks. Test-only: reloading a coordinate yields
/// different content, which violates the factory determinism the streaming
/// loop relies on.
pub struct RandomGenerator {
    /// Fraction of positions left as air, in `[0, 1]`.
    pub sparseness: f64,
}

impl ChunkGenerator for RandomGenerator {
    fn generate(&self, coordinate: Point3<i32>) -> Chunk {
        fill_chunk(coordinate, |_, _| {
            if fastrand::f64() < self.sparseness {
                BlockType::AIR
            } else {
                BlockType::random_solid()
            }
        })
    }
}

/// The content-generation strategy selected by configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Perlin-noise terrain.
    Perlin,
    /// 3D checkerboard pattern.
    Checkerboard,
    /// Fully solid stone chunks.
    Solid,
    /// Fully empty chunks.
    Empty,
}

impl GenerationMethod {
    /// Builds the content factory for this method.
    pub fn build_generator(self, seed: u32) -> Arc<dyn ChunkGenerator> {
        match self {
            GenerationMethod::Perlin => Arc::new(PerlinGenerator::new(seed)),
            GenerationMethod::Checkerboard => Arc::new(CheckerboardGenerator),
            GenerationMethod::Solid => Arc::new(SolidGenerator::new(BlockType::STONE)),
            GenerationMethod::Empty => Arc::new(EmptyGenerator),
        }
    }
}
