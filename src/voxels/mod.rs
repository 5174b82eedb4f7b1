//! # Voxels Module
//!
//! The cell-content side of the crate: blocks, chunks (the streaming system's
//! cell type), the chunk builder, the render representation, and the content
//! factories that populate chunks from their spatial coordinates.

pub mod block;
pub mod chunk;
pub mod generation;
