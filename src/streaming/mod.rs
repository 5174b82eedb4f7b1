//! # Streaming Module
//!
//! Keeps a fixed `(2R+1)³` volume of chunks resident around a moving viewer:
//! a fixed-capacity pool stores the active set, a spatial index finds chunks
//! by coordinate, a delta scheduler turns viewer cell crossings into slice
//! evictions and loads, and the manager drives it all from a background
//! thread.

pub mod config;
pub mod delta;
pub mod index;
pub mod manager;
pub mod pool;
pub mod store;

pub use config::StreamingConfig;
pub use delta::{collect_shift_targets, ShiftDirection};
pub use index::{spatial_hash, SpatialIndex};
pub use manager::{world_to_chunk, StreamingManager};
pub use pool::ChunkPool;
pub use store::ChunkStore;
