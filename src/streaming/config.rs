//! # Streaming Configuration Module
//!
//! Tunables for the streaming system, deserializable from JSON so hosts can
//! ship them alongside other asset configuration. Every field has a default,
//! so a config file only needs to name what it overrides.

use serde::Deserialize;

use crate::voxels::generation::GenerationMethod;

/// Default render distance, in chunks per axis from the viewer's cell.
pub const DEFAULT_RENDER_DISTANCE: i32 = 8;

/// Upper bound on worker threads used for bulk initialization.
pub const DEFAULT_MAX_INIT_THREADS: usize = 5;

/// Desired depth slices of the volume handled per initializer thread.
pub const DEFAULT_DEPTH_SLICES_PER_THREAD: usize = 2;

/// Default world generation seed.
pub const DEFAULT_GENERATION_SEED: u32 = 12346;

/// Tunables for the streaming volume and its initialization.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamingConfig {
    /// Chunks kept resident in every axis direction from the viewer's cell.
    pub render_distance: i32,
    /// Most worker threads bulk initialization will launch.
    pub max_init_threads: usize,
    /// Depth slices of the volume each initializer thread should cover.
    pub depth_slices_per_thread: usize,
    /// Seed handed to the content generator.
    pub generation_seed: u32,
    /// Which content generator populates chunks.
    pub generation_method: GenerationMethod,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            render_distance: DEFAULT_RENDER_DISTANCE,
            max_init_threads: DEFAULT_MAX_INIT_THREADS,
            depth_slices_per_thread: DEFAULT_DEPTH_SLICES_PER_THREAD,
            generation_seed: DEFAULT_GENERATION_SEED,
            generation_method: GenerationMethod::Perlin,
        }
    }
}

impl StreamingConfig {
    /// Parses a config from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The side length of the streaming volume in chunks, `2R + 1`.
    pub fn volume_span(&self) -> usize {
        (2 * self.render_distance + 1) as usize
    }

    /// The total chunk count of the streaming volume, `(2R + 1)³`.
    pub fn chunk_volume(&self) -> usize {
        let span = self.volume_span();
        span * span * span
    }
}
