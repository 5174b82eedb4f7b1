#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streaming
//!
//! A chunk streaming core for voxel worlds: keeps a fixed-size volume of
//! 16x16x16 chunks resident around a moving viewer, loading and evicting
//! whole slices as the viewer crosses chunk boundaries.
//!
//! ## Key Modules
//!
//! * `core` - Concurrency primitives shared across the crate
//! * `voxels` - Blocks, chunks, render representations and content generators
//! * `streaming` - The pool, spatial index, delta scheduler and the manager
//!   that drives them from a background thread
//!
//! ## Architecture
//!
//! The system holds exactly `(2R+1)³` chunks for render distance `R`. Bulk
//! initialization fills that volume in parallel; afterwards a single
//! background thread watches the viewer position and shifts the volume one
//! cross-section slice at a time. Chunk handles are reference counted, so
//! collaborators can hold a chunk across an eviction without dangling.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_streaming::streaming::{StreamingConfig, StreamingManager};
//!
//! let config = StreamingConfig::from_json_str(
//!     r#"{ "render_distance": 1, "generation_method": "empty" }"#,
//! )
//! .unwrap();
//!
//! let mut manager = StreamingManager::new(config);
//! manager.initialize(Point3::new(0.0, 0.0, 0.0));
//!
//! // The viewer moves; the background thread keeps the volume centered.
//! manager.set_viewer_position(Point3::new(20.0, 0.0, 0.0));
//!
//! manager.shutdown();
//! ```

use log::info;

pub mod core;
pub mod streaming;
pub mod voxels;

pub use streaming::{StreamingConfig, StreamingManager};

/// Initializes stdout logging, honoring the `RUST_LOG` environment variable.
///
/// Call once at application startup, before the first manager is created.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
}
