//! # Streaming Manager Module
//!
//! The driver that owns the streaming system and its lifecycle:
//!
//! 1. **Bulk initialization** fills the whole `(2R+1)³` volume around the
//!    starting viewer cell. Content generation is partitioned by depth slice
//!    across a small pool of worker threads, then render representations are
//!    materialized in a second pass partitioned by pool slot range. The second
//!    pass cannot start earlier because boundary faces depend on neighbors
//!    that another worker may not have generated yet.
//! 2. **Steady-state streaming** runs on one background thread: whenever the
//!    viewer's world position maps to a new cell, the delta scheduler picks
//!    the slices to evict and load, the store applies them, and the chunks
//!    whose neighbor residency changed are re-materialized.
//!
//! Chunk generation always happens outside the store lock; only the insertion
//! and eviction of finished chunks run under the write guard, so readers on
//! other threads see short, bounded critical sections.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cgmath::Point3;
use log::{info, warn};

use crate::core::{MtResource, StopToken};
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::chunk::mesh::gather_neighbor_planes;
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION};
use crate::voxels::generation::ChunkGenerator;

use super::config::StreamingConfig;
use super::delta::{collect_shift_targets, ShiftDirection};
use super::index::spatial_hash;
use super::store::ChunkStore;

/// Maps a world-space position to the chunk cell containing it.
///
/// Uses floor division, so positions with negative components land in the
/// correct cell (world x of `-0.5` is in chunk x of `-1`, not `0`).
pub fn world_to_chunk(position: Point3<f32>) -> Point3<i32> {
    let dim = CHUNK_DIMENSION as f32;
    Point3::new(
        (position.x / dim).floor() as i32,
        (position.y / dim).floor() as i32,
        (position.z / dim).floor() as i32,
    )
}

/// Owns the chunk store, the content factory and the background streaming
/// thread.
///
/// Collaborators keep a clone of nothing: they query the manager, which hands
/// out reference-counted chunk handles that stay valid even after eviction.
pub struct StreamingManager {
    config: StreamingConfig,
    generator: Arc<dyn ChunkGenerator>,
    store: MtResource<ChunkStore>,
    viewer_position: MtResource<Point3<f32>>,
    stop_token: StopToken,
    streamer: Option<JoinHandle<()>>,
}

impl StreamingManager {
    /// Creates an idle manager. No chunks are resident and no thread runs
    /// until [`StreamingManager::initialize`] is called.
    pub fn new(config: StreamingConfig) -> Self {
        let generator = config
            .generation_method
            .build_generator(config.generation_seed);
        let capacity = config.chunk_volume();
        StreamingManager {
            config,
            generator,
            store: MtResource::new(ChunkStore::new(capacity)),
            viewer_position: MtResource::new(Point3::new(0.0, 0.0, 0.0)),
            stop_token: StopToken::new(),
            streamer: None,
        }
    }

    /// Fills the streaming volume around `viewer_position` and starts the
    /// background streaming thread.
    ///
    /// Blocks until every chunk of the initial volume is generated and
    /// materialized; returns with the system in steady state.
    ///
    /// # Panics
    /// Panics if called more than once; a manager is initialized exactly one
    /// time and rebuilt rather than restarted.
    pub fn initialize(&mut self, viewer_position: Point3<f32>) {
        assert!(
            self.streamer.is_none(),
            "streaming manager already initialized"
        );

        let center = world_to_chunk(viewer_position);
        *self.viewer_position.write() = viewer_position;

        self.bulk_initialize(center);

        let config = self.config.clone();
        let generator = Arc::clone(&self.generator);
        let store = self.store.clone();
        let viewer = self.viewer_position.clone();
        let stop_token = self.stop_token.clone();

        let handle = thread::Builder::new()
            .name("chunk-streamer".to_string())
            .spawn(move || {
                let mut prev = center;
                while !stop_token.should_stop() {
                    let curr = world_to_chunk(*viewer.read());
                    if curr == prev {
                        thread::yield_now();
                        continue;
                    }
                    run_streaming_cycle(&config, &generator, &store, prev, curr);
                    prev = curr;
                }
            })
            .expect("failed to spawn the chunk streaming thread");
        self.streamer = Some(handle);

        info!(
            "streaming volume initialized: {} chunks around {:?}",
            self.active_chunk_count(),
            center
        );
    }

    /// Generates and materializes the full volume centered on `center`.
    fn bulk_initialize(&self, center: Point3<i32>) {
        let radius = self.config.render_distance;
        let span = self.config.volume_span();
        let capacity = self.config.chunk_volume();

        let num_threads = (span / self.config.depth_slices_per_thread)
            .clamp(1, self.config.max_init_threads);
        assert!(num_threads > 0);
        info!("launching {} chunk initializer threads", num_threads);

        // Phase A: generate content, partitioned by depth slice. Each worker
        // generates outside the store lock and only takes the write guard to
        // publish a finished chunk.
        let slices_per_thread = span / num_threads;
        thread::scope(|scope| {
            for worker in 0..num_threads {
                let generator = Arc::clone(&self.generator);
                let store = self.store.clone();
                let z_begin = worker * slices_per_thread;
                let z_end = if worker == num_threads - 1 {
                    span
                } else {
                    (worker + 1) * slices_per_thread
                };
                scope.spawn(move || {
                    for z in z_begin..z_end {
                        for y in 0..span {
                            for x in 0..span {
                                let coordinate = Point3::new(
                                    center.x - radius + x as i32,
                                    center.y - radius + y as i32,
                                    center.z - radius + z as i32,
                                );
                                let chunk = generator.generate(coordinate);
                                store.write().load(chunk);
                            }
                        }
                    }
                });
            }
        });
        assert_eq!(
            self.store.read().len(),
            capacity,
            "bulk initialization did not fill the streaming volume"
        );

        // Phase B: materialize render representations, partitioned by pool
        // slot range. Every neighbor exists by now, so boundary faces come
        // out correct on the first build.
        let chunks_per_thread = capacity / num_threads;
        thread::scope(|scope| {
            for worker in 0..num_threads {
                let store = self.store.clone();
                let begin = worker * chunks_per_thread;
                let end = if worker == num_threads - 1 {
                    capacity
                } else {
                    (worker + 1) * chunks_per_thread
                };
                scope.spawn(move || {
                    for slot in begin..end {
                        let chunk = store
                            .read()
                            .chunk_at_index(slot)
                            .expect("pool slot emptied during initialization");
                        let coordinate = chunk.read().position();
                        materialize_at(&store, coordinate);
                    }
                });
            }
        });
    }

    /// Stops and joins the background streaming thread.
    ///
    /// Idempotent; also invoked from `Drop` so an owner that forgets to call
    /// it still shuts down cleanly.
    ///
    /// # Panics
    /// Panics if the streaming thread itself panicked.
    pub fn shutdown(&mut self) {
        self.stop_token.request_stop();
        if let Some(handle) = self.streamer.take() {
            handle
                .join()
                .expect("chunk streaming thread panicked before shutdown");
        }
    }

    /// Publishes the viewer's current world-space position. The background
    /// thread reacts when the position maps to a new chunk cell.
    pub fn set_viewer_position(&self, position: Point3<f32>) {
        *self.viewer_position.write() = position;
    }

    /// Looks up the resident chunk at a chunk-space coordinate.
    pub fn chunk_at(&self, coordinate: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.store.read().chunk_at(coordinate)
    }

    /// Bounds-checked access to the chunk in pool slot `index`.
    pub fn chunk_at_index(&self, index: usize) -> Option<MtResource<Chunk>> {
        self.store.read().chunk_at_index(index)
    }

    /// The number of currently resident chunks.
    pub fn active_chunk_count(&self) -> usize {
        self.store.read().len()
    }

    /// Copy-on-read list of every resident chunk handle, for per-frame
    /// enumeration by the rendering collaborator.
    pub fn chunk_snapshot(&self) -> Vec<MtResource<Chunk>> {
        self.store.read().snapshot()
    }

    /// Tests whether the block containing the world-space `point` is solid.
    ///
    /// Points outside the resident volume report `false`.
    pub fn ray_hit_test(&self, point: Point3<f32>) -> bool {
        let cell = world_to_chunk(point);
        let Some(chunk) = self.chunk_at(cell) else {
            return false;
        };

        let dim = CHUNK_DIMENSION;
        let local_x = (point.x.floor() as i32 - cell.x * dim) as usize;
        let local_y = (point.y.floor() as i32 - cell.y * dim) as usize;
        let local_z = (point.z.floor() as i32 - cell.z * dim) as usize;
        let guard = chunk.read();
        guard.is_block_solid(local_x, local_y, local_z)
    }
}

impl Drop for StreamingManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Applies one streaming cycle for the viewer move from cell `prev` to cell
/// `curr`: evict the trailing slices, load the leading ones, then
/// re-materialize every chunk whose neighbor residency changed.
fn run_streaming_cycle(
    config: &StreamingConfig,
    generator: &Arc<dyn ChunkGenerator>,
    store: &MtResource<ChunkStore>,
    prev: Point3<i32>,
    curr: Point3<i32>,
) {
    let radius = config.render_distance;

    let evictions = collect_shift_targets(prev, curr, radius, ShiftDirection::Evict);
    for coordinate in &evictions {
        store.write().evict(*coordinate);
    }

    let loads = collect_shift_targets(prev, curr, radius, ShiftDirection::Load);
    let mut loaded = Vec::with_capacity(loads.len());
    for coordinate in loads {
        if store.read().chunk_at(coordinate).is_some() {
            warn!("skipped loading already-resident chunk at {:?}", coordinate);
            continue;
        }
        // Generation stays outside the lock; only publication takes it.
        let chunk = generator.generate(coordinate);
        store.write().load(chunk);
        loaded.push(coordinate);
    }

    // Chunks adjacent to a load or an eviction have stale boundary faces.
    let mut remesh_targets = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut queue_remesh = |coordinate: Point3<i32>| {
        if seen.insert(spatial_hash(coordinate)) {
            remesh_targets.push(coordinate);
        }
    };
    for &coordinate in &loaded {
        queue_remesh(coordinate);
        for side in BlockSide::all() {
            queue_remesh(coordinate + side.offset());
        }
    }
    for &coordinate in &evictions {
        for side in BlockSide::all() {
            queue_remesh(coordinate + side.offset());
        }
    }
    for coordinate in remesh_targets {
        materialize_at(store, coordinate);
    }

    let resident = store.read().len();
    let capacity = store.read().capacity();
    if resident != capacity {
        warn!(
            "streaming volume not full after cycle: {} of {} chunks resident",
            resident, capacity
        );
    }
}

/// Re-materializes the chunk at `coordinate` against its current neighbors.
///
/// No-op when the coordinate is not resident. Boundary planes are gathered
/// under a store read guard plus per-neighbor read guards; the chunk's own
/// write guard is taken only after the store guard is released, so this never
/// holds the store lock across the mesh build.
fn materialize_at(store: &MtResource<ChunkStore>, coordinate: Point3<i32>) {
    let (chunk, planes) = {
        let guard = store.read();
        let Some(chunk) = guard.chunk_at(coordinate) else {
            return;
        };
        let planes = gather_neighbor_planes(|side| {
            guard
                .chunk_at(coordinate + side.offset())
                .map(|neighbor| neighbor.read().boundary_plane(side.opposite()))
        });
        (chunk, planes)
    };
    chunk.write().materialize_mesh(&planes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::generation::GenerationMethod;
    use std::time::{Duration, Instant};

    fn test_config(radius: i32, method: GenerationMethod) -> StreamingConfig {
        StreamingConfig {
            render_distance: radius,
            generation_method: method,
            ..StreamingConfig::default()
        }
    }

    fn initialized_manager(radius: i32, method: GenerationMethod) -> StreamingManager {
        let manager = StreamingManager::new(test_config(radius, method));
        manager.bulk_initialize(Point3::new(0, 0, 0));
        manager
    }

    #[test]
    fn world_to_chunk_floors_negative_positions() {
        assert_eq!(world_to_chunk(Point3::new(0.0, 0.0, 0.0)), Point3::new(0, 0, 0));
        assert_eq!(world_to_chunk(Point3::new(15.9, 8.0, 0.0)), Point3::new(0, 0, 0));
        assert_eq!(world_to_chunk(Point3::new(16.0, 0.0, 0.0)), Point3::new(1, 0, 0));
        assert_eq!(
            world_to_chunk(Point3::new(-0.5, -16.0, -16.1)),
            Point3::new(-1, -1, -2)
        );
    }

    #[test]
    fn bulk_initialization_fills_and_materializes_the_volume() {
        let manager = initialized_manager(1, GenerationMethod::Solid);
        assert_eq!(manager.active_chunk_count(), 27);

        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    let chunk = manager
                        .chunk_at(Point3::new(x, y, z))
                        .expect("volume chunk should be resident");
                    assert!(chunk.read().mesh().is_some());
                }
            }
        }

        // Fully surrounded by solid neighbors, the center chunk has no
        // visible faces at all.
        let center = manager.chunk_at(Point3::new(0, 0, 0)).unwrap();
        assert!(center.read().mesh().unwrap().faces.is_empty());

        // A corner chunk has three exposed sides of 16x16 faces each.
        let corner = manager.chunk_at(Point3::new(1, 1, 1)).unwrap();
        assert_eq!(corner.read().mesh().unwrap().faces.len(), 3 * 256);
    }

    #[test]
    fn a_cycle_shifts_the_volume_one_plane_along_x() {
        let manager = initialized_manager(1, GenerationMethod::Solid);

        run_streaming_cycle(
            &manager.config,
            &manager.generator,
            &manager.store,
            Point3::new(0, 0, 0),
            Point3::new(1, 0, 0),
        );

        assert_eq!(manager.active_chunk_count(), 27);
        for y in -1..=1 {
            for z in -1..=1 {
                assert!(manager.chunk_at(Point3::new(-1, y, z)).is_none());
                assert!(manager.chunk_at(Point3::new(2, y, z)).is_some());
            }
        }

        // Residency maps stay consistent after the swap-removes.
        for slot in 0..manager.active_chunk_count() {
            let chunk = manager.chunk_at_index(slot).unwrap();
            let coordinate = chunk.read().position();
            assert_eq!(manager.store.read().slot_of(coordinate), Some(slot));
        }
    }

    #[test]
    fn a_cycle_refreshes_boundary_faces_of_affected_neighbors() {
        let manager = initialized_manager(1, GenerationMethod::Solid);

        // Before the move, (1, 0, 0) sits on the +x boundary and shows faces
        // there; (0, 0, 0) is the fully surrounded center.
        let edge = manager.chunk_at(Point3::new(1, 0, 0)).unwrap();
        assert!(edge
            .read()
            .mesh()
            .unwrap()
            .faces
            .iter()
            .any(|face| face.side == BlockSide::BACK));

        run_streaming_cycle(
            &manager.config,
            &manager.generator,
            &manager.store,
            Point3::new(0, 0, 0),
            Point3::new(1, 0, 0),
        );

        // (1, 0, 0) is now the surrounded center: no visible faces left.
        assert!(edge.read().mesh().unwrap().faces.is_empty());

        // (0, 0, 0) lost its -x neighbor and must now show faces there.
        let trailing = manager.chunk_at(Point3::new(0, 0, 0)).unwrap();
        assert!(trailing
            .read()
            .mesh()
            .unwrap()
            .faces
            .iter()
            .any(|face| face.side == BlockSide::FRONT));
    }

    #[test]
    fn lookups_outside_the_volume_return_none() {
        let manager = initialized_manager(1, GenerationMethod::Solid);
        assert!(manager.chunk_at(Point3::new(5, 5, 5)).is_none());
        assert!(manager.chunk_at_index(27).is_none());
        assert!(manager.chunk_at_index(0).is_some());
    }

    #[test]
    fn ray_hit_test_reports_solidity_inside_the_volume() {
        let solid = initialized_manager(1, GenerationMethod::Solid);
        assert!(solid.ray_hit_test(Point3::new(0.5, 0.5, 0.5)));
        assert!(solid.ray_hit_test(Point3::new(-10.2, 8.0, 15.9)));
        // Outside the resident volume.
        assert!(!solid.ray_hit_test(Point3::new(100.0, 0.0, 0.0)));

        let empty = initialized_manager(1, GenerationMethod::Empty);
        assert!(!empty.ray_hit_test(Point3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn ray_hit_test_is_exact_at_large_world_coordinates() {
        let manager = StreamingManager::new(test_config(1, GenerationMethod::Solid));
        manager.bulk_initialize(Point3::new(524288, 0, 0));

        // Division by 16 is an exact exponent shift, so even at large world
        // coordinates the cell and local-block computations cannot disagree.
        assert!(manager.ray_hit_test(Point3::new(8388616.0, 8.0, 8.0)));
        assert!(!manager.ray_hit_test(Point3::new(0.5, 8.0, 8.0)));
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn initializing_twice_is_fatal() {
        let mut manager = StreamingManager::new(test_config(1, GenerationMethod::Empty));
        manager.initialize(Point3::new(0.0, 0.0, 0.0));
        manager.initialize(Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn snapshot_enumerates_every_resident_chunk_once() {
        let manager = initialized_manager(1, GenerationMethod::Empty);
        let snapshot = manager.chunk_snapshot();
        assert_eq!(snapshot.len(), 27);

        let mut seen = std::collections::HashSet::new();
        for chunk in &snapshot {
            assert!(seen.insert(spatial_hash(chunk.read().position())));
        }
    }

    #[test]
    fn background_thread_streams_when_the_viewer_crosses_a_cell() {
        let mut manager = StreamingManager::new(test_config(1, GenerationMethod::Empty));
        manager.initialize(Point3::new(8.0, 8.0, 8.0));
        assert!(manager.chunk_at(Point3::new(2, 0, 0)).is_none());

        manager.set_viewer_position(Point3::new(24.0, 8.0, 8.0));

        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.chunk_at(Point3::new(2, 0, 0)).is_none()
            || manager.active_chunk_count() != 27
        {
            assert!(
                Instant::now() < deadline,
                "streaming thread never finished shifting the volume"
            );
            thread::sleep(Duration::from_millis(5));
        }

        assert!(manager.chunk_at(Point3::new(-1, 0, 0)).is_none());

        manager.shutdown();
    }

    #[test]
    fn shutdown_is_idempotent_and_drop_is_clean() {
        let mut manager = StreamingManager::new(test_config(1, GenerationMethod::Empty));
        manager.initialize(Point3::new(0.0, 0.0, 0.0));
        manager.shutdown();
        manager.shutdown();
        // Drop runs shutdown again on an already-joined thread.
    }
}
