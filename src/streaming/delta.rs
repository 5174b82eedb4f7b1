//! # Delta Scheduler Module
//!
//! Determines which chunk coordinates enter and leave the streaming volume
//! when the viewer crosses cell boundaries. The volume delta is decomposed
//! per axis: for each axis whose cell coordinate changed, the trailing
//! slice(s) that fell outside the radius on the far side are evicted and the
//! leading slice(s) that came into range on the near side are loaded, each
//! slice being a full `(2R+1)²` cross-section over the other two axes.
//!
//! Axes are processed in x, y, z order and a per-cycle set keyed by spatial
//! hash deduplicates coordinates targeted by more than one axis. Results are
//! applied as unordered sets, so ordering only affects diagnostics.
//!
//! Known approximation, inherited deliberately: when the viewer crosses cell
//! boundaries on more than one axis in a single update, cross-axis corner
//! cells can be missed or double-targeted depending on update rate relative
//! to movement speed. The dedup set absorbs the double-targeting half of
//! that; the residency check at application time absorbs the rest. Likewise,
//! a move of more than `R` cells along one axis in a single update is clamped
//! to `R` and the excess ignored.

use std::collections::HashSet;

use cgmath::Point3;
use log::warn;

use super::index::spatial_hash;

/// Whether a scheduling pass produces coordinates to evict or to load.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Coordinates leaving the volume on the far side of the movement.
    Evict,
    /// Coordinates entering the volume on the near side of the movement.
    Load,
}

/// Computes the deduplicated coordinate set to evict or load for the move
/// from cell `prev` to cell `curr` with render distance `radius`.
///
/// In steady motion (at most one cell crossed per update) the result size is
/// a multiple of `(2R+1)²`; any other size indicates a scheduling
/// inconsistency and is logged as a warning, not treated as fatal.
pub fn collect_shift_targets(
    prev: Point3<i32>,
    curr: Point3<i32>,
    radius: i32,
    direction: ShiftDirection,
) -> Vec<Point3<i32>> {
    let prev_axes = [prev.x, prev.y, prev.z];
    let curr_axes = [curr.x, curr.y, curr.z];

    let mut targets = Vec::new();
    let mut scheduled: HashSet<u64> = HashSet::new();

    for axis in 0..3 {
        if prev_axes[axis] == curr_axes[axis] {
            continue;
        }

        let delta = prev_axes[axis] - curr_axes[axis];
        let sign = if delta > 0 { 1 } else { -1 };
        // A move of more than `radius` cells in one update cannot be fully
        // tracked; the excess slices are ignored.
        let steps = delta.abs().min(radius);

        // Loading mirrors eviction onto the near side of the movement.
        let sign = match direction {
            ShiftDirection::Evict => sign,
            ShiftDirection::Load => -sign,
        };

        // Slice offsets run from R - (steps - 1) up to R: exactly the slices
        // of the old volume that fell out of range (eviction) or of the new
        // volume that came into range (loading), nearest the reference point
        // first.
        for step in 0..steps {
            let slice_offset = radius - steps + 1 + step;
            let axis_value = match direction {
                ShiftDirection::Evict => prev_axes[axis] + sign * slice_offset,
                ShiftDirection::Load => curr_axes[axis] + sign * slice_offset,
            };

            for u in -radius..=radius {
                for v in -radius..=radius {
                    let mut axes = curr_axes;
                    axes[axis] = axis_value;
                    let (other_a, other_b) = match axis {
                        0 => (1, 2),
                        1 => (0, 2),
                        _ => (0, 1),
                    };
                    axes[other_a] = curr_axes[other_a] + u;
                    axes[other_b] = curr_axes[other_b] + v;

                    let coordinate = Point3::new(axes[0], axes[1], axes[2]);
                    if scheduled.insert(spatial_hash(coordinate)) {
                        targets.push(coordinate);
                    } else if direction == ShiftDirection::Load {
                        warn!("attempted to schedule duplicate chunk load at {:?}", coordinate);
                    }
                }
            }
        }
    }

    let cross_section = ((2 * radius + 1) * (2 * radius + 1)) as usize;
    if targets.len() % cross_section != 0 {
        warn!(
            "did not schedule a uniform number of chunks ({} {:?} targets, cross-section {})",
            targets.len(),
            direction,
            cross_section
        );
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn coordinate_set(targets: &[Point3<i32>]) -> HashSet<(i32, i32, i32)> {
        targets.iter().map(|p| (p.x, p.y, p.z)).collect()
    }

    #[test]
    fn no_movement_schedules_nothing() {
        let at = Point3::new(4, -2, 9);
        assert!(collect_shift_targets(at, at, 3, ShiftDirection::Evict).is_empty());
        assert!(collect_shift_targets(at, at, 3, ShiftDirection::Load).is_empty());
    }

    #[test]
    fn unit_x_shift_evicts_the_trailing_plane() {
        let prev = Point3::new(0, 0, 0);
        let curr = Point3::new(1, 0, 0);

        let evictions = collect_shift_targets(prev, curr, 1, ShiftDirection::Evict);
        assert_eq!(evictions.len(), 9);
        assert!(evictions.iter().all(|p| p.x == -1));
        assert!(evictions
            .iter()
            .all(|p| (-1..=1).contains(&p.y) && (-1..=1).contains(&p.z)));
    }

    #[test]
    fn unit_x_shift_loads_the_leading_plane() {
        let prev = Point3::new(0, 0, 0);
        let curr = Point3::new(1, 0, 0);

        let loads = collect_shift_targets(prev, curr, 1, ShiftDirection::Load);
        assert_eq!(loads.len(), 9);
        assert!(loads.iter().all(|p| p.x == 2));
    }

    #[test]
    fn unit_shift_sets_do_not_overlap() {
        let prev = Point3::new(5, 5, 5);
        let curr = Point3::new(5, 4, 5);

        let evictions = coordinate_set(&collect_shift_targets(prev, curr, 2, ShiftDirection::Evict));
        let loads = coordinate_set(&collect_shift_targets(prev, curr, 2, ShiftDirection::Load));

        assert_eq!(evictions.len(), 25);
        assert_eq!(loads.len(), 25);
        assert!(evictions.is_disjoint(&loads));
        assert!(evictions.iter().all(|&(_, y, _)| y == 5 + 2));
        assert!(loads.iter().all(|&(_, y, _)| y == 4 - 2));
    }

    #[test]
    fn negative_direction_shift_mirrors_the_planes() {
        let prev = Point3::new(0, 0, 0);
        let curr = Point3::new(-1, 0, 0);

        let evictions = collect_shift_targets(prev, curr, 1, ShiftDirection::Evict);
        let loads = collect_shift_targets(prev, curr, 1, ShiftDirection::Load);

        assert!(evictions.iter().all(|p| p.x == 1));
        assert!(loads.iter().all(|p| p.x == -2));
    }

    #[test]
    fn multi_cell_moves_produce_one_slice_per_step() {
        let prev = Point3::new(0, 0, 0);
        let curr = Point3::new(2, 0, 0);

        // Old volume spans x in [-3, 3], new volume x in [-1, 5].
        let evictions = collect_shift_targets(prev, curr, 3, ShiftDirection::Evict);
        assert_eq!(evictions.len(), 2 * 49);
        let xs: HashSet<i32> = evictions.iter().map(|p| p.x).collect();
        assert_eq!(xs, HashSet::from([-3, -2]));

        let loads = collect_shift_targets(prev, curr, 3, ShiftDirection::Load);
        assert_eq!(loads.len(), 2 * 49);
        let xs: HashSet<i32> = loads.iter().map(|p| p.x).collect();
        assert_eq!(xs, HashSet::from([4, 5]));
    }

    #[test]
    fn moves_beyond_the_radius_are_clamped() {
        let prev = Point3::new(0, 0, 0);
        let curr = Point3::new(10, 0, 0);

        let loads = collect_shift_targets(prev, curr, 2, ShiftDirection::Load);
        // Only `radius` slices can be tracked per update; the ones kept sit
        // at the leading edge of the new volume.
        assert_eq!(loads.len(), 2 * 25);
        let xs: HashSet<i32> = loads.iter().map(|p| p.x).collect();
        assert_eq!(xs, HashSet::from([11, 12]));
    }

    #[test]
    fn diagonal_movement_is_deduplicated_across_axes() {
        let prev = Point3::new(0, 0, 0);
        let curr = Point3::new(1, 1, 0);

        let loads = collect_shift_targets(prev, curr, 1, ShiftDirection::Load);
        let unique = coordinate_set(&loads);
        assert_eq!(loads.len(), unique.len(), "duplicate coordinates scheduled");
    }
}
