//! Path-following system.
//!
//! Enemies spend `speed * dt` of movement budget walking segment by
//! segment. Position is re-derived from (waypoint index, progress) each
//! tick rather than integrated, so error never accumulates.

use hecs::World;

use chroma_core::components::{Enemy, Health, PathFollower};
use chroma_core::types::Position;

use crate::map::Path;

/// Leftover budget this close to a waypoint counts as reaching it.
const ARRIVAL_EPSILON: f32 = 1e-3;

/// Advance every living enemy that has not reached the end.
pub fn run(world: &mut World, path: &Path, dt: f32) {
    for (_entity, (enemy, health, follower, pos)) in
        world.query_mut::<(&Enemy, &Health, &mut PathFollower, &mut Position)>()
    {
        if health.is_dead() || follower.reached_end {
            continue;
        }
        advance(follower, path, enemy.speed * dt);
        pos.0 = path.position_at(follower.waypoint_index, follower.progress);
    }
}

/// Move a follower `distance` units along `path`.
///
/// Zero-length segments are skipped without spending budget. Arriving at
/// the final waypoint sets `reached_end` and clears progress.
pub fn advance(follower: &mut PathFollower, path: &Path, distance: f32) {
    if follower.reached_end {
        return;
    }

    let last = path.last_index();
    let mut remaining = distance.max(0.0);

    while follower.waypoint_index < last {
        let segment_length = path.segment_length(follower.waypoint_index);
        if segment_length <= f32::EPSILON {
            follower.waypoint_index += 1;
            follower.progress = 0.0;
            continue;
        }
        if remaining <= 0.0 {
            break;
        }

        let segment_remaining = segment_length * (1.0 - follower.progress);
        if remaining + ARRIVAL_EPSILON >= segment_remaining {
            remaining = (remaining - segment_remaining).max(0.0);
            follower.waypoint_index += 1;
            follower.progress = 0.0;
        } else {
            follower.progress += remaining / segment_length;
            break;
        }
    }

    if follower.waypoint_index >= last {
        follower.waypoint_index = last;
        follower.progress = 0.0;
        follower.reached_end = true;
    }
}
