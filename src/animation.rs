//! Facing and animation-frame selection.  Both are pure functions of
//! simulation data; turning a frame index into pixels is the renderer's job.

use glam::Vec2;

use crate::entities::{Archetype, Facing};

/// Facing for a movement delta: the dominant axis wins, ties go vertical.
/// A zero delta has no facing.
pub fn facing_from_delta(delta: Vec2) -> Option<Facing> {
    if delta == Vec2::ZERO {
        return None;
    }
    let facing = if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    } else if delta.y > 0.0 {
        Facing::Up
    } else {
        Facing::Down
    };
    Some(facing)
}

/// Frame to show for an archetype that has been animating for `elapsed`
/// seconds in `facing`.  Single-frame archetypes always show frame 0.
pub fn frame_index(archetype: Archetype, _facing: Facing, elapsed: f32) -> usize {
    let stats = archetype.stats();
    if stats.anim_frames <= 1 || stats.anim_fps <= 0.0 || elapsed <= 0.0 {
        return 0;
    }
    (elapsed * stats.anim_fps) as usize % stats.anim_frames
}
