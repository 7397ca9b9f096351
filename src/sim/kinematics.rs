//! Per-tick player motion
//!
//! Gravity is applied every tick, including while jump is held, so the
//! net vertical velocity is gravity accumulation minus jump impulses.

use super::state::{JumpState, Player};
use crate::tuning::Tuning;

/// Advance the player by one tick. Returns the new camera offset.
pub fn integrate(player: &mut Player, jump: &mut JumpState, tuning: &Tuning) -> f32 {
    // Jump impulse while held, up to the hold limit
    if jump.active {
        if jump.hold_ticks < tuning.max_jump_hold {
            player.vel.y -= tuning.jump_power;
            jump.hold_ticks += 1;
        } else {
            jump.stop();
        }
    }

    player.vel.y += tuning.gravity;
    player.pos += player.vel;

    let camera_offset = camera_offset_for(player, tuning);

    // No residual drift once grounded and jump released
    if player.on_platform && !jump.active {
        player.vel.x = 0.0;
    }

    camera_offset
}

/// Camera keeps the player a fixed inset from the viewport's left edge
#[inline]
pub fn camera_offset_for(player: &Player, tuning: &Tuning) -> f32 {
    player.pos.x - tuning.camera_inset
}
