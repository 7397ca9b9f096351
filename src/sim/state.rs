//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here. Screen-space coordinates:
//! x grows to the right, y grows downward.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the simulation
    #[default]
    Running,
    /// Player fell off-screen; frozen until a restart request
    GameOver,
}

/// Something that happened during a tick, for UI/audio consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A jump was accepted this tick
    JumpStarted,
    /// Player landed on a platform (every landing tick, including resting)
    Landed { platform_id: u32 },
    /// First landing on a platform this session
    PlatformReached { platform_id: u32, score: u32 },
    /// A platform was appended to the stream
    PlatformSpawned { platform_id: u32 },
    /// Platforms were dropped behind the camera
    PlatformsEvicted { count: usize },
    /// Session ended
    GameOver { score: u32, new_best: bool },
    /// Session was reset after game over
    Restarted,
}

/// An axis-aligned platform. Immutable once spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    pub fn new(id: u32, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }
}

/// The player's box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_platform: bool,
    pub current_platform_id: Option<u32>,
}

impl Player {
    /// Player standing on `platform` at horizontal position `x`
    pub fn standing_on(platform: &Platform, x: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, platform.top() - size),
            vel: Vec2::ZERO,
            size: Vec2::splat(size),
            on_platform: true,
            current_platform_id: Some(platform.id),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Snap so the bottom edge rests on `platform` and stop all motion
    pub fn land_on(&mut self, platform: &Platform) {
        self.pos.y = platform.top() - self.size.y;
        self.vel = Vec2::ZERO;
        self.on_platform = true;
        self.current_platform_id = Some(platform.id);
    }

    /// Mark airborne (collision pass starts from here every tick)
    pub fn detach(&mut self) {
        self.on_platform = false;
        self.current_platform_id = None;
    }
}

/// Jump hold tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpState {
    pub active: bool,
    /// Ticks the current jump has applied impulse for
    pub hold_ticks: u32,
}

impl JumpState {
    /// Begin a jump if the player is grounded and not already jumping.
    /// Gives the player its forward speed. Returns whether it was accepted.
    pub fn try_start(&mut self, player: &mut Player, tuning: &Tuning) -> bool {
        if !player.on_platform || self.active {
            return false;
        }
        self.active = true;
        self.hold_ticks = 0;
        player.vel.x = tuning.jump_forward_speed;
        true
    }

    /// Release the jump (idempotent)
    pub fn stop(&mut self) {
        self.active = false;
    }
}

/// Ids of platforms landed on at least once this session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReachedSet {
    ids: BTreeSet<u32>,
}

impl ReachedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a landing; true the first time an id is seen
    pub fn insert(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Score excludes the start platform
    pub fn score(&self) -> u32 {
        self.ids.len().saturating_sub(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_edges() {
        let p = Platform::new(3, 250.0, 380.0, 100.0, 20.0);
        assert_eq!(p.left(), 250.0);
        assert_eq!(p.right(), 350.0);
        assert_eq!(p.top(), 380.0);
    }

    #[test]
    fn test_player_standing_on() {
        let p = Platform::new(0, 0.0, 400.0, 200.0, 20.0);
        let player = Player::standing_on(&p, 100.0, 30.0);
        assert_eq!(player.bottom(), 400.0);
        assert!(player.on_platform);
        assert_eq!(player.current_platform_id, Some(0));
        assert_eq!(player.right(), 130.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let tuning = Tuning::default();
        let p = Platform::new(0, 0.0, 400.0, 200.0, 20.0);
        let mut player = Player::standing_on(&p, 100.0, 30.0);
        let mut jump = JumpState::default();

        player.detach();
        assert!(!jump.try_start(&mut player, &tuning));
        assert_eq!(player.vel.x, 0.0);

        player.land_on(&p);
        assert!(jump.try_start(&mut player, &tuning));
        assert_eq!(player.vel.x, tuning.jump_forward_speed);
        assert!(jump.active);

        // Already jumping
        assert!(!jump.try_start(&mut player, &tuning));

        jump.stop();
        jump.stop();
        assert!(!jump.active);
    }

    #[test]
    fn test_reached_set_score() {
        let mut reached = ReachedSet::new();
        assert_eq!(reached.score(), 0);
        assert!(reached.insert(0));
        assert_eq!(reached.score(), 0);
        assert!(reached.insert(4));
        assert!(!reached.insert(4));
        assert_eq!(reached.score(), 1);
        assert!(reached.contains(4));
        reached.clear();
        assert!(reached.is_empty());
    }
}
