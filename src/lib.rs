//! Skyhop - an endless-runner platform game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (platform stream, kinematics, landings, session)
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Deterministic bot that plans jumps by simulating ahead

pub mod autopilot;
pub mod sim;
pub mod tuning;

pub use autopilot::Autopilot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Screen-space coordinates: x grows right, y grows down. One tick per frame.
pub mod consts {
    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.5;
    /// Upward velocity removed each tick while jump is held
    pub const JUMP_POWER: f32 = 0.7;
    /// Maximum ticks a jump can be held
    pub const MAX_JUMP_HOLD: u32 = 30;
    /// Horizontal speed given by a jump
    pub const JUMP_FORWARD_SPEED: f32 = 4.0;
    /// Scale from (hold ticks * jump power) to achievable climb
    pub const JUMP_HEIGHT_SCALE: f32 = 4.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_GAP_MIN: f32 = 50.0;
    pub const PLATFORM_GAP_MAX: f32 = 200.0;
    pub const PLATFORM_HEIGHT_VARIATION: f32 = 60.0;
    /// Highest (smallest y) a generated platform may sit
    pub const MIN_PLATFORM_Y: f32 = 100.0;
    /// Generated platforms stay this far above the bottom of the viewport
    pub const SCREEN_BOTTOM_MARGIN: f32 = 100.0;

    /// Viewport
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Player stays this far from the left edge of the viewport
    pub const CAMERA_INSET: f32 = 100.0;

    /// Platform stream window
    pub const LOOK_AHEAD_MARGIN: f32 = 500.0;
    pub const EVICTION_MARGIN: f32 = 100.0;
    pub const INITIAL_PLATFORMS: u32 = 10;

    /// Swept landing tolerance above the platform top
    pub const LANDING_TOLERANCE: f32 = 5.0;

    /// Start layout
    pub const START_PLATFORM_X: f32 = 0.0;
    pub const START_PLATFORM_Y: f32 = 400.0;
    pub const START_PLATFORM_WIDTH_FACTOR: f32 = 2.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 30.0;
}
