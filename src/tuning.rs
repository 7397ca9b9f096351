//! Data-driven game balance
//!
//! Every gameplay constant in [`crate::consts`] can be overridden from a JSON
//! file. Missing fields keep their compiled-in defaults.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Environment variable naming the tuning file
pub const TUNING_ENV_VAR: &str = "SKYHOP_TUNING";
/// Tuning file used when the environment variable is unset
pub const DEFAULT_TUNING_PATH: &str = "config/tuning.json";

/// Gameplay balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_power: f32,
    pub max_jump_hold: u32,
    pub jump_forward_speed: f32,
    pub jump_height_scale: f32,

    pub platform_width: f32,
    pub platform_height: f32,
    pub gap_min: f32,
    pub gap_max: f32,
    pub height_variation: f32,
    pub min_platform_y: f32,
    pub screen_bottom_margin: f32,

    pub viewport_width: f32,
    pub viewport_height: f32,
    pub camera_inset: f32,

    pub look_ahead_margin: f32,
    pub eviction_margin: f32,
    pub initial_platforms: u32,

    pub landing_tolerance: f32,

    pub start_platform_x: f32,
    pub start_platform_y: f32,
    pub start_platform_width_factor: f32,
    pub player_start_x: f32,
    pub player_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_power: JUMP_POWER,
            max_jump_hold: MAX_JUMP_HOLD,
            jump_forward_speed: JUMP_FORWARD_SPEED,
            jump_height_scale: JUMP_HEIGHT_SCALE,

            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            gap_min: PLATFORM_GAP_MIN,
            gap_max: PLATFORM_GAP_MAX,
            height_variation: PLATFORM_HEIGHT_VARIATION,
            min_platform_y: MIN_PLATFORM_Y,
            screen_bottom_margin: SCREEN_BOTTOM_MARGIN,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            camera_inset: CAMERA_INSET,

            look_ahead_margin: LOOK_AHEAD_MARGIN,
            eviction_margin: EVICTION_MARGIN,
            initial_platforms: INITIAL_PLATFORMS,

            landing_tolerance: LANDING_TOLERANCE,

            start_platform_x: START_PLATFORM_X,
            start_platform_y: START_PLATFORM_Y,
            start_platform_width_factor: START_PLATFORM_WIDTH_FACTOR,
            player_start_x: PLAYER_START_X,
            player_size: PLAYER_SIZE,
        }
    }
}

/// Reasons a tuning file is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// The file could not be read
    Io { kind: ErrorKind, message: String },
    /// JSON could not be parsed
    Parse(String),
    /// A value is NaN or infinite
    NotFinite { field: &'static str },
    /// A size, speed or count that must be strictly positive is not
    NotPositive { field: &'static str },
    /// A margin or tolerance is negative
    Negative { field: &'static str },
    /// `gap_min` exceeds `gap_max`
    GapRange { min: f32, max: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { message, .. } => write!(f, "cannot read tuning file: {message}"),
            Self::Parse(msg) => write!(f, "invalid tuning JSON: {msg}"),
            Self::NotFinite { field } => write!(f, "{field} must be finite"),
            Self::NotPositive { field } => write!(f, "{field} must be > 0"),
            Self::Negative { field } => write!(f, "{field} must be >= 0"),
            Self::GapRange { min, max } => {
                write!(f, "gap_min ({min}) must not exceed gap_max ({max})")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Greatest climb achievable by holding jump for the full duration
    pub fn max_jump_height(&self) -> f32 {
        self.max_jump_hold as f32 * self.jump_power * self.jump_height_scale
    }

    /// Lowest (largest y) a generated platform may sit
    pub fn max_platform_y(&self) -> f32 {
        self.viewport_height - self.screen_bottom_margin
    }

    /// Width of the wide platform the player starts on
    pub fn start_platform_width(&self) -> f32 {
        self.platform_width * self.start_platform_width_factor
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let reals = [
            ("gravity", self.gravity),
            ("jump_power", self.jump_power),
            ("jump_forward_speed", self.jump_forward_speed),
            ("jump_height_scale", self.jump_height_scale),
            ("platform_width", self.platform_width),
            ("platform_height", self.platform_height),
            ("gap_min", self.gap_min),
            ("gap_max", self.gap_max),
            ("height_variation", self.height_variation),
            ("min_platform_y", self.min_platform_y),
            ("screen_bottom_margin", self.screen_bottom_margin),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("camera_inset", self.camera_inset),
            ("look_ahead_margin", self.look_ahead_margin),
            ("eviction_margin", self.eviction_margin),
            ("landing_tolerance", self.landing_tolerance),
            ("start_platform_x", self.start_platform_x),
            ("start_platform_y", self.start_platform_y),
            ("start_platform_width_factor", self.start_platform_width_factor),
            ("player_start_x", self.player_start_x),
            ("player_size", self.player_size),
        ];
        if let Some(&(field, _)) = reals.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TuningError::NotFinite { field });
        }

        let positive = [
            ("gravity", self.gravity),
            ("jump_power", self.jump_power),
            ("jump_forward_speed", self.jump_forward_speed),
            ("jump_height_scale", self.jump_height_scale),
            ("platform_width", self.platform_width),
            ("platform_height", self.platform_height),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("start_platform_width_factor", self.start_platform_width_factor),
            ("player_size", self.player_size),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(TuningError::NotPositive { field });
        }
        if self.max_jump_hold == 0 {
            return Err(TuningError::NotPositive {
                field: "max_jump_hold",
            });
        }

        let non_negative = [
            ("gap_min", self.gap_min),
            ("height_variation", self.height_variation),
            ("screen_bottom_margin", self.screen_bottom_margin),
            ("look_ahead_margin", self.look_ahead_margin),
            ("eviction_margin", self.eviction_margin),
            ("landing_tolerance", self.landing_tolerance),
        ];
        if let Some(&(field, _)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(TuningError::Negative { field });
        }

        if self.gap_min > self.gap_max {
            return Err(TuningError::GapRange {
                min: self.gap_min,
                max: self.gap_max,
            });
        }

        Ok(())
    }

    /// Read, parse and validate a tuning file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let content = std::fs::read_to_string(path).map_err(|e| TuningError::Io {
            kind: e.kind(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Load the tuning named by `SKYHOP_TUNING` (or the default path).
    /// Falls back to defaults if the file is missing or rejected.
    pub fn load() -> Self {
        let path =
            std::env::var(TUNING_ENV_VAR).unwrap_or_else(|_| DEFAULT_TUNING_PATH.to_string());
        Self::load_or_default(&path)
    }

    /// Tuning from `path`; a missing file quietly yields defaults, any other
    /// failure is logged before falling back
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from_path(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(TuningError::Io {
                kind: ErrorKind::NotFound,
                ..
            }) => Self::default(),
            Err(e) => {
                log::warn!("Rejected tuning file {path}: {e}, using defaults");
                Self::default()
            }
        }
    }
}
