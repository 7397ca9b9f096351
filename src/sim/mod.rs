//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (platforms in x order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod kinematics;
pub mod replay;
pub mod rules;
pub mod sampler;
pub mod session;
pub mod state;
pub mod stream;

pub use collision::{Landing, lands_on, resolve_landing};
pub use input::{InputQueue, InputRequest};
pub use kinematics::{camera_offset_for, integrate};
pub use replay::{InputTape, ReplayResult, ReplayViolation, TapeRecorder, replay, replay_strict};
pub use rules::RuleCode;
pub use sampler::{Sampler, height_bounds};
pub use session::{Session, SessionSnapshot};
pub use state::{GameEvent, GamePhase, JumpState, Platform, Player, ReachedSet};
pub use stream::PlatformStream;
