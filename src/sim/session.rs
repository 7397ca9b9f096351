//! Session state machine
//!
//! A `Session` owns the whole game: player, platform stream, reached set,
//! scores and the RNG. `reset()` starts a run, `tick()` advances it one frame,
//! and falling below the viewport ends it until a restart is requested.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::resolve_landing;
use super::input::{InputQueue, InputRequest};
use super::kinematics::{camera_offset_for, integrate};
use super::sampler::Sampler;
use super::state::{GameEvent, GamePhase, JumpState, Platform, Player, ReachedSet};
use super::stream::PlatformStream;
use crate::tuning::Tuning;

/// Read-only view of a session after a tick, for rendering and UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub game_over: bool,
    pub player: Player,
    /// Live platforms in x order
    pub platforms: Vec<Platform>,
    /// Ids of live platforms already landed on
    pub reached: Vec<u32>,
    pub camera_offset: f32,
    pub score: u32,
    pub best_score: u32,
    /// Set at game over when the best score was beaten
    pub new_best: bool,
    pub jump_active: bool,
    /// Events produced by the tick that built this snapshot
    pub events: Vec<GameEvent>,
}

impl SessionSnapshot {
    /// Player position relative to the viewport's left edge
    pub fn player_screen_pos(&self) -> Vec2 {
        Vec2::new(self.player.pos.x - self.camera_offset, self.player.pos.y)
    }
}

/// A single game session
#[derive(Debug, Clone)]
pub struct Session<R = Pcg32> {
    tuning: Tuning,
    sampler: Sampler<R>,
    player: Player,
    stream: PlatformStream,
    reached: ReachedSet,
    jump: JumpState,
    phase: GamePhase,
    score: u32,
    best_score: u32,
    new_best: bool,
    camera_offset: f32,
    time_ticks: u64,
    /// Level of the jump input seen by the last `tick`, for edge detection
    jump_held: bool,
    input: InputQueue,
}

impl Session<Pcg32> {
    /// New session with default tuning and a seeded PCG stream
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RngCore> Session<R> {
    /// New session drawing platform placement from `rng`
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        let mut session = Self {
            tuning,
            sampler: Sampler::new(rng),
            player: Player::standing_on(&Platform::new(0, 0.0, 0.0, 0.0, 0.0), 0.0, 0.0),
            stream: PlatformStream::new(),
            reached: ReachedSet::new(),
            jump: JumpState::default(),
            phase: GamePhase::Running,
            score: 0,
            best_score: 0,
            new_best: false,
            camera_offset: 0.0,
            time_ticks: 0,
            jump_held: false,
            input: InputQueue::new(),
        };
        session.reset_state();
        session
    }

    /// Start a fresh run. The best score is kept.
    pub fn reset(&mut self) -> SessionSnapshot {
        self.reset_state();
        self.snapshot()
    }

    fn reset_state(&mut self) {
        let start = self.stream.reset(&mut self.sampler, &self.tuning);
        self.player = Player::standing_on(&start, self.tuning.player_start_x, self.tuning.player_size);

        self.reached.clear();
        self.reached.insert(start.id);
        self.score = 0;
        self.new_best = false;
        self.phase = GamePhase::Running;
        self.jump = JumpState::default();
        self.camera_offset = camera_offset_for(&self.player, &self.tuning);
        self.time_ticks = 0;
        self.input.clear();

        log::info!(
            "Session reset: {} platforms, best score {}",
            self.stream.len(),
            self.best_score
        );
    }

    /// Queue a jump start for the next tick
    pub fn request_jump_start(&mut self) {
        self.input.push(InputRequest::JumpStart);
    }

    /// Queue a jump release for the next tick
    pub fn request_jump_stop(&mut self) {
        self.input.push(InputRequest::JumpStop);
    }

    /// Queue a restart; ignored unless the session is over
    pub fn request_restart(&mut self) {
        self.input.push(InputRequest::Restart);
    }

    /// Advance one frame and return a snapshot for rendering.
    ///
    /// `jump_input_active` is the jump key level: a rising edge requests a
    /// jump start, a falling edge requests a release.
    pub fn tick(&mut self, jump_input_active: bool) -> SessionSnapshot {
        let events = self.advance(jump_input_active);
        self.snapshot_with(events)
    }

    /// Advance one frame without building a snapshot.
    /// Returns the events produced by the tick.
    pub fn advance(&mut self, jump_input_active: bool) -> Vec<GameEvent> {
        if jump_input_active != self.jump_held {
            self.jump_held = jump_input_active;
            self.input.push(if jump_input_active {
                InputRequest::JumpStart
            } else {
                InputRequest::JumpStop
            });
        }

        let mut events = Vec::new();
        self.apply_input(&mut events);

        // Frozen until restarted
        if self.phase == GamePhase::GameOver {
            return events;
        }

        self.camera_offset = integrate(&mut self.player, &mut self.jump, &self.tuning);

        if let Some(landing) = resolve_landing(
            &mut self.player,
            self.stream.iter(),
            &mut self.reached,
            self.tuning.landing_tolerance,
        ) {
            self.score = landing.score;
            events.extend(landing.events());
        }

        if let Some(platform) = self.stream.tick(
            self.camera_offset,
            self.tuning.viewport_width,
            &mut self.sampler,
            &self.tuning,
        ) {
            events.push(GameEvent::PlatformSpawned {
                platform_id: platform.id,
            });
        }

        let evicted = self.stream.evict(
            self.camera_offset,
            self.player.current_platform_id,
            &self.tuning,
        );
        if evicted > 0 {
            events.push(GameEvent::PlatformsEvicted { count: evicted });
        }

        self.time_ticks += 1;

        if self.player.pos.y > self.tuning.viewport_height {
            self.end_session(&mut events);
        }

        events
    }

    fn apply_input(&mut self, events: &mut Vec<GameEvent>) {
        for request in self.input.drain() {
            match request {
                InputRequest::Restart => {
                    if self.phase == GamePhase::GameOver {
                        self.reset_state();
                        events.push(GameEvent::Restarted);
                    }
                }
                InputRequest::JumpStart => {
                    if self.phase == GamePhase::Running
                        && self.jump.try_start(&mut self.player, &self.tuning)
                    {
                        events.push(GameEvent::JumpStarted);
                    }
                }
                InputRequest::JumpStop => self.jump.stop(),
            }
        }
    }

    fn end_session(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::GameOver;
        self.jump.stop();
        if self.score > self.best_score {
            self.best_score = self.score;
            self.new_best = true;
        }
        log::info!(
            "Game over after {} ticks: score {}, best {}{}",
            self.time_ticks,
            self.score,
            self.best_score,
            if self.new_best { " (new best)" } else { "" }
        );
        events.push(GameEvent::GameOver {
            score: self.score,
            new_best: self.new_best,
        });
    }
}

impl<R> Session<R> {
    /// Snapshot of the current state with no events
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_with(Vec::new())
    }

    fn snapshot_with(&self, events: Vec<GameEvent>) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            game_over: self.phase == GamePhase::GameOver,
            player: self.player.clone(),
            platforms: self.stream.to_vec(),
            reached: self
                .stream
                .iter()
                .filter(|p| self.reached.contains(p.id))
                .map(|p| p.id)
                .collect(),
            camera_offset: self.camera_offset,
            score: self.score,
            best_score: self.best_score,
            new_best: self.new_best,
            jump_active: self.jump.active,
            events,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn platforms(&self) -> &PlatformStream {
        &self.stream
    }

    pub fn reached(&self) -> &ReachedSet {
        &self.reached
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn new_best(&self) -> bool {
        self.new_best
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera_offset
    }

    /// Ticks simulated since the last reset
    pub fn tick_count(&self) -> u64 {
        self.time_ticks
    }

    /// Swap in a hand-built platform layout
    #[cfg(test)]
    pub(crate) fn set_platforms(&mut self, platforms: impl IntoIterator<Item = Platform>) {
        self.stream = PlatformStream::from_platforms(platforms);
    }
}
