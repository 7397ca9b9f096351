//! Autopilot - deterministic jump planner
//!
//! Whenever the player stands still on a platform, every hold duration is
//! tried on a cloned session and the outcome inspected. The bot then commits
//! to one hold and replays it on the real session tick by tick, so the real
//! run follows the probe exactly.

use rand::RngCore;

use crate::sim::Session;

/// Release ticks simulated before a probe is abandoned
const PROBE_FALL_TICKS: u32 = 600;

/// Where a probed hold ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Lands(u32),
    Falls,
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Ticks still to hold for the committed jump
    hold_remaining: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump level to feed `Session::tick` this frame
    pub fn next_input<R: RngCore + Clone>(&mut self, session: &Session<R>) -> bool {
        if self.hold_remaining > 0 {
            self.hold_remaining -= 1;
            return true;
        }

        let player = session.player();
        if session.is_game_over()
            || !player.on_platform
            || session.jump().active
            || session.jump_held()
        {
            return false;
        }

        match plan_hold(session) {
            Some(hold) => {
                self.hold_remaining = hold - 1;
                true
            }
            None => false,
        }
    }
}

/// Longest hold reaching a new platform, else the longest hop that stays on
/// the current one
fn plan_hold<R: RngCore + Clone>(session: &Session<R>) -> Option<u32> {
    let current = session.player().current_platform_id?;
    let max_hold = session.tuning().max_jump_hold;

    let mut hop = None;
    for hold in (1..=max_hold).rev() {
        match probe(session, hold) {
            Outcome::Lands(id) if !session.reached().contains(id) => {
                log::debug!("Autopilot: hold {hold} reaches platform {id}");
                return Some(hold);
            }
            Outcome::Lands(id) if id == current && hop.is_none() => hop = Some(hold),
            _ => {}
        }
    }

    if hop.is_none() {
        log::debug!("Autopilot: no safe jump from platform {current}");
    }
    hop
}

fn probe<R: RngCore + Clone>(session: &Session<R>, hold: u32) -> Outcome {
    let mut probe = session.clone();
    for _ in 0..hold {
        probe.advance(true);
    }
    for _ in 0..PROBE_FALL_TICKS {
        probe.advance(false);
        if probe.is_game_over() {
            return Outcome::Falls;
        }
        if let Some(id) = probe.player().current_platform_id {
            return Outcome::Lands(id);
        }
    }
    Outcome::Falls
}
