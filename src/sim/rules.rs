//! Session invariant checks
//!
//! `Session::validate` is cheap enough to run after every tick; strict
//! replays and the property tests do exactly that.

use std::fmt;

use super::session::Session;
use super::state::GamePhase;

/// Names the first invariant a session breaks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    EmptyStream,
    PlatformOrder,
    GapBounds,
    Reachability,
    PlatformBounds,
    OnPlatformConsistency,
    ScoreMismatch,
    BestScore,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStream => write!(f, "EMPTY_STREAM"),
            Self::PlatformOrder => write!(f, "PLATFORM_ORDER"),
            Self::GapBounds => write!(f, "GAP_BOUNDS"),
            Self::Reachability => write!(f, "REACHABILITY"),
            Self::PlatformBounds => write!(f, "PLATFORM_BOUNDS"),
            Self::OnPlatformConsistency => write!(f, "ON_PLATFORM_CONSISTENCY"),
            Self::ScoreMismatch => write!(f, "SCORE_MISMATCH"),
            Self::BestScore => write!(f, "BEST_SCORE"),
        }
    }
}

impl std::error::Error for RuleCode {}

/// Slack for comparisons against sampled f32 values. Grows with magnitude
/// since platform x keeps increasing for the whole run.
fn slack(scale: f32) -> f32 {
    1e-3_f32.max(scale.abs() * f32::EPSILON * 8.0)
}

impl<R> Session<R> {
    /// Check every session invariant, reporting the first one broken
    pub fn validate(&self) -> Result<(), RuleCode> {
        let tuning = self.tuning();
        let stream = self.platforms();
        if stream.is_empty() {
            return Err(RuleCode::EmptyStream);
        }

        let max_jump = tuning.max_jump_height();
        let (min_y, max_y) = (tuning.min_platform_y, tuning.max_platform_y());
        let band_valid = min_y <= max_y;

        let mut prev = None;
        for platform in stream.iter() {
            // The start platform is placed by hand, not sampled
            if band_valid && platform.id != 0 {
                let eps = slack(platform.top());
                if platform.top() < min_y - eps || platform.top() > max_y + eps {
                    return Err(RuleCode::PlatformBounds);
                }
            }

            if let Some(prev) = prev.replace(*platform) {
                if platform.id <= prev.id || platform.left() < prev.right() {
                    return Err(RuleCode::PlatformOrder);
                }
                let gap = platform.left() - prev.right();
                let eps = slack(platform.left());
                if gap < tuning.gap_min - eps || gap > tuning.gap_max + eps {
                    return Err(RuleCode::GapBounds);
                }
                if platform.top() - prev.top() > max_jump + slack(platform.top()) {
                    return Err(RuleCode::Reachability);
                }
            }
        }

        let player = self.player();
        match (player.on_platform, player.current_platform_id) {
            (false, None) => {}
            (true, Some(id)) => {
                let Some(platform) = stream.get(id) else {
                    return Err(RuleCode::OnPlatformConsistency);
                };
                let resting = (player.bottom() - platform.top()).abs() <= slack(platform.top());
                let overlaps =
                    player.right() > platform.left() && player.left() < platform.right();
                if !resting || !overlaps {
                    return Err(RuleCode::OnPlatformConsistency);
                }
            }
            _ => return Err(RuleCode::OnPlatformConsistency),
        }

        if self.score() != self.reached().score() {
            return Err(RuleCode::ScoreMismatch);
        }

        if self.phase() == GamePhase::GameOver && self.best_score() < self.score() {
            return Err(RuleCode::BestScore);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Platform;
    use crate::tuning::Tuning;

    #[test]
    fn test_fresh_session_is_valid() {
        for seed in 0..50 {
            assert_eq!(Session::new(seed).validate(), Ok(()));
        }
    }

    #[test]
    fn test_rule_code_display() {
        assert_eq!(RuleCode::GapBounds.to_string(), "GAP_BOUNDS");
        assert_eq!(
            RuleCode::OnPlatformConsistency.to_string(),
            "ON_PLATFORM_CONSISTENCY"
        );
    }

    #[test]
    fn test_detects_gap_out_of_range() {
        let mut session = Session::new(1);
        session.set_platforms([
            Platform::new(0, 0.0, 400.0, 200.0, 20.0),
            Platform::new(1, 210.0, 400.0, 100.0, 20.0),
        ]);
        assert_eq!(session.validate(), Err(RuleCode::GapBounds));
    }

    #[test]
    fn test_detects_overlap() {
        let mut session = Session::new(1);
        session.set_platforms([
            Platform::new(0, 0.0, 400.0, 200.0, 20.0),
            Platform::new(1, 150.0, 400.0, 100.0, 20.0),
        ]);
        assert_eq!(session.validate(), Err(RuleCode::PlatformOrder));
    }

    #[test]
    fn test_detects_unreachable_drop() {
        let tuning = Tuning {
            height_variation: 200.0,
            ..Tuning::default()
        };
        let mut session = Session::with_tuning(tuning, 1);
        session.set_platforms([
            Platform::new(0, 0.0, 300.0, 200.0, 20.0),
            Platform::new(1, 300.0, 490.0, 100.0, 20.0),
        ]);
        assert_eq!(session.validate(), Err(RuleCode::Reachability));
    }

    #[test]
    fn test_detects_platform_out_of_band() {
        let mut session = Session::new(1);
        session.set_platforms([
            Platform::new(0, 0.0, 400.0, 200.0, 20.0),
            Platform::new(1, 300.0, 450.0, 100.0, 20.0),
            Platform::new(2, 500.0, 510.0, 100.0, 20.0),
        ]);
        assert_eq!(session.validate(), Err(RuleCode::PlatformBounds));
    }

    #[test]
    fn test_detects_occupied_platform_missing() {
        let mut session = Session::new(1);
        session.set_platforms([Platform::new(3, 900.0, 400.0, 100.0, 20.0)]);
        assert_eq!(session.validate(), Err(RuleCode::OnPlatformConsistency));
    }
}
