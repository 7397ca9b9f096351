//! Landing detection and response
//!
//! A swept vertical test: the player's bottom edge must have crossed the
//! platform top during this tick's displacement, give or take the landing
//! tolerance. Exact only while the tolerance covers the per-tick overshoot;
//! very fast falls can still tunnel through.

use super::state::{GameEvent, Platform, Player, ReachedSet};

/// Outcome of a landing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub platform_id: u32,
    /// First landing on this platform this session
    pub first_visit: bool,
    /// Score after recording the landing
    pub score: u32,
}

impl Landing {
    /// Events to report for this landing
    pub fn events(&self) -> impl Iterator<Item = GameEvent> {
        let landed = GameEvent::Landed {
            platform_id: self.platform_id,
        };
        let reached = self.first_visit.then_some(GameEvent::PlatformReached {
            platform_id: self.platform_id,
            score: self.score,
        });
        std::iter::once(landed).chain(reached)
    }
}

/// True if `player` lands on `platform` this tick
pub fn lands_on(player: &Player, platform: &Platform, tolerance: f32) -> bool {
    if player.vel.y < 0.0 {
        return false;
    }

    let bottom = player.bottom();
    let top = platform.top();

    player.right() > platform.left()
        && player.left() < platform.right()
        && bottom >= top
        && bottom - player.vel.y <= top + tolerance
}

/// Resolve landings against platforms in x order. The first match wins.
///
/// Clears the player's grounded state first; on a landing, snaps the player
/// onto the platform, stops it, and records the platform as reached.
pub fn resolve_landing<'a>(
    player: &mut Player,
    platforms: impl IntoIterator<Item = &'a Platform>,
    reached: &mut ReachedSet,
    tolerance: f32,
) -> Option<Landing> {
    player.detach();

    let mut prev_right = f32::NEG_INFINITY;
    for platform in platforms {
        debug_assert!(
            platform.left() >= prev_right,
            "platforms overlap in x at id {}",
            platform.id
        );
        prev_right = platform.right();

        if lands_on(player, platform, tolerance) {
            player.land_on(platform);
            let first_visit = reached.insert(platform.id);
            let score = reached.score();
            if first_visit {
                log::debug!("Reached platform {} (score {score})", platform.id);
            }
            return Some(Landing {
                platform_id: platform.id,
                first_visit,
                score,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const TOLERANCE: f32 = 5.0;

    fn player_at(x: f32, bottom: f32, vy: f32) -> Player {
        Player {
            pos: Vec2::new(x, bottom - 30.0),
            vel: Vec2::new(0.0, vy),
            size: Vec2::splat(30.0),
            on_platform: false,
            current_platform_id: None,
        }
    }

    fn platforms() -> Vec<Platform> {
        vec![
            Platform::new(0, 0.0, 400.0, 200.0, 20.0),
            Platform::new(1, 300.0, 350.0, 100.0, 20.0),
        ]
    }

    #[test]
    fn test_lands_when_crossing_top() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();
        reached.insert(0);

        // Bottom moved from 345 to 353 this tick, across top 350
        let mut player = player_at(320.0, 353.0, 8.0);
        player.vel.x = 4.0;
        let landing = resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).unwrap();

        assert_eq!(landing.platform_id, 1);
        assert!(landing.first_visit);
        assert_eq!(landing.score, 1);
        assert_eq!(player.bottom(), 350.0);
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(player.on_platform);
        assert_eq!(player.current_platform_id, Some(1));
    }

    #[test]
    fn test_no_landing_while_rising() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();
        let mut player = player_at(320.0, 351.0, -2.0);
        assert!(resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).is_none());
        assert!(!player.on_platform);
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();

        // Right edge exactly at platform left: touching, not overlapping
        let mut player = player_at(270.0, 352.0, 4.0);
        assert!(resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).is_none());

        // Left edge exactly at platform right
        let mut player = player_at(400.0, 352.0, 4.0);
        assert!(resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).is_none());
    }

    #[test]
    fn test_tunnels_when_overshoot_exceeds_tolerance() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();

        // Bottom was at 356 before this tick: already below top + tolerance
        let mut player = player_at(320.0, 366.0, 10.0);
        assert!(resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).is_none());

        // Bottom was at 355: exactly at the tolerance
        let mut player = player_at(320.0, 365.0, 10.0);
        assert!(resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).is_some());
    }

    #[test]
    fn test_resting_player_relands_each_tick() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();
        reached.insert(0);

        // Standing still: one tick of gravity pushes bottom 0.5 into the platform
        let mut player = player_at(100.0, 400.5, 0.5);
        let landing = resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).unwrap();
        assert_eq!(landing.platform_id, 0);
        assert!(!landing.first_visit);
        assert_eq!(landing.score, 0);
        assert_eq!(landing.events().count(), 1);
    }

    #[test]
    fn test_repeat_landing_scores_once() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();
        reached.insert(0);

        for i in 0..5 {
            let mut player = player_at(320.0, 351.0, 3.0);
            let landing =
                resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).unwrap();
            assert_eq!(landing.first_visit, i == 0);
            assert_eq!(landing.score, 1);
        }
        assert_eq!(reached.score(), 1);
    }

    #[test]
    fn test_first_visit_emits_reached_event() {
        let landing = Landing {
            platform_id: 9,
            first_visit: true,
            score: 4,
        };
        let events: Vec<_> = landing.events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::Landed { platform_id: 9 },
                GameEvent::PlatformReached {
                    platform_id: 9,
                    score: 4
                },
            ]
        );
    }

    #[test]
    fn test_detaches_when_airborne() {
        let platforms = platforms();
        let mut reached = ReachedSet::new();
        let mut player = player_at(250.0, 450.0, 3.0);
        player.on_platform = true;
        player.current_platform_id = Some(0);
        assert!(resolve_landing(&mut player, &platforms, &mut reached, TOLERANCE).is_none());
        assert!(!player.on_platform);
        assert_eq!(player.current_platform_id, None);
    }
}
