//! Live platform window
//!
//! Platforms are generated strictly left to right, so insertion order is
//! x order. New platforms are appended at the back as the camera approaches
//! the rightmost one; old ones are dropped from the front once they fall
//! behind the camera.

use std::collections::VecDeque;

use rand::RngCore;

use super::sampler::Sampler;
use super::state::Platform;
use crate::tuning::Tuning;

/// Ordered live platforms plus the id allocator
#[derive(Debug, Clone, Default)]
pub struct PlatformStream {
    platforms: VecDeque<Platform>,
    next_id: u32,
}

impl PlatformStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and lay out the wide start platform plus the initial run.
    /// Returns the start platform.
    pub fn reset<R: RngCore>(&mut self, sampler: &mut Sampler<R>, tuning: &Tuning) -> Platform {
        self.platforms.clear();
        self.next_id = 0;

        let start = Platform::new(
            self.allocate_id(),
            tuning.start_platform_x,
            tuning.start_platform_y,
            tuning.start_platform_width(),
            tuning.platform_height,
        );
        self.platforms.push_back(start);

        for _ in 0..tuning.initial_platforms {
            self.spawn_next(sampler, tuning);
        }

        log::debug!(
            "Platform stream reset: {} platforms, rightmost edge {:.1}",
            self.platforms.len(),
            self.back().map(Platform::right).unwrap_or_default()
        );
        start
    }

    /// Append one platform if the rightmost edge is inside the look-ahead
    /// window. Returns the spawned platform.
    pub fn tick<R: RngCore>(
        &mut self,
        camera_offset: f32,
        viewport_width: f32,
        sampler: &mut Sampler<R>,
        tuning: &Tuning,
    ) -> Option<Platform> {
        let Some(rightmost) = self.platforms.back() else {
            log::error!("Platform stream is empty; was reset() skipped?");
            return None;
        };

        let visible_right = camera_offset + viewport_width;
        if rightmost.right() < visible_right + tuning.look_ahead_margin {
            self.spawn_next(sampler, tuning)
        } else {
            None
        }
    }

    /// Drop platforms whose right edge is more than the eviction margin
    /// behind the camera. Never drops `occupied` or the last platform.
    /// Returns how many were removed.
    pub fn evict(&mut self, camera_offset: f32, occupied: Option<u32>, tuning: &Tuning) -> usize {
        let cutoff = camera_offset - tuning.eviction_margin;
        let mut removed = 0;
        while self.platforms.len() > 1 {
            let Some(front) = self.platforms.front() else {
                break;
            };
            if front.right() >= cutoff || Some(front.id) == occupied {
                break;
            }
            self.platforms.pop_front();
            removed += 1;
        }
        if removed > 0 {
            log::debug!("Evicted {removed} platforms behind x={cutoff:.1}");
        }
        removed
    }

    /// Chain a platform after the rightmost one
    fn spawn_next<R: RngCore>(&mut self, sampler: &mut Sampler<R>, tuning: &Tuning) -> Option<Platform> {
        let prev = *self.platforms.back()?;
        let x = prev.right() + sampler.next_gap(tuning);
        let y = sampler.next_height(prev.top(), tuning.max_jump_height(), tuning);
        let platform = Platform::new(
            self.allocate_id(),
            x,
            y,
            tuning.platform_width,
            tuning.platform_height,
        );
        self.platforms.push_back(platform);
        Some(platform)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn front(&self) -> Option<&Platform> {
        self.platforms.front()
    }

    pub fn back(&self) -> Option<&Platform> {
        self.platforms.back()
    }

    pub fn get(&self, id: u32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Copy out the live platforms in x order
    pub fn to_vec(&self) -> Vec<Platform> {
        self.platforms.iter().copied().collect()
    }

    /// Build a stream from explicit platforms (ids must ascend with x)
    pub fn from_platforms(platforms: impl IntoIterator<Item = Platform>) -> Self {
        let platforms: VecDeque<Platform> = platforms.into_iter().collect();
        let next_id = platforms.back().map(|p| p.id + 1).unwrap_or(0);
        Self { platforms, next_id }
    }
}
