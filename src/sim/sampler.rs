//! Gap/height sampling for the next platform
//!
//! The height bound is the fairness guarantee: a platform is never placed
//! further below its predecessor than a full-hold jump covers, and never
//! outside the playable band of the screen.

use std::cmp::Ordering;

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

/// Platform placement sampler over an injected RNG
#[derive(Debug, Clone)]
pub struct Sampler<R = Pcg32> {
    rng: R,
}

impl Sampler<Pcg32> {
    /// Seeded PCG sampler
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: RngCore> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Horizontal gap in `[gap_min, gap_max]`
    pub fn next_gap(&mut self, tuning: &Tuning) -> f32 {
        sample_range(&mut self.rng, tuning.gap_min, tuning.gap_max)
    }

    /// Top edge of the next platform given the previous one
    pub fn next_height(&mut self, prev_y: f32, max_jump_height: f32, tuning: &Tuning) -> f32 {
        let (min, max) = height_bounds(prev_y, max_jump_height, tuning);
        sample_range(&mut self.rng, min, max)
    }
}

/// Clamped `[min, max]` window for the next platform's y
pub fn height_bounds(prev_y: f32, max_jump_height: f32, tuning: &Tuning) -> (f32, f32) {
    let min = (prev_y - tuning.height_variation).max(tuning.min_platform_y);
    let max = (prev_y + tuning.height_variation)
        .min(tuning.max_platform_y())
        .min(prev_y + max_jump_height);
    (min, max)
}

/// Uniform sample in `[min, max]`; collapses to `min` when the range is
/// empty or its width is not finite
fn sample_range<R: RngCore>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min.partial_cmp(&max) != Some(Ordering::Less) || !min.is_finite() || !(max - min).is_finite()
    {
        return min;
    }
    rng.random_range(min..=max)
}
