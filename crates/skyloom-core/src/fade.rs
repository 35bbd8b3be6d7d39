//! Time-of-day fade schedule and the per-frame alpha step.
//!
//! A fade window is four tick boundaries on the 24000-tick day cycle:
//!
//! ```text
//!   startFadeIn ──ramp up──▶ endFadeIn ──full──▶ startFadeOut ──ramp down──▶ endFadeOut
//! ```
//!
//! Any boundary may be numerically smaller than the one before it; the
//! window then wraps past midnight.

use serde::{Deserialize, Serialize};

use crate::constants::DAY_LENGTH_TICKS;

/// Four-boundary fade schedule plus an always-visible override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fade {
    pub start_fade_in: i64,
    pub end_fade_in: i64,
    pub start_fade_out: i64,
    pub end_fade_out: i64,
    pub always_on: bool,
}

impl Fade {
    pub const ALWAYS_ON: Fade = Fade {
        start_fade_in: 0,
        end_fade_in: 0,
        start_fade_out: 0,
        end_fade_out: 0,
        always_on: true,
    };

    pub fn new(start_fade_in: i64, end_fade_in: i64, start_fade_out: i64, end_fade_out: i64) -> Self {
        Self {
            start_fade_in,
            end_fade_in,
            start_fade_out,
            end_fade_out,
            always_on: false,
        }
    }

    /// Fraction of full visibility (0.0–1.0) the schedule allows at `tick`.
    /// Ignores `always_on`; callers handle that before asking.
    pub fn ceiling(&self, tick: i64) -> f32 {
        let day = DAY_LENGTH_TICKS;
        let now = tick.rem_euclid(day);

        let start_in = self.start_fade_in.rem_euclid(day);
        let mut end_in = self.end_fade_in.rem_euclid(day);
        if end_in < start_in {
            end_in += day;
        }
        let mut start_out = self.start_fade_out.rem_euclid(day);
        if start_out < end_in {
            start_out += day;
        }
        let mut end_out = self.end_fade_out.rem_euclid(day);
        if end_out < start_out {
            end_out += day;
        }

        // Each comparison runs on its own wrapped copy of `now`.
        let wrap = |boundary: i64| if now < boundary { now + day } else { now };
        let in_time = wrap(start_in);
        let full_time = wrap(end_in);
        let out_time = wrap(start_out);

        if start_in < in_time && in_time <= end_in {
            // start_in < in_time guarantees a non-zero duration here
            let duration = (end_in - start_in) as f32;
            1.0 - (end_in - in_time) as f32 / duration
        } else if end_in < full_time && full_time <= start_out {
            1.0
        } else if start_out < out_time && out_time <= end_out {
            let duration = (end_out - start_out) as f32;
            (end_out - out_time) as f32 / duration
        } else {
            0.0
        }
    }
}

/// Move `current` one step toward its target.
///
/// With conditions met, alpha rises by `speed` up to `ceiling` (snapping
/// straight down if the ceiling fell below it). Otherwise it falls by
/// `speed` toward zero regardless of the ceiling.
pub fn step_alpha(current: f32, ceiling: f32, speed: f32, conditions_met: bool) -> f32 {
    if conditions_met {
        if current >= ceiling {
            ceiling
        } else {
            (current + speed).min(ceiling)
        }
    } else {
        (current - speed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_ceiling_phases() {
        let fade = Fade::new(0, 2000, 10000, 12000);
        assert!(approx(fade.ceiling(1000), 0.5));
        assert!(approx(fade.ceiling(2000), 1.0));
        assert!(approx(fade.ceiling(5000), 1.0));
        assert!(approx(fade.ceiling(11000), 0.5));
        assert!(approx(fade.ceiling(13000), 0.0));
    }

    #[test]
    fn test_ceiling_uses_day_modulo() {
        let fade = Fade::new(0, 2000, 10000, 12000);
        assert!(approx(fade.ceiling(24000 * 3 + 1000), 0.5));
        assert!(approx(fade.ceiling(-23000), 0.5));
    }

    #[test]
    fn test_ceiling_wraps_past_midnight() {
        // Night sky: fade in 13000..14000, fade out 22000..1000 next day.
        let fade = Fade::new(13000, 14000, 22000, 1000);
        assert!(approx(fade.ceiling(13500), 0.5));
        assert!(approx(fade.ceiling(18000), 1.0));
        assert!(approx(fade.ceiling(23500), 0.5));
        assert!(approx(fade.ceiling(250), 0.25));
        assert!(approx(fade.ceiling(6000), 0.0));
    }

    #[test]
    fn test_degenerate_window_stays_in_range() {
        let fade = Fade::new(5000, 5000, 5000, 5000);
        for tick in (0..24000).step_by(250) {
            let c = fade.ceiling(tick);
            assert!(c.is_finite() && (0.0..=1.0).contains(&c), "tick {tick}: {c}");
        }
    }

    #[test]
    fn test_step_alpha_rises_and_clamps() {
        assert!(approx(step_alpha(0.0, 1.0, 0.25, true), 0.25));
        assert!(approx(step_alpha(0.9, 1.0, 0.25, true), 1.0));
        // Ceiling dropped below current alpha
        assert!(approx(step_alpha(0.8, 0.3, 0.01, true), 0.3));
    }

    #[test]
    fn test_step_alpha_disqualified_fades_out() {
        assert!(approx(step_alpha(0.5, 1.0, 0.2, false), 0.3));
        assert!(approx(step_alpha(0.1, 1.0, 0.2, false), 0.0));
        assert!(approx(step_alpha(0.0, 1.0, 0.2, false), 0.0));
    }
}
