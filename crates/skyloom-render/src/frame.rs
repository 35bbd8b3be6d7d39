use std::f32::consts::PI;

use skyloom_core::constants::DAY_LENGTH_TICKS;
use skyloom_core::FrameSignals;

/// Host-side values a draw pass needs beyond the environment snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Absolute world day time in ticks (not wrapped to one day).
    pub day_time: i64,
    pub tick_delta: f32,
    /// Celestial angle as a fraction of a full turn (0.0 = noon).
    pub time_of_day: f32,
    /// 0..8, indexes the 4x2 moon phase atlas.
    pub moon_phase: u32,
    pub star_brightness: f32,
    pub rain_level: f32,
    /// Monotonic host clock, drives texture animation.
    pub now_ms: u64,
    pub camera_below_horizon: bool,
}

impl FrameContext {
    /// Derive the celestial values for `day_time` the way the vanilla client
    /// does, for hosts (and headless tools) that do not supply their own.
    pub fn from_day_time(day_time: i64, now_ms: u64) -> Self {
        let time_of_day = celestial_angle(day_time);
        Self {
            day_time,
            tick_delta: 0.0,
            time_of_day,
            moon_phase: day_time.div_euclid(DAY_LENGTH_TICKS).rem_euclid(8) as u32,
            star_brightness: star_brightness(time_of_day),
            rain_level: 0.0,
            now_ms,
            camera_below_horizon: false,
        }
    }

    pub fn with_rain_level(mut self, rain_level: f32) -> Self {
        self.rain_level = rain_level.clamp(0.0, 1.0);
        self
    }

    /// Fraction of a day elapsed, unwrapped; drives skybox time rotation.
    pub fn day_fraction(&self) -> f32 {
        self.day_time as f32 / DAY_LENGTH_TICKS as f32
    }
}

fn celestial_angle(day_time: i64) -> f32 {
    let t = day_time.rem_euclid(DAY_LENGTH_TICKS) as f32 / DAY_LENGTH_TICKS as f32 - 0.25;
    let d = t.rem_euclid(1.0);
    let eased = 0.5 - (d * PI).cos() / 2.0;
    (d * 2.0 + eased) / 3.0
}

fn star_brightness(time_of_day: f32) -> f32 {
    let f = (1.0 - ((time_of_day * PI * 2.0).cos() * 2.0 + 0.25)).clamp(0.0, 1.0);
    f * f * 0.5
}

/// What a frame pass hands back to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub signals: FrameSignals,
    /// Custom skyboxes cover the default sky; the host should not draw it.
    pub skip_default_sky: bool,
    pub total_alpha: f32,
    /// Entries drawn this frame.
    pub drawn: usize,
}
