use skyloom_core::constants::DAY_LENGTH_TICKS;
use skyloom_core::{Identifier, StaticEnvironment, Weather};
use skyloom_render::FrameContext;

/// Host clock advance per game tick.
pub const MS_PER_TICK: u64 = 50;

/// Horizon height for the below-horizon check.
const HORIZON_HEIGHT: f64 = 63.0;

/// Scripted player situation swept across a span of day time.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub start_tick: i64,
    /// Ticks between samples.
    pub step: i64,
    pub days: u32,
    pub weather: Weather,
    pub biome: Identifier,
    pub world: Identifier,
    pub height: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            start_tick: 0,
            step: 500,
            days: 1,
            weather: Weather::Clear,
            biome: Identifier::minecraft("plains"),
            world: Identifier::minecraft("overworld"),
            height: 64.0,
        }
    }
}

impl Scenario {
    /// Sample ticks from `start_tick` up to (not including) the end of the
    /// last day.
    pub fn ticks(&self) -> impl Iterator<Item = i64> {
        let end = self.start_tick + DAY_LENGTH_TICKS * i64::from(self.days);
        let step = self.step.max(1);
        (self.start_tick..end).step_by(step as usize)
    }

    pub fn environment_at(&self, tick: i64) -> StaticEnvironment {
        StaticEnvironment {
            tick,
            world: self.world.clone(),
            biome: self.biome.clone(),
            player_height: self.height,
            ..StaticEnvironment::default()
        }
        .with_weather(self.weather)
    }

    pub fn frame_at(&self, tick: i64) -> FrameContext {
        let elapsed = (tick - self.start_tick).max(0) as u64;
        let rain_level = match self.weather {
            Weather::Clear => 0.0,
            _ => 1.0,
        };
        let mut frame = FrameContext::from_day_time(tick, elapsed * MS_PER_TICK).with_rain_level(rain_level);
        frame.camera_below_horizon = self.height < HORIZON_HEIGHT;
        frame
    }
}
