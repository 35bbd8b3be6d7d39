//! Queries into the host game. The core never owns world state; it asks
//! these questions once per frame and works from the resulting snapshot.

use crate::types::{Identifier, Precipitation, Weather};

/// Capability interface implemented by the host engine.
///
/// Every query returns `None` when the answer is unavailable (no world
/// loaded, no player yet). A `None` anywhere makes the whole environment
/// unavailable for that frame, which evaluates as "conditions false".
pub trait Environment {
    fn current_tick(&self) -> Option<i64>;
    fn current_world(&self) -> Option<Identifier>;
    /// Biome at the player's position.
    fn current_biome(&self) -> Option<Identifier>;
    fn player_height(&self) -> Option<f64>;
    fn is_raining(&self) -> Option<bool>;
    fn is_thundering(&self) -> Option<bool>;
    /// Precipitation kind of the biome at the player's position.
    fn precipitation(&self) -> Option<Precipitation>;
    fn active_status_effects(&self) -> Option<Vec<Identifier>>;
}

/// Everything the condition evaluator and fade logic need for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    pub tick: i64,
    pub world: Identifier,
    pub biome: Identifier,
    pub player_height: f64,
    pub raining: bool,
    pub thundering: bool,
    pub precipitation: Precipitation,
    pub active_effects: Vec<Identifier>,
}

impl EnvironmentSnapshot {
    /// Query the host once. Returns `None` if any answer is missing.
    pub fn capture<E: Environment + ?Sized>(env: &E) -> Option<Self> {
        Some(Self {
            tick: env.current_tick()?,
            world: env.current_world()?,
            biome: env.current_biome()?,
            player_height: env.player_height()?,
            raining: env.is_raining()?,
            thundering: env.is_thundering()?,
            precipitation: env.precipitation()?,
            active_effects: env.active_status_effects()?,
        })
    }
}

/// Plain-data environment for tests and offline tools.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticEnvironment {
    /// When false every query answers `None`.
    pub world_loaded: bool,
    pub tick: i64,
    pub world: Identifier,
    pub biome: Identifier,
    pub player_height: f64,
    pub raining: bool,
    pub thundering: bool,
    pub precipitation: Precipitation,
    pub active_effects: Vec<Identifier>,
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self {
            world_loaded: true,
            tick: 0,
            world: Identifier::minecraft("overworld"),
            biome: Identifier::minecraft("plains"),
            player_height: 64.0,
            raining: false,
            thundering: false,
            precipitation: Precipitation::Rain,
            active_effects: Vec::new(),
        }
    }
}

impl StaticEnvironment {
    /// An environment with no world loaded.
    pub fn unloaded() -> Self {
        Self {
            world_loaded: false,
            ..Self::default()
        }
    }

    pub fn at_tick(mut self, tick: i64) -> Self {
        self.tick = tick;
        self
    }

    /// Set raining/thundering (and the biome's precipitation for snow)
    /// to match a weather state.
    pub fn with_weather(mut self, weather: Weather) -> Self {
        let (raining, thundering) = match weather {
            Weather::Clear => (false, false),
            Weather::Rain | Weather::Snow => (true, false),
            Weather::Thunder => (true, true),
        };
        self.raining = raining;
        self.thundering = thundering;
        self.precipitation = match weather {
            Weather::Snow => Precipitation::Snow,
            _ => Precipitation::Rain,
        };
        self
    }

    pub fn snapshot(&self) -> Option<EnvironmentSnapshot> {
        EnvironmentSnapshot::capture(self)
    }

    fn loaded<T>(&self, value: T) -> Option<T> {
        self.world_loaded.then_some(value)
    }
}

impl Environment for StaticEnvironment {
    fn current_tick(&self) -> Option<i64> {
        self.loaded(self.tick)
    }

    fn current_world(&self) -> Option<Identifier> {
        self.loaded(self.world.clone())
    }

    fn current_biome(&self) -> Option<Identifier> {
        self.loaded(self.biome.clone())
    }

    fn player_height(&self) -> Option<f64> {
        self.loaded(self.player_height)
    }

    fn is_raining(&self) -> Option<bool> {
        self.loaded(self.raining)
    }

    fn is_thundering(&self) -> Option<bool> {
        self.loaded(self.thundering)
    }

    fn precipitation(&self) -> Option<Precipitation> {
        self.loaded(self.precipitation)
    }

    fn active_status_effects(&self) -> Option<Vec<Identifier>> {
        self.loaded(self.active_effects.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_loaded() {
        let env = StaticEnvironment::default().at_tick(6000);
        let snap = env.snapshot().expect("world is loaded");
        assert_eq!(snap.tick, 6000);
        assert_eq!(snap.world.to_string(), "minecraft:overworld");
    }

    #[test]
    fn test_capture_unloaded_is_none() {
        assert!(StaticEnvironment::unloaded().snapshot().is_none());
    }

    #[test]
    fn test_with_weather() {
        let env = StaticEnvironment::default().with_weather(Weather::Snow);
        assert!(env.raining);
        assert!(!env.thundering);
        assert_eq!(env.precipitation, Precipitation::Snow);

        let env = StaticEnvironment::default().with_weather(Weather::Thunder);
        assert!(env.raining && env.thundering);
    }
}
