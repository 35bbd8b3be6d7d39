use serde::{Deserialize, Serialize};

use crate::environment::EnvironmentSnapshot;
use crate::types::{HeightRange, Identifier, Precipitation, Weather};

/// Environmental filters for a skybox. An empty filter matches anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conditions {
    pub biomes: Vec<Identifier>,
    /// World (dimension instance) identifiers, not dimension types.
    pub worlds: Vec<Identifier>,
    pub weather: Vec<Weather>,
    pub heights: Vec<HeightRange>,
}

impl Conditions {
    /// World filter first; the biome filter is only consulted when the
    /// world filter passes.
    pub fn biomes_ok(&self, env: &EnvironmentSnapshot) -> bool {
        if !self.worlds.is_empty() && !self.worlds.contains(&env.world) {
            return false;
        }
        self.biomes.is_empty() || self.biomes.contains(&env.biome)
    }

    pub fn heights_ok(&self, env: &EnvironmentSnapshot) -> bool {
        self.heights.is_empty()
            || self
                .heights
                .iter()
                .any(|range| range.contains(env.player_height))
    }

    /// Checked in order thunder, snow, rain; `clear` accepts whatever the
    /// earlier checks did not.
    pub fn weather_ok(&self, env: &EnvironmentSnapshot) -> bool {
        if self.weather.is_empty() {
            return true;
        }
        let wants = |w: Weather| self.weather.contains(&w);

        (wants(Weather::Thunder) && env.thundering)
            || (wants(Weather::Snow) && env.raining && env.precipitation == Precipitation::Snow)
            || (wants(Weather::Rain) && env.raining && !env.thundering)
            || wants(Weather::Clear)
    }

    /// False if any active status effect blocks vision.
    pub fn effect_ok(env: &EnvironmentSnapshot, vision_blocking: &[Identifier]) -> bool {
        !env
            .active_effects
            .iter()
            .any(|effect| vision_blocking.contains(effect))
    }

    /// AND of all four checks. An unavailable environment never passes.
    pub fn are_met(&self, env: Option<&EnvironmentSnapshot>, vision_blocking: &[Identifier]) -> bool {
        match env {
            Some(env) => {
                self.biomes_ok(env)
                    && self.heights_ok(env)
                    && self.weather_ok(env)
                    && Self::effect_ok(env, vision_blocking)
            }
            None => false,
        }
    }
}
