use serde::{Deserialize, Serialize};

use crate::constants::{BLINDNESS_EFFECT, DEFAULT_MINIMUM_ALPHA};
use crate::types::Identifier;

/// Runtime tuning shared by the alpha state machine and the catalog.
/// Loaded from RON by the rules crate; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Alpha at or below which a skybox counts as invisible.
    pub minimum_alpha: f32,
    /// Any of these active on the player disqualifies every
    /// non-always-on skybox.
    pub vision_blocking_effects: Vec<Identifier>,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            minimum_alpha: DEFAULT_MINIMUM_ALPHA,
            vision_blocking_effects: vec![Identifier::minecraft(BLINDNESS_EFFECT)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SkyConfig::default();
        assert_eq!(config.minimum_alpha, 0.001);
        assert_eq!(
            config.vision_blocking_effects[0].to_string(),
            "minecraft:blindness"
        );
    }
}
