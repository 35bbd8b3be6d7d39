use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::conditions::Conditions;
use crate::config::SkyConfig;
use crate::constants::{
    ANIMATED_SQUARE_TEXTURED_SKYBOX, DEFAULT_MOON_TEXTURE, DEFAULT_SUN_TEXTURE, MONO_COLOR_SKYBOX,
    SINGLE_SPRITE_ANIMATED_SQUARE_TEXTURED_SKYBOX, SINGLE_SPRITE_SQUARE_TEXTURED_SKYBOX,
    SQUARE_TEXTURED_SKYBOX,
};
use crate::environment::EnvironmentSnapshot;
use crate::fade::{step_alpha, Fade};
use crate::signals::FrameSignals;
use crate::texture::{Animation, Texture, Textures};
use crate::types::{Identifier, Rgba};

/// Static and time-of-day rotation, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rotation {
    #[serde(rename = "static")]
    pub static_rotation: Vec3,
    pub axis: Vec3,
    /// Full turns per day when rotating with time.
    pub rotation_speed: f32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            static_rotation: Vec3::ZERO,
            axis: Vec3::ZERO,
            rotation_speed: 1.0,
        }
    }
}

/// Options shared by every skybox type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Properties {
    pub fade: Fade,
    /// Cap on alpha (0.0–1.0).
    pub max_alpha: f32,
    /// Alpha change per frame (> 0).
    pub transition_speed: f32,
    pub change_fog: bool,
    #[serde(rename = "fogColors")]
    pub fog_color: Rgba,
    /// Whether the host's sunrise/sunset tint stays on while visible.
    #[serde(rename = "sunSkyTint")]
    pub render_sun_sky_tint: bool,
    pub should_rotate: bool,
    pub rotation: Rotation,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            fade: Fade::default(),
            max_alpha: 1.0,
            transition_speed: 1.0,
            change_fog: false,
            fog_color: Rgba::BLACK,
            render_sun_sky_tint: true,
            should_rotate: false,
            rotation: Rotation::default(),
        }
    }
}

/// Sun, moon and star overlay drawn at most once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Decorations {
    pub sun: Identifier,
    pub moon: Identifier,
    pub show_sun: bool,
    pub show_moon: bool,
    pub show_stars: bool,
    pub rotation: Rotation,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            sun: Identifier::minecraft(DEFAULT_SUN_TEXTURE),
            moon: Identifier::minecraft(DEFAULT_MOON_TEXTURE),
            show_sun: true,
            show_moon: true,
            show_stars: true,
            rotation: Rotation::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Alpha,
    Add,
    Subtract,
    Multiply,
    Screen,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Blend {
    #[serde(rename = "type")]
    pub mode: BlendMode,
}

impl Blend {
    pub const ADD: Blend = Blend {
        mode: BlendMode::Add,
    };
}

/// Type-specific payload. Closed set; each variant has its own draw
/// routine in the render crate.
#[derive(Debug, Clone, PartialEq)]
pub enum SkyboxKind {
    MonoColor {
        color: Rgba,
    },
    SquareTextured {
        blend: Blend,
        textures: Textures,
    },
    SingleSpriteSquareTextured {
        blend: Blend,
        sprite: Texture,
        textures: Textures,
    },
    AnimatedSquareTextured {
        blend: Blend,
        animation: Animation,
    },
    SingleSpriteAnimatedSquareTextured {
        blend: Blend,
        sprites: Vec<Texture>,
        animation: Animation,
    },
}

impl SkyboxKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            SkyboxKind::MonoColor { .. } => MONO_COLOR_SKYBOX,
            SkyboxKind::SquareTextured { .. } => SQUARE_TEXTURED_SKYBOX,
            SkyboxKind::SingleSpriteSquareTextured { .. } => SINGLE_SPRITE_SQUARE_TEXTURED_SKYBOX,
            SkyboxKind::AnimatedSquareTextured { .. } => ANIMATED_SQUARE_TEXTURED_SKYBOX,
            SkyboxKind::SingleSpriteAnimatedSquareTextured { .. } => {
                SINGLE_SPRITE_ANIMATED_SQUARE_TEXTURED_SKYBOX
            }
        }
    }

    pub fn single_sprite(blend: Blend, sprite: Texture) -> Self {
        let textures = Textures::from_atlas(&sprite);
        SkyboxKind::SingleSpriteSquareTextured {
            blend,
            sprite,
            textures,
        }
    }

    pub fn single_sprite_animated(blend: Blend, sprites: Vec<Texture>, frame_duration_ms: u64) -> Self {
        let frames = sprites.iter().map(Textures::from_atlas).collect();
        SkyboxKind::SingleSpriteAnimatedSquareTextured {
            blend,
            sprites,
            animation: Animation::new(frames, frame_duration_ms),
        }
    }
}

/// One configured skybox. `alpha` is runtime-only and is recomputed every
/// frame by [`SkyboxEntry::update_alpha`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkyboxEntry {
    pub properties: Properties,
    pub conditions: Conditions,
    pub decorations: Decorations,
    pub kind: SkyboxKind,
    alpha: f32,
}

impl SkyboxEntry {
    pub fn new(
        properties: Properties,
        conditions: Conditions,
        decorations: Decorations,
        kind: SkyboxKind,
    ) -> Self {
        Self {
            properties,
            conditions,
            decorations,
            kind,
            alpha: 0.0,
        }
    }

    /// Entry with default properties, no conditions and default decorations.
    pub fn with_kind(kind: SkyboxKind) -> Self {
        Self::new(
            Properties::default(),
            Conditions::default(),
            Decorations::default(),
            kind,
        )
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Run one frame of the fade state machine and return the new alpha.
    ///
    /// `env` is `None` when the host has no world/player context; that
    /// counts as conditions failing. Visible entries record their fog and
    /// sky-tint requests into `signals`.
    pub fn update_alpha(
        &mut self,
        env: Option<&EnvironmentSnapshot>,
        config: &SkyConfig,
        signals: &mut FrameSignals,
    ) -> f32 {
        let props = &self.properties;

        let next = if props.fade.always_on {
            1.0
        } else {
            let met = self
                .conditions
                .are_met(env, &config.vision_blocking_effects);
            let ceiling = env.map_or(0.0, |env| props.fade.ceiling(env.tick) * props.max_alpha);
            step_alpha(self.alpha, ceiling, props.transition_speed, met)
        };

        self.alpha = if next.is_nan() {
            0.0
        } else {
            next.clamp(0.0, 1.0)
        };

        if self.alpha > config.minimum_alpha {
            signals.apply(props);
        }
        self.alpha
    }
}
