//! Single source of truth for shared constants.

/// Length of a full day/night cycle in ticks.
pub const DAY_LENGTH_TICKS: i64 = 24000;

/// Alpha at or below which a skybox is treated as invisible.
pub const DEFAULT_MINIMUM_ALPHA: f32 = 0.001;

/// Namespace used when an identifier string carries none.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Namespace that may prefix a skybox type name in documents.
pub const SKYLOOM_NAMESPACE: &str = "skyloom";

/// Status effect that blocks custom skies by default.
pub const BLINDNESS_EFFECT: &str = "blindness";

/// Default frame duration for animated skyboxes, in milliseconds (~60 fps).
pub const DEFAULT_ANIMATION_FRAME_MS: u64 = 16;

/// Default decoration textures (paths in the default namespace).
pub const DEFAULT_SUN_TEXTURE: &str = "textures/environment/sun.png";
pub const DEFAULT_MOON_TEXTURE: &str = "textures/environment/moon_phases.png";

/// Placeholder face used by default instances before decoding fills them in.
pub const MISSING_TEXTURE: &str = "textures/misc/missing.png";

/// UV inset applied to each cell when splitting a single-sprite atlas.
pub const ATLAS_UV_INSET: f32 = 0.005;

/// Canonical skybox type names.
pub const MONO_COLOR_SKYBOX: &str = "mono-color-skybox";
pub const SQUARE_TEXTURED_SKYBOX: &str = "square-textured-skybox";
pub const SINGLE_SPRITE_SQUARE_TEXTURED_SKYBOX: &str = "single-sprite-square-textured-skybox";
pub const ANIMATED_SQUARE_TEXTURED_SKYBOX: &str = "animated-square-textured-skybox";
pub const SINGLE_SPRITE_ANIMATED_SQUARE_TEXTURED_SKYBOX: &str =
    "single-sprite-animated-square-textured-skybox";
