pub mod conditions;
pub mod config;
pub mod constants;
pub mod entry;
pub mod environment;
pub mod error;
pub mod fade;
pub mod signals;
pub mod texture;
pub mod types;

pub use conditions::Conditions;
pub use config::SkyConfig;
pub use entry::{Blend, BlendMode, Decorations, Properties, Rotation, SkyboxEntry, SkyboxKind};
pub use environment::{Environment, EnvironmentSnapshot, StaticEnvironment};
pub use fade::Fade;
pub use signals::FrameSignals;
pub use texture::{Animation, Texture, Textures};
pub use types::{HeightRange, Identifier, Precipitation, Rgba, Weather};
