//! Schema version 2 documents.
//!
//! Each built-in type has one document struct. Shared sections are
//! flattened in from [`CommonSections`]; only `properties` and the type
//! payload are required.

use serde::Deserialize;
use serde_json::Value;
use skyloom_core::constants::DEFAULT_ANIMATION_FRAME_MS;
use skyloom_core::{
    Animation, Blend, Conditions, Decorations, Properties, Rgba, SkyboxEntry, SkyboxKind, Texture,
    Textures,
};

use crate::DecodeError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommonSections {
    properties: Properties,
    #[serde(default)]
    conditions: Conditions,
    #[serde(default)]
    decorations: Decorations,
}

impl CommonSections {
    fn into_entry(self, kind: SkyboxKind) -> SkyboxEntry {
        SkyboxEntry::new(self.properties, self.conditions, self.decorations, kind)
    }
}

#[derive(Debug, Deserialize)]
struct MonoColorDocument {
    #[serde(flatten)]
    common: CommonSections,
    #[serde(default)]
    color: Rgba,
}

#[derive(Debug, Deserialize)]
struct SquareTexturedDocument {
    #[serde(flatten)]
    common: CommonSections,
    #[serde(default)]
    blend: Blend,
    texture: Textures,
}

#[derive(Debug, Deserialize)]
struct SingleSpriteDocument {
    #[serde(flatten)]
    common: CommonSections,
    #[serde(default)]
    blend: Blend,
    texture: Texture,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimatedDocument {
    #[serde(flatten)]
    common: CommonSections,
    #[serde(default)]
    blend: Blend,
    animated_texture: Vec<Textures>,
    #[serde(default = "default_frame_duration")]
    frame_duration: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SingleSpriteAnimatedDocument {
    #[serde(flatten)]
    common: CommonSections,
    #[serde(default)]
    blend: Blend,
    animated_texture: Vec<Texture>,
    #[serde(default = "default_frame_duration")]
    frame_duration: u64,
}

fn default_frame_duration() -> u64 {
    DEFAULT_ANIMATION_FRAME_MS
}

fn parse<'de, T: Deserialize<'de>>(document: &'de Value) -> Result<T, DecodeError> {
    T::deserialize(document).map_err(DecodeError::malformed)
}

pub fn decode_mono_color(document: &Value) -> Result<SkyboxEntry, DecodeError> {
    let doc: MonoColorDocument = parse(document)?;
    Ok(doc.common.into_entry(SkyboxKind::MonoColor { color: doc.color }))
}

pub fn decode_square_textured(document: &Value) -> Result<SkyboxEntry, DecodeError> {
    let doc: SquareTexturedDocument = parse(document)?;
    Ok(doc.common.into_entry(SkyboxKind::SquareTextured {
        blend: doc.blend,
        textures: doc.texture,
    }))
}

pub fn decode_single_sprite_square_textured(document: &Value) -> Result<SkyboxEntry, DecodeError> {
    let doc: SingleSpriteDocument = parse(document)?;
    Ok(doc
        .common
        .into_entry(SkyboxKind::single_sprite(doc.blend, doc.texture)))
}

pub fn decode_animated_square_textured(document: &Value) -> Result<SkyboxEntry, DecodeError> {
    let doc: AnimatedDocument = parse(document)?;
    Ok(doc.common.into_entry(SkyboxKind::AnimatedSquareTextured {
        blend: doc.blend,
        animation: Animation::new(doc.animated_texture, doc.frame_duration),
    }))
}

pub fn decode_single_sprite_animated_square_textured(
    document: &Value,
) -> Result<SkyboxEntry, DecodeError> {
    let doc: SingleSpriteAnimatedDocument = parse(document)?;
    Ok(doc.common.into_entry(SkyboxKind::single_sprite_animated(
        doc.blend,
        doc.animated_texture,
        doc.frame_duration,
    )))
}
