//! Schema version 1: flat, loosely-typed keys read straight off the
//! document. Only mono-colour and square-textured skyboxes ever had this
//! layout.

use glam::Vec3;
use serde_json::{Map, Value};
use skyloom_core::constants::MISSING_TEXTURE;
use skyloom_core::{
    Blend, Decorations, Fade, HeightRange, Identifier, Rgba, Rotation, SkyboxEntry, SkyboxKind,
    Texture, Textures, Weather,
};

use crate::DecodeError;

pub fn new_mono_color() -> SkyboxEntry {
    SkyboxEntry::with_kind(SkyboxKind::MonoColor { color: Rgba::BLACK })
}

pub fn new_square_textured() -> SkyboxEntry {
    let missing = Texture::new(Identifier::minecraft(MISSING_TEXTURE));
    SkyboxEntry::with_kind(SkyboxKind::SquareTextured {
        blend: Blend::default(),
        textures: Textures::uniform(&missing),
    })
}

pub fn decode_mono_color(document: &Value, entry: &mut SkyboxEntry) -> Result<(), DecodeError> {
    let fields = as_object(document)?;
    decode_shared(fields, entry)?;
    entry.kind = SkyboxKind::MonoColor {
        color: Rgba::rgb(
            required_f32(fields, "red")?,
            required_f32(fields, "green")?,
            required_f32(fields, "blue")?,
        ),
    };
    Ok(())
}

pub fn decode_square_textured(
    document: &Value,
    entry: &mut SkyboxEntry,
) -> Result<(), DecodeError> {
    let fields = as_object(document)?;
    decode_shared(fields, entry)?;

    entry.properties.rotation = Rotation {
        static_rotation: Vec3::ZERO,
        axis: optional_vec3(fields, "axis")?,
        rotation_speed: 1.0,
    };
    let blend = if optional_bool(fields, "shouldBlend", false)? {
        Blend::ADD
    } else {
        Blend::default()
    };
    let face = |key: &str| -> Result<Texture, DecodeError> {
        Ok(Texture::new(required_identifier(fields, key)?))
    };
    entry.kind = SkyboxKind::SquareTextured {
        blend,
        textures: Textures {
            north: face("texture_north")?,
            south: face("texture_south")?,
            east: face("texture_east")?,
            west: face("texture_west")?,
            top: face("texture_top")?,
            bottom: face("texture_bottom")?,
        },
    };
    Ok(())
}

fn decode_shared(fields: &Map<String, Value>, entry: &mut SkyboxEntry) -> Result<(), DecodeError> {
    let props = &mut entry.properties;
    props.fade = Fade::new(
        required_i64(fields, "startFadeIn")?,
        required_i64(fields, "endFadeIn")?,
        required_i64(fields, "startFadeOut")?,
        required_i64(fields, "endFadeOut")?,
    );
    props.max_alpha = optional_f32(fields, "maxAlpha", 1.0)?;
    props.transition_speed = optional_f32(fields, "transitionSpeed", 1.0)?;
    props.should_rotate = optional_bool(fields, "shouldRotate", false)?;
    props.change_fog = optional_bool(fields, "changeFog", false)?;
    props.fog_color = Rgba::rgb(
        optional_f32(fields, "fogRed", 0.0)?,
        optional_f32(fields, "fogGreen", 0.0)?,
        optional_f32(fields, "fogBlue", 0.0)?,
    );
    entry.decorations = Decorations::default();

    let conditions = &mut entry.conditions;
    conditions.weather = one_or_many(fields, "weather")?
        .into_iter()
        .map(|raw| raw.parse::<Weather>().map_err(DecodeError::malformed))
        .collect::<Result<_, _>>()?;
    conditions.biomes = identifiers(fields, "biomes")?;
    conditions.worlds = identifiers(fields, "dimensions")?;
    conditions.heights = height_ranges(fields)?;
    Ok(())
}

fn as_object(document: &Value) -> Result<&Map<String, Value>, DecodeError> {
    document
        .as_object()
        .ok_or_else(|| DecodeError::malformed("legacy skybox document is not an object"))
}

fn missing(key: &str) -> DecodeError {
    DecodeError::MalformedDocument(format!("missing required field '{key}'"))
}

fn wrong_type(key: &str, expected: &str) -> DecodeError {
    DecodeError::MalformedDocument(format!("field '{key}' must be {expected}"))
}

fn required_i64(fields: &Map<String, Value>, key: &str) -> Result<i64, DecodeError> {
    let value = fields.get(key).ok_or_else(|| missing(key))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| wrong_type(key, "a number"))
}

fn required_f32(fields: &Map<String, Value>, key: &str) -> Result<f32, DecodeError> {
    let value = fields.get(key).ok_or_else(|| missing(key))?;
    value
        .as_f64()
        .map(|f| f as f32)
        .ok_or_else(|| wrong_type(key, "a number"))
}

fn optional_f32(fields: &Map<String, Value>, key: &str, default: f32) -> Result<f32, DecodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(_) => required_f32(fields, key),
    }
}

fn optional_bool(fields: &Map<String, Value>, key: &str, default: bool) -> Result<bool, DecodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_bool().ok_or_else(|| wrong_type(key, "a boolean")),
    }
}

fn optional_vec3(fields: &Map<String, Value>, key: &str) -> Result<Vec3, DecodeError> {
    let Some(value) = fields.get(key) else {
        return Ok(Vec3::ZERO);
    };
    let items = value
        .as_array()
        .ok_or_else(|| wrong_type(key, "an array of numbers"))?;
    // Missing components default to zero.
    let component = |i: usize| -> Result<f32, DecodeError> {
        match items.get(i) {
            None => Ok(0.0),
            Some(v) => v
                .as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| wrong_type(key, "an array of numbers")),
        }
    };
    Ok(Vec3::new(component(0)?, component(1)?, component(2)?))
}

fn required_identifier(fields: &Map<String, Value>, key: &str) -> Result<Identifier, DecodeError> {
    let raw = fields
        .get(key)
        .ok_or_else(|| missing(key))?
        .as_str()
        .ok_or_else(|| wrong_type(key, "a string"))?;
    Identifier::parse(raw).map_err(DecodeError::malformed)
}

/// A single string or a list of strings. Absent means empty.
fn one_or_many<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<Vec<&'a str>, DecodeError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.as_str()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| wrong_type(key, "a list of strings")))
            .collect(),
        Some(_) => Err(wrong_type(key, "a string or a list of strings")),
    }
}

fn identifiers(fields: &Map<String, Value>, key: &str) -> Result<Vec<Identifier>, DecodeError> {
    one_or_many(fields, key)?
        .into_iter()
        .map(|raw| Identifier::parse(raw).map_err(DecodeError::malformed))
        .collect()
}

fn height_ranges(fields: &Map<String, Value>) -> Result<Vec<HeightRange>, DecodeError> {
    const KEY: &str = "heightRanges";
    let Some(value) = fields.get(KEY) else {
        return Ok(Vec::new());
    };
    let pairs = value
        .as_array()
        .ok_or_else(|| wrong_type(KEY, "a list of [min, max] pairs"))?;
    pairs
        .iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([min, max, ..]) => match (min.as_f64(), max.as_f64()) {
                (Some(min), Some(max)) => Ok(HeightRange::new(min, max)),
                _ => Err(wrong_type(KEY, "a list of [min, max] pairs")),
            },
            _ => Err(wrong_type(KEY, "a list of [min, max] pairs")),
        })
        .collect()
}
