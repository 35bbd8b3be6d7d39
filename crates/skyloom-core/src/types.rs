use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_NAMESPACE;
use crate::error::{IdentifierError, UnknownWeather};

/// A `namespace:path` resource identifier (biomes, worlds, status effects,
/// textures). A bare `path` resolves into the default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Parse and validate an identifier string.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let (namespace, path) = match raw.split_once(':') {
            Some((ns, path)) => (ns, path),
            None => (DEFAULT_NAMESPACE, raw),
        };
        if namespace.is_empty() || path.is_empty() {
            return Err(IdentifierError::MissingPart(raw.to_string()));
        }

        let ns_ok = |c: char| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.');
        let path_ok = |c: char| ns_ok(c) || c == '/';
        if let Some(ch) = namespace.chars().find(|&c| !ns_ok(c)) {
            return Err(IdentifierError::InvalidCharacter {
                id: raw.to_string(),
                ch,
            });
        }
        if let Some(ch) = path.chars().find(|&c| !path_ok(c)) {
            return Err(IdentifierError::InvalidCharacter {
                id: raw.to_string(),
                ch,
            });
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Identifier in the default namespace. `path` must already be valid.
    pub fn minecraft(path: &str) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: path.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

/// RGBA color, 0.0–1.0 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(default)]
    pub red: f32,
    #[serde(default)]
    pub green: f32,
    #[serde(default)]
    pub blue: f32,
    #[serde(default = "opaque")]
    pub alpha: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Weather states a skybox may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Rain,
    Snow,
    Thunder,
}

impl FromStr for Weather {
    type Err = UnknownWeather;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => Ok(Weather::Clear),
            "rain" => Ok(Weather::Rain),
            "snow" => Ok(Weather::Snow),
            "thunder" => Ok(Weather::Thunder),
            other => Err(UnknownWeather(other.to_string())),
        }
    }
}

/// Precipitation kind of the biome the player stands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precipitation {
    #[default]
    None,
    Rain,
    Snow,
}

/// Vertical band a skybox is restricted to. Both bounds are exclusive;
/// a range with `min >= max` never matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: f64,
    pub max: f64,
}

impl HeightRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, height: f64) -> bool {
        self.min < height && height < self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min < self.max
    }
}
