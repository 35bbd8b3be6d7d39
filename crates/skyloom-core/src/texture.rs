use serde::{Deserialize, Serialize};

use crate::constants::ATLAS_UV_INSET;
use crate::types::Identifier;

/// A texture reference with the UV sub-rectangle to sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Identifier")]
pub struct Texture {
    pub id: Identifier,
    pub min_u: f32,
    pub min_v: f32,
    pub max_u: f32,
    pub max_v: f32,
}

impl Texture {
    /// Whole-image texture.
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            min_u: 0.0,
            min_v: 0.0,
            max_u: 1.0,
            max_v: 1.0,
        }
    }

    pub fn with_uv(&self, min_u: f32, min_v: f32, max_u: f32, max_v: f32) -> Self {
        Self {
            id: self.id.clone(),
            min_u,
            min_v,
            max_u,
            max_v,
        }
    }
}

impl From<Identifier> for Texture {
    fn from(id: Identifier) -> Self {
        Self::new(id)
    }
}

/// The six faces of a cube skybox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Textures {
    pub north: Texture,
    pub south: Texture,
    pub east: Texture,
    pub west: Texture,
    pub top: Texture,
    pub bottom: Texture,
}

impl Textures {
    /// All six faces showing the same texture.
    pub fn uniform(texture: &Texture) -> Self {
        Self {
            north: texture.clone(),
            south: texture.clone(),
            east: texture.clone(),
            west: texture.clone(),
            top: texture.clone(),
            bottom: texture.clone(),
        }
    }

    /// Faces in draw order: bottom, north, south, top, east, west.
    pub fn in_draw_order(&self) -> [&Texture; 6] {
        [
            &self.bottom,
            &self.north,
            &self.south,
            &self.top,
            &self.east,
            &self.west,
        ]
    }

    /// Split a single 3x2 sprite atlas into six faces.
    ///
    /// ```text
    ///   +--------+--------+--------+
    ///   | bottom |  top   | south  |   v 0.0–0.5
    ///   +--------+--------+--------+
    ///   |  west  | north  |  east  |   v 0.5–1.0
    ///   +--------+--------+--------+
    /// ```
    pub fn from_atlas(sprite: &Texture) -> Self {
        let e = ATLAS_UV_INSET;
        let third = 1.0 / 3.0;
        let two_thirds = 2.0 / 3.0;
        Self {
            north: sprite.with_uv(third + e, 0.5 + e, two_thirds - e, 1.0 - e),
            south: sprite.with_uv(two_thirds + e, e, 1.0 - e, 0.5 - e),
            east: sprite.with_uv(two_thirds + e, 0.5 + e, 1.0 - e, 1.0 - e),
            west: sprite.with_uv(e, 0.5 + e, third - e, 1.0 - e),
            top: sprite.with_uv(third + e, e, two_thirds - e, 0.5 - e),
            bottom: sprite.with_uv(e, e, third - e, 0.5 - e),
        }
    }
}

/// A looping sequence of cube texture sets. Frame state is runtime-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<Textures>,
    frame_duration_ms: u64,
    current: usize,
    last_switch_ms: Option<u64>,
}

impl Animation {
    pub fn new(frames: Vec<Textures>, frame_duration_ms: u64) -> Self {
        Self {
            frames,
            frame_duration_ms,
            current: 0,
            last_switch_ms: None,
        }
    }

    pub fn frames(&self) -> &[Textures] {
        &self.frames
    }

    pub fn frame_duration_ms(&self) -> u64 {
        self.frame_duration_ms
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Textures> {
        self.frames.get(self.current)
    }

    /// Advance to the next frame once `frame_duration_ms` has elapsed since
    /// the last switch. The first call only starts the clock.
    pub fn advance(&mut self, now_ms: u64) {
        let Some(last) = self.last_switch_ms else {
            self.last_switch_ms = Some(now_ms);
            return;
        };
        if self.frames.is_empty() || now_ms < last.saturating_add(self.frame_duration_ms) {
            return;
        }
        self.current = (self.current + 1) % self.frames.len();
        self.last_switch_ms = Some(now_ms);
    }
}
