use glam::Mat4;
use skyloom_core::{BlendMode, Identifier, Rgba};

/// Position, texture coordinate and colour of one sky quad corner.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl SkyVertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            uv,
            color,
        }
    }
}

/// Geometry the host builds once and keeps on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyBuffer {
    /// Default sky dome.
    Sky,
    Stars,
    /// Lower hemisphere shown when the camera is below the horizon.
    Dark,
}

/// Draw requests issued by skybox draw routines. Implementors own every GPU
/// resource; nothing here allocates or frees them.
pub trait RenderBackend {
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Colour multiplied into everything drawn until the next call.
    fn set_shader_tint(&mut self, tint: Rgba);

    /// Draw quads (four vertices each) sampling `texture`, with `transform`
    /// applied on top of the camera's view rotation.
    fn draw_textured_quad_set(&mut self, texture: &Identifier, vertices: &[SkyVertex], transform: Mat4);

    fn draw_prebuilt_buffer(&mut self, buffer: SkyBuffer, transform: Mat4);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetBlendMode(BlendMode),
    SetShaderTint(Rgba),
    TexturedQuads {
        texture: Identifier,
        vertices: Vec<SkyVertex>,
        transform: Mat4,
    },
    PrebuiltBuffer {
        buffer: SkyBuffer,
        transform: Mat4,
    },
}

/// Backend that keeps every request in order. Used by tests and the
/// headless preview.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of draw calls (state changes excluded).
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::TexturedQuads { .. } | DrawCommand::PrebuiltBuffer { .. }
                )
            })
            .count()
    }

    pub fn textures_drawn(&self) -> Vec<&Identifier> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::TexturedQuads { texture, .. } => Some(texture),
                _ => None,
            })
            .collect()
    }

    pub fn buffer_draws(&self, buffer: SkyBuffer) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::PrebuiltBuffer { buffer: b, .. } if *b == buffer))
            .count()
    }
}

impl RenderBackend for RecordingBackend {
    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::SetBlendMode(mode));
    }

    fn set_shader_tint(&mut self, tint: Rgba) {
        self.commands.push(DrawCommand::SetShaderTint(tint));
    }

    fn draw_textured_quad_set(&mut self, texture: &Identifier, vertices: &[SkyVertex], transform: Mat4) {
        self.commands.push(DrawCommand::TexturedQuads {
            texture: texture.clone(),
            vertices: vertices.to_vec(),
            transform,
        });
    }

    fn draw_prebuilt_buffer(&mut self, buffer: SkyBuffer, transform: Mat4) {
        self.commands
            .push(DrawCommand::PrebuiltBuffer { buffer, transform });
    }
}
