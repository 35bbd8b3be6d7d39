//! Sun, moon and stars. Several active skyboxes may each want to draw
//! them; the coordinator lets only the first one per frame through.

use glam::{Mat4, Vec3};
use skyloom_core::{BlendMode, Decorations, Rgba, Rotation};

use crate::backend::{RenderBackend, SkyBuffer, SkyVertex};
use crate::frame::FrameContext;

const SUN_HALF_SIZE: f32 = 30.0;
const MOON_HALF_SIZE: f32 = 20.0;
const CELESTIAL_DISTANCE: f32 = 100.0;

/// Frame-scoped "decorations already drawn" flag.
#[derive(Debug, Default)]
pub struct DecorationCoordinator {
    drawn: bool,
}

impl DecorationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once at the start of each frame's skybox pass.
    pub fn begin_frame(&mut self) {
        self.drawn = false;
    }

    /// True exactly once per frame.
    pub fn try_consume(&mut self) -> bool {
        !std::mem::replace(&mut self.drawn, true)
    }

    pub fn drawn(&self) -> bool {
        self.drawn
    }
}

/// Rotation about X, then Y, then Z, in degrees.
pub(crate) fn rotation_xyz(degrees: Vec3) -> Mat4 {
    Mat4::from_rotation_x(degrees.x.to_radians())
        * Mat4::from_rotation_y(degrees.y.to_radians())
        * Mat4::from_rotation_z(degrees.z.to_radians())
}

/// Inverse of [`rotation_xyz`].
pub(crate) fn rotation_zyx_inverse(degrees: Vec3) -> Mat4 {
    Mat4::from_rotation_z(-degrees.z.to_radians())
        * Mat4::from_rotation_y(-degrees.y.to_radians())
        * Mat4::from_rotation_x(-degrees.x.to_radians())
}

/// Static orientation, then the celestial arc tilted by `rotation.axis`.
pub fn decoration_transform(rotation: &Rotation, time_of_day: f32) -> Mat4 {
    let arc = time_of_day * 360.0 * rotation.rotation_speed;
    rotation_xyz(rotation.static_rotation)
        * rotation_xyz(rotation.axis)
        * Mat4::from_rotation_y((-90.0f32).to_radians())
        * Mat4::from_rotation_x(arc.to_radians())
        * rotation_zyx_inverse(rotation.axis)
}

fn sun_quad() -> [SkyVertex; 4] {
    let s = SUN_HALF_SIZE;
    let y = CELESTIAL_DISTANCE;
    let white = [1.0; 4];
    [
        SkyVertex::new([-s, y, -s], [0.0, 0.0], white),
        SkyVertex::new([s, y, -s], [1.0, 0.0], white),
        SkyVertex::new([s, y, s], [1.0, 1.0], white),
        SkyVertex::new([-s, y, s], [0.0, 1.0], white),
    ]
}

/// Quad opposite the sun showing one cell of the 4x2 phase atlas.
fn moon_quad(phase: u32) -> [SkyVertex; 4] {
    let s = MOON_HALF_SIZE;
    let y = -CELESTIAL_DISTANCE;
    let col = phase % 4;
    let row = phase / 4 % 2;
    let (u0, v0) = (col as f32 / 4.0, row as f32 / 2.0);
    let (u1, v1) = ((col + 1) as f32 / 4.0, (row + 1) as f32 / 2.0);
    let white = [1.0; 4];
    [
        SkyVertex::new([-s, y, s], [u1, v1], white),
        SkyVertex::new([s, y, s], [u0, v1], white),
        SkyVertex::new([s, y, -s], [u0, v0], white),
        SkyVertex::new([-s, y, -s], [u1, v0], white),
    ]
}

/// Draw whichever decoration parts are enabled, faded by `alpha`.
/// Callers gate this through [`DecorationCoordinator::try_consume`].
pub fn draw_decorations<B: RenderBackend + ?Sized>(
    decorations: &Decorations,
    alpha: f32,
    frame: &FrameContext,
    backend: &mut B,
) {
    let transform = decoration_transform(&decorations.rotation, frame.time_of_day);

    backend.set_blend_mode(BlendMode::Add);
    backend.set_shader_tint(Rgba::WHITE.with_alpha(alpha));
    if decorations.show_sun {
        backend.draw_textured_quad_set(&decorations.sun, &sun_quad(), transform);
    }
    if decorations.show_moon {
        backend.draw_textured_quad_set(&decorations.moon, &moon_quad(frame.moon_phase), transform);
    }
    if decorations.show_stars {
        let brightness = frame.star_brightness * (1.0 - frame.rain_level);
        if brightness > 0.0 {
            backend.set_shader_tint(Rgba {
                red: brightness,
                green: brightness,
                blue: brightness,
                alpha: brightness,
            });
            backend.draw_prebuilt_buffer(SkyBuffer::Stars, transform);
        }
    }
    backend.set_shader_tint(Rgba::WHITE);
    backend.set_blend_mode(BlendMode::Alpha);
}
