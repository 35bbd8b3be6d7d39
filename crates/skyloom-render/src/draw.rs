use glam::{Mat4, Vec3};
use skyloom_core::{BlendMode, Properties, Rgba, SkyboxEntry, SkyboxKind, Texture, Textures};

use crate::backend::{RenderBackend, SkyBuffer, SkyVertex};
use crate::decorations::{draw_decorations, rotation_xyz, rotation_zyx_inverse, DecorationCoordinator};
use crate::frame::FrameContext;

const CUBE_HALF_EXTENT: f32 = 100.0;
/// Offset of the dark hemisphere below the camera.
const DARK_BUFFER_LIFT: f32 = 12.0;

/// Per-variant draw routine for an active skybox.
pub trait DrawSkybox {
    fn draw<B: RenderBackend + ?Sized>(
        &mut self,
        frame: &FrameContext,
        decorations: &mut DecorationCoordinator,
        backend: &mut B,
    );
}

impl DrawSkybox for SkyboxEntry {
    fn draw<B: RenderBackend + ?Sized>(
        &mut self,
        frame: &FrameContext,
        coordinator: &mut DecorationCoordinator,
        backend: &mut B,
    ) {
        let alpha = self.alpha();
        let properties = &self.properties;
        let decorations = &self.decorations;
        let mut draw_overlay = |backend: &mut B| {
            if coordinator.try_consume() {
                draw_decorations(decorations, alpha, frame, backend);
            }
        };

        match &mut self.kind {
            SkyboxKind::MonoColor { color } => {
                if alpha <= 0.0 {
                    return;
                }
                backend.set_blend_mode(BlendMode::Alpha);
                backend.set_shader_tint(color.with_alpha(alpha));
                backend.draw_prebuilt_buffer(SkyBuffer::Sky, Mat4::IDENTITY);
                draw_overlay(backend);
                if frame.camera_below_horizon {
                    backend.set_shader_tint(Rgba::BLACK);
                    backend.draw_prebuilt_buffer(
                        SkyBuffer::Dark,
                        Mat4::from_translation(Vec3::new(0.0, DARK_BUFFER_LIFT, 0.0)),
                    );
                }
                backend.set_shader_tint(Rgba::WHITE);
            }
            SkyboxKind::SquareTextured { blend, textures }
            | SkyboxKind::SingleSpriteSquareTextured {
                blend, textures, ..
            } => {
                draw_cube(properties, blend.mode, Some(&*textures), alpha, frame, backend);
                draw_overlay(backend);
            }
            SkyboxKind::AnimatedSquareTextured { blend, animation }
            | SkyboxKind::SingleSpriteAnimatedSquareTextured {
                blend, animation, ..
            } => {
                animation.advance(frame.now_ms);
                draw_cube(properties, blend.mode, animation.current(), alpha, frame, backend);
                draw_overlay(backend);
            }
        }
    }
}

/// Time-of-day spin about the configured axis (when enabled), then the
/// static orientation.
pub fn skybox_transform(properties: &Properties, frame: &FrameContext) -> Mat4 {
    let rotation = &properties.rotation;
    let spin = if properties.should_rotate {
        frame.day_fraction() * 360.0 * rotation.rotation_speed
    } else {
        0.0
    };
    rotation_xyz(rotation.axis)
        * Mat4::from_rotation_y(spin.to_radians())
        * rotation_zyx_inverse(rotation.axis)
        * rotation_xyz(rotation.static_rotation)
}

/// Orientation of each face in draw order (bottom, north, south, top,
/// east, west), applied to a quad lying on the cube's floor.
fn face_transforms() -> [Mat4; 6] {
    let rx = |deg: f32| Mat4::from_rotation_x(deg.to_radians());
    let ry = |deg: f32| Mat4::from_rotation_y(deg.to_radians());
    let rz = |deg: f32| Mat4::from_rotation_z(deg.to_radians());
    [
        Mat4::IDENTITY,
        rx(90.0),
        rx(-90.0) * ry(180.0),
        rx(180.0) * ry(90.0),
        rz(90.0) * ry(-90.0),
        rz(-90.0) * ry(90.0),
    ]
}

fn face_quad(texture: &Texture, alpha: f32) -> [SkyVertex; 4] {
    let e = CUBE_HALF_EXTENT;
    let color = [1.0, 1.0, 1.0, alpha];
    [
        SkyVertex::new([-e, -e, -e], [texture.min_u, texture.min_v], color),
        SkyVertex::new([-e, -e, e], [texture.min_u, texture.max_v], color),
        SkyVertex::new([e, -e, e], [texture.max_u, texture.max_v], color),
        SkyVertex::new([e, -e, -e], [texture.max_u, texture.min_v], color),
    ]
}

fn draw_cube<B: RenderBackend + ?Sized>(
    properties: &Properties,
    blend: BlendMode,
    textures: Option<&Textures>,
    alpha: f32,
    frame: &FrameContext,
    backend: &mut B,
) {
    backend.set_blend_mode(blend);
    let Some(textures) = textures else {
        log::debug!("Animated skybox has no frame to draw");
        return;
    };
    let base = skybox_transform(properties, frame);
    for (texture, face) in textures.in_draw_order().into_iter().zip(face_transforms()) {
        backend.draw_textured_quad_set(&texture.id, &face_quad(texture, alpha), base * face);
    }
    backend.set_blend_mode(BlendMode::Alpha);
}
