use crate::entry::Properties;
use crate::types::Rgba;

/// One-shot requests raised while updating alphas for a frame. Built
/// fresh every frame and handed to the rendering backend; nothing here
/// carries over to the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignals {
    /// Fog color to use instead of the host's, if any visible skybox asks.
    /// The last visible entry to ask wins.
    pub fog_override: Option<Rgba>,
    /// False once any visible skybox disables the sunrise/sunset tint.
    pub render_sun_sky_tint: bool,
}

impl Default for FrameSignals {
    fn default() -> Self {
        Self {
            fog_override: None,
            render_sun_sky_tint: true,
        }
    }
}

impl FrameSignals {
    /// Record the requests of a skybox that is visible this frame.
    pub fn apply(&mut self, properties: &Properties) {
        if properties.change_fog {
            self.fog_override = Some(properties.fog_color);
        }
        if !properties.render_sun_sky_tint {
            self.render_sun_sky_tint = false;
        }
    }
}
