use skyloom_core::{SkyboxEntry, SkyboxKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("transitionSpeed {0} must be a finite number greater than 0")]
    NonPositiveTransitionSpeed(f32),
    #[error("maxAlpha {0} is outside 0.0..=1.0")]
    MaxAlphaOutOfRange(f32),
    #[error("Height range [{min}, {max}] is empty (min must be below max)")]
    EmptyHeightRange { min: f64, max: f64 },
    #[error("Animated skybox has no frames")]
    EmptyAnimation,
    #[error("Animated skybox frame duration must be at least 1 ms")]
    ZeroFrameDuration,
}

/// Check the semantic constraints a well-formed document can still break.
pub fn validate_entry(entry: &SkyboxEntry) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let props = &entry.properties;

    // NaN fails both comparisons
    if !(props.transition_speed > 0.0 && props.transition_speed.is_finite()) {
        errors.push(ValidationError::NonPositiveTransitionSpeed(
            props.transition_speed,
        ));
    }
    if !(0.0..=1.0).contains(&props.max_alpha) {
        errors.push(ValidationError::MaxAlphaOutOfRange(props.max_alpha));
    }

    for range in &entry.conditions.heights {
        if !range.is_valid() {
            errors.push(ValidationError::EmptyHeightRange {
                min: range.min,
                max: range.max,
            });
        }
    }

    if let SkyboxKind::AnimatedSquareTextured { animation, .. }
    | SkyboxKind::SingleSpriteAnimatedSquareTextured { animation, .. } = &entry.kind
    {
        if animation.frames().is_empty() {
            errors.push(ValidationError::EmptyAnimation);
        }
        if animation.frame_duration_ms() == 0 {
            errors.push(ValidationError::ZeroFrameDuration);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
