use thiserror::Error;

/// Errors produced while parsing a `namespace:path` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier '{0}' has an empty namespace or path")]
    MissingPart(String),

    #[error("identifier '{id}' contains invalid character '{ch}'")]
    InvalidCharacter { id: String, ch: char },
}

/// Error for an unrecognised weather name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weather '{0}' (expected clear, rain, snow or thunder)")]
pub struct UnknownWeather(pub String);
