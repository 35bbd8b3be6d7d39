pub mod report;
pub mod runner;
pub mod scenario;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] skyloom_rules::ConfigError),
    #[error(transparent)]
    Registry(#[from] skyloom_rules::RegistryError),
}
