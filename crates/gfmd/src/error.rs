//! CLI error types.

use gfmd_config::ConfigError;
use gfmd_diagrams::{DecodeError, UnknownLanguage};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Language(#[from] UnknownLanguage),

    #[error("{0}")]
    Validation(String),
}
