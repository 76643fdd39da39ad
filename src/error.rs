//! Unified error type hierarchy for sesfix
//!
//! Provides structured error handling with PatchError for the project-file
//! patch passes and ConvertError for the post-build UF2 conversion hook.

use std::io;
use thiserror::Error;

/// Project-file patching errors.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Project file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid regex pattern: {0}")]
    RegexInvalid(String),

    #[error("Malformed project markup: {0}")]
    MalformedMarkup(String),

    #[error("IO error during patch operations: {0}")]
    IoError(#[from] io::Error),
}

/// Post-build HEX-to-UF2 conversion errors.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Required environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Converter script not found: {0}")]
    ConverterNotFound(String),

    #[error("UF2 conversion failed with exit status {status}")]
    ConversionFailed { status: i32 },

    #[error("Failed to launch converter: {0}")]
    SpawnFailed(#[from] io::Error),
}

/// Result type for patching operations
pub type PatchResult<T> = std::result::Result<T, PatchError>;

/// Result type for conversion operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_error_display() {
        let err = PatchError::FileNotFound("project.emProject".to_string());
        assert_eq!(err.to_string(), "Project file not found: project.emProject");
    }

    #[test]
    fn test_malformed_markup_display() {
        let err = PatchError::MalformedMarkup("no closing tag for folder \"nRF_Log\"".to_string());
        assert!(err.to_string().contains("nRF_Log"));
    }

    #[test]
    fn test_convert_error_display() {
        let err = ConvertError::ConversionFailed { status: 2 };
        assert_eq!(err.to_string(), "UF2 conversion failed with exit status 2");
    }

    #[test]
    fn test_missing_env_display() {
        let err = ConvertError::MissingEnv("PROJECT_DIR");
        assert_eq!(
            err.to_string(),
            "Required environment variable PROJECT_DIR is not set"
        );
    }
}
